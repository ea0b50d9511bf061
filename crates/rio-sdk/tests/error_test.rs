// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error type tests for rio-sdk.

use std::time::Duration;

use rio_sdk::{
    DeploymentPhase, DeploymentSnapshot, DeploymentStatus, PollError, ResourceKind, SdkError,
    SnapshotSummary,
};

fn summary() -> SnapshotSummary {
    SnapshotSummary::from(
        &DeploymentSnapshot::new(DeploymentPhase::FailedToStart, DeploymentStatus::Error)
            .with_errors(["DEP_E151"]),
    )
}

#[test]
fn test_config_error_display() {
    let err = SdkError::Config("missing token".to_string());
    assert!(err.to_string().contains("configuration error"));
    assert!(err.to_string().contains("missing token"));
}

#[test]
fn test_timeout_error_display() {
    let err = SdkError::Timeout(5000);
    assert!(err.to_string().contains("timed out"));
    assert!(err.to_string().contains("5000"));
}

#[test]
fn test_server_error_display() {
    let err = SdkError::Server {
        code: "500".to_string(),
        message: "Internal error".to_string(),
    };
    let display = err.to_string();
    assert!(display.contains("server error"));
    assert!(display.contains("500"));
    assert!(display.contains("Internal error"));
}

#[test]
fn test_malformed_status_display() {
    let err = SdkError::MalformedStatus("missing field `phase`".to_string());
    assert!(err.to_string().contains("malformed status"));
    assert!(err.to_string().contains("phase"));
}

#[test]
fn test_not_progressing_display() {
    let err = PollError::NotProgressing {
        resource: ResourceKind::Deployment,
        snapshot: summary(),
    };
    assert_eq!(
        err.to_string(),
        "deployment is not progressing: phase=Failed to start status=Error errors=[DEP_E151]"
    );
}

#[test]
fn test_retries_exhausted_display() {
    let err = PollError::RetriesExhausted {
        resource: ResourceKind::Volume,
        attempts: 15,
        interval: Duration::from_secs(6),
        last: None,
    };
    assert_eq!(
        err.to_string(),
        "volume not ready: retries exhausted after 15 attempts at 6s intervals"
    );
    assert!(err.is_exhausted());
    assert!(err.snapshot().is_none());
}

#[test]
fn test_upload_failed_display() {
    let err = PollError::UploadFailed {
        reason: Some("device offline".to_string()),
        snapshot: summary(),
    };
    assert_eq!(err.to_string(), "rosbag blob upload failed: device offline");
    assert_eq!(err.snapshot(), Some(&summary()));
}

#[test]
fn test_poll_error_is_transparent_in_sdk_error() {
    let poll = PollError::BuildFailed {
        reason: Some("exit code 1".to_string()),
        snapshot: summary(),
    };
    let err: SdkError = poll.clone().into();
    assert_eq!(err.to_string(), poll.to_string());
    assert_eq!(err.as_poll(), Some(&poll));
}

#[test]
fn test_as_poll_on_other_errors() {
    assert!(SdkError::NotFound("x".to_string()).as_poll().is_none());
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SdkError>();
    assert_send_sync::<PollError>();
}

#[test]
fn test_from_serde_json_error() {
    let json_err: Result<(), serde_json::Error> = serde_json::from_str::<()>("invalid");

    let sdk_err: SdkError = json_err.unwrap_err().into();
    assert!(matches!(sdk_err, SdkError::Serialization(_)));
}
