// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for rio-sdk.

use std::time::Duration;

use thiserror::Error;

use crate::status::{ResourceKind, SnapshotSummary};

/// Result type using SdkError.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Errors that can occur when using the SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection to the platform API failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// Request timed out.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// API returned an error response.
    #[error("server error [{code}]: {message}")]
    Server { code: String, message: String },

    /// Resource not found.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A status payload was missing required fields or had the wrong shape.
    #[error("malformed status: {0}")]
    MalformedStatus(String),

    /// A poll session ended without the resource becoming ready.
    #[error(transparent)]
    Poll(#[from] PollError),
}

impl SdkError {
    /// The poll outcome carried by this error, if any.
    pub fn as_poll(&self) -> Option<&PollError> {
        match self {
            SdkError::Poll(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(err: reqwest::Error) -> Self {
        SdkError::Connection(err.to_string())
    }
}

/// Ways a poll session can end without the resource becoming ready.
///
/// Errors raised by the status fetch itself are never converted into this
/// type; they reach the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// The resource reached, or is known to be stuck in, a state it will
    /// not recover from.
    #[error("{resource} is not progressing: {snapshot}")]
    NotProgressing {
        resource: ResourceKind,
        snapshot: SnapshotSummary,
    },

    /// Every attempt saw the resource still in progress.
    #[error(
        "{resource} not ready: retries exhausted after {attempts} attempts at {}s intervals",
        .interval.as_secs_f64()
    )]
    RetriesExhausted {
        resource: ResourceKind,
        attempts: u32,
        interval: Duration,
        last: Option<SnapshotSummary>,
    },

    /// A build finished in its failed state.
    #[error("build failed: {}", reason_or_default(.reason))]
    BuildFailed {
        reason: Option<String>,
        snapshot: SnapshotSummary,
    },

    /// A rosbag blob upload finished in its error state.
    #[error("rosbag blob upload failed: {}", reason_or_default(.reason))]
    UploadFailed {
        reason: Option<String>,
        snapshot: SnapshotSummary,
    },
}

impl PollError {
    /// The snapshot that ended the session, if one was fetched.
    pub fn snapshot(&self) -> Option<&SnapshotSummary> {
        match self {
            PollError::NotProgressing { snapshot, .. }
            | PollError::BuildFailed { snapshot, .. }
            | PollError::UploadFailed { snapshot, .. } => Some(snapshot),
            PollError::RetriesExhausted { last, .. } => last.as_ref(),
        }
    }

    /// Whether the session ended because attempts ran out.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, PollError::RetriesExhausted { .. })
    }
}

fn reason_or_default(reason: &Option<String>) -> &str {
    reason.as_deref().unwrap_or("no reason reported")
}
