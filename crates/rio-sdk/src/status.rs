// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Status snapshot types for provisioned resources.
//!
//! Phase and status values keep the exact spellings the platform API uses,
//! so they round-trip through serde unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kinds of asynchronously provisioned resources that can be polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Deployment,
    Volume,
    RoutedNetwork,
    NativeNetwork,
    Build,
    RosbagBlob,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Deployment => "deployment",
            ResourceKind::Volume => "volume",
            ResourceKind::RoutedNetwork => "routed network",
            ResourceKind::NativeNetwork => "native network",
            ResourceKind::Build => "build",
            ResourceKind::RosbagBlob => "rosbag blob",
        }
    }

    /// Whether this kind is provisioned as a deployment and shares the
    /// deployment phase/status vocabulary.
    pub fn is_deployment_like(&self) -> bool {
        matches!(
            self,
            ResourceKind::Deployment
                | ResourceKind::Volume
                | ResourceKind::RoutedNetwork
                | ResourceKind::NativeNetwork
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend spelling of a phase or status value.
///
/// Resource families without a separate status use `()`, which has no
/// spelling.
pub trait Spelling {
    fn spelling(&self) -> Option<&'static str>;
}

impl Spelling for () {
    fn spelling(&self) -> Option<&'static str> {
        None
    }
}

/// Phase of a deployment-like resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeploymentPhase {
    #[serde(rename = "In progress")]
    InProgress,
    #[serde(rename = "Provisioning")]
    Provisioning,
    #[serde(rename = "Succeeded")]
    Succeeded,
    #[serde(rename = "Failed to start")]
    FailedToStart,
    #[serde(rename = "Partially deprovisioned")]
    PartiallyDeprovisioned,
    #[serde(rename = "Deployment stopped")]
    DeploymentStopped,
    /// Any value this SDK does not recognize.
    #[serde(other)]
    Unknown,
}

impl DeploymentPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentPhase::InProgress => "In progress",
            DeploymentPhase::Provisioning => "Provisioning",
            DeploymentPhase::Succeeded => "Succeeded",
            DeploymentPhase::FailedToStart => "Failed to start",
            DeploymentPhase::PartiallyDeprovisioned => "Partially deprovisioned",
            DeploymentPhase::DeploymentStopped => "Deployment stopped",
            DeploymentPhase::Unknown => "Unknown",
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            DeploymentPhase::InProgress | DeploymentPhase::Provisioning
        )
    }
}

/// Status of a deployment-like resource. Orthogonal to the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeploymentStatus {
    Running,
    Pending,
    Error,
    Stopped,
    Bound,
    Released,
    Available,
    Failed,
    /// Any value this SDK does not recognize.
    #[serde(other)]
    Unknown,
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Running => "Running",
            DeploymentStatus::Pending => "Pending",
            DeploymentStatus::Error => "Error",
            DeploymentStatus::Stopped => "Stopped",
            DeploymentStatus::Bound => "Bound",
            DeploymentStatus::Released => "Released",
            DeploymentStatus::Available => "Available",
            DeploymentStatus::Failed => "Failed",
            DeploymentStatus::Unknown => "Unknown",
        }
    }
}

/// Status of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildStatus {
    BuildInProgress,
    Complete,
    BuildFailed,
    #[serde(other)]
    Unknown,
}

impl BuildStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::BuildInProgress => "BuildInProgress",
            BuildStatus::Complete => "Complete",
            BuildStatus::BuildFailed => "BuildFailed",
            BuildStatus::Unknown => "Unknown",
        }
    }
}

/// Status of a rosbag blob upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlobStatus {
    Starting,
    Uploading,
    Uploaded,
    Error,
    #[serde(other)]
    Unknown,
}

impl BlobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlobStatus::Starting => "Starting",
            BlobStatus::Uploading => "Uploading",
            BlobStatus::Uploaded => "Uploaded",
            BlobStatus::Error => "Error",
            BlobStatus::Unknown => "Unknown",
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, BlobStatus::Starting | BlobStatus::Uploading)
    }
}

macro_rules! spelled {
    ($($ty:ty),*) => {
        $(
            impl Spelling for $ty {
                fn spelling(&self) -> Option<&'static str> {
                    Some(self.as_str())
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

spelled!(DeploymentPhase, DeploymentStatus, BuildStatus, BlobStatus);

/// One observation of a resource's state.
///
/// `P` is the phase vocabulary of the resource family and `S` its status
/// vocabulary (`()` when the family has none). A snapshot is built fresh on
/// every fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot<P, S = ()> {
    phase: P,
    status: S,
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Snapshot of a deployment, volume, or network.
pub type DeploymentSnapshot = StatusSnapshot<DeploymentPhase, DeploymentStatus>;
/// Snapshot of a build.
pub type BuildSnapshot = StatusSnapshot<BuildStatus>;
/// Snapshot of a rosbag blob.
pub type BlobSnapshot = StatusSnapshot<BlobStatus>;

impl<P, S> StatusSnapshot<P, S> {
    pub fn new(phase: P, status: S) -> Self {
        Self {
            phase,
            status,
            errors: Vec::new(),
            error_message: None,
        }
    }

    /// Attach backend error codes, in the order the backend reported them.
    pub fn with_errors<I, E>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        self.errors = errors.into_iter().map(Into::into).collect();
        self
    }

    /// Attach the resource's own failure detail.
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn phase(&self) -> &P {
        &self.phase
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether any reported error code is in `codes`.
    pub fn has_any_error<T: AsRef<str>>(&self, codes: &[T]) -> bool {
        self.errors
            .iter()
            .any(|e| codes.iter().any(|code| code.as_ref() == e))
    }
}

impl<P> StatusSnapshot<P> {
    /// Snapshot for resource families that only report a single status
    /// value, such as builds and rosbag blobs.
    pub fn of(phase: P) -> Self {
        Self::new(phase, ())
    }
}

/// String form of a snapshot, attached to poll errors so they stay
/// independent of the resource family's enum types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub phase: String,
    pub status: Option<String>,
    pub errors: Vec<String>,
    pub error_message: Option<String>,
}

impl<P: Spelling, S: Spelling> From<&StatusSnapshot<P, S>> for SnapshotSummary {
    fn from(snapshot: &StatusSnapshot<P, S>) -> Self {
        Self {
            phase: snapshot.phase.spelling().unwrap_or_default().to_string(),
            status: snapshot.status.spelling().map(str::to_string),
            errors: snapshot.errors.clone(),
            error_message: snapshot.error_message.clone(),
        }
    }
}

impl fmt::Display for SnapshotSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase={}", self.phase)?;
        if let Some(status) = &self.status {
            write!(f, " status={}", status)?;
        }
        if !self.errors.is_empty() {
            write!(f, " errors=[{}]", self.errors.join(", "))?;
        }
        if let Some(message) = &self.error_message {
            write!(f, " message={:?}", message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_phase_spellings_round_trip() {
        let phases = [
            (DeploymentPhase::InProgress, "\"In progress\""),
            (DeploymentPhase::Provisioning, "\"Provisioning\""),
            (DeploymentPhase::Succeeded, "\"Succeeded\""),
            (DeploymentPhase::FailedToStart, "\"Failed to start\""),
            (
                DeploymentPhase::PartiallyDeprovisioned,
                "\"Partially deprovisioned\"",
            ),
            (DeploymentPhase::DeploymentStopped, "\"Deployment stopped\""),
        ];
        for (phase, json) in phases {
            assert_eq!(serde_json::to_string(&phase).unwrap(), json);
            assert_eq!(
                serde_json::from_str::<DeploymentPhase>(json).unwrap(),
                phase
            );
            assert_eq!(format!("\"{}\"", phase), json);
        }
    }

    #[test]
    fn test_deployment_status_spellings_round_trip() {
        let statuses = [
            DeploymentStatus::Running,
            DeploymentStatus::Pending,
            DeploymentStatus::Error,
            DeploymentStatus::Stopped,
            DeploymentStatus::Bound,
            DeploymentStatus::Released,
            DeploymentStatus::Available,
            DeploymentStatus::Failed,
            DeploymentStatus::Unknown,
        ];
        for status in statuses {
            let json = format!("\"{}\"", status.as_str());
            assert_eq!(serde_json::to_string(&status).unwrap(), json);
            assert_eq!(
                serde_json::from_str::<DeploymentStatus>(&json).unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_unrecognized_values_map_to_unknown() {
        assert_eq!(
            serde_json::from_str::<DeploymentPhase>("\"Hibernating\"").unwrap(),
            DeploymentPhase::Unknown
        );
        assert_eq!(
            serde_json::from_str::<DeploymentStatus>("\"Terminating\"").unwrap(),
            DeploymentStatus::Unknown
        );
        assert_eq!(
            serde_json::from_str::<BlobStatus>("\"Queued\"").unwrap(),
            BlobStatus::Unknown
        );
    }

    #[test]
    fn test_in_progress_phases() {
        assert!(DeploymentPhase::InProgress.is_in_progress());
        assert!(DeploymentPhase::Provisioning.is_in_progress());
        assert!(!DeploymentPhase::Succeeded.is_in_progress());
        assert!(!DeploymentPhase::FailedToStart.is_in_progress());
        assert!(BlobStatus::Starting.is_in_progress());
        assert!(BlobStatus::Uploading.is_in_progress());
        assert!(!BlobStatus::Uploaded.is_in_progress());
    }

    #[test]
    fn test_summary_of_deployment_snapshot() {
        let snapshot = DeploymentSnapshot::new(
            DeploymentPhase::Provisioning,
            DeploymentStatus::Pending,
        )
        .with_errors(["DEP_E153", "DEP_E161"]);

        let summary = SnapshotSummary::from(&snapshot);
        assert_eq!(summary.phase, "Provisioning");
        assert_eq!(summary.status.as_deref(), Some("Pending"));
        assert_eq!(summary.errors, vec!["DEP_E153", "DEP_E161"]);
        assert_eq!(
            summary.to_string(),
            "phase=Provisioning status=Pending errors=[DEP_E153, DEP_E161]"
        );
    }

    #[test]
    fn test_summary_of_blob_snapshot_has_no_status() {
        let snapshot = BlobSnapshot::of(BlobStatus::Error).with_error_message("device offline");
        let summary = SnapshotSummary::from(&snapshot);
        assert_eq!(summary.phase, "Error");
        assert!(summary.status.is_none());
        assert_eq!(summary.error_message.as_deref(), Some("device offline"));
        assert_eq!(summary.to_string(), "phase=Error message=\"device offline\"");
    }

    #[test]
    fn test_has_any_error() {
        let snapshot = DeploymentSnapshot::new(
            DeploymentPhase::InProgress,
            DeploymentStatus::Pending,
        )
        .with_errors(["DEP_E151"]);
        assert!(snapshot.has_any_error(&["DEP_E151"]));
        assert!(!snapshot.has_any_error(&["DEP_E153"]));
        assert!(!snapshot.has_any_error::<&str>(&[]));
    }

    #[test]
    fn test_resource_kind_display() {
        assert_eq!(ResourceKind::RoutedNetwork.to_string(), "routed network");
        assert!(ResourceKind::Volume.is_deployment_like());
        assert!(!ResourceKind::Build.is_deployment_like());
    }
}
