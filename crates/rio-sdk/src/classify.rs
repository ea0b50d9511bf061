// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Terminal-state classification for status snapshots.
//!
//! Every resource family follows the same shape:
//! - a success test (ready),
//! - a continue test for in-progress phases, with an escape hatch for error
//!   codes that are known not to clear on their own,
//! - and a fallback to failure for everything else.
//!
//! The escape hatch applies only to in-progress phases. A deployment that has
//! `Succeeded` but is not yet in a ready status keeps polling even if it
//! reports one of those codes.

use crate::status::{
    BlobStatus, BuildStatus, DeploymentPhase, DeploymentStatus, ResourceKind, StatusSnapshot,
};

/// Why a snapshot ended the poll session without the resource being ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Terminal failure phase, or an in-progress phase carrying a
    /// non-recoverable error code.
    NotProgressing,
    /// The build reached its failed state.
    BuildFailed { reason: Option<String> },
    /// The rosbag blob upload reached its error state.
    UploadFailed { reason: Option<String> },
}

/// Decision for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Ready,
    Continue,
    Fail(Failure),
}

impl Verdict {
    pub fn is_ready(&self) -> bool {
        matches!(self, Verdict::Ready)
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Verdict::Continue)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Verdict::Fail(_))
    }
}

/// Maps a snapshot of one resource family to a verdict.
///
/// Implementations must be pure: the same snapshot always yields the same
/// verdict.
pub trait Classifier<P, S> {
    fn classify(&self, snapshot: &StatusSnapshot<P, S>) -> Verdict;
}

/// Image pull failures on deployments do not resolve across retries.
pub const IMAGE_PULL_ERROR: &str = "DEP_E153";

/// Statuses that count as ready for any deployment-like resource.
pub const READY_STATUSES: [DeploymentStatus; 3] = [
    DeploymentStatus::Running,
    DeploymentStatus::Available,
    DeploymentStatus::Released,
];

/// Classifier shared by deployments, volumes and networks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentClassifier {
    ready_statuses: Vec<DeploymentStatus>,
    non_recoverable_errors: Vec<String>,
}

impl DeploymentClassifier {
    /// Classifier that is ready on the given statuses and treats
    /// [`IMAGE_PULL_ERROR`] as non-recoverable.
    pub fn new(ready_statuses: impl IntoIterator<Item = DeploymentStatus>) -> Self {
        Self {
            ready_statuses: ready_statuses.into_iter().collect(),
            non_recoverable_errors: vec![IMAGE_PULL_ERROR.to_string()],
        }
    }

    /// Default table for a deployment-like resource kind.
    ///
    /// All kinds share [`READY_STATUSES`]; volumes are also ready once bound.
    /// Non deployment-like kinds get the shared table.
    pub fn for_kind(kind: ResourceKind) -> Self {
        let classifier = Self::new(READY_STATUSES);
        match kind {
            ResourceKind::Volume => classifier.with_ready_status(DeploymentStatus::Bound),
            _ => classifier,
        }
    }

    pub fn with_ready_status(mut self, status: DeploymentStatus) -> Self {
        if !self.ready_statuses.contains(&status) {
            self.ready_statuses.push(status);
        }
        self
    }

    pub fn with_non_recoverable_error(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        if !self.non_recoverable_errors.contains(&code) {
            self.non_recoverable_errors.push(code);
        }
        self
    }

    /// Drop all non-recoverable codes, so in-progress phases always continue.
    pub fn without_non_recoverable_errors(mut self) -> Self {
        self.non_recoverable_errors.clear();
        self
    }

    pub fn ready_statuses(&self) -> &[DeploymentStatus] {
        &self.ready_statuses
    }

    pub fn non_recoverable_errors(&self) -> &[String] {
        &self.non_recoverable_errors
    }
}

impl Default for DeploymentClassifier {
    fn default() -> Self {
        Self::for_kind(ResourceKind::Deployment)
    }
}

impl Classifier<DeploymentPhase, DeploymentStatus> for DeploymentClassifier {
    fn classify(&self, snapshot: &StatusSnapshot<DeploymentPhase, DeploymentStatus>) -> Verdict {
        match snapshot.phase() {
            DeploymentPhase::Succeeded => {
                if self.ready_statuses.contains(snapshot.status()) {
                    Verdict::Ready
                } else {
                    Verdict::Continue
                }
            }
            phase if phase.is_in_progress() => {
                continue_unless_stuck(snapshot, &self.non_recoverable_errors)
            }
            _ => Verdict::Fail(Failure::NotProgressing),
        }
    }
}

/// Classifier for builds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildClassifier {
    non_recoverable_errors: Vec<String>,
}

impl BuildClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_non_recoverable_error(mut self, code: impl Into<String>) -> Self {
        self.non_recoverable_errors.push(code.into());
        self
    }
}

impl Classifier<BuildStatus, ()> for BuildClassifier {
    fn classify(&self, snapshot: &StatusSnapshot<BuildStatus>) -> Verdict {
        match snapshot.phase() {
            BuildStatus::Complete => Verdict::Ready,
            BuildStatus::BuildInProgress => {
                continue_unless_stuck(snapshot, &self.non_recoverable_errors)
            }
            BuildStatus::BuildFailed => Verdict::Fail(Failure::BuildFailed {
                reason: snapshot.error_message().map(str::to_string),
            }),
            BuildStatus::Unknown => Verdict::Fail(Failure::NotProgressing),
        }
    }
}

/// Classifier for rosbag blob uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobClassifier {
    non_recoverable_errors: Vec<String>,
}

impl BlobClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_non_recoverable_error(mut self, code: impl Into<String>) -> Self {
        self.non_recoverable_errors.push(code.into());
        self
    }
}

impl Classifier<BlobStatus, ()> for BlobClassifier {
    fn classify(&self, snapshot: &StatusSnapshot<BlobStatus>) -> Verdict {
        match snapshot.phase() {
            BlobStatus::Uploaded => Verdict::Ready,
            status if status.is_in_progress() => {
                continue_unless_stuck(snapshot, &self.non_recoverable_errors)
            }
            BlobStatus::Error => Verdict::Fail(Failure::UploadFailed {
                reason: snapshot.error_message().map(str::to_string),
            }),
            _ => Verdict::Fail(Failure::NotProgressing),
        }
    }
}

fn continue_unless_stuck<P, S>(snapshot: &StatusSnapshot<P, S>, codes: &[String]) -> Verdict {
    if snapshot.has_any_error(codes) {
        Verdict::Fail(Failure::NotProgressing)
    } else {
        Verdict::Continue
    }
}
