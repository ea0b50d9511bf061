// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Retry loop that waits for a provisioned resource to reach a terminal state.
//!
//! A poll session fetches a snapshot, classifies it and either returns,
//! fails, or sleeps and tries again. Fetches within a session are strictly
//! sequential and the only suspension point is the sleep after a `Continue`
//! verdict that still has attempts left. No state survives between sessions.

use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::binding::Pollable;
use crate::classify::{Failure, Verdict};
use crate::error::PollError;
use crate::status::{ResourceKind, SnapshotSummary, StatusSnapshot};

/// Retry count and sleep interval for one poll session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Maximum number of fetches. Zero exhausts immediately without fetching.
    pub retry_count: u32,
    /// Pause between a `Continue` verdict and the next fetch.
    pub sleep_interval: Duration,
}

impl PollPolicy {
    pub const DEPLOYMENT: Self = Self::new(15, Duration::from_secs(6));
    pub const VOLUME: Self = Self::new(15, Duration::from_secs(6));
    pub const ROUTED_NETWORK: Self = Self::new(120, Duration::from_secs(5));
    pub const NATIVE_NETWORK: Self = Self::new(120, Duration::from_secs(5));
    pub const BUILD: Self = Self::new(120, Duration::from_secs(5));
    pub const ROSBAG_BLOB: Self = Self::new(120, Duration::from_secs(5));

    pub const fn new(retry_count: u32, sleep_interval: Duration) -> Self {
        Self {
            retry_count,
            sleep_interval,
        }
    }

    /// Documented defaults for a resource kind.
    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Deployment => Self::DEPLOYMENT,
            ResourceKind::Volume => Self::VOLUME,
            ResourceKind::RoutedNetwork => Self::ROUTED_NETWORK,
            ResourceKind::NativeNetwork => Self::NATIVE_NETWORK,
            ResourceKind::Build => Self::BUILD,
            ResourceKind::RosbagBlob => Self::ROSBAG_BLOB,
        }
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_sleep_interval(mut self, sleep_interval: Duration) -> Self {
        self.sleep_interval = sleep_interval;
        self
    }

    /// Upper bound on time spent sleeping in one session, excluding fetch latency.
    pub fn max_wait(&self) -> Duration {
        self.sleep_interval
            .saturating_mul(self.retry_count.saturating_sub(1))
    }
}

/// Successful end of a poll session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport<P, S> {
    /// The snapshot that was classified as ready.
    pub snapshot: StatusSnapshot<P, S>,
    /// Number of fetches it took, including the final one.
    pub attempts: u32,
}

/// Drives poll sessions with a fixed policy.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    policy: PollPolicy,
}

impl Poller {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    /// Poller using the documented defaults for `kind`.
    pub fn for_kind(kind: ResourceKind) -> Self {
        Self::new(PollPolicy::for_kind(kind))
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Poll `target` until it is ready, fails, or attempts run out.
    ///
    /// Errors returned by [`Pollable::fetch`] are passed through unchanged
    /// and end the session immediately. Failures decided by the classifier
    /// and exhaustion are reported as [`PollError`] converted into the
    /// target's error type.
    #[instrument(skip_all, fields(resource = %target.kind(), retry_count = self.policy.retry_count))]
    pub async fn poll<T: Pollable>(
        &self,
        target: &mut T,
    ) -> Result<PollReport<T::Phase, T::Status>, T::Error> {
        let kind = target.kind();
        let mut last = None;

        for attempt in 1..=self.policy.retry_count {
            let snapshot = target.fetch().await?;

            match target.classify(&snapshot) {
                Verdict::Ready => {
                    info!(attempt, "Resource is ready");
                    return Ok(PollReport {
                        snapshot,
                        attempts: attempt,
                    });
                }
                Verdict::Fail(failure) => {
                    let error = failure_error(kind, failure, SnapshotSummary::from(&snapshot));
                    warn!(attempt, error = %error, "Resource will not become ready");
                    return Err(error.into());
                }
                Verdict::Continue => {
                    debug!(
                        attempt,
                        snapshot = %SnapshotSummary::from(&snapshot),
                        "Resource not ready yet"
                    );
                    if attempt < self.policy.retry_count {
                        tokio::time::sleep(self.policy.sleep_interval).await;
                    }
                    last = Some(snapshot);
                }
            }
        }

        let error = PollError::RetriesExhausted {
            resource: kind,
            attempts: self.policy.retry_count,
            interval: self.policy.sleep_interval,
            last: last.as_ref().map(SnapshotSummary::from),
        };
        warn!(error = %error, "Gave up waiting for resource");
        Err(error.into())
    }
}

/// Poll `target` with `policy` and return the ready snapshot.
pub async fn poll_until_ready<T: Pollable>(
    target: &mut T,
    policy: PollPolicy,
) -> Result<StatusSnapshot<T::Phase, T::Status>, T::Error> {
    Poller::new(policy)
        .poll(target)
        .await
        .map(|report| report.snapshot)
}

fn failure_error(kind: ResourceKind, failure: Failure, snapshot: SnapshotSummary) -> PollError {
    match failure {
        Failure::NotProgressing => PollError::NotProgressing {
            resource: kind,
            snapshot,
        },
        Failure::BuildFailed { reason } => PollError::BuildFailed { reason, snapshot },
        Failure::UploadFailed { reason } => PollError::UploadFailed { reason, snapshot },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_kind() {
        assert_eq!(PollPolicy::for_kind(ResourceKind::Deployment).retry_count, 15);
        assert_eq!(
            PollPolicy::for_kind(ResourceKind::Deployment).sleep_interval,
            Duration::from_secs(6)
        );
        assert_eq!(PollPolicy::for_kind(ResourceKind::RoutedNetwork).retry_count, 120);
        assert_eq!(
            PollPolicy::for_kind(ResourceKind::NativeNetwork).sleep_interval,
            Duration::from_secs(5)
        );
        assert_eq!(PollPolicy::for_kind(ResourceKind::Build), PollPolicy::BUILD);
    }

    #[test]
    fn test_max_wait() {
        let policy = PollPolicy::new(5, Duration::from_secs(2));
        assert_eq!(policy.max_wait(), Duration::from_secs(8));
        assert_eq!(PollPolicy::new(0, Duration::from_secs(2)).max_wait(), Duration::ZERO);
    }

    #[test]
    fn test_builders() {
        let policy = PollPolicy::DEPLOYMENT
            .with_retry_count(3)
            .with_sleep_interval(Duration::from_millis(250));
        assert_eq!(policy, PollPolicy::new(3, Duration::from_millis(250)));
        assert_eq!(Poller::new(policy).policy(), policy);
    }
}
