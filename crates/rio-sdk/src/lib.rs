// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! rio SDK
//!
//! Client SDK for the rapyuta.io cloud robotics platform.
//!
//! Deployments, volumes, networks, builds and rosbag uploads are provisioned
//! asynchronously: the API accepts the request and the resource moves
//! through a series of phases afterwards. This crate provides typed status
//! snapshots for those resources and a poller that waits for them to become
//! ready.
//!
//! # Architecture
//!
//! - [`StatusSnapshot`]: one observation of a resource's phase, status and
//!   error codes.
//! - [`Classifier`]: per resource family, turns a snapshot into a
//!   [`Verdict`] (ready, continue, or fail).
//! - [`Poller`]: fetches and classifies until the resource is ready, fails,
//!   or the [`PollPolicy`] runs out of attempts.
//! - [`Pollable`]: the capability a binding provides to the poller.
//!   [`DeploymentBinding`], [`BuildBinding`] and [`RosbagBlobBinding`] wire
//!   a [`StatusSource`] such as [`PlatformClient`] to a classifier.
//!
//! # Example
//!
//! ```no_run
//! use rio_sdk::{PlatformClient, PollPolicy, SdkConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SdkConfig::new("my-auth-token").with_project("project-id");
//! let client = PlatformClient::new(config)?;
//!
//! // Wait with the deployment defaults (15 attempts, 6 seconds apart)
//! let snapshot = client.poll_deployment_till_ready("dep-id", None).await?;
//! println!("Deployment is {}", snapshot.status());
//!
//! // Or with an explicit policy
//! let policy = PollPolicy::new(30, Duration::from_secs(10));
//! client.poll_build_till_ready("build-id", Some(policy)).await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod binding;
mod classify;
mod client;
mod config;
mod error;
mod poller;
mod status;

pub use auth::{Credentials, ORGANIZATION_HEADER, PROJECT_HEADER};
pub use binding::{BuildBinding, DeploymentBinding, Pollable, RosbagBlobBinding, StatusSource};
pub use classify::{
    BlobClassifier, BuildClassifier, Classifier, DeploymentClassifier, Failure, IMAGE_PULL_ERROR,
    READY_STATUSES, Verdict,
};
pub use client::PlatformClient;
pub use config::SdkConfig;
pub use error::{PollError, Result, SdkError};
pub use poller::{PollPolicy, PollReport, Poller, poll_until_ready};
pub use status::{
    BlobSnapshot, BlobStatus, BuildSnapshot, BuildStatus, DeploymentPhase, DeploymentSnapshot,
    DeploymentStatus, ResourceKind, SnapshotSummary, Spelling, StatusSnapshot,
};
