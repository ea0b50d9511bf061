// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for rio-sdk tests.
//!
//! Provides ScriptedSource, a StatusSource that replays a fixed sequence of
//! fetch results and counts how often it was asked.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use rio_sdk::{
    BlobSnapshot, BuildSnapshot, DeploymentSnapshot, ResourceKind, Result, SdkError, StatusSource,
};

/// Replays scripted results per resource family.
///
/// Running out of script is reported as a server error so a test that
/// fetches more often than expected fails loudly.
#[derive(Default)]
pub struct ScriptedSource {
    deployments: Mutex<VecDeque<Result<DeploymentSnapshot>>>,
    builds: Mutex<VecDeque<Result<BuildSnapshot>>>,
    blobs: Mutex<VecDeque<Result<BlobSnapshot>>>,
    fetches: AtomicU32,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deployments(self, steps: impl IntoIterator<Item = Result<DeploymentSnapshot>>) -> Self {
        self.deployments.lock().unwrap().extend(steps);
        self
    }

    pub fn with_builds(self, steps: impl IntoIterator<Item = Result<BuildSnapshot>>) -> Self {
        self.builds.lock().unwrap().extend(steps);
        self
    }

    pub fn with_blobs(self, steps: impl IntoIterator<Item = Result<BlobSnapshot>>) -> Self {
        self.blobs.lock().unwrap().extend(steps);
        self
    }

    /// Repeat one deployment snapshot `times` times.
    pub fn repeating_deployment(snapshot: DeploymentSnapshot, times: usize) -> Self {
        Self::new().with_deployments(std::iter::repeat_n(snapshot, times).map(Ok))
    }

    pub fn fetches(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    fn next<T>(&self, queue: &Mutex<VecDeque<Result<T>>>) -> Result<T> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        queue.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(SdkError::Server {
                code: "script".to_string(),
                message: "script exhausted".to_string(),
            })
        })
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn deployment_status(&self, _kind: ResourceKind, _id: &str) -> Result<DeploymentSnapshot> {
        self.next(&self.deployments)
    }

    async fn build_status(&self, _id: &str) -> Result<BuildSnapshot> {
        self.next(&self.builds)
    }

    async fn rosbag_blob_status(&self, _id: &str) -> Result<BlobSnapshot> {
        self.next(&self.blobs)
    }
}
