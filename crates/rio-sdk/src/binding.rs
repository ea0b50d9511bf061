// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Bindings between concrete resource kinds and the poller.
//!
//! A binding knows how to fetch a fresh snapshot for one resource and which
//! classification table applies to it. The poller only sees the
//! [`Pollable`] capability.

use async_trait::async_trait;

use crate::classify::{BlobClassifier, BuildClassifier, Classifier, DeploymentClassifier, Verdict};
use crate::error::{PollError, Result, SdkError};
use crate::status::{
    BlobSnapshot, BlobStatus, BuildSnapshot, BuildStatus, DeploymentPhase, DeploymentSnapshot,
    DeploymentStatus, ResourceKind, Spelling, StatusSnapshot,
};

/// A resource whose readiness can be polled.
#[async_trait]
pub trait Pollable: Send {
    /// Phase vocabulary of the resource family.
    type Phase: Spelling + Send;
    /// Status vocabulary of the resource family (`()` if it has none).
    type Status: Spelling + Send;
    /// Error returned by `fetch`. Poll outcomes are converted into it.
    type Error: From<PollError> + Send;

    fn kind(&self) -> ResourceKind;

    /// Fetch a fresh snapshot. Must never return a cached value.
    async fn fetch(&mut self)
    -> std::result::Result<StatusSnapshot<Self::Phase, Self::Status>, Self::Error>;

    fn classify(&self, snapshot: &StatusSnapshot<Self::Phase, Self::Status>) -> Verdict;
}

/// Source of resource status, normally the platform REST client.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Status of a deployment-like resource (deployment, volume, network).
    async fn deployment_status(&self, kind: ResourceKind, id: &str) -> Result<DeploymentSnapshot>;

    async fn build_status(&self, id: &str) -> Result<BuildSnapshot>;

    async fn rosbag_blob_status(&self, id: &str) -> Result<BlobSnapshot>;
}

/// Binding for deployments, volumes, routed networks and native networks.
pub struct DeploymentBinding<'a, C: ?Sized> {
    source: &'a C,
    kind: ResourceKind,
    id: String,
    classifier: DeploymentClassifier,
}

impl<'a, C: StatusSource + ?Sized> DeploymentBinding<'a, C> {
    /// Bind a deployment-like resource with its default classifier.
    ///
    /// Fails with [`SdkError::InvalidInput`] for builds and rosbag blobs,
    /// which use their own bindings.
    pub fn new(source: &'a C, kind: ResourceKind, id: impl Into<String>) -> Result<Self> {
        if !kind.is_deployment_like() {
            return Err(SdkError::InvalidInput(format!(
                "{} is not provisioned as a deployment",
                kind
            )));
        }
        Ok(Self::bind(source, kind, id))
    }

    pub fn deployment(source: &'a C, id: impl Into<String>) -> Self {
        Self::bind(source, ResourceKind::Deployment, id)
    }

    pub fn volume(source: &'a C, id: impl Into<String>) -> Self {
        Self::bind(source, ResourceKind::Volume, id)
    }

    pub fn routed_network(source: &'a C, id: impl Into<String>) -> Self {
        Self::bind(source, ResourceKind::RoutedNetwork, id)
    }

    pub fn native_network(source: &'a C, id: impl Into<String>) -> Self {
        Self::bind(source, ResourceKind::NativeNetwork, id)
    }

    fn bind(source: &'a C, kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            source,
            kind,
            id: id.into(),
            classifier: DeploymentClassifier::for_kind(kind),
        }
    }

    /// Replace the classification table, e.g. to add non-recoverable codes.
    pub fn with_classifier(mut self, classifier: DeploymentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl<'a, C: StatusSource + ?Sized> Pollable for DeploymentBinding<'a, C> {
    type Phase = DeploymentPhase;
    type Status = DeploymentStatus;
    type Error = SdkError;

    fn kind(&self) -> ResourceKind {
        self.kind
    }

    async fn fetch(&mut self) -> Result<DeploymentSnapshot> {
        self.source.deployment_status(self.kind, &self.id).await
    }

    fn classify(&self, snapshot: &DeploymentSnapshot) -> Verdict {
        self.classifier.classify(snapshot)
    }
}

/// Binding for builds.
pub struct BuildBinding<'a, C: ?Sized> {
    source: &'a C,
    id: String,
    classifier: BuildClassifier,
}

impl<'a, C: StatusSource + ?Sized> BuildBinding<'a, C> {
    pub fn new(source: &'a C, id: impl Into<String>) -> Self {
        Self {
            source,
            id: id.into(),
            classifier: BuildClassifier::new(),
        }
    }

    pub fn with_classifier(mut self, classifier: BuildClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl<'a, C: StatusSource + ?Sized> Pollable for BuildBinding<'a, C> {
    type Phase = BuildStatus;
    type Status = ();
    type Error = SdkError;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Build
    }

    async fn fetch(&mut self) -> Result<BuildSnapshot> {
        self.source.build_status(&self.id).await
    }

    fn classify(&self, snapshot: &BuildSnapshot) -> Verdict {
        self.classifier.classify(snapshot)
    }
}

/// Binding for rosbag blob uploads.
pub struct RosbagBlobBinding<'a, C: ?Sized> {
    source: &'a C,
    id: String,
    classifier: BlobClassifier,
}

impl<'a, C: StatusSource + ?Sized> RosbagBlobBinding<'a, C> {
    pub fn new(source: &'a C, id: impl Into<String>) -> Self {
        Self {
            source,
            id: id.into(),
            classifier: BlobClassifier::new(),
        }
    }

    pub fn with_classifier(mut self, classifier: BlobClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl<'a, C: StatusSource + ?Sized> Pollable for RosbagBlobBinding<'a, C> {
    type Phase = BlobStatus;
    type Status = ();
    type Error = SdkError;

    fn kind(&self) -> ResourceKind {
        ResourceKind::RosbagBlob
    }

    async fn fetch(&mut self) -> Result<BlobSnapshot> {
        self.source.rosbag_blob_status(&self.id).await
    }

    fn classify(&self, snapshot: &BlobSnapshot) -> Verdict {
        self.classifier.classify(snapshot)
    }
}
