// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! PlatformClient for fetching resource status from the platform API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::auth::Credentials;
use crate::binding::{BuildBinding, DeploymentBinding, RosbagBlobBinding, StatusSource};
use crate::config::SdkConfig;
use crate::error::{Result, SdkError};
use crate::poller::{PollPolicy, poll_until_ready};
use crate::status::{
    BlobSnapshot, BlobStatus, BuildSnapshot, BuildStatus, DeploymentPhase, DeploymentSnapshot,
    DeploymentStatus, ResourceKind, StatusSnapshot,
};

/// REST client for the platform API.
///
/// Holds one connection pool with the authentication headers from the
/// configuration applied to every request. Cheap to share by reference
/// across poll sessions.
pub struct PlatformClient {
    http: reqwest::Client,
    config: SdkConfig,
}

impl PlatformClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SdkConfig) -> Result<Self> {
        config.validate()?;
        let headers = Credentials::from_config(&config).headers()?;

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SdkError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = SdkConfig::from_env()?;
        Self::new(config)
    }

    /// Get the SDK configuration.
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn transport_error(&self, err: reqwest::Error) -> SdkError {
        if err.is_timeout() {
            SdkError::Timeout(timeout_millis(self.config.request_timeout))
        } else {
            SdkError::from(err)
        }
    }

    /// GET `path` and decode the JSON body.
    ///
    /// Bodies that do not match `T` are reported as
    /// [`SdkError::MalformedStatus`].
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SdkError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .map_err(|e| self.transport_error(e))?;
            return Err(SdkError::Server {
                code: status.as_u16().to_string(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| SdkError::MalformedStatus(format!("{}: {}", path, e)))
    }

    // =========================================================================
    // Resource status
    // =========================================================================

    /// Get the status of a deployment-like resource.
    #[instrument(skip(self), fields(kind = %kind, id = %id))]
    pub async fn get_deployment_status(
        &self,
        kind: ResourceKind,
        id: &str,
    ) -> Result<DeploymentSnapshot> {
        let path = status_path(kind, id)?;
        debug!("Getting deployment status");
        let body: DeploymentStatusBody = self.get_json(&path).await?;
        Ok(body.into())
    }

    /// Get the status of a build.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_build_status(&self, id: &str) -> Result<BuildSnapshot> {
        let path = status_path(ResourceKind::Build, id)?;
        debug!("Getting build status");
        let body: BuildBody = self.get_json(&path).await?;
        Ok(body.into())
    }

    /// Get the status of a rosbag blob.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_rosbag_blob_status(&self, id: &str) -> Result<BlobSnapshot> {
        let path = status_path(ResourceKind::RosbagBlob, id)?;
        debug!("Getting rosbag blob status");
        let body: BlobBody = self.get_json(&path).await?;
        Ok(body.into())
    }

    // =========================================================================
    // Provisioning waits
    // =========================================================================

    /// Wait for a deployment to be running.
    ///
    /// Uses [`PollPolicy::DEPLOYMENT`] unless a policy is given.
    #[instrument(skip(self, policy), fields(deployment_id = %id))]
    pub async fn poll_deployment_till_ready(
        &self,
        id: &str,
        policy: Option<PollPolicy>,
    ) -> Result<DeploymentSnapshot> {
        let mut binding = DeploymentBinding::deployment(self, id);
        poll_until_ready(&mut binding, policy.unwrap_or(PollPolicy::DEPLOYMENT)).await
    }

    /// Wait for a volume to be bound or available.
    #[instrument(skip(self, policy), fields(volume_id = %id))]
    pub async fn poll_volume_till_ready(
        &self,
        id: &str,
        policy: Option<PollPolicy>,
    ) -> Result<DeploymentSnapshot> {
        let mut binding = DeploymentBinding::volume(self, id);
        poll_until_ready(&mut binding, policy.unwrap_or(PollPolicy::VOLUME)).await
    }

    /// Wait for a routed network to be running.
    #[instrument(skip(self, policy), fields(network_id = %id))]
    pub async fn poll_routed_network_till_ready(
        &self,
        id: &str,
        policy: Option<PollPolicy>,
    ) -> Result<DeploymentSnapshot> {
        let mut binding = DeploymentBinding::routed_network(self, id);
        poll_until_ready(&mut binding, policy.unwrap_or(PollPolicy::ROUTED_NETWORK)).await
    }

    /// Wait for a native network to be running.
    #[instrument(skip(self, policy), fields(network_id = %id))]
    pub async fn poll_native_network_till_ready(
        &self,
        id: &str,
        policy: Option<PollPolicy>,
    ) -> Result<DeploymentSnapshot> {
        let mut binding = DeploymentBinding::native_network(self, id);
        poll_until_ready(&mut binding, policy.unwrap_or(PollPolicy::NATIVE_NETWORK)).await
    }

    /// Wait for a build to complete.
    #[instrument(skip(self, policy), fields(build_id = %id))]
    pub async fn poll_build_till_ready(
        &self,
        id: &str,
        policy: Option<PollPolicy>,
    ) -> Result<BuildSnapshot> {
        let mut binding = BuildBinding::new(self, id);
        poll_until_ready(&mut binding, policy.unwrap_or(PollPolicy::BUILD)).await
    }

    /// Wait for a rosbag blob to finish uploading.
    #[instrument(skip(self, policy), fields(blob_id = %id))]
    pub async fn poll_rosbag_blob_till_ready(
        &self,
        id: &str,
        policy: Option<PollPolicy>,
    ) -> Result<BlobSnapshot> {
        let mut binding = RosbagBlobBinding::new(self, id);
        poll_until_ready(&mut binding, policy.unwrap_or(PollPolicy::ROSBAG_BLOB)).await
    }
}

#[async_trait]
impl StatusSource for PlatformClient {
    async fn deployment_status(&self, kind: ResourceKind, id: &str) -> Result<DeploymentSnapshot> {
        self.get_deployment_status(kind, id).await
    }

    async fn build_status(&self, id: &str) -> Result<BuildSnapshot> {
        self.get_build_status(id).await
    }

    async fn rosbag_blob_status(&self, id: &str) -> Result<BlobSnapshot> {
        self.get_rosbag_blob_status(id).await
    }
}

/// Request timeout in whole milliseconds, saturating at `u64::MAX`.
fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// Relative route of a resource's status.
fn status_path(kind: ResourceKind, id: &str) -> Result<String> {
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(SdkError::InvalidInput(format!("invalid {} id: {:?}", kind, id)));
    }

    Ok(match kind {
        ResourceKind::Deployment => format!("/deployment/{}/status", id),
        ResourceKind::Volume => format!("/volume/{}/status", id),
        ResourceKind::RoutedNetwork => format!("/routednetwork/{}/status", id),
        ResourceKind::NativeNetwork => format!("/nativenetwork/{}/status", id),
        ResourceKind::Build => format!("/build/{}", id),
        ResourceKind::RosbagBlob => format!("/rosbag-blob/{}", id),
    })
}

// =========================================================================
// Response bodies
// =========================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentStatusBody {
    phase: DeploymentPhase,
    #[serde(default = "unknown_status")]
    status: DeploymentStatus,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

fn unknown_status() -> DeploymentStatus {
    DeploymentStatus::Unknown
}

impl From<DeploymentStatusBody> for DeploymentSnapshot {
    fn from(body: DeploymentStatusBody) -> Self {
        DeploymentSnapshot::new(body.phase, body.status).with_errors(body.errors.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildBody {
    status: BuildStatus,
    #[serde(default, alias = "errorString")]
    error_message: Option<String>,
}

impl From<BuildBody> for BuildSnapshot {
    fn from(body: BuildBody) -> Self {
        with_message(BuildSnapshot::of(body.status), body.error_message)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobBody {
    status: BlobStatus,
    #[serde(default)]
    error_message: Option<String>,
}

impl From<BlobBody> for BlobSnapshot {
    fn from(body: BlobBody) -> Self {
        with_message(BlobSnapshot::of(body.status), body.error_message)
    }
}

fn with_message<P>(snapshot: StatusSnapshot<P>, message: Option<String>) -> StatusSnapshot<P> {
    match message.filter(|m| !m.is_empty()) {
        Some(message) => snapshot.with_error_message(message),
        None => snapshot,
    }
}
