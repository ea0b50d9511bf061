// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the SDK.

use std::time::Duration;

use crate::error::{Result, SdkError};

const DEFAULT_API_URL: &str = "https://api.rapyuta.io";

/// Configuration for the PlatformClient.
#[derive(Clone)]
pub struct SdkConfig {
    /// Base URL of the platform API.
    pub api_url: String,
    /// Bearer token used to authenticate requests.
    pub auth_token: String,
    /// Project the requests are scoped to.
    pub project_id: Option<String>,
    /// Organization the requests are scoped to.
    pub organization_id: Option<String>,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkConfig")
            .field("api_url", &self.api_url)
            .field("auth_token", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("organization_id", &self.organization_id)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: String::new(),
            project_id: None,
            organization_id: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl SdkConfig {
    /// Create a new configuration with the given token and default values.
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            ..Self::default()
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RIO_AUTH_TOKEN`: Bearer token (required)
    /// - `RIO_API_URL`: API base URL (default: "https://api.rapyuta.io")
    /// - `RIO_PROJECT_ID`: Project scope (optional)
    /// - `RIO_ORGANIZATION_ID`: Organization scope (optional)
    /// - `RIO_CONNECT_TIMEOUT_MS`: Connection timeout in milliseconds (default: 10000)
    /// - `RIO_REQUEST_TIMEOUT_MS`: Request timeout in milliseconds (default: 30000)
    pub fn from_env() -> Result<Self> {
        let auth_token = std::env::var("RIO_AUTH_TOKEN")
            .map_err(|_| SdkError::Config("RIO_AUTH_TOKEN is required".to_string()))?;

        let api_url =
            std::env::var("RIO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        validate_url(&api_url)
            .map_err(|e| SdkError::Config(format!("invalid RIO_API_URL: {}", e)))?;

        let project_id = std::env::var("RIO_PROJECT_ID").ok().filter(|v| !v.is_empty());
        let organization_id = std::env::var("RIO_ORGANIZATION_ID")
            .ok()
            .filter(|v| !v.is_empty());

        let connect_timeout_ms: u64 = std::env::var("RIO_CONNECT_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .map_err(|e| SdkError::Config(format!("invalid RIO_CONNECT_TIMEOUT_MS: {}", e)))?;

        let request_timeout_ms: u64 = std::env::var("RIO_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".to_string())
            .parse()
            .map_err(|e| SdkError::Config(format!("invalid RIO_REQUEST_TIMEOUT_MS: {}", e)))?;

        Ok(Self {
            api_url,
            auth_token,
            project_id,
            organization_id,
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            request_timeout: Duration::from_millis(request_timeout_ms),
        })
    }

    /// Set the API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the project scope.
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the organization scope.
    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check the values a client cannot work without.
    pub fn validate(&self) -> Result<()> {
        validate_url(&self.api_url)
            .map_err(|e| SdkError::Config(format!("invalid api_url: {}", e)))?;
        if self.auth_token.trim().is_empty() {
            return Err(SdkError::Config("auth_token is empty".to_string()));
        }
        Ok(())
    }
}

fn validate_url(url: &str) -> std::result::Result<(), String> {
    reqwest::Url::parse(url)
        .map_err(|e| e.to_string())
        .and_then(|parsed| match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(format!("unsupported scheme '{}'", scheme)),
        })
}
