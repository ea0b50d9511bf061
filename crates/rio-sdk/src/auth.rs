// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request authentication headers.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

use crate::config::SdkConfig;
use crate::error::{Result, SdkError};

/// Header carrying the project scope.
pub const PROJECT_HEADER: &str = "project";
/// Header carrying the organization scope.
pub const ORGANIZATION_HEADER: &str = "organization";

/// Token and scope used to authenticate API requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    project: Option<String>,
    organization: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("project", &self.project)
            .field("organization", &self.organization)
            .finish()
    }
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            project: None,
            organization: None,
        }
    }

    pub fn from_config(config: &SdkConfig) -> Self {
        Self {
            token: config.auth_token.clone(),
            project: config.project_id.clone(),
            organization: config.organization_id.clone(),
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Build the headers sent with every request.
    pub fn headers(&self) -> Result<HeaderMap> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(SdkError::InvalidInput("auth token is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        let mut authorization = header_value("authorization", &format!("Bearer {}", token))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        if let Some(project) = &self.project {
            headers.insert(
                HeaderName::from_static(PROJECT_HEADER),
                header_value(PROJECT_HEADER, project)?,
            );
        }
        if let Some(organization) = &self.organization {
            headers.insert(
                HeaderName::from_static(ORGANIZATION_HEADER),
                header_value(ORGANIZATION_HEADER, organization)?,
            );
        }

        Ok(headers)
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| SdkError::InvalidInput(format!("invalid value for {} header", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header_only() {
        let headers = Credentials::new("abc123").headers().unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[AUTHORIZATION], "Bearer abc123");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn test_scoped_headers() {
        let headers = Credentials::new("abc123")
            .with_project("project-1")
            .with_organization("org-1")
            .headers()
            .unwrap();
        assert_eq!(headers[PROJECT_HEADER], "project-1");
        assert_eq!(headers[ORGANIZATION_HEADER], "org-1");
    }

    #[test]
    fn test_from_config() {
        let config = SdkConfig::new("tok").with_project("p");
        let credentials = Credentials::from_config(&config);
        assert_eq!(credentials.project(), Some("p"));
        assert!(credentials.organization().is_none());
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            Credentials::new("  ").headers(),
            Err(SdkError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        let err = Credentials::new("tok")
            .with_project("bad\nproject")
            .headers()
            .unwrap_err();
        assert!(err.to_string().contains("project"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", Credentials::new("secret-token"));
        assert!(!debug.contains("secret-token"));
    }
}
