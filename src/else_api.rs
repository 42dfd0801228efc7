//! Thin client for the Else vendor API.
//!
//! Else provisions per-user tenants and prototyping extensions ("mods") for
//! the embedded sandbox feature. This wrapper covers the handful of endpoints
//! Kaneo calls; everything else about Else is its problem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ELSE_PRODUCT_SLUG;

#[derive(Debug, Error)]
pub enum ElseError {
    #[error("ELSE_API_KEY is not configured")]
    NotConfigured,
    #[error("else api request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("else api returned {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BundleResponse {
    pub bundle_url: Option<String>,
    pub deployment_id: Option<String>,
    pub status: String,
    pub tenant_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TenantResponse {
    pub external_id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtensionInfo {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub is_running: bool,
    pub dev_env_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ExtensionsResponse {
    extensions: Vec<ExtensionInfo>,
}

pub struct ElseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ElseClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn api_key(&self) -> Result<&str, ElseError> {
        self.api_key.as_deref().ok_or(ElseError::NotConfigured)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ElseError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(ElseError::Api { status, body })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, ElseError> {
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.api_key()?)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        body: serde_json::Value,
    ) -> Result<T, ElseError> {
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key()?)
            .json(&body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Fetch the bundle URL for an extension by its identifier.
    pub async fn get_extension_bundle(
        &self,
        extension_identifier: &str,
    ) -> Result<BundleResponse, ElseError> {
        let url = format!(
            "{}/products/{ELSE_PRODUCT_SLUG}/extensions/{extension_identifier}/bundle",
            self.base_url
        );
        tracing::debug!(extension = extension_identifier, "fetching extension bundle");
        self.get_json(url).await
    }

    /// Create a tenant for a user. `external_id` is our user id; Else echoes
    /// it back as the tenant key.
    pub async fn create_tenant(
        &self,
        external_id: &str,
        name: &str,
    ) -> Result<TenantResponse, ElseError> {
        let url = format!("{}/products/{ELSE_PRODUCT_SLUG}/tenants", self.base_url);
        self.post_json(
            url,
            serde_json::json!({ "external_id": external_id, "name": name }),
        )
        .await
    }

    /// Create a prototyping extension inside a tenant.
    pub async fn create_extension(&self, tenant_id: &str) -> Result<ExtensionInfo, ElseError> {
        let url = format!(
            "{}/products/{ELSE_PRODUCT_SLUG}/tenants/{tenant_id}/extensions",
            self.base_url
        );
        self.post_json(url, serde_json::json!({})).await
    }

    pub async fn list_extensions(&self, tenant_id: &str) -> Result<Vec<ExtensionInfo>, ElseError> {
        let url = format!(
            "{}/products/{ELSE_PRODUCT_SLUG}/tenants/{tenant_id}/extensions",
            self.base_url
        );
        let response: ExtensionsResponse = self.get_json(url).await?;
        Ok(response.extensions)
    }

    /// Boot the dev environment backing an extension.
    pub async fn start_workspace(
        &self,
        tenant_id: &str,
        extension_id: &str,
    ) -> Result<(), ElseError> {
        let url = format!(
            "{}/products/{ELSE_PRODUCT_SLUG}/tenants/{tenant_id}/extensions/{extension_id}/start",
            self.base_url
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key()?)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
