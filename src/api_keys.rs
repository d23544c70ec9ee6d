//! Provider API key vault.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::{
    client::ClientInner,
    errors::{Error, Result, ValidationError},
    http::Query,
    types::{ApiKeyCreateRequest, ApiKeyUpdateRequest, Page},
};

const DEFAULT_PAGE: Page = Page { skip: 0, limit: 10 };

/// Client for registering and managing provider API keys.
#[derive(Clone)]
pub struct ApiKeysClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl ApiKeysClient {
    /// Register a provider key (e.g. an OpenAI key) with the server.
    pub async fn register(&self, req: ApiKeyCreateRequest) -> Result<Value> {
        self.inner.ensure_open()?;
        if req.model_provider.trim().is_empty() {
            return Err(ValidationError::required("model_provider").into());
        }
        if req.api_key_value.trim().is_empty() {
            return Err(ValidationError::required("api_key_value").into());
        }
        self.inner
            .send_json(Method::POST, "/api-keys/", &req)
            .await
    }

    /// List registered keys (defaults to the first 10).
    pub async fn list(&self, page: Option<Page>) -> Result<Value> {
        self.inner.ensure_open()?;
        let page = page.unwrap_or(DEFAULT_PAGE);
        let mut query = Query::new();
        query.push("skip", page.skip).push("limit", page.limit);
        self.inner.get("/api-keys/", query).await
    }

    pub async fn get(&self, api_key_id: i64) -> Result<Value> {
        self.inner.ensure_open()?;
        self.inner
            .get(&format!("/api-keys/{api_key_id}"), Query::new())
            .await
    }

    pub async fn update(&self, api_key_id: i64, req: ApiKeyUpdateRequest) -> Result<Value> {
        self.inner.ensure_open()?;
        if req == ApiKeyUpdateRequest::default() {
            return Err(Error::Validation(ValidationError::new(
                "at least one field must be updated",
            )));
        }
        self.inner
            .send_json(Method::PUT, &format!("/api-keys/{api_key_id}"), &req)
            .await
    }

    /// Revoke (delete) a registered key.
    pub async fn revoke(&self, api_key_id: i64) -> Result<()> {
        self.inner.ensure_open()?;
        self.inner.delete(&format!("/api-keys/{api_key_id}")).await
    }
}
