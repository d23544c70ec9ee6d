//! MCP server connections registered for the current user.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::{
    client::ClientInner,
    errors::{Error, Result, ValidationError},
    http::Query,
    types::{McpConnectionCreateRequest, McpConnectionFilter, McpConnectionUpdateRequest, Page},
};

const DEFAULT_PAGE: Page = Page {
    skip: 0,
    limit: 100,
};

/// Client for MCP connection CRUD.
#[derive(Clone)]
pub struct McpConnectionsClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl McpConnectionsClient {
    pub async fn add(&self, req: McpConnectionCreateRequest) -> Result<Value> {
        self.inner.ensure_open()?;
        if req.mcp_server_url.trim().is_empty() {
            return Err(Error::Validation(ValidationError::required(
                "mcp_server_url",
            )));
        }
        self.inner
            .send_json(Method::POST, "/mcp-connections/", &req)
            .await
    }

    /// List connections, optionally only active (or inactive) ones.
    pub async fn list(&self, filter: McpConnectionFilter) -> Result<Value> {
        self.inner.ensure_open()?;
        let page = filter.page.unwrap_or(DEFAULT_PAGE);
        let mut query = Query::new();
        query
            .push("skip", page.skip)
            .push("limit", page.limit)
            .push_opt("is_active", filter.is_active);
        self.inner.get("/mcp-connections/", query).await
    }

    pub async fn get(&self, connection_id: i64) -> Result<Value> {
        self.inner.ensure_open()?;
        self.inner
            .get(&format!("/mcp-connections/{connection_id}"), Query::new())
            .await
    }

    pub async fn update(
        &self,
        connection_id: i64,
        req: McpConnectionUpdateRequest,
    ) -> Result<Value> {
        self.inner.ensure_open()?;
        self.inner
            .send_json(
                Method::PUT,
                &format!("/mcp-connections/{connection_id}"),
                &req,
            )
            .await
    }

    pub async fn delete(&self, connection_id: i64) -> Result<()> {
        self.inner.ensure_open()?;
        self.inner
            .delete(&format!("/mcp-connections/{connection_id}"))
            .await
    }
}
