//! Memory entries extracted from (or added to) sessions.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::{
    client::ClientInner,
    errors::{Error, Result, ValidationError},
    http::Query,
    sessions::session_segment,
    types::{MemoryEntryCreateRequest, MemoryEntryUpdateRequest, MemoryFilter, Page},
};

const DEFAULT_PAGE: Page = Page {
    skip: 0,
    limit: 100,
};

/// Client for memory entry CRUD.
#[derive(Clone)]
pub struct MemoryClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl MemoryClient {
    /// Add a memory entry to a session.
    pub async fn add(&self, session_id: &str, req: MemoryEntryCreateRequest) -> Result<Value> {
        self.inner.ensure_open()?;
        let session_id = session_segment(session_id)?;
        for (value, field) in [
            (&req.memory_type, "memory_type"),
            (&req.scope, "scope"),
            (&req.content, "content"),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation(ValidationError::required(field)));
            }
        }
        self.inner
            .send_json(Method::POST, &format!("/sessions/{session_id}/memory"), &req)
            .await
    }

    /// List entries across sessions, filtered by session, scope or type.
    pub async fn list(&self, filter: MemoryFilter) -> Result<Value> {
        self.inner.ensure_open()?;
        let page = filter.page.unwrap_or(DEFAULT_PAGE);
        let mut query = Query::new();
        query
            .push("skip", page.skip)
            .push("limit", page.limit)
            .push_opt("session_id", non_blank(filter.session_id))
            .push_opt("scope", non_blank(filter.scope))
            .push_opt("memory_type", non_blank(filter.memory_type));
        self.inner.get("/memory/", query).await
    }

    pub async fn get(&self, memory_id: i64) -> Result<Value> {
        self.inner.ensure_open()?;
        self.inner
            .get(&format!("/memory/{memory_id}"), Query::new())
            .await
    }

    /// Partially update an entry (`PATCH`).
    pub async fn update(&self, memory_id: i64, req: MemoryEntryUpdateRequest) -> Result<Value> {
        self.inner.ensure_open()?;
        self.inner
            .send_json(Method::PATCH, &format!("/memory/{memory_id}"), &req)
            .await
    }

    pub async fn delete(&self, memory_id: i64) -> Result<()> {
        self.inner.ensure_open()?;
        self.inner.delete(&format!("/memory/{memory_id}")).await
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
