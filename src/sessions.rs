//! Sessions API client for multi-turn conversation management.
//!
//! A session stores its message history and memory on the server. Messages are
//! managed through [`crate::MessagesClient`]; this client covers the session
//! record itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use rini::{Client, SessionCreateRequest, SessionUpdateRequest};
//!
//! let session = client
//!     .sessions()
//!     .create(
//!         SessionCreateRequest::new()
//!             .with_alias("support")
//!             .with_system_prompt("You are a friendly assistant."),
//!     )
//!     .await?;
//! let id = session["id"].as_str().unwrap_or_default();
//!
//! client
//!     .sessions()
//!     .update(id, SessionUpdateRequest {
//!         memory_mode: Some("manual".into()),
//!         ..Default::default()
//!     })
//!     .await?;
//! ```

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::{
    client::ClientInner,
    errors::{Error, Result, ValidationError},
    http::Query,
    types::{Page, SessionCreateRequest, SessionUpdateRequest},
};

const DEFAULT_PAGE: Page = Page { skip: 0, limit: 10 };

/// Client for session operations.
#[derive(Clone)]
pub struct SessionsClient {
    pub(crate) inner: Arc<ClientInner>,
}

/// Validates a session id and percent-encodes it for use as a path segment.
pub(crate) fn session_segment(session_id: &str) -> Result<String> {
    let trimmed = session_id.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(ValidationError::required("session_id")));
    }
    Ok(urlencoding::encode(trimmed).into_owned())
}

impl SessionsClient {
    /// Create a new session.
    pub async fn create(&self, req: SessionCreateRequest) -> Result<Value> {
        self.inner.ensure_open()?;
        if req.memory_mode.trim().is_empty() {
            return Err(Error::Validation(ValidationError::required("memory_mode")));
        }
        self.inner.send_json(Method::POST, "/sessions/", &req).await
    }

    /// List sessions (defaults to the first 10).
    pub async fn list(&self, page: Option<Page>) -> Result<Value> {
        self.inner.ensure_open()?;
        let page = page.unwrap_or(DEFAULT_PAGE);
        let mut query = Query::new();
        query.push("skip", page.skip).push("limit", page.limit);
        self.inner.get("/sessions/", query).await
    }

    pub async fn get(&self, session_id: &str) -> Result<Value> {
        self.inner.ensure_open()?;
        let session_id = session_segment(session_id)?;
        self.inner
            .get(&format!("/sessions/{session_id}"), Query::new())
            .await
    }

    /// Update alias, system prompt or memory mode.
    pub async fn update(&self, session_id: &str, req: SessionUpdateRequest) -> Result<Value> {
        self.inner.ensure_open()?;
        let session_id = session_segment(session_id)?;
        self.inner
            .send_json(Method::PUT, &format!("/sessions/{session_id}"), &req)
            .await
    }

    /// Delete a session together with its history.
    pub async fn delete(&self, session_id: &str) -> Result<()> {
        self.inner.ensure_open()?;
        let session_id = session_segment(session_id)?;
        self.inner.delete(&format!("/sessions/{session_id}")).await
    }
}
