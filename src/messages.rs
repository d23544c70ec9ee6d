//! Session message history.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::{
    client::ClientInner,
    errors::{Error, Result, ValidationError},
    http::Query,
    sessions::session_segment,
    types::{ChatMessage, Page},
};

const DEFAULT_PAGE: Page = Page {
    skip: 0,
    limit: 100,
};

/// Client for reading and appending session messages.
///
/// Concurrent `add` calls on one session are not ordered; await each call
/// before sending the next when order matters.
#[derive(Clone)]
pub struct MessagesClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl MessagesClient {
    /// Append a user or system message to a session.
    ///
    /// Assistant messages are normally recorded by the server as a side effect
    /// of a completion call.
    pub async fn add(&self, session_id: &str, message: ChatMessage) -> Result<Value> {
        self.inner.ensure_open()?;
        let session_id = session_segment(session_id)?;
        let role = message.role.trim();
        if role.is_empty() {
            return Err(Error::Validation(ValidationError::required("role")));
        }
        let message = ChatMessage {
            role: role.to_string(),
            content: message.content,
        };
        self.inner
            .send_json(
                Method::POST,
                &format!("/sessions/{session_id}/messages/"),
                &message,
            )
            .await
    }

    /// List a session's messages (defaults to the first 100).
    pub async fn list(&self, session_id: &str, page: Option<Page>) -> Result<Value> {
        self.inner.ensure_open()?;
        let session_id = session_segment(session_id)?;
        let page = page.unwrap_or(DEFAULT_PAGE);
        let mut query = Query::new();
        query.push("skip", page.skip).push("limit", page.limit);
        self.inner
            .get(&format!("/sessions/{session_id}/messages/"), query)
            .await
    }

    pub async fn get(&self, message_id: i64) -> Result<Value> {
        self.inner.ensure_open()?;
        self.inner
            .get(&format!("/messages/{message_id}"), Query::new())
            .await
    }

    /// The chain of parent messages leading to `message_id`.
    pub async fn history(&self, message_id: i64) -> Result<Value> {
        self.inner.ensure_open()?;
        self.inner
            .get(&format!("/messages/{message_id}/history"), Query::new())
            .await
    }
}
