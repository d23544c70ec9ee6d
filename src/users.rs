//! User accounts and token issuance.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    client::ClientInner,
    errors::Result,
    http::Query,
};

/// Client for user operations.
#[derive(Clone)]
pub struct UsersClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl UsersClient {
    /// Create a new user. The response carries the user's access token.
    pub async fn create(&self) -> Result<Value> {
        self.inner.ensure_open()?;
        self.inner.post_empty("/users/").await
    }

    /// Create a new user and use its token for every later request on this client.
    ///
    /// The token is read from `access_token` (or `token`). The created user is
    /// returned unchanged either way; when the body carries no token the
    /// current token is kept, so check [`crate::Client::token`] if that matters.
    pub async fn create_and_adopt_token(&self) -> Result<Value> {
        let user = self.create().await?;
        match extract_token(&user) {
            Some(token) => {
                self.inner.auth.set_token(token)?;
                #[cfg(feature = "tracing")]
                tracing::info!(user_id = ?user.get("id"), "adopted token for new user");
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(user_id = ?user.get("id"), "user response carried no token");
            }
        }
        Ok(user)
    }

    /// Fetch the user the current token belongs to.
    pub async fn me(&self) -> Result<Value> {
        self.inner.ensure_open()?;
        self.inner.get("/users/me", Query::new()).await
    }
}

fn extract_token(user: &Value) -> Option<&str> {
    ["access_token", "token"]
        .iter()
        .filter_map(|key| user.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn token_prefers_access_token() {
        let user = json!({"id": 1, "access_token": "a", "token": "b"});
        assert_eq!(extract_token(&user), Some("a"));
        assert_eq!(extract_token(&json!({"token": "abc123"})), Some("abc123"));
        assert_eq!(extract_token(&json!({"access_token": " ", "token": "t"})), Some("t"));
        assert_eq!(extract_token(&json!({"id": 7})), None);
        assert_eq!(extract_token(&json!({"access_token": 5})), None);
    }
}
