//! Bearer token state shared by every request on a client.

use std::sync::{PoisonError, RwLock};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::errors::{Error, Result, ValidationError};

/// Holds the optional bearer token. Last write wins; each request reads one
/// snapshot when its headers are built.
#[derive(Debug, Default)]
pub(crate) struct Authenticator {
    token: RwLock<Option<String>>,
}

impl Authenticator {
    pub(crate) fn new(token: Option<String>) -> Result<Self> {
        let auth = Self::default();
        if let Some(token) = token {
            auth.set_token(token)?;
        }
        Ok(auth)
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the token. An empty value clears it.
    pub(crate) fn set_token(&self, token: impl Into<String>) -> Result<()> {
        let normalized = normalize(token.into());
        if let Some(token) = &normalized {
            HeaderValue::from_str(&bearer(token)).map_err(|_| {
                Error::Validation(
                    ValidationError::new("token contains characters not allowed in a header")
                        .with_field("token"),
                )
            })?;
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = normalized;
        Ok(())
    }

    pub(crate) fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Authorization header for the current token, or nothing.
    pub(crate) fn headers_for_request(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.token() {
            // set_token only stores values that form a valid header
            if let Ok(mut value) = HeaderValue::from_str(&bearer(&token)) {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }
}

fn normalize(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))
        .unwrap_or(trimmed)
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_token_means_no_headers() {
        let auth = Authenticator::new(None).unwrap();
        assert!(auth.headers_for_request().is_empty());
    }

    #[test]
    fn token_becomes_bearer_header() {
        let auth = Authenticator::new(Some("abc123".into())).unwrap();
        let headers = auth.headers_for_request();
        assert_eq!(headers.len(), 1);
        let value = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc123");
        assert!(value.is_sensitive());
    }

    #[test]
    fn bearer_prefix_is_not_doubled() {
        let auth = Authenticator::new(Some("Bearer xyz".into())).unwrap();
        assert_eq!(auth.token().as_deref(), Some("xyz"));
    }

    #[test]
    fn empty_assignment_clears_token() {
        let auth = Authenticator::new(Some("abc".into())).unwrap();
        auth.set_token("   ").unwrap();
        assert_eq!(auth.token(), None);
        assert!(auth.headers_for_request().is_empty());

        auth.set_token("def").unwrap();
        auth.clear();
        assert_eq!(auth.token(), None);
    }

    #[test]
    fn invalid_header_characters_are_rejected() {
        let auth = Authenticator::new(Some("good".into())).unwrap();
        let err = auth.set_token("bad\ntoken").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(auth.token().as_deref(), Some("good"));
    }
}
