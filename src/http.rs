use reqwest::{header::HeaderMap, StatusCode};
use serde_json::Value;

use crate::errors::APIError;

/// Header the server uses to echo a request identifier.
pub(crate) const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Ordered query parameters, percent-encoded onto the request path.
#[derive(Clone, Debug, Default)]
pub(crate) struct Query(Vec<(&'static str, String)>);

impl Query {
    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub(crate) fn push_opt<V: ToString>(&mut self, key: &'static str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn append_to(&self, path: &str) -> String {
        if self.is_empty() {
            return path.to_string();
        }
        let encoded: String = self
            .0
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", path, encoded)
    }
}

pub(crate) fn request_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Builds the error for a non-2xx response. Never fails.
///
/// The diagnostic comes from the body's `detail` key when present, then the
/// raw body, then the status reason phrase.
pub(crate) fn parse_api_error_parts(status: StatusCode, headers: &HeaderMap, body: String) -> APIError {
    let request_id = request_id_from_headers(headers);
    let status_code = status.as_u16();

    if body.trim().is_empty() {
        let status_text = status.canonical_reason().unwrap_or("request failed");
        return APIError::new(status_code, status_text).with_request_id(request_id);
    }

    if let Ok(value) = serde_json::from_str::<Value>(&body) {
        let request_id = request_id.or_else(|| {
            value
                .get("request_id")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        });
        let detail = match value.get("detail") {
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(Value::Null) | None => None,
            // FastAPI validation errors carry a list of objects.
            Some(other) => Some(other.to_string()),
        };
        if let Some(detail) = detail {
            let mut err = APIError::new(status_code, detail).with_request_id(request_id);
            err.raw_body = Some(body);
            return err;
        }
        let mut err = APIError::new(status_code, body.clone()).with_request_id(request_id);
        err.raw_body = Some(body);
        return err;
    }

    let mut err = APIError::new(status_code, body.clone()).with_request_id(request_id);
    err.raw_body = Some(body);
    err
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;
    use crate::errors::FailureKind;

    #[test]
    fn detail_string_is_preferred() {
        let err = parse_api_error_parts(
            StatusCode::NOT_FOUND,
            &HeaderMap::new(),
            r#"{"detail":"Session not found"}"#.to_string(),
        );
        assert_eq!(err.status_code, 404);
        assert_eq!(err.detail, "Session not found");
        assert_eq!(err.kind, FailureKind::Status);
        assert!(err.raw_body.is_some());
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let err = parse_api_error_parts(
            StatusCode::UNPROCESSABLE_ENTITY,
            &HeaderMap::new(),
            r#"{"detail":[{"loc":["body","provider"],"msg":"field required"}]}"#.to_string(),
        );
        assert_eq!(err.status_code, 422);
        assert_eq!(
            err.detail,
            r#"[{"loc":["body","provider"],"msg":"field required"}]"#
        );
    }

    #[test]
    fn json_without_detail_falls_back_to_raw_body() {
        let body = r#"{"error":"boom"}"#.to_string();
        let err = parse_api_error_parts(StatusCode::BAD_REQUEST, &HeaderMap::new(), body.clone());
        assert_eq!(err.detail, body);
    }

    #[test]
    fn non_json_body_is_used_verbatim() {
        let err = parse_api_error_parts(
            StatusCode::BAD_GATEWAY,
            &HeaderMap::new(),
            "upstream exploded".to_string(),
        );
        assert_eq!(err.status_code, 502);
        assert_eq!(err.detail, "upstream exploded");
    }

    #[test]
    fn empty_body_uses_reason_phrase() {
        let err = parse_api_error_parts(StatusCode::UNAUTHORIZED, &HeaderMap::new(), String::new());
        assert_eq!(err.detail, "Unauthorized");
        assert!(err.raw_body.is_none());

        let unknown = StatusCode::from_u16(599).unwrap();
        let err = parse_api_error_parts(unknown, &HeaderMap::new(), "  ".to_string());
        assert_eq!(err.detail, "request failed");
    }

    #[test]
    fn request_id_read_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req_42"));
        let err = parse_api_error_parts(StatusCode::FORBIDDEN, &headers, String::new());
        assert_eq!(err.request_id.as_deref(), Some("req_42"));
    }

    #[test]
    fn query_encodes_in_declaration_order() {
        let mut query = Query::new();
        query
            .push("skip", 0)
            .push("limit", 10)
            .push_opt("scope", Some("user profile"))
            .push_opt::<&str>("memory_type", None);
        assert_eq!(
            query.append_to("/memory/"),
            "/memory/?skip=0&limit=10&scope=user%20profile"
        );
        assert_eq!(Query::new().append_to("/users/me"), "/users/me");
    }
}
