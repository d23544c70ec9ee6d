//! Owns the pooled HTTP client for one [`crate::Client`].

use std::{
    sync::{PoisonError, RwLock},
    time::Duration,
};

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT},
    Method, StatusCode,
};
use serde_json::Value;

use crate::{
    errors::{APIError, Error, Result, TransportErrorKind},
    http::Query,
    multipart::MultipartForm,
    CLIENT_HEADER,
};

/// Request body encodings. JSON and multipart are mutually exclusive.
#[derive(Debug)]
pub(crate) enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

/// Status, headers and body of a completed exchange.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Vec<u8>,
}

pub(crate) struct Transport {
    base_url: String,
    http: RwLock<Option<reqwest::Client>>,
    request_timeout: Duration,
    default_headers: HeaderMap,
}

impl Transport {
    pub(crate) fn new(
        base_url: &str,
        http: reqwest::Client,
        request_timeout: Duration,
        client_header: Option<&str>,
    ) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|err| Error::Config(format!("invalid base url: {err}")))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::Config(format!("invalid base url: {base_url}")));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(client_header) = client_header {
            let value = HeaderValue::from_str(client_header.trim())
                .map_err(|err| Error::Config(format!("invalid client header: {err}")))?;
            let name = HeaderName::from_bytes(CLIENT_HEADER.as_bytes())
                .map_err(|err| Error::Config(format!("invalid header name: {err}")))?;
            default_headers.insert(name, value);
        }

        Ok(Self {
            base_url,
            http: RwLock::new(Some(http)),
            request_timeout,
            default_headers,
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.http
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Drops the pool handle. Returns `true` only for the call that released it.
    pub(crate) fn close(&self) -> bool {
        self.http
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    fn pool(&self) -> Result<reqwest::Client> {
        self.http
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(Error::Closed)
    }

    fn url(&self, path_and_query: &str) -> Result<reqwest::Url> {
        let joined = if path_and_query.starts_with('/') {
            format!("{}{}", self.base_url, path_and_query)
        } else {
            format!("{}/{}", self.base_url, path_and_query)
        };
        reqwest::Url::parse(&joined).map_err(|err| Error::Config(format!("invalid path: {err}")))
    }

    /// Sends one request. Fails with [`Error::Closed`] after [`Transport::close`].
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: RequestBody,
        headers: HeaderMap,
    ) -> Result<RawResponse> {
        let http = self.pool()?;
        let url = self.url(&query.append_to(path))?;

        let mut builder = http
            .request(method, url)
            .headers(self.default_headers.clone())
            .headers(headers)
            .timeout(self.request_timeout);
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form.into_reqwest()?),
        };

        let resp = builder.send().await.map_err(to_transport_error)?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(to_transport_error)?.to_vec();
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

pub(crate) fn to_transport_error(err: reqwest::Error) -> Error {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else if err.is_request() {
        TransportErrorKind::Request
    } else {
        TransportErrorKind::Other
    };
    APIError::transport(kind, err.to_string()).into()
}
