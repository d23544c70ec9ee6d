use std::{env, future::Future, sync::Arc, time::Duration, time::Instant};

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::{
    api_keys::ApiKeysClient,
    auth::Authenticator,
    errors::{APIError, Error, Result},
    http::{parse_api_error_parts, request_id_from_headers, Query},
    llm::LlmClient,
    mcp::McpConnectionsClient,
    memory::MemoryClient,
    messages::MessagesClient,
    multipart::MultipartForm,
    sessions::SessionsClient,
    telemetry::{HttpRequestMetrics, MetricsCallbacks, RequestContext, Telemetry},
    transport::{RawResponse, RequestBody, Transport},
    usage::UsageClient,
    users::UsersClient,
    DEFAULT_BASE_URL, DEFAULT_CLIENT_HEADER, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
};

/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "RINI_BASE_URL";
/// Environment variable holding a bearer token.
pub const ENV_TOKEN: &str = "RINI_TOKEN";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "RINI_TIMEOUT_SECS";

#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: Option<String>,
    /// Initial bearer token. Blank values mean "unauthenticated".
    pub token: Option<String>,
    pub client_header: Option<String>,
    /// Bring your own pooled client (proxies, custom TLS).
    pub http_client: Option<reqwest::Client>,
    /// Override the connect timeout (defaults to 5s).
    pub connect_timeout: Option<Duration>,
    /// Override the request timeout (defaults to 600s).
    pub timeout: Option<Duration>,
    pub metrics: Option<MetricsCallbacks>,
}

impl Config {
    /// Reads `RINI_BASE_URL`, `RINI_TOKEN` and `RINI_TIMEOUT_SECS`.
    ///
    /// Unset or blank variables leave the corresponding field at its default.
    pub fn from_env() -> Result<Self> {
        let timeout = match non_blank_var(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|err| {
                    Error::Config(format!("invalid {ENV_TIMEOUT_SECS} {raw:?}: {err}"))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };
        Ok(Self {
            base_url: non_blank_var(ENV_BASE_URL),
            token: non_blank_var(ENV_TOKEN),
            timeout,
            ..Default::default()
        })
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Handle to the Rini API.
///
/// Clones share one transport pool and one token. The pool is released by
/// [`Client::close`] (or at the end of [`Client::scoped`]); after that every
/// call fails with [`Error::Closed`].
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    transport: Transport,
    pub(crate) auth: Authenticator,
    telemetry: Telemetry,
}

impl Client {
    pub fn new(cfg: Config) -> Result<Self> {
        let base_url = cfg
            .base_url
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let connect_timeout = cfg.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let request_timeout = cfg.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http = match cfg.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(connect_timeout)
                .build()
                .map_err(|err| Error::Config(format!("failed to build http client: {err}")))?,
        };

        let client_header = cfg
            .client_header
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CLIENT_HEADER.to_string());

        let transport = Transport::new(&base_url, http, request_timeout, Some(&client_header))?;
        let auth = Authenticator::new(cfg.token)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                auth,
                telemetry: Telemetry::new(cfg.metrics),
            }),
        })
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Builds a client from [`Config::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    /// Runs `body` with a fresh client and closes it on every exit path.
    ///
    /// The client is closed when `body` returns (successfully or not), when it
    /// panics, and when the returned future is dropped before completion.
    ///
    /// ```rust,ignore
    /// let me = Client::scoped(Config::default(), |client| async move {
    ///     client.users().create_and_adopt_token().await?;
    ///     client.users().me().await
    /// })
    /// .await?;
    /// ```
    pub async fn scoped<F, Fut, T>(cfg: Config, body: F) -> Result<T>
    where
        F: FnOnce(Client) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let client = Client::new(cfg)?;
        let _guard = CloseOnDrop(client.clone());
        body(client).await
    }

    pub fn base_url(&self) -> &str {
        self.inner.transport.base_url()
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.inner.auth.token()
    }

    /// Replaces the bearer token used by all subsequent requests.
    ///
    /// A blank token clears authentication. Requests already in flight keep
    /// the token they were sent with.
    pub fn set_token(&self, token: impl Into<String>) -> Result<()> {
        self.inner.auth.set_token(token)
    }

    pub fn clear_token(&self) {
        self.inner.auth.clear();
    }

    /// Releases the transport pool. Returns `true` for the call that released it.
    pub fn close(&self) -> bool {
        let released = self.inner.transport.close();
        #[cfg(feature = "tracing")]
        {
            if released {
                tracing::debug!(base_url = %self.base_url(), "rini client closed");
            }
        }
        released
    }

    pub fn is_closed(&self) -> bool {
        self.inner.transport.is_closed()
    }

    pub fn users(&self) -> UsersClient {
        UsersClient {
            inner: self.inner.clone(),
        }
    }

    pub fn api_keys(&self) -> ApiKeysClient {
        ApiKeysClient {
            inner: self.inner.clone(),
        }
    }

    pub fn sessions(&self) -> SessionsClient {
        SessionsClient {
            inner: self.inner.clone(),
        }
    }

    pub fn messages(&self) -> MessagesClient {
        MessagesClient {
            inner: self.inner.clone(),
        }
    }

    pub fn llm(&self) -> LlmClient {
        LlmClient {
            inner: self.inner.clone(),
        }
    }

    pub fn mcp_connections(&self) -> McpConnectionsClient {
        McpConnectionsClient {
            inner: self.inner.clone(),
        }
    }

    pub fn memory(&self) -> MemoryClient {
        MemoryClient {
            inner: self.inner.clone(),
        }
    }

    pub fn usage(&self) -> UsageClient {
        UsageClient {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url())
            .field("authenticated", &self.token().is_some())
            .field("closed", &self.is_closed())
            .finish()
    }
}

struct CloseOnDrop(Client);

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Fluent alternative to filling in a [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ClientBuilder {
    cfg: Config,
}

impl ClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.cfg.base_url = Some(base_url.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.cfg.token = Some(token.into());
        self
    }

    pub fn client_header(mut self, value: impl Into<String>) -> Self {
        self.cfg.client_header = Some(value.into());
        self
    }

    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.cfg.http_client = Some(http);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.connect_timeout = Some(timeout);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.cfg.timeout = Some(timeout);
        self
    }

    pub fn metrics(mut self, metrics: MetricsCallbacks) -> Self {
        self.cfg.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Result<Client> {
        Client::new(self.cfg)
    }
}

impl ClientInner {
    /// Fails with [`Error::Closed`] once the transport has been released.
    ///
    /// Operations call this before any local validation or file access so a
    /// closed client reports `Closed` whatever the arguments.
    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.transport.is_closed() {
            return Err(Error::Closed);
        }
        Ok(())
    }

    /// Single dispatch path for every operation.
    ///
    /// Success bodies are decoded as JSON (`null` for empty / 204 bodies);
    /// non-2xx responses become [`APIError`]s via the error translator.
    pub(crate) async fn call(
        &self,
        method: Method,
        path: &str,
        query: Query,
        body: RequestBody,
    ) -> Result<Value> {
        let fut = self.dispatch(method.clone(), path, query, body);
        #[cfg(feature = "tracing")]
        let fut = tracing::Instrument::instrument(
            fut,
            tracing::debug_span!("rini.http", method = %method, path = %path),
        );
        fut.await
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: Query,
        body: RequestBody,
    ) -> Result<Value> {
        let ctx = RequestContext::new(method.as_str(), path);
        let headers = self.auth.headers_for_request();
        let start = Instant::now();

        let resp = match self.transport.send(method, path, &query, body, headers).await {
            Ok(resp) => resp,
            Err(err) => {
                if err.is_transport() {
                    self.record(ctx, start, None, Some(err.to_string()));
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %err, "transport error");
                }
                return Err(err);
            }
        };

        let status = resp.status;
        let ctx = ctx.with_request_id(request_id_from_headers(&resp.headers));
        if !status.is_success() {
            self.record(
                ctx,
                start,
                Some(status.as_u16()),
                Some(format!("http {}", status.as_u16())),
            );
            #[cfg(feature = "tracing")]
            tracing::warn!(status = %status, "request failed");
            let RawResponse { headers, body, .. } = resp;
            let body = String::from_utf8_lossy(&body).into_owned();
            return Err(parse_api_error_parts(status, &headers, body).into());
        }

        self.record(ctx, start, Some(status.as_u16()), None);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            status = %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "request completed"
        );
        decode_success_body(status, &resp.body)
    }

    fn record(
        &self,
        context: RequestContext,
        start: Instant,
        status: Option<u16>,
        error: Option<String>,
    ) {
        if self.telemetry.http_enabled() {
            self.telemetry.record_http(HttpRequestMetrics {
                latency: start.elapsed(),
                status,
                error,
                context,
            });
        }
    }

    pub(crate) async fn get(&self, path: &str, query: Query) -> Result<Value> {
        self.call(Method::GET, path, query, RequestBody::Empty).await
    }

    /// Sends `body` serialized as JSON.
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        let value = serde_json::to_value(body)?;
        self.call(method, path, Query::new(), RequestBody::Json(value))
            .await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> Result<Value> {
        self.call(Method::POST, path, Query::new(), RequestBody::Empty)
            .await
    }

    pub(crate) async fn send_multipart(&self, path: &str, form: MultipartForm) -> Result<Value> {
        self.call(Method::POST, path, Query::new(), RequestBody::Multipart(form))
            .await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.call(Method::DELETE, path, Query::new(), RequestBody::Empty)
            .await
            .map(|_| ())
    }
}

pub(crate) fn decode_success_body(status: StatusCode, body: &[u8]) -> Result<Value> {
    if status == StatusCode::NO_CONTENT || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|err| {
        APIError::malformed(
            format!("response body is not valid JSON: {err}"),
            Some(String::from_utf8_lossy(body).into_owned()),
        )
        .into()
    })
}
