//! Async Rust client for the Rini LLM orchestration API.
//!
//! A [`Client`] owns one pooled HTTP transport and an optional bearer token.
//! Resource families are reached through cheap sub-clients (`client.sessions()`,
//! `client.llm()`, ...) that all share the same transport and token.
//!
//! ```rust,ignore
//! use rini::{Client, Config, SessionCreateRequest};
//!
//! let client = Client::new(Config::default())?;
//! client.users().create_and_adopt_token().await?;
//! let session = client
//!     .sessions()
//!     .create(SessionCreateRequest::new().with_alias("demo"))
//!     .await?;
//! client.close();
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::result_large_err)]

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default client header value.
pub(crate) const DEFAULT_CLIENT_HEADER: &str = concat!("rini-rust/", env!("CARGO_PKG_VERSION"));

/// HTTP header carrying the client identifier.
pub(crate) const CLIENT_HEADER: &str = "X-Rini-Client";

/// Default connection timeout (5 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Default request timeout (10 minutes). Completions can be slow.
pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(600);

/// Status code reported on [`APIError`] when no HTTP response was received.
pub const NO_RESPONSE_STATUS: u16 = 0;

/// Media type used when an upload's extension is not recognized.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

mod api_keys;
mod auth;
mod client;
mod errors;
mod http;
mod llm;
mod mcp;
mod memory;
mod messages;
mod multipart;
mod sessions;
mod telemetry;
pub mod testing;
mod transport;
mod types;
mod usage;
mod users;

pub use api_keys::ApiKeysClient;
pub use client::{Client, ClientBuilder, Config, ENV_BASE_URL, ENV_TIMEOUT_SECS, ENV_TOKEN};
pub use errors::{APIError, Error, FailureKind, Result, TransportErrorKind, ValidationError};
pub use llm::LlmClient;
pub use mcp::McpConnectionsClient;
pub use memory::MemoryClient;
pub use messages::MessagesClient;
pub use multipart::guess_media_type;
pub use sessions::SessionsClient;
pub use telemetry::{HttpRequestMetrics, MetricsCallbacks, RequestContext};
pub use types::{
    ApiKeyCreateRequest, ApiKeyUpdateRequest, ChatCompletionRequest, ChatMessage,
    CostEstimationFilter, EmbeddingInput, EmbeddingRequest, ImageCompletionRequest,
    McpConnectionCreateRequest, McpConnectionFilter, McpConnectionUpdateRequest,
    LlmParams, MemoryEntryCreateRequest, MemoryEntryUpdateRequest, MemoryFilter, Page,
    SessionCreateRequest, SessionUpdateRequest, TextCompletionRequest,
};
pub use usage::UsageClient;
pub use users::UsersClient;

/// Re-exported so callers can inspect returned payloads without a direct dependency.
pub use serde_json::Value;
