use std::{fmt, sync::Arc, time::Duration};

/// User-provided callbacks for emitting metrics without taking on a tracing dependency.
#[derive(Clone, Default)]
pub struct MetricsCallbacks {
    pub http_request: Option<Arc<dyn Fn(HttpRequestMetrics) + Send + Sync>>,
}

impl fmt::Debug for MetricsCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsCallbacks")
            .field(
                "http_request",
                &self.http_request.as_ref().map(|_| "callback"),
            )
            .finish()
    }
}

/// Request metadata attached to every metrics event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub method: String,
    pub path: String,
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        if let Some(id) = request_id {
            if !id.trim().is_empty() {
                self.request_id = Some(id);
            }
        }
        self
    }
}

/// HTTP request latency and outcome.
///
/// `status` is `None` when no response was received.
#[derive(Clone, Debug)]
pub struct HttpRequestMetrics {
    pub latency: Duration,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub context: RequestContext,
}

/// Internal helper that owns the registered callbacks (if any).
#[derive(Clone, Default)]
pub(crate) struct Telemetry {
    callbacks: MetricsCallbacks,
}

impl Telemetry {
    pub(crate) fn new(callbacks: Option<MetricsCallbacks>) -> Self {
        Self {
            callbacks: callbacks.unwrap_or_default(),
        }
    }

    pub(crate) fn http_enabled(&self) -> bool {
        self.callbacks.http_request.is_some()
    }

    pub(crate) fn record_http(&self, metrics: HttpRequestMetrics) {
        if let Some(cb) = &self.callbacks.http_request {
            cb(metrics);
        }
    }
}
