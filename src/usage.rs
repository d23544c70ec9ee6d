//! Usage accounting.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    client::ClientInner,
    errors::{Error, Result, ValidationError},
    http::Query,
    memory::non_blank,
    types::CostEstimationFilter,
};

#[derive(Clone)]
pub struct UsageClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl UsageClient {
    /// Estimated spend, optionally narrowed by date range, session, provider or model.
    pub async fn cost_estimation(&self, filter: CostEstimationFilter) -> Result<Value> {
        self.inner.ensure_open()?;
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            if start > end {
                return Err(Error::Validation(
                    ValidationError::new("start_date must not be after end_date")
                        .with_field("start_date"),
                ));
            }
        }
        let mut query = Query::new();
        query
            .push_opt("start_date", filter.start_date.map(|d| d.format("%Y-%m-%d")))
            .push_opt("end_date", filter.end_date.map(|d| d.format("%Y-%m-%d")))
            .push_opt("session_id", non_blank(filter.session_id))
            .push_opt("provider", non_blank(filter.provider))
            .push_opt("model", non_blank(filter.model));
        self.inner.get("/usage/cost-estimation/", query).await
    }
}
