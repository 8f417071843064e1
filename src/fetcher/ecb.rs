//! ECB SDMX adapter.
//!
//! The dataset identifier encodes `{flowRef}.{key}`; the adapter splits on
//! the first dot to form the REST resource path `{flowRef}/{key}` and
//! windows the request with ISO start/end dates for the year. Identifiers
//! that already contain a slash are used as the resource path verbatim.

use crate::fetcher::http::{HttpRunner, RequestPlan};
use crate::fetcher::{FetchResult, RequestOutcome, SourceFetcher};
use crate::SourceType;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const DATA_BASE_URL: &str = "https://data-api.ecb.europa.eu/service/data";

/// Fetcher for ECB data-portal series.
pub struct EcbFetcher {
    runner: Arc<HttpRunner>,
}

impl EcbFetcher {
    /// Create an ECB fetcher sharing the given runner.
    pub fn new(runner: Arc<HttpRunner>) -> Self {
        Self { runner }
    }
}

/// REST resource path for a dataset identifier.
fn resource_path(dataset_id: &str) -> String {
    if dataset_id.contains('.') && !dataset_id.contains('/') {
        if let Some((flow_ref, key)) = dataset_id.split_once('.') {
            return format!("{flow_ref}/{key}");
        }
    }
    dataset_id.to_string()
}

#[async_trait]
impl SourceFetcher for EcbFetcher {
    fn source_type(&self) -> SourceType {
        SourceType::Ecb
    }

    async fn fetch_year(&self, dataset_id: &str, year: i32) -> FetchResult<RequestOutcome> {
        let url = format!("{DATA_BASE_URL}/{}", resource_path(dataset_id));

        let plan = RequestPlan::get(SourceType::Ecb, url)
            .with_query(vec![
                ("startPeriod", format!("{year}-01-01")),
                ("endPeriod", format!("{year}-12-31")),
            ])
            .with_header("Accept", "application/json")
            .with_header("User-Agent", "econ-data-downloader");

        let exchange = self.runner.execute(&plan).await?;
        Ok(RequestOutcome {
            request: json!({
                "url": exchange.url,
                "status_code": exchange.status_code,
            }),
            status_code: Some(exchange.status_code),
            payload: Some(exchange.payload),
        })
    }
}
