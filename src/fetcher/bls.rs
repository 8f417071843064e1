//! BLS (Bureau of Labor Statistics) adapter.
//!
//! POST to the v2 timeseries endpoint with a single-series JSON body. A
//! registration key widens the request quota; when none is configured the
//! field is omitted entirely rather than sent empty.

use crate::fetcher::http::{HttpRunner, RequestPlan};
use crate::fetcher::{FetchResult, RequestOutcome, SourceFetcher};
use crate::{secrets, SourceType};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const TIMESERIES_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";

/// Fetcher for BLS time series.
pub struct BlsFetcher {
    runner: Arc<HttpRunner>,
}

impl BlsFetcher {
    /// Create a BLS fetcher sharing the given runner.
    pub fn new(runner: Arc<HttpRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl SourceFetcher for BlsFetcher {
    fn source_type(&self) -> SourceType {
        SourceType::Bls
    }

    async fn fetch_year(&self, dataset_id: &str, year: i32) -> FetchResult<RequestOutcome> {
        let mut body = json!({
            "seriesid": [dataset_id],
            "startyear": year.to_string(),
            "endyear": year.to_string(),
        });

        let registration_key = secrets::get_secret("BLS_API_KEY");
        if !registration_key.is_empty() {
            body["registrationkey"] = json!(registration_key);
        }

        let plan = RequestPlan::post_json(SourceType::Bls, TIMESERIES_URL, body.clone())
            .with_header("Content-Type", "application/json");

        let exchange = self.runner.execute(&plan).await?;
        Ok(RequestOutcome {
            request: json!({
                "url": TIMESERIES_URL,
                "status_code": exchange.status_code,
                "payload": body,
            }),
            status_code: Some(exchange.status_code),
            payload: Some(exchange.payload),
        })
    }
}
