//! FRED (Federal Reserve Economic Data) adapter.
//!
//! GET against the series-observations endpoint, windowed to one calendar
//! year. The API key comes from the secrets collaborator; an empty key is
//! sent as-is, which FRED treats as an unauthenticated (rate-limited)
//! request.

use crate::fetcher::http::{HttpRunner, RequestPlan};
use crate::fetcher::{FetchResult, RequestOutcome, SourceFetcher};
use crate::{secrets, SourceType};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const OBSERVATIONS_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Fetcher for FRED series observations.
pub struct FredFetcher {
    runner: Arc<HttpRunner>,
}

impl FredFetcher {
    /// Create a FRED fetcher sharing the given runner.
    pub fn new(runner: Arc<HttpRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl SourceFetcher for FredFetcher {
    fn source_type(&self) -> SourceType {
        SourceType::Fred
    }

    async fn fetch_year(&self, dataset_id: &str, year: i32) -> FetchResult<RequestOutcome> {
        let plan = RequestPlan::get(SourceType::Fred, OBSERVATIONS_URL).with_query(vec![
            ("series_id", dataset_id.to_string()),
            ("api_key", secrets::get_secret("FRED_API_KEY")),
            ("file_type", "json".to_string()),
            ("observation_start", format!("{year}-01-01")),
            ("observation_end", format!("{year}-12-31")),
        ]);

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
