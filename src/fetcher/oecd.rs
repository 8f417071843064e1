//! OECD SDMX adapter.
//!
//! The dataset identifier is itself a full data-explorer URL containing a
//! `startPeriod` template; the adapter rewrites `startPeriod`/`endPeriod`
//! to the target year, preserving quarterly or monthly granularity inferred
//! from the template. TLS certificate verification is disabled for this
//! source specifically - the upstream has recurring certificate issues that
//! are tolerated by design.

use crate::fetcher::http::{HttpRunner, RequestPlan};
use crate::fetcher::{FetchResult, RequestOutcome, SourceFetcher};
use crate::SourceType;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Fetcher for OECD SDMX data URLs.
pub struct OecdFetcher {
    runner: Arc<HttpRunner>,
}

impl OecdFetcher {
    /// Create an OECD fetcher sharing the given runner.
    pub fn new(runner: Arc<HttpRunner>) -> Self {
        Self { runner }
    }
}

/// Rewrite `startPeriod`/`endPeriod` in an SDMX URL to the target year.
///
/// Granularity comes from the existing `startPeriod` template: "-Q" means
/// quarterly (Q1..Q4), "-M" means monthly (M01..M12), anything else is
/// annual. Parameter order is preserved; missing period parameters are
/// appended.
pub fn rewrite_period_params(dataset_id: &str, year: i32) -> FetchResult<String> {
    let url = Url::parse(dataset_id)?;
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    let template = pairs
        .iter()
        .find(|(key, _)| key == "startPeriod")
        .map(|(_, value)| value.clone())
        .unwrap_or_else(|| "YYYY".to_string());

    let (start, end) = if template.contains("-Q") {
        (format!("{year}-Q1"), format!("{year}-Q4"))
    } else if template.contains("-M") {
        (format!("{year}-M01"), format!("{year}-M12"))
    } else {
        (year.to_string(), year.to_string())
    };

    let mut rewritten = url;
    {
        let mut query = rewritten.query_pairs_mut();
        query.clear();
        let mut saw_start = false;
        let mut saw_end = false;
        for (key, value) in &pairs {
            match key.as_str() {
                "startPeriod" => {
                    query.append_pair(key, &start);
                    saw_start = true;
                }
                "endPeriod" => {
                    query.append_pair(key, &end);
                    saw_end = true;
                }
                _ => {
                    query.append_pair(key, value);
                }
            }
        }
        if !saw_start {
            query.append_pair("startPeriod", &start);
        }
        if !saw_end {
            query.append_pair("endPeriod", &end);
        }
    }

    Ok(rewritten.to_string())
}

#[async_trait]
impl SourceFetcher for OecdFetcher {
    fn source_type(&self) -> SourceType {
        SourceType::Oecd
    }

    async fn fetch_year(&self, dataset_id: &str, year: i32) -> FetchResult<RequestOutcome> {
        let url = rewrite_period_params(dataset_id, year)?;

        // Browser-style headers: the data explorer rejects bare clients.
        let plan = RequestPlan::get(SourceType::Oecd, url)
            .with_header("User-Agent", "Mozilla/5.0")
            .with_header("Accept", "application/json, text/csv;q=0.9, */*;q=0.8")
            .with_header("Referer", "https://data-explorer.oecd.org/")
            .with_timeout(Duration::from_secs(45))
            .insecure();

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
