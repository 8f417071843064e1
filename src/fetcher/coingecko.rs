//! CoinGecko adapter.
//!
//! GET against the market-chart range endpoint for one coin, windowed to a
//! calendar year in Unix seconds (Jan 1 00:00:00 through Dec 31 23:59:59
//! UTC). Prices are always quoted in USD.

use crate::fetcher::http::{HttpRunner, RequestPlan};
use crate::fetcher::{FetchError, FetchResult, RequestOutcome, SourceFetcher};
use crate::SourceType;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;

/// Fetcher for CoinGecko market-chart ranges.
pub struct CoingeckoFetcher {
    runner: Arc<HttpRunner>,
}

impl CoingeckoFetcher {
    /// Create a CoinGecko fetcher sharing the given runner.
    pub fn new(runner: Arc<HttpRunner>) -> Self {
        Self { runner }
    }
}

/// Unix-second bounds of a calendar year in UTC.
fn year_range_unix(year: i32) -> FetchResult<(i64, i64)> {
    let start = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| FetchError::InvalidUrl(format!("invalid year {year}")))?;
    let end = Utc
        .with_ymd_and_hms(year, 12, 31, 23, 59, 59)
        .single()
        .ok_or_else(|| FetchError::InvalidUrl(format!("invalid year {year}")))?;
    Ok((start.timestamp(), end.timestamp()))
}

#[async_trait]
impl SourceFetcher for CoingeckoFetcher {
    fn source_type(&self) -> SourceType {
        SourceType::Coingecko
    }

    async fn fetch_year(&self, dataset_id: &str, year: i32) -> FetchResult<RequestOutcome> {
        let (from, to) = year_range_unix(year)?;
        let url = format!("https://api.coingecko.com/api/v3/coins/{dataset_id}/market_chart/range");

        let plan = RequestPlan::get(SourceType::Coingecko, url)
            .with_query(vec![
                ("vs_currency", "usd".to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
            ])
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_unix() {
        let (from, to) = year_range_unix(2021).unwrap();
        assert_eq!(from, 1609459200); // 2021-01-01T00:00:00Z
        assert_eq!(to, 1640995199); // 2021-12-31T23:59:59Z
    }

    #[test]
    fn test_year_range_spans_whole_year() {
        let (from, to) = year_range_unix(2000).unwrap();
        // Leap year: 366 days minus the final second.
        assert_eq!(to - from, 366 * 86_400 - 1);
    }
}
