//! US Census adapter.
//!
//! The dataset identifier is a full data-API URL with a `/data/{year}/`
//! path segment and, for timeseries endpoints, a `time` query parameter;
//! the adapter rewrites both to the target year. Endpoints whose path
//! carries no vintage year (e.g. `/data/timeseries/...`) keep their path
//! untouched.

use crate::fetcher::http::{HttpRunner, RequestPlan};
use crate::fetcher::{FetchResult, RequestOutcome, SourceFetcher};
use crate::SourceType;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use url::Url;

/// Fetcher for US Census data-API URLs.
pub struct CensusFetcher {
    runner: Arc<HttpRunner>,
}

impl CensusFetcher {
    /// Create a Census fetcher sharing the given runner.
    pub fn new(runner: Arc<HttpRunner>) -> Self {
        Self { runner }
    }
}

/// Rewrite the vintage-year path segment and the `time` parameter.
pub fn rewrite_census_url(dataset_id: &str, year: i32) -> FetchResult<String> {
    let mut url = Url::parse(dataset_id)?;

    let segments: Vec<String> = url
        .path_segments()
        .map(|s| s.map(str::to_string).collect())
        .unwrap_or_default();
    let mut rewritten = segments.clone();
    for i in 0..segments.len() {
        let is_vintage = segments[i] == "data"
            && segments
                .get(i + 1)
                .is_some_and(|s| s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()));
        if is_vintage {
            rewritten[i + 1] = year.to_string();
        }
    }
    url.set_path(&rewritten.join("/"));

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (key, value) in &pairs {
            if key == "time" {
                query.append_pair(key, &year.to_string());
            } else {
                query.append_pair(key, value);
            }
        }
    }

    Ok(url.to_string())
}

#[async_trait]
impl SourceFetcher for CensusFetcher {
    fn source_type(&self) -> SourceType {
        SourceType::Census
    }

    async fn fetch_year(&self, dataset_id: &str, year: i32) -> FetchResult<RequestOutcome> {
        let url = rewrite_census_url(dataset_id, year)?;
        let plan = RequestPlan::get(SourceType::Census, url);

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
    fn test_rewrites_path_year_and_time_param() {
        let url = "https://api.census.gov/data/2020/dec/pl?get=NAME,P1_001N&for=state:*&time=2020";
        let rewritten = rewrite_census_url(url, 2023).unwrap();
        assert!(rewritten.contains("/data/2023/dec/pl"));
        assert!(rewritten.contains("time=2023"));
        assert!(!rewritten.contains("2020"));
    }

    #[test]
    fn test_path_year_without_time_param() {
        let url = "https://api.census.gov/data/2021/acs/acs1/profile?get=NAME,DP03_0062E&for=county:*";
        let rewritten = rewrite_census_url(url, 1998).unwrap();
        assert!(rewritten.contains("/data/1998/acs/acs1/profile"));
        assert!(!rewritten.contains("time="));
    }

    #[test]
    fn test_timeseries_path_is_untouched() {
        let url = "https://api.census.gov/data/timeseries/poverty/saipe?get=NAME&for=state:*&time=2021";
        let rewritten = rewrite_census_url(url, 2005).unwrap();
        assert!(rewritten.contains("/data/timeseries/poverty/saipe"));
        assert!(rewritten.contains("time=2005"));
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        assert!(rewrite_census_url("not a url", 2020).is_err());
    }
}
