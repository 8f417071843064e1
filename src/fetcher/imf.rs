//! IMF adapter - intentionally unimplemented.
//!
//! Documents an extension point: no IMF dataset has been wired up yet, so
//! this adapter never touches the network. A blank identifier yields a
//! structured "missing configuration" payload; anything else yields a
//! "not implemented" payload. Both carry a null status code, which the
//! classifier maps to `malformed_or_missing_config`.

use crate::fetcher::{FetchResult, RequestOutcome, SourceFetcher};
use crate::SourceType;
use async_trait::async_trait;
use serde_json::json;

/// Stub fetcher for the IMF source type.
pub struct ImfFetcher;

impl ImfFetcher {
    /// Create the stub.
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImfFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceFetcher for ImfFetcher {
    fn source_type(&self) -> SourceType {
        SourceType::Imf
    }

    async fn fetch_year(&self, dataset_id: &str, year: i32) -> FetchResult<RequestOutcome> {
        let payload = if dataset_id.trim().is_empty() {
            json!({
                "error": "Dataset URL is empty. Update the dataset_id with a valid IMF API URL.",
                "year": year,
            })
        } else {
            json!({
                "error": "IMF raw downloader expects a concrete IMF URL in the dataset slot.",
                "year": year,
            })
        };

        Ok(RequestOutcome {
            payload: Some(payload),
            request: json!({
                "url": dataset_id,
                "status_code": null,
            }),
            status_code: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_identifier_reports_missing_configuration() {
        let fetcher = ImfFetcher::new();
        let outcome = fetcher.fetch_year("  ", 2010).await.unwrap();
        assert_eq!(outcome.status_code, None);
        let payload = outcome.payload.unwrap();
        assert!(payload["error"]
            .as_str()
            .unwrap()
            .contains("Dataset URL is empty"));
        assert_eq!(payload["year"], 2010);
    }

    #[tokio::test]
    async fn test_concrete_identifier_reports_not_implemented() {
        let fetcher = ImfFetcher::new();
        let outcome = fetcher
            .fetch_year("https://dataservices.imf.org/REST/SDMX_JSON.svc", 1999)
            .await
            .unwrap();
        assert_eq!(outcome.status_code, None);
        let payload = outcome.payload.unwrap();
        assert!(payload["error"].as_str().unwrap().contains("concrete IMF URL"));
    }
}
