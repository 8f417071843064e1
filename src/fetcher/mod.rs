//! Per-source data fetchers.
//!
//! One adapter per upstream provider, all behind [`SourceFetcher`]. Adapters
//! differ only in URL/payload construction and request-metadata echoing; the
//! throttle + retry mechanics live in the shared [`HttpRunner`].

use crate::SourceType;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub mod bls;
pub mod census;
pub mod coingecko;
pub mod ecb;
pub mod fred;
pub mod http;
pub mod imf;
pub mod oecd;

pub use http::HttpRunner;

/// Fetch errors.
///
/// Retryable variants are consumed by the retry loop; whatever survives it
/// is captured by the orchestrator and classified, never propagated across
/// years.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP response carried one of the explicit retryable statuses
    #[error("retryable status code {status}")]
    RetryableStatus {
        /// The offending status code (429, 500, 502, 503, or 504)
        status: u16,
    },

    /// Transport-level failure (timeout, connection refused, DNS)
    #[error("network error: {0}")]
    Transport(String),

    /// A dataset identifier that should be a URL could not be parsed
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether the retry loop should re-run the attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::RetryableStatus { .. } | FetchError::Transport(_)
        )
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(e: url::ParseError) -> Self {
        FetchError::InvalidUrl(e.to_string())
    }
}

/// Result type for fetcher operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Everything observed for one (dataset, year) request.
///
/// Created once per year and never mutated; the classifier and the artifact
/// writer both read from it.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    /// Decoded response body, or a raw-text fallback object when the body
    /// was not JSON; `None` only when no payload exists at all
    pub payload: Option<Value>,
    /// Echo of the executed call: effective URL, status code, and
    /// source-specific extras such as the POSTed body
    pub request: Value,
    /// HTTP status code, or `None` when no call was made
    pub status_code: Option<u16>,
}

/// One adapter per source type (T-shaped seam of the pipeline).
///
/// `fetch_year` builds the source-specific request for a dataset identifier
/// and target year, executes it through the shared throttled/retrying
/// runner, and returns the outcome. Implementations must not panic on
/// malformed identifiers - errors flow back for classification.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// The provider this adapter talks to.
    fn source_type(&self) -> SourceType;

    /// Download one year of one dataset.
    async fn fetch_year(&self, dataset_id: &str, year: i32) -> FetchResult<RequestOutcome>;
}

/// Create the adapter for a source type.
///
/// Every variant routes somewhere - [`SourceType`] is closed, so an
/// unsupported source cannot reach this point. The IMF adapter is an
/// intentional stub that never touches the network.
pub fn create_fetcher(source_type: SourceType, runner: Arc<HttpRunner>) -> Box<dyn SourceFetcher> {
    match source_type {
        SourceType::Fred => Box::new(fred::FredFetcher::new(runner)),
        SourceType::Bls => Box::new(bls::BlsFetcher::new(runner)),
        SourceType::Coingecko => Box::new(coingecko::CoingeckoFetcher::new(runner)),
        SourceType::Oecd => Box::new(oecd::OecdFetcher::new(runner)),
        SourceType::Ecb => Box::new(ecb::EcbFetcher::new(runner)),
        SourceType::Census => Box::new(census::CensusFetcher::new(runner)),
        SourceType::Imf => Box::new(imf::ImfFetcher::new()),
    }
}
