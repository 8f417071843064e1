//! Download orchestration: pacing, retries, and per-dataset execution.

pub mod config;
pub mod executor;
pub mod retry;
pub mod throttle;

pub use executor::{DatasetDownloader, DatasetSummary};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use throttle::Throttle;

use crate::output::OutputError;

/// Errors surfaced by the download executor.
///
/// Fetch failures are not errors at this level - they are classified and
/// recorded in the year artifact. Only failures to persist artifacts abort
/// a dataset run.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Writing an artifact or summary failed
    #[error("output error: {0}")]
    Output(#[from] OutputError),
}
