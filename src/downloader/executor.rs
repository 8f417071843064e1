//! Per-dataset download executor.
//!
//! Walks the year range for one dataset, classifies every outcome, and
//! persists a snapshot per year plus a `_summary.json` rollup. Fetch
//! failures never abort the run - they become classified error records in
//! the artifacts. Only a failure to write an artifact aborts.

use crate::classify::{classify, Classification};
use crate::downloader::config::{END_YEAR, START_YEAR};
use crate::downloader::DownloadError;
use crate::fetcher::{RequestOutcome, SourceFetcher};
use crate::output::{write_json, ArtifactPaths};
use crate::DatasetSpec;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Rollup of one dataset run.
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    /// Dataset metadata echoed into every artifact
    pub metadata: Value,
    /// Count of years that classified as ok
    pub ok_years: u32,
    /// Count of years that classified as error
    pub error_years: u32,
    /// One entry per failed year
    pub errors: Vec<Value>,
    /// One entry per year, in order
    pub years: Vec<Value>,
    /// Where the summary rollup was written
    pub summary_path: PathBuf,
}

impl DatasetSummary {
    /// Render the summary in its artifact layout.
    pub fn to_value(&self) -> Value {
        json!({
            "metadata": &self.metadata,
            "totals": {
                "ok": self.ok_years,
                "error": self.error_years,
            },
            "errors": &self.errors,
            "years": &self.years,
        })
    }
}

/// Executor for downloading one dataset across the configured year range.
#[derive(Debug, Clone)]
pub struct DatasetDownloader {
    data_dir: PathBuf,
    start_year: i32,
    end_year: i32,
}

impl Default for DatasetDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetDownloader {
    /// Downloader rooted at the default `data` directory over the full
    /// year range.
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            start_year: START_YEAR,
            end_year: END_YEAR,
        }
    }

    /// Override the artifact root directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Override the inclusive year range.
    pub fn with_year_range(mut self, start_year: i32, end_year: i32) -> Self {
        self.start_year = start_year;
        self.end_year = end_year;
        self
    }

    /// Artifact root directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Download every year for `dataset`, writing one snapshot per year and
    /// a summary rollup. Re-running overwrites artifacts in place.
    pub async fn run(
        &self,
        dataset: &DatasetSpec,
        fetcher: &dyn SourceFetcher,
    ) -> Result<DatasetSummary, DownloadError> {
        let paths = ArtifactPaths::new(&self.data_dir, dataset);
        let metadata = json!({
            "group": dataset.group,
            "dataset_name": dataset.dataset_name,
            "source_type": dataset.source_type.as_str(),
            "dataset_id": dataset.dataset_id,
            "start_year": self.start_year,
            "end_year": self.end_year,
        });

        info!(
            "Downloading {} ({}) from {} to {}",
            dataset.dataset_name, dataset.source_type, self.start_year, self.end_year
        );

        let mut summary = DatasetSummary {
            metadata: metadata.clone(),
            ok_years: 0,
            error_years: 0,
            errors: Vec::new(),
            years: Vec::new(),
            summary_path: paths.summary_file(),
        };

        for year in self.start_year..=self.end_year {
            let (outcome, captured_error) =
                match fetcher.fetch_year(&dataset.dataset_id, year).await {
                    Ok(outcome) => (Some(outcome), None),
                    Err(e) => (None, Some(e)),
                };

            let (payload, request, status_code) = match outcome {
                Some(RequestOutcome {
                    payload,
                    request,
                    status_code,
                }) => (payload, request, status_code),
                None => (None, json!({}), None),
            };

            let result = classify(
                dataset.source_type,
                status_code,
                payload.as_ref(),
                captured_error.as_ref(),
            );

            let year_path = paths.year_file(year);
            write_json(
                &year_path,
                &json!({
                    "metadata": &metadata,
                    "year": year,
                    "request": &request,
                    "status": result.status.as_str(),
                    "error_type": result.error_type_str(),
                    "recommended_action": result.recommended_action.as_str(),
                    "message": &result.message,
                    "response": payload,
                }),
            )?;

            self.record_year(&mut summary, year, &year_path, &request, &result);
        }

        write_json(&summary.summary_path, &summary.to_value())?;
        info!("Summary: {}", summary.summary_path.display());

        Ok(summary)
    }

    fn record_year(
        &self,
        summary: &mut DatasetSummary,
        year: i32,
        year_path: &Path,
        request: &Value,
        result: &Classification,
    ) {
        if result.is_ok() {
            summary.ok_years += 1;
            info!("  saved {}", year_path.display());
        } else {
            summary.error_years += 1;
            summary.errors.push(json!({
                "year": year,
                "error_type": result.error_type_str(),
                "recommended_action": result.recommended_action.as_str(),
                "message": &result.message,
                "request": request,
            }));
            warn!(
                "  failed {year}: {} ({})",
                result.error_type_str(),
                result.recommended_action.as_str()
            );
        }

        summary.years.push(json!({
            "year": year,
            "status": result.status.as_str(),
            "error_type": result.error_type_str(),
            "recommended_action": result.recommended_action.as_str(),
        }));
    }
}
