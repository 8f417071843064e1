//! Download and batch-run command implementations

use crate::catalog::Catalog;
use crate::downloader::{DatasetDownloader, DatasetSummary};
use crate::fetcher::{create_fetcher, HttpRunner};
use crate::output::{path::run_report_file, write_json};
use crate::DatasetSpec;
use chrono::{DateTime, Utc};
use clap::Parser;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::CliError;

/// Command-line interface for the economic data downloader
#[derive(Parser, Debug)]
#[command(name = "econ-data-downloader")]
#[command(about = "Download historical economic indicator data as raw JSON snapshots")]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory for downloaded artifacts
    #[arg(long, global = true, default_value = "data")]
    pub data_dir: PathBuf,
}

/// Available commands
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Download one catalog group, or a single dataset within it
    Download(DownloadArgs),

    /// Download every dataset in the catalog and write a run report
    RunAll(RunAllArgs),

    /// Inspect the embedded dataset catalog
    Catalog(super::CatalogCommand),
}

/// Download command arguments
#[derive(Parser, Debug)]
pub struct DownloadArgs {
    /// Catalog group to download (e.g. "BLS", "US Census")
    #[arg(long)]
    pub group: String,

    /// Single dataset within the group; omit to download the whole group
    #[arg(long)]
    pub dataset: Option<String>,
}

impl DownloadArgs {
    /// Execute the download command.
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let catalog = Catalog::load_embedded()?;

        let specs: Vec<DatasetSpec> = match &self.dataset {
            Some(dataset_name) => vec![catalog.dataset(&self.group, dataset_name)?],
            None => catalog.group(&self.group)?.all_specs(),
        };

        let runner = Arc::new(HttpRunner::new()?);
        let downloader = DatasetDownloader::new().with_data_dir(&cli.data_dir);

        for spec in &specs {
            let fetcher = create_fetcher(spec.source_type, runner.clone());
            downloader.run(spec, fetcher.as_ref()).await?;
        }

        Ok(())
    }
}

/// Batch-run command arguments
#[derive(Parser, Debug)]
pub struct RunAllArgs {}

impl RunAllArgs {
    /// Download every catalog dataset and write a timestamped run report.
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        let catalog = Catalog::load_embedded()?;
        let runner = Arc::new(HttpRunner::new()?);
        let downloader = DatasetDownloader::new().with_data_dir(&cli.data_dir);

        let run_started = Utc::now();
        let mut total_datasets: u32 = 0;
        let mut total_ok_years: u32 = 0;
        let mut total_error_years: u32 = 0;
        let mut dataset_entries = Vec::new();

        for spec in catalog.all_datasets() {
            total_datasets += 1;
            info!("[{total_datasets}] {} :: {}", spec.group, spec.dataset_name);

            let fetcher = create_fetcher(spec.source_type, runner.clone());
            let summary = downloader.run(&spec, fetcher.as_ref()).await?;

            total_ok_years += summary.ok_years;
            total_error_years += summary.error_years;
            dataset_entries.push(report_entry(&spec, &summary));
        }

        let (report, report_path) = finalize_run(
            &cli.data_dir,
            run_started,
            Utc::now(),
            (total_datasets, total_ok_years, total_error_years),
            dataset_entries,
        );
        write_json(&report_path, &report)?;

        info!("Completed {total_datasets} dataset downloads.");
        info!("Run report: {}", report_path.display());

        Ok(())
    }
}

/// Assemble the batch run report and its destination path.
///
/// The report id in the filename comes from the finish timestamp, so it
/// names the moment the run completed.
fn finalize_run(
    data_dir: &Path,
    run_started: DateTime<Utc>,
    run_finished: DateTime<Utc>,
    totals: (u32, u32, u32),
    datasets: Vec<Value>,
) -> (Value, PathBuf) {
    let (total_datasets, ok_years, error_years) = totals;
    let report = json!({
        "run_started_at": run_started.to_rfc3339(),
        "totals": {
            "datasets": total_datasets,
            "ok_years": ok_years,
            "error_years": error_years,
        },
        "datasets": datasets,
        "run_finished_at": run_finished.to_rfc3339(),
    });
    (report, run_report_file(data_dir, run_finished))
}

fn report_entry(spec: &DatasetSpec, summary: &DatasetSummary) -> Value {
    json!({
        "group": &spec.group,
        "dataset_name": &spec.dataset_name,
        "source_type": spec.source_type.as_str(),
        "summary_path": summary.summary_path.display().to_string(),
        "totals": {
            "ok": summary.ok_years,
            "error": summary.error_years,
        },
        "errors": &summary.errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_run_report_id_uses_finish_time() {
        let started = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 9).unwrap();
        let finished = Utc.with_ymd_and_hms(2024, 3, 5, 14, 35, 42).unwrap();

        let (report, path) =
            finalize_run(Path::new("data"), started, finished, (2, 50, 14), Vec::new());

        assert_eq!(
            path,
            Path::new("data/raw_json/_runs/run_all_20240305T143542Z.json")
        );
        assert_eq!(report["run_started_at"], started.to_rfc3339());
        assert_eq!(report["run_finished_at"], finished.to_rfc3339());
        assert_eq!(report["totals"]["datasets"], 2);
        assert_eq!(report["totals"]["ok_years"], 50);
        assert_eq!(report["totals"]["error_years"], 14);

        let keys: Vec<&str> = report
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec!["run_started_at", "totals", "datasets", "run_finished_at"]
        );
    }
}
