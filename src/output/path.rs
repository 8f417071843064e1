//! Artifact path layout.
//!
//! Every dataset owns a directory under `data/raw_json/` named by the slug
//! of `{group} {dataset_name}`; per-year snapshots live next to a
//! `_summary.json` rollup. Batch run reports go to `data/raw_json/_runs/`.

use crate::DatasetSpec;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

const RAW_JSON_DIR: &str = "raw_json";
const RUNS_DIR: &str = "_runs";
const SUMMARY_FILE: &str = "_summary.json";

/// Lowercase a name and collapse every run of non-alphanumeric characters
/// into a single underscore, trimming leading and trailing underscores.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Resolved artifact locations for one dataset.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    dataset_dir: PathBuf,
}

impl ArtifactPaths {
    /// Paths for a dataset rooted at `data_dir`.
    pub fn new(data_dir: &Path, dataset: &DatasetSpec) -> Self {
        let slug = slugify(&format!("{} {}", dataset.group, dataset.dataset_name));
        Self {
            dataset_dir: data_dir.join(RAW_JSON_DIR).join(slug),
        }
    }

    /// Directory holding all artifacts for this dataset.
    pub fn dataset_dir(&self) -> &Path {
        &self.dataset_dir
    }

    /// Snapshot file for one year.
    pub fn year_file(&self, year: i32) -> PathBuf {
        self.dataset_dir.join(format!("{year}.json"))
    }

    /// Summary rollup file.
    pub fn summary_file(&self) -> PathBuf {
        self.dataset_dir.join(SUMMARY_FILE)
    }
}

/// Report file for a batch run started at `started_at`.
pub fn run_report_file(data_dir: &Path, started_at: DateTime<Utc>) -> PathBuf {
    data_dir.join(RAW_JSON_DIR).join(RUNS_DIR).join(format!(
        "run_all_{}.json",
        started_at.format("%Y%m%dT%H%M%SZ")
    ))
}
