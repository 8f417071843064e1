//! # Economic Data Downloader Library
//!
//! A library for downloading historical economic indicator time series from
//! public statistical APIs. Designed for building local snapshots of
//! inflation, unemployment, GDP, exchange-rate, and demographic data.
//!
//! ## Features
//!
//! - **Multi-Source Support**: FRED, BLS, CoinGecko, OECD SDMX, ECB SDMX,
//!   US Census (IMF is a documented placeholder)
//! - **Uniform Resilience**: Every source shares one throttle + retry +
//!   classify pipeline
//! - **Raw JSON Snapshots**: One artifact per (dataset, year) plus a rollup
//!   summary, overwritten idempotently on re-run
//! - **Outcome Taxonomy**: Every download attempt is classified into a small
//!   set of actionable statuses
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use econ_data_downloader::{DatasetSpec, SourceType};
//! use econ_data_downloader::downloader::DatasetDownloader;
//! use econ_data_downloader::fetcher::{create_fetcher, HttpRunner};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = DatasetSpec::new(
//!     "BLS",
//!     "US Unemployment",
//!     SourceType::Bls,
//!     "LNS14000000",
//! );
//!
//! let runner = Arc::new(HttpRunner::new()?);
//! let fetcher = create_fetcher(dataset.source_type, runner);
//!
//! let summary = DatasetDownloader::new().run(&dataset, fetcher.as_ref()).await?;
//! println!("ok years: {}", summary.ok_years);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`catalog`] - Embedded catalog of dataset identifiers grouped by source
//! - [`fetcher`] - One adapter per source type behind a common trait, plus
//!   the shared throttled/retrying HTTP runner
//! - [`classify`] - Pure classification of request outcomes
//! - [`downloader`] - Year-range orchestration, retry policy, throttling
//! - [`output`] - JSON artifact writing and filesystem layout
//! - [`cli`] - Command implementations for the binary

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dataset catalog access
pub mod catalog;

/// CLI command implementations
pub mod cli;

/// Response classification
pub mod classify;

/// Download orchestration
pub mod downloader;

/// Per-source data fetchers
pub mod fetcher;

/// Artifact output writers
pub mod output;

/// API key lookup
pub mod secrets;

/// Upstream statistical API providers.
///
/// Each variant carries its own request shape, auth scheme, and pacing
/// requirements; see the matching module under [`fetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Federal Reserve Economic Data (St. Louis Fed)
    Fred,
    /// US Bureau of Labor Statistics
    Bls,
    /// CoinGecko market data
    Coingecko,
    /// OECD SDMX data explorer
    Oecd,
    /// European Central Bank SDMX data portal
    Ecb,
    /// US Census Bureau data API
    Census,
    /// International Monetary Fund (placeholder, no adapter implemented)
    Imf,
}

impl SourceType {
    /// All supported source types, in catalog order.
    pub const ALL: [SourceType; 7] = [
        SourceType::Fred,
        SourceType::Bls,
        SourceType::Coingecko,
        SourceType::Oecd,
        SourceType::Ecb,
        SourceType::Census,
        SourceType::Imf,
    ];

    /// Lowercase identifier used in catalogs, artifacts, and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Fred => "fred",
            SourceType::Bls => "bls",
            SourceType::Coingecko => "coingecko",
            SourceType::Oecd => "oecd",
            SourceType::Ecb => "ecb",
            SourceType::Census => "census",
            SourceType::Imf => "imf",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fred" => Ok(SourceType::Fred),
            "bls" => Ok(SourceType::Bls),
            "coingecko" => Ok(SourceType::Coingecko),
            "oecd" => Ok(SourceType::Oecd),
            "ecb" => Ok(SourceType::Ecb),
            "census" => Ok(SourceType::Census),
            "imf" => Ok(SourceType::Imf),
            _ => Err(format!("Unsupported source_type: {s}")),
        }
    }
}

/// One named economic time series to download across years.
///
/// The shape of `dataset_id` varies by source: a bare series code (FRED,
/// BLS), a dotted dimension key (ECB), or a full URL template (OECD, Census).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetSpec {
    /// Catalog group the dataset belongs to (e.g. "BLS", "US Census")
    pub group: String,
    /// Human-readable dataset name (e.g. "US Unemployment")
    pub dataset_name: String,
    /// Upstream provider
    pub source_type: SourceType,
    /// Source-specific series identifier
    pub dataset_id: String,
}

impl DatasetSpec {
    /// Create a dataset spec.
    pub fn new(
        group: impl Into<String>,
        dataset_name: impl Into<String>,
        source_type: SourceType,
        dataset_id: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            dataset_name: dataset_name.into(),
            source_type,
            dataset_id: dataset_id.into(),
        }
    }
}
