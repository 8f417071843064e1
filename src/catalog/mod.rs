//! Embedded dataset catalog
//!
//! The catalog maps group names to their source type and named datasets.
//! It is compiled into the binary so a checkout downloads the same dataset
//! set everywhere without external configuration.

use crate::{DatasetSpec, SourceType};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Embedded catalog data
const CATALOG_JSON: &str = include_str!("catalog.json");

/// Global catalog instance (loaded once)
static CATALOG: Lazy<Result<Catalog, CatalogError>> = Lazy::new(|| Catalog::from_json(CATALOG_JSON));

/// Catalog of downloadable datasets, grouped by topic.
#[derive(Debug, Clone)]
pub struct Catalog {
    groups: Vec<CatalogGroup>,
}

impl Catalog {
    /// Load the embedded catalog
    ///
    /// This is a singleton operation - the catalog is loaded once and cached.
    pub fn load() -> Result<&'static Self, &'static CatalogError> {
        CATALOG.as_ref()
    }

    /// Load the embedded catalog, returning an owned copy
    pub fn load_embedded() -> Result<Self, CatalogError> {
        Self::from_json(CATALOG_JSON)
    }

    /// Parse a catalog from JSON
    fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)
            .map_err(|e| CatalogError::ParseError(format!("Failed to parse catalog: {e}")))?;
        Ok(Self { groups: raw.groups })
    }

    /// All groups, in catalog order
    pub fn groups(&self) -> &[CatalogGroup] {
        &self.groups
    }

    /// Look up a group by name
    pub fn group(&self, name: &str) -> Result<&CatalogGroup, CatalogError> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| CatalogError::NotFound(format!("Group {name} not found in catalog")))
    }

    /// Look up one dataset within a group
    pub fn dataset(&self, group: &str, dataset_name: &str) -> Result<DatasetSpec, CatalogError> {
        let group = self.group(group)?;
        group
            .datasets
            .iter()
            .find(|d| d.name == dataset_name)
            .map(|d| group.spec_for(d))
            .ok_or_else(|| {
                CatalogError::NotFound(format!(
                    "Dataset {dataset_name} not found in group {}",
                    group.name
                ))
            })
    }

    /// Every dataset in the catalog, in catalog order
    pub fn all_datasets(&self) -> Vec<DatasetSpec> {
        self.groups
            .iter()
            .flat_map(|g| g.datasets.iter().map(|d| g.spec_for(d)))
            .collect()
    }
}

/// One catalog group: a topic with a single source type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogGroup {
    name: String,
    source_type: SourceType,
    datasets: Vec<CatalogDataset>,
}

impl CatalogGroup {
    /// Group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source type shared by every dataset in this group
    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    /// Datasets in this group, in catalog order
    pub fn datasets(&self) -> &[CatalogDataset] {
        &self.datasets
    }

    /// Every dataset in this group as a [`DatasetSpec`]
    pub fn all_specs(&self) -> Vec<DatasetSpec> {
        self.datasets.iter().map(|d| self.spec_for(d)).collect()
    }

    fn spec_for(&self, dataset: &CatalogDataset) -> DatasetSpec {
        DatasetSpec::new(&self.name, &dataset.name, self.source_type, &dataset.id)
    }
}

/// One named dataset within a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDataset {
    name: String,
    id: String,
}

impl CatalogDataset {
    /// Dataset display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source-specific dataset identifier (series id, coin id, or full URL)
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Raw catalog structure for deserialization
#[derive(Debug, Deserialize)]
struct RawCatalog {
    groups: Vec<CatalogGroup>,
}

/// Errors that can occur when working with the catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to parse catalog JSON
    #[error("catalog parse error: {0}")]
    ParseError(String),

    /// Group or dataset not found in catalog
    #[error("not found: {0}")]
    NotFound(String),
}
