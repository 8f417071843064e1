//! CLI command for inspecting the embedded dataset catalog

use crate::catalog::Catalog;
use clap::Args;
use serde_json::json;

use super::CliError;

/// Catalog subcommand
#[derive(Debug, Args)]
pub struct CatalogCommand {
    #[command(subcommand)]
    action: CatalogAction,
}

/// Catalog actions
#[derive(Debug, clap::Subcommand)]
enum CatalogAction {
    /// List all catalog groups and their datasets
    List {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Output format for the catalog command
#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl CatalogCommand {
    /// Execute the catalog command
    pub fn execute(&self) -> Result<(), CliError> {
        match &self.action {
            CatalogAction::List { format } => self.execute_list(format),
        }
    }

    fn execute_list(&self, format: &OutputFormat) -> Result<(), CliError> {
        let catalog = Catalog::load_embedded()?;

        match format {
            OutputFormat::Human => {
                for group in catalog.groups() {
                    println!("{} ({})", group.name(), group.source_type());
                    for dataset in group.datasets() {
                        println!("  {} -> {}", dataset.name(), dataset.id());
                    }
                }
            }
            OutputFormat::Json => {
                let groups: Vec<_> = catalog
                    .groups()
                    .iter()
                    .map(|group| {
                        json!({
                            "name": group.name(),
                            "source_type": group.source_type().as_str(),
                            "datasets": group
                                .datasets()
                                .iter()
                                .map(|d| json!({"name": d.name(), "id": d.id()}))
                                .collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "groups": groups })).map_err(|e| {
                        CliError::InvalidArgument(format!("Failed to render catalog: {e}"))
                    })?
                );
            }
        }

        Ok(())
    }
}
