// Unity Catalog metastore setup
// Validates operator input, then drives the `databricks unity-catalog` CLI step by step

pub mod cli;
pub mod cli_config;
pub mod client;
pub mod commands;
pub mod context;
pub mod error;
pub mod exec;
pub mod params;
pub mod provision;
pub mod validate;

// Re-export commonly used items
pub use client::{CatalogAdminClient, CliCatalogClient};
pub use context::SessionContext;
pub use error::SetupError;
pub use params::{CloudCredential, CloudProvider, SetupParams};
pub use provision::{ProvisionReport, provision_metastore, run_setup};
