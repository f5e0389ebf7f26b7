// Command handlers
//
// Each subcommand has its own module; `handle_command` routes to it.

pub mod assign;
pub mod setup;
pub mod status;

use crate::cli::{Cli, Commands};
use crate::cli_config;
use crate::client::CliCatalogClient;
use crate::context::SessionContext;
use crate::exec::UnityCatalogCli;
use anyhow::Result;
use std::path::PathBuf;

/// Everything a command needs to talk to the catalog service
pub struct Session {
    pub ctx: SessionContext,
    pub config_path: PathBuf,
    pub client: CliCatalogClient<UnityCatalogCli>,
}

impl Session {
    /// Resolve the session and locate the CLI; nothing is spawned or written yet
    pub fn open(cli: &Cli) -> Result<Self> {
        let ctx = SessionContext::from_env(cli.context_overrides())?;
        tracing::debug!(?ctx, "resolved session context");

        let mut uc = UnityCatalogCli::locate(&cli.cli_bin)?;
        let config_path = match &cli.config_file {
            Some(path) => {
                uc = uc.with_config_file(path);
                path.clone()
            }
            None => cli_config::default_config_path(),
        };

        Ok(Self {
            ctx,
            config_path,
            client: CliCatalogClient::new(uc),
        })
    }

    /// Write the CLI profile so later subprocesses are authenticated
    pub fn authenticate(&self) -> Result<()> {
        cli_config::write_cli_config(&self.config_path, &self.ctx)
    }
}

/// Dispatch command to appropriate handler
pub fn handle_command(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Setup(args) => setup::handle_setup(&cli, args),
        Commands::Assign {
            metastore_id,
            target_workspace_id,
            default_catalog_name,
        } => assign::handle_assign(
            &cli,
            metastore_id,
            target_workspace_id.as_deref(),
            default_catalog_name,
        ),
        Commands::Status { metastore_id } => status::handle_status(&cli, metastore_id),
    }
}
