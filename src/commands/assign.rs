//! Assign command handler

use super::Session;
use crate::cli::Cli;
use crate::provision;
use anyhow::Result;

pub fn handle_assign(
    cli: &Cli,
    metastore_id: &str,
    target_workspace_id: Option<&str>,
    default_catalog_name: &str,
) -> Result<()> {
    let session = Session::open(cli)?;
    session.authenticate()?;

    let workspace_id = target_workspace_id.unwrap_or(session.ctx.workspace_id.as_str());
    provision::assign_workspace(
        &session.client,
        metastore_id,
        workspace_id,
        default_catalog_name,
    )
}
