//! Status command handler

use super::Session;
use crate::cli::Cli;
use crate::provision;
use anyhow::Result;

pub fn handle_status(cli: &Cli, metastore_id: &str) -> Result<()> {
    let session = Session::open(cli)?;
    session.authenticate()?;

    provision::show_status(&session.client, metastore_id)?;
    Ok(())
}
