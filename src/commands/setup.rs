//! Setup command handler

use super::Session;
use crate::cli::{Cli, SetupArgs};
use crate::params::{self, ParamInputs, SetupParams};
use crate::provision;
use crate::validate;
use anyhow::Result;
use std::io;

pub fn handle_setup(cli: &Cli, args: &SetupArgs) -> Result<()> {
    let params = gather_params(args)?;

    // Reject bad input before looking for the CLI or touching any files
    validate::validate_params(&params)?;

    let session = Session::open(cli)?;
    let report = provision::run_setup(
        &session.client,
        &params,
        &session.ctx,
        &session.config_path,
    )?;

    tracing::info!(
        metastore_id = %report.metastore_id,
        credential_id = %report.credential_id,
        delta_sharing = report.delta_sharing_enabled,
        "setup finished"
    );
    Ok(())
}

fn gather_params(args: &SetupArgs) -> Result<SetupParams> {
    let file_inputs = match &args.params {
        Some(path) => ParamInputs::from_toml_file(path)?,
        None => ParamInputs::default(),
    };
    let inputs = file_inputs.merge(args.inputs());

    if args.interactive {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        params::prompt_params(inputs, &mut input, &mut output)
    } else {
        Ok(params::collect_params(inputs)?)
    }
}
