//! Metastore provisioning sequence
//!
//! Steps run strictly in order and stop at the first failure. Nothing created by an
//! earlier step is rolled back; re-running with the same metastore or credential name
//! fails at the create step, so pick new names after a partial run.

use crate::cli_config;
use crate::client::{
    CatalogAdminClient, MetastoreInfo, MetastoreUpdate, PermissionsUpdate,
    StorageCredentialRequest, parse_response,
};
use crate::context::SessionContext;
use crate::params::SetupParams;
use crate::validate;
use anyhow::Result;
use std::path::Path;

pub const DEFAULT_CATALOG_NAME: &str = "hive_metastore";
pub const GRANT_CATALOG: &str = "main";
pub const GRANT_PRIVILEGES: [&str; 2] = ["CREATE", "USAGE"];
/// One year; 0 would mean tokens never expire
pub const SHARING_TOKEN_LIFETIME_SECS: u64 = 31_536_000;

/// What a completed setup run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub metastore_id: String,
    pub credential_id: String,
    pub delta_sharing_enabled: bool,
}

/// Validate inputs, write the CLI profile, then provision
///
/// Validation runs first so malformed input never reaches the CLI or the config file.
pub fn run_setup<C: CatalogAdminClient + ?Sized>(
    client: &C,
    params: &SetupParams,
    ctx: &SessionContext,
    config_path: &Path,
) -> Result<ProvisionReport> {
    validate::validate_params(params)?;

    cli_config::write_cli_config(config_path, ctx)?;
    println!("✓ Wrote CLI credentials to {}", config_path.display());

    provision_metastore(client, params, ctx)
}

/// Create, configure and verify a metastore for the session's workspace
pub fn provision_metastore<C: CatalogAdminClient + ?Sized>(
    client: &C,
    params: &SetupParams,
    ctx: &SessionContext,
) -> Result<ProvisionReport> {
    println!(
        "Setting up metastore '{}' on {} ({})...",
        params.metastore,
        params.provider(),
        params.bucket
    );
    println!();

    tracing::info!(metastore = %params.metastore, "creating metastore");
    let metastore = client.create_metastore(&params.metastore, &params.bucket)?;
    let metastore_id = metastore.metastore_id;
    println!("✓ Created metastore {}", metastore_id);

    tracing::info!(%metastore_id, workspace_id = %ctx.workspace_id, "assigning metastore");
    print_output(&client.assign_metastore(&metastore_id, &ctx.workspace_id, DEFAULT_CATALOG_NAME)?);
    println!(
        "✓ Assigned metastore to workspace {} (default catalog: {})",
        ctx.workspace_id, DEFAULT_CATALOG_NAME
    );

    tracing::info!(name = %params.storage_credential_name, "creating storage credential");
    let request =
        StorageCredentialRequest::new(&params.storage_credential_name, &params.credential);
    let credential_id = client.create_storage_credential(&request)?.id;
    println!(
        "✓ Storage credential configuration {} has been set up",
        credential_id
    );

    client.update_metastore(
        &metastore_id,
        &MetastoreUpdate {
            name: Some(params.metastore.clone()),
            storage_root_credential_id: Some(credential_id.clone()),
            ..Default::default()
        },
    )?;
    println!("✓ Metastore {} has been set up", metastore_id);

    println!("Metastore summary:");
    print_output(&client.get_metastore(&metastore_id)?);

    tracing::info!(owner = %params.admin_group, "setting metastore owner");
    print_output(&client.update_metastore(
        &metastore_id,
        &MetastoreUpdate {
            owner: Some(params.admin_group.clone()),
            ..Default::default()
        },
    )?);
    println!("✓ Metastore owner set to {}", params.admin_group);

    for principal in [&params.admin_group, &ctx.user] {
        tracing::info!(%principal, catalog = GRANT_CATALOG, "granting catalog privileges");
        print_output(&client.update_permissions(
            GRANT_CATALOG,
            &PermissionsUpdate::grant(principal, &GRANT_PRIVILEGES),
        )?);
        println!(
            "✓ Granted {} on catalog {} to {}",
            GRANT_PRIVILEGES.join(", "),
            GRANT_CATALOG,
            principal
        );
    }

    println!("Current metastore setup:");
    print_output(&client.metastore_summary()?);

    tracing::info!(%metastore_id, "enabling Delta Sharing");
    print_output(&client.update_metastore(
        &metastore_id,
        &MetastoreUpdate {
            delta_sharing_enabled: Some(true),
            delta_sharing_recipient_token_lifetime_in_seconds: Some(SHARING_TOKEN_LIFETIME_SECS),
            ..Default::default()
        },
    )?);

    let delta_sharing_enabled = delta_sharing_status(client, &metastore_id)?;
    println!();
    println!("✓ Provisioning complete for metastore {}", metastore_id);

    Ok(ProvisionReport {
        metastore_id,
        credential_id,
        delta_sharing_enabled,
    })
}

/// Assign an existing metastore to another workspace
pub fn assign_workspace<C: CatalogAdminClient + ?Sized>(
    client: &C,
    metastore_id: &str,
    workspace_id: &str,
    default_catalog_name: &str,
) -> Result<()> {
    print_output(&client.assign_metastore(metastore_id, workspace_id, default_catalog_name)?);
    println!(
        "✓ Assigned metastore {} to workspace {} (default catalog: {})",
        metastore_id, workspace_id, default_catalog_name
    );
    Ok(())
}

/// Print a metastore's summary and whether Delta Sharing is on
pub fn show_status<C: CatalogAdminClient + ?Sized>(
    client: &C,
    metastore_id: &str,
) -> Result<MetastoreInfo> {
    let output = client.get_metastore(metastore_id)?;
    let info: MetastoreInfo = parse_response("get-metastore", &output)?;

    println!("Metastore summary:");
    print_output(&output);
    println!("Delta Sharing is {}", sharing_label(info.delta_sharing_enabled));
    Ok(info)
}

fn delta_sharing_status<C: CatalogAdminClient + ?Sized>(
    client: &C,
    metastore_id: &str,
) -> Result<bool> {
    let info: MetastoreInfo =
        parse_response("get-metastore", &client.get_metastore(metastore_id)?)?;
    println!("Delta Sharing is {}", sharing_label(info.delta_sharing_enabled));
    Ok(info.delta_sharing_enabled.unwrap_or(false))
}

// A missing flag is reported as disabled
fn sharing_label(enabled: Option<bool>) -> &'static str {
    if enabled.unwrap_or(false) {
        "enabled"
    } else {
        "disabled"
    }
}

// Most update commands print nothing on success
fn print_output(output: &str) {
    let trimmed = output.trim_end();
    if !trimmed.is_empty() {
        println!("{}", trimmed);
    }
}
