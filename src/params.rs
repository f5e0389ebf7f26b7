//! Operator inputs for a setup run
//!
//! Values are layered: placeholder defaults, then an optional TOML file, then
//! flags/environment, then (optionally) interactive prompts. Nothing here checks
//! formats; that happens in `validate` before any remote call.

use crate::error::SetupError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

pub const SELECT_ONE: &str = "Select one";

pub const DEFAULT_AWS_BUCKET: &str = "s3://bucket";
pub const DEFAULT_IAM_ROLE: &str = "arn:aws:iam::997819012307:role/role";
pub const DEFAULT_AZURE_BUCKET: &str =
    "abfss://$CONTAINER_NAME@$STORAGE_ACCOUNT_NAME.dfs.core.windows.net/";
pub const DEFAULT_DIRECTORY_ID: &str = "9f37a392-f0ae-4280-9796-f1864a10effc";
pub const DEFAULT_APPLICATION_ID: &str = "ed573937-9c53-4ed6-b016-929e765443eb";
pub const DEFAULT_CLIENT_SECRET: &str = "xxxxx";
pub const DEFAULT_METASTORE: &str = "unity-catalog";
pub const DEFAULT_STORAGE_CREDENTIAL: &str = "default-credential";
pub const DEFAULT_ADMIN_GROUP: &str = "metastore-admin-users";

/// Cloud selector as presented to the operator, including the unselected sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloudChoice {
    #[default]
    Unselected,
    Aws,
    Azure,
}

impl CloudChoice {
    /// Turn the selector into a provider, failing if nothing was picked
    pub fn resolve(self) -> Result<CloudProvider, SetupError> {
        match self {
            CloudChoice::Unselected => {
                Err(SetupError::Selection("Need to select a cloud".to_string()))
            }
            CloudChoice::Aws => Ok(CloudProvider::Aws),
            CloudChoice::Azure => Ok(CloudProvider::Azure),
        }
    }
}

impl FromStr for CloudChoice {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(SELECT_ONE) {
            return Ok(CloudChoice::Unselected);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "aws" => Ok(CloudChoice::Aws),
            "azure" => Ok(CloudChoice::Azure),
            other => Err(SetupError::Selection(format!(
                "Unsupported cloud '{}': choose AWS or Azure",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudProvider {
    Aws,
    Azure,
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudProvider::Aws => write!(f, "AWS"),
            CloudProvider::Azure => write!(f, "Azure"),
        }
    }
}

/// Cloud-specific authorization for the storage credential
#[derive(Clone, PartialEq, Eq)]
pub enum CloudCredential {
    Aws {
        iam_role: String,
    },
    Azure {
        directory_id: String,
        application_id: String,
        client_secret: String,
    },
}

impl CloudCredential {
    pub fn provider(&self) -> CloudProvider {
        match self {
            CloudCredential::Aws { .. } => CloudProvider::Aws,
            CloudCredential::Azure { .. } => CloudProvider::Azure,
        }
    }
}

// Keep the client secret out of logs and panic messages
impl fmt::Debug for CloudCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudCredential::Aws { iam_role } => {
                f.debug_struct("Aws").field("iam_role", iam_role).finish()
            }
            CloudCredential::Azure {
                directory_id,
                application_id,
                ..
            } => f
                .debug_struct("Azure")
                .field("directory_id", directory_id)
                .field("application_id", application_id)
                .field("client_secret", &"<redacted>")
                .finish(),
        }
    }
}

/// Fully collected inputs for one setup run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupParams {
    pub credential: CloudCredential,
    pub bucket: String,
    pub metastore: String,
    pub storage_credential_name: String,
    pub admin_group: String,
}

impl SetupParams {
    pub fn provider(&self) -> CloudProvider {
        self.credential.provider()
    }
}

/// Raw, possibly partial inputs from one source (file, flags, prompts)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamInputs {
    pub cloud: Option<String>,
    pub bucket: Option<String>,
    pub iam_role: Option<String>,
    pub directory_id: Option<String>,
    pub application_id: Option<String>,
    pub client_secret: Option<String>,
    pub metastore: Option<String>,
    pub storage_credential_name: Option<String>,
    pub metastore_admin_group: Option<String>,
}

impl ParamInputs {
    /// Load inputs from a TOML parameters file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read parameters file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse parameters file: {}", path.display()))
    }

    /// Overlay `higher` on top of `self`; any value set in `higher` wins
    pub fn merge(self, higher: ParamInputs) -> ParamInputs {
        ParamInputs {
            cloud: higher.cloud.or(self.cloud),
            bucket: higher.bucket.or(self.bucket),
            iam_role: higher.iam_role.or(self.iam_role),
            directory_id: higher.directory_id.or(self.directory_id),
            application_id: higher.application_id.or(self.application_id),
            client_secret: higher.client_secret.or(self.client_secret),
            metastore: higher.metastore.or(self.metastore),
            storage_credential_name: higher
                .storage_credential_name
                .or(self.storage_credential_name),
            metastore_admin_group: higher.metastore_admin_group.or(self.metastore_admin_group),
        }
    }

    pub fn cloud_choice(&self) -> Result<CloudChoice, SetupError> {
        match &self.cloud {
            Some(cloud) => cloud.parse(),
            None => Ok(CloudChoice::Unselected),
        }
    }

    /// Fill any unset field with its placeholder for the given provider
    pub fn into_params(self, provider: CloudProvider) -> SetupParams {
        let (credential, default_bucket) = match provider {
            CloudProvider::Aws => (
                CloudCredential::Aws {
                    iam_role: or_default(self.iam_role, DEFAULT_IAM_ROLE),
                },
                DEFAULT_AWS_BUCKET,
            ),
            CloudProvider::Azure => (
                CloudCredential::Azure {
                    directory_id: or_default(self.directory_id, DEFAULT_DIRECTORY_ID),
                    application_id: or_default(self.application_id, DEFAULT_APPLICATION_ID),
                    client_secret: or_default(self.client_secret, DEFAULT_CLIENT_SECRET),
                },
                DEFAULT_AZURE_BUCKET,
            ),
        };

        SetupParams {
            credential,
            bucket: or_default(self.bucket, default_bucket),
            metastore: or_default(self.metastore, DEFAULT_METASTORE),
            storage_credential_name: or_default(
                self.storage_credential_name,
                DEFAULT_STORAGE_CREDENTIAL,
            ),
            admin_group: or_default(self.metastore_admin_group, DEFAULT_ADMIN_GROUP),
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value.unwrap_or_else(|| default.to_string())
}

/// Resolve the cloud selection and fill in the remaining fields
pub fn collect_params(inputs: ParamInputs) -> Result<SetupParams, SetupError> {
    let provider = inputs.cloud_choice()?.resolve()?;
    Ok(inputs.into_params(provider))
}

/// Ask for every field on `output`, reading answers from `input`
///
/// The current value (or placeholder) is shown in brackets; an empty answer keeps it.
/// Fails as soon as the cloud is left unselected, before asking anything else.
pub fn prompt_params<R: BufRead, W: Write>(
    inputs: ParamInputs,
    input: &mut R,
    output: &mut W,
) -> Result<SetupParams> {
    let cloud_current = inputs.cloud.clone().unwrap_or_else(|| SELECT_ONE.to_string());
    let cloud = ask(input, output, "Cloud (AWS/Azure)", &cloud_current)?;
    let provider = cloud.parse::<CloudChoice>()?.resolve()?;

    // Placeholders depend on the provider, so show the resolved defaults
    let defaults = inputs.into_params(provider);
    let bucket = ask(input, output, "bucket", &defaults.bucket)?;

    let credential = match &defaults.credential {
        CloudCredential::Aws { iam_role } => CloudCredential::Aws {
            iam_role: ask(input, output, "iam_role", iam_role)?,
        },
        CloudCredential::Azure {
            directory_id,
            application_id,
            client_secret,
        } => CloudCredential::Azure {
            directory_id: ask(input, output, "directory_id", directory_id)?,
            application_id: ask(input, output, "application_id", application_id)?,
            client_secret: ask(input, output, "client_secret", client_secret)?,
        },
    };

    let metastore = ask(input, output, "metastore", &defaults.metastore)?;
    let storage_credential_name = ask(
        input,
        output,
        "storage_credential_name",
        &defaults.storage_credential_name,
    )?;
    let admin_group = ask(input, output, "metastore_admin_group", &defaults.admin_group)?;

    Ok(SetupParams {
        credential,
        bucket,
        metastore,
        storage_credential_name,
        admin_group,
    })
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    current: &str,
) -> Result<String> {
    write!(output, "{} [{}]: ", label, current)?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .with_context(|| format!("Failed to read {}", label))?;

    let answer = line.trim();
    if answer.is_empty() {
        Ok(current.to_string())
    } else {
        Ok(answer.to_string())
    }
}
