use crate::context::ContextOverrides;
use crate::exec::DEFAULT_CLI;
use crate::params::ParamInputs;
use crate::provision::DEFAULT_CATALOG_NAME;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "metastore-setup")]
#[command(about = "Provision a Unity Catalog metastore with its storage credential, owner, grants and Delta Sharing", long_about = None)]
pub struct Cli {
    /// Administration CLI to run (name on PATH or a path)
    #[arg(long, env = "DATABRICKS_CLI", default_value = DEFAULT_CLI, global = true)]
    pub cli_bin: String,

    /// Where to write CLI credentials (default: ~/.databrickscfg)
    #[arg(long, env = "DATABRICKS_CONFIG_FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Workspace API URL (default: $DATABRICKS_HOST)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// API token (default: $DATABRICKS_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Invoking user, granted catalog access during setup (default: $DATABRICKS_USER)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Workspace id (default: $DATABRICKS_WORKSPACE_ID)
    #[arg(long, global = true)]
    pub workspace_id: Option<String>,

    /// Show debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn context_overrides(&self) -> ContextOverrides {
        ContextOverrides {
            host: self.host.clone(),
            token: self.token.clone(),
            user: self.user.clone(),
            workspace_id: self.workspace_id.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a metastore, attach a storage credential, set owner and grants, enable Delta Sharing
    Setup(SetupArgs),
    /// Assign an existing metastore to a workspace
    Assign {
        /// Metastore to assign
        #[arg(long)]
        metastore_id: String,
        /// Target workspace (defaults to the current session's workspace)
        #[arg(long = "target-workspace-id")]
        target_workspace_id: Option<String>,
        /// Default catalog for the workspace
        #[arg(long, default_value = DEFAULT_CATALOG_NAME)]
        default_catalog_name: String,
    },
    /// Show a metastore and whether Delta Sharing is enabled
    Status {
        /// Metastore to show
        #[arg(long)]
        metastore_id: String,
    },
}

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Cloud provider: AWS or Azure
    #[arg(long, env = "UC_CLOUD")]
    pub cloud: Option<String>,

    /// Default storage root (s3://<bucket> or abfss://<container>@<account>.dfs.core.windows.net/)
    #[arg(long, env = "UC_BUCKET")]
    pub bucket: Option<String>,

    /// AWS: IAM role ARN for the storage credential
    #[arg(long, env = "UC_IAM_ROLE")]
    pub iam_role: Option<String>,

    /// Azure: directory (tenant) id of the service principal
    #[arg(long, env = "UC_DIRECTORY_ID")]
    pub directory_id: Option<String>,

    /// Azure: application id of the service principal
    #[arg(long, env = "UC_APPLICATION_ID")]
    pub application_id: Option<String>,

    /// Azure: client secret of the service principal
    #[arg(long, env = "UC_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Unique name for the metastore
    #[arg(long, env = "UC_METASTORE")]
    pub metastore: Option<String>,

    /// Unique name for the storage credential
    #[arg(long, env = "UC_STORAGE_CREDENTIAL_NAME")]
    pub storage_credential_name: Option<String>,

    /// Account-level group that will own the metastore
    #[arg(long, env = "UC_METASTORE_ADMIN_GROUP")]
    pub metastore_admin_group: Option<String>,

    /// TOML file with any of the above (flags take precedence)
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Prompt for every value, showing the current one as default
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

impl SetupArgs {
    /// Values given as flags or environment variables
    pub fn inputs(&self) -> ParamInputs {
        ParamInputs {
            cloud: self.cloud.clone(),
            bucket: self.bucket.clone(),
            iam_role: self.iam_role.clone(),
            directory_id: self.directory_id.clone(),
            application_id: self.application_id.clone(),
            client_secret: self.client_secret.clone(),
            metastore: self.metastore.clone(),
            storage_credential_name: self.storage_credential_name.clone(),
            metastore_admin_group: self.metastore_admin_group.clone(),
        }
    }
}
