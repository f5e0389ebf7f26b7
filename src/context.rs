//! Workspace session the setup runs under

use crate::error::SetupError;
use std::fmt;

pub const HOST_ENV: &str = "DATABRICKS_HOST";
pub const TOKEN_ENV: &str = "DATABRICKS_TOKEN";
pub const USER_ENV: &str = "DATABRICKS_USER";
pub const WORKSPACE_ID_ENV: &str = "DATABRICKS_WORKSPACE_ID";

/// API endpoint, credentials and identity of the invoking administrator
#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub host: String,
    pub token: String,
    pub user: String,
    pub workspace_id: String,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}

/// Session values given explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub host: Option<String>,
    pub token: Option<String>,
    pub user: Option<String>,
    pub workspace_id: Option<String>,
}

impl SessionContext {
    /// Resolve from the process environment
    pub fn from_env(overrides: ContextOverrides) -> Result<Self, SetupError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve each value from `overrides`, falling back to `lookup` by env var name
    ///
    /// Blank values count as missing.
    pub fn resolve<F>(overrides: ContextOverrides, lookup: F) -> Result<Self, SetupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |given: Option<String>,
                    name: &'static str,
                    env_var: &'static str,
                    flag: &'static str| {
            given
                .or_else(|| lookup(env_var))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(SetupError::ContextResolution {
                    name,
                    env_var,
                    flag,
                })
        };

        Ok(SessionContext {
            host: pick(overrides.host, "API URL", HOST_ENV, "host")?,
            token: pick(overrides.token, "API token", TOKEN_ENV, "token")?,
            user: pick(overrides.user, "current user", USER_ENV, "user")?,
            workspace_id: pick(
                overrides.workspace_id,
                "workspace id",
                WORKSPACE_ID_ENV,
                "workspace-id",
            )?,
        })
    }
}
