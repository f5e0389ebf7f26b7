//! Authentication file read by the administration CLI

use crate::context::SessionContext;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".databrickscfg";
pub const CONFIG_FILE_ENV: &str = "DATABRICKS_CONFIG_FILE";

/// `~/.databrickscfg`, the location the CLI reads when nothing else is configured
pub fn default_config_path() -> PathBuf {
    home_dir().join(CONFIG_FILE_NAME)
}

fn home_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let username = whoami::username();
            if username == "root" {
                PathBuf::from("/root")
            } else if cfg!(target_os = "macos") {
                PathBuf::from(format!("/Users/{}", username))
            } else {
                PathBuf::from(format!("/home/{}", username))
            }
        }
    }
}

/// Render the default profile for a session
pub fn render_profile(ctx: &SessionContext) -> String {
    format!("[DEFAULT]\nhost = {}\ntoken = {}\n", ctx.host, ctx.token)
}

/// Write the default profile to `path`, replacing whatever was there
pub fn write_cli_config(path: &Path, ctx: &SessionContext) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, render_profile(ctx))
        .with_context(|| format!("Failed to write CLI config: {}", path.display()))?;

    // The file holds a bearer token
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to set permissions for: {}", path.display()))?;
    }

    tracing::debug!(path = %path.display(), host = %ctx.host, "wrote CLI config");
    Ok(())
}
