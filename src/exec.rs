use crate::cli_config::CONFIG_FILE_ENV;
use crate::error::SetupError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const DEFAULT_CLI: &str = "databricks";
pub const UC_SUBSYSTEM: &str = "unity-catalog";

/// Apply the CLI's error contract to captured output
///
/// Anything on stderr is an error. So is stdout mentioning "error" in any case,
/// because the CLI prints some API failures to stdout. Otherwise stdout is returned as-is.
pub fn check_output(stdout: &str, stderr: &str) -> Result<String, SetupError> {
    if !stderr.is_empty() {
        return Err(SetupError::Command(stderr.to_string()));
    }
    if stdout.to_lowercase().contains("error") {
        return Err(SetupError::Command(stdout.to_string()));
    }
    Ok(stdout.to_string())
}

/// Runs `unity-catalog` subcommands; the seam between request building and process spawning
pub trait UcExecutor {
    /// Run one subcommand with its arguments and return stdout
    fn execute(&self, args: &[String]) -> Result<String>;
}

/// The `<cli> unity-catalog` command family
#[derive(Debug, Clone)]
pub struct UnityCatalogCli {
    program: PathBuf,
    config_file: Option<PathBuf>,
}

impl UnityCatalogCli {
    /// Find the CLI binary by name (on PATH) or by path
    pub fn locate(program: &str) -> Result<Self> {
        let program = which::which(program).with_context(|| {
            format!(
                "Could not find the '{}' CLI with Unity Catalog support\n\nInstall it with:\n  pip install databricks-cli-uc",
                program
            )
        })?;
        tracing::debug!(program = %program.display(), "using administration CLI");
        Ok(Self {
            program,
            config_file: None,
        })
    }

    /// Point subprocesses at a config file other than `~/.databrickscfg`
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl UcExecutor for UnityCatalogCli {
    /// Run `<cli> unity-catalog <args...>` and return its stdout
    ///
    /// Blocks until the subprocess exits; there is no timeout.
    fn execute(&self, args: &[String]) -> Result<String> {
        let subcommand = args.first().map(String::as_str).unwrap_or_default();
        // Payloads can carry client secrets, so only the subcommand is logged
        tracing::debug!(subcommand, program = %self.program.display(), "running {}", UC_SUBSYSTEM);

        let mut cmd = Command::new(&self.program);
        cmd.arg(UC_SUBSYSTEM);
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.stdin(Stdio::null());
        if let Some(config_file) = &self.config_file {
            cmd.env(CONFIG_FILE_ENV, config_file);
        }

        let output = cmd.output().with_context(|| {
            format!(
                "Failed to execute command: {} {} {}",
                self.program.display(),
                UC_SUBSYSTEM,
                subcommand
            )
        })?;
        tracing::debug!(subcommand, status = ?output.status, "command finished");

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(check_output(&stdout, &stderr)?)
    }
}
