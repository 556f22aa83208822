//! `calbump init` - write a starter configuration file.

use std::path::Path;

use crate::{
    cli::InitArgs,
    config::{AppConfig, PROJECT_CONFIG_FILE},
    error::{CliError, CliResult},
    output::OutputManager,
};

use super::Outcome;

/// Write `calbump.toml` into the project root.
pub fn execute(args: InitArgs, root: &Path, output: OutputManager) -> CliResult<Outcome> {
    let config_path = root.join(PROJECT_CONFIG_FILE);

    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(Outcome::Clean);
    }

    let toml = toml::to_string_pretty(&AppConfig::starter()).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise starter config: {e}"),
        source: Some(Box::new(e)),
    })?;

    std::fs::write(&config_path, &toml).map_err(|e| CliError::IoError {
        message: format!("Failed to write config to '{}'", config_path.display()),
        source: e,
    })?;

    output.success(&format!("Configuration created at {}", config_path.display()))?;
    output.info("Edit the [[files]] entries, then run: calbump bump --dry-run")?;

    Ok(Outcome::Clean)
}
