//! `calbump config` - inspect the effective configuration.

use std::path::Path;

use serde_json::Value;

use crate::{
    cli::ConfigCommands,
    config::{AppConfig, PROJECT_CONFIG_FILE},
    error::{CliError, CliResult},
    output::OutputManager,
};

use super::Outcome;

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    root: &Path,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<Outcome> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            if output.is_json() {
                output.json(&value)?;
            } else {
                output.print(&render_value(&value))?;
            }
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                let serialised =
                    toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                        message: format!("Failed to serialise config: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                output.print(serialised.trim_end())?;
            }
        }

        ConfigCommands::Path => {
            output.field("project", &root.join(PROJECT_CONFIG_FILE).display().to_string())?;
            if let Some(global) = AppConfig::global_config_path() {
                output.field("global", &global.display().to_string())?;
            }
            output.field("state", &config.state_dir(root).display().to_string())?;
        }
    }

    Ok(Outcome::Clean)
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Look up a dotted key such as `git.tag_prefix` or `files.0.path`.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<Value> {
    let root = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;

    key.split('.')
        .try_fold(&root, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
        .cloned()
        .ok_or_else(|| CliError::UnknownConfigKey { key: key.into() })
}

/// Scalars print bare; tables print as JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
