//! `calbump history` - list recorded bumps.

use std::path::Path;

use tracing::instrument;

use calbump_core::domain::Operation;

use super::{Outcome, Project, display_path};
use crate::{
    cli::{HistoryArgs, HistoryFormat, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    args: HistoryArgs,
    root: &Path,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<Outcome> {
    let project = Project::open(root, &config);
    let history = project.history();

    if args.prune {
        let pruned = history.prune_orphans()?;
        if pruned.is_empty() {
            output.info("No orphaned backups found")?;
        } else {
            output.success(&format!("Removed {} orphaned backup set(s)", pruned.len()))?;
        }
        return Ok(Outcome::Clean);
    }

    let operations = history.list(args.limit)?;

    if args.format == HistoryFormat::Json || output.format() == OutputFormat::Json {
        output.json(&operations)?;
        return Ok(Outcome::Clean);
    }

    if operations.is_empty() {
        output.info("No bumps recorded yet")?;
        return Ok(Outcome::Clean);
    }

    output.header(&format!(
        "{:<27} {:<20} {:<20} {}",
        "ID", "TIMESTAMP", "VERSION", "FILES"
    ))?;
    for op in &operations {
        output.print(&row(op, root))?;
    }
    Ok(Outcome::Clean)
}

fn row(op: &Operation, root: &Path) -> String {
    let files: Vec<String> = op.files.iter().map(|f| display_path(root, &f.path)).collect();
    let mut line = format!(
        "{:<27} {:<20} {:<20} {}",
        op.id,
        op.created_at.format("%Y-%m-%d %H:%M:%S"),
        op.version,
        files.join(", ")
    );
    if let Some(tag) = op.tag() {
        line.push_str(&format!("  [tag {tag}]"));
    }
    line
}
