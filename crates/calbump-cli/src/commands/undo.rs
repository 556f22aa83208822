//! `calbump undo` - restore the files of a recorded bump.

use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{info, instrument};

use calbump_core::{
    application::{UndoTarget, UndoWarning},
    domain::{Operation, OperationId},
    error::CalbumpError,
};

use super::{Outcome, Project, display_path};
use crate::{cli::UndoArgs, config::AppConfig, error::CliResult, output::OutputManager};

#[instrument(skip_all, fields(check = args.check))]
pub fn execute(
    args: UndoArgs,
    root: &Path,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<Outcome> {
    let target = match args.id.as_deref() {
        Some(id) => {
            let id: OperationId = id.trim().parse().map_err(CalbumpError::from)?;
            UndoTarget::Id(id)
        }
        None => UndoTarget::Latest,
    };

    let project = Project::open(root, &config);
    let service = project.undo_service();

    if args.check {
        let (operation, warnings) = service.check(&target)?;
        render(&operation, &[], &warnings, true, root, &output)?;
        return Ok(outcome(&warnings));
    }

    let report = service.undo(&target)?;
    info!(
        id = %report.operation.id,
        restored = report.restored.len(),
        warnings = report.warnings.len(),
        "Undo completed"
    );
    render(
        &report.operation,
        &report.restored,
        &report.warnings,
        false,
        root,
        &output,
    )?;
    Ok(outcome(&report.warnings))
}

fn outcome(warnings: &[UndoWarning]) -> Outcome {
    if warnings.is_empty() {
        Outcome::Clean
    } else {
        Outcome::Warnings
    }
}

fn render(
    operation: &Operation,
    restored: &[PathBuf],
    warnings: &[UndoWarning],
    check: bool,
    root: &Path,
    output: &OutputManager,
) -> CliResult<()> {
    if output.is_json() {
        let warnings: Vec<String> = warnings.iter().map(ToString::to_string).collect();
        let restored: Vec<String> = restored.iter().map(|p| display_path(root, p)).collect();
        output.json(&json!({
            "check": check,
            "operation": operation.id,
            "version": operation.version,
            "restored": restored,
            "warnings": warnings,
        }))?;
        return Ok(());
    }

    if check {
        output.header(&format!(
            "Undo of {} ({}) would restore {} file(s)",
            operation.id,
            operation.version,
            operation.files.len()
        ))?;
        for change in &operation.files {
            output.field("restore", &display_path(root, &change.path))?;
        }
        if let Some(tag) = operation.tag() {
            output.field("delete tag", tag)?;
        }
    } else {
        output.success(&format!("Undid {} ({})", operation.id, operation.version))?;
        for path in restored {
            output.field("restored", &display_path(root, path))?;
        }
    }

    for warning in warnings {
        output.warning(&warning.to_string())?;
    }
    Ok(())
}
