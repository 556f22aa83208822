//! `calbump bump` - write the next version into every configured file.
//!
//! Translates flags and config into a `BumpRequest`, runs it through the
//! core `BumpService` and reports the result. No version logic lives here.

use std::path::Path;

use chrono::Utc;
use serde_json::json;
use tracing::{info, instrument};

use calbump_core::{
    application::{BumpPreview, BumpReport, BumpRequest, GitOutcome, GitPolicy},
    domain::ReleaseSuffix,
};

use super::{Outcome, Project, display_path};
use crate::{
    cli::BumpArgs,
    config::{AppConfig, PROJECT_CONFIG_FILE},
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(dry_run = args.dry_run))]
pub fn execute(
    args: BumpArgs,
    root: &Path,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<Outcome> {
    if config.files.is_empty() {
        return Err(CliError::NoTargets {
            path: root.join(PROJECT_CONFIG_FILE),
        });
    }

    let spec = config.version_spec(args.timezone.as_deref())?;
    let targets = config.targets(root)?;
    let request = BumpRequest::new(spec, targets)
        .suffix(release_suffix(&args)?)
        .git(git_policy(&args, &config));

    let project = Project::open(root, &config);
    let service = project.bump_service();

    if args.dry_run {
        let preview = service.preview(&request, Utc::now())?;
        render_preview(&preview, root, &output)?;
        return Ok(Outcome::Clean);
    }

    let report = service.bump(&request, Utc::now())?;
    info!(
        id = %report.operation.id,
        version = %report.operation.version,
        files = report.operation.files.len(),
        "Bump completed"
    );
    render_report(&report, root, &output)?;

    Ok(if report.has_warnings() {
        Outcome::Warnings
    } else {
        Outcome::Clean
    })
}

fn release_suffix(args: &BumpArgs) -> CliResult<Option<ReleaseSuffix>> {
    if args.beta {
        return Ok(Some(ReleaseSuffix::Beta));
    }
    if args.rc {
        return Ok(Some(ReleaseSuffix::Rc));
    }
    if args.release {
        return Ok(Some(ReleaseSuffix::Release));
    }
    match args.custom.as_deref().map(str::trim) {
        None => Ok(None),
        Some(custom) if custom.is_empty() || custom.chars().any(char::is_whitespace) => {
            Err(CliError::InvalidInput {
                message: format!("custom suffix '{custom}' must be a single non-empty word"),
                source: None,
            })
        }
        Some(custom) => Ok(Some(ReleaseSuffix::Custom(custom.to_string()))),
    }
}

/// Flags override config. A commit is only made together with a tag.
fn git_policy(args: &BumpArgs, config: &AppConfig) -> GitPolicy {
    let tag = args.git_tag().unwrap_or(config.git.tag);
    let auto_commit = args.auto_commit().unwrap_or(config.git.auto_commit);
    GitPolicy {
        commit: tag && auto_commit,
        tag,
        tag_prefix: config.git.tag_prefix.clone(),
    }
}

fn render_preview(preview: &BumpPreview, root: &Path, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        let files: Vec<_> = preview
            .targets
            .iter()
            .map(|t| {
                json!({
                    "path": display_path(root, t.target.path()),
                    "variable": t.target.variable(),
                    "current": t.current,
                    "next": t.next,
                })
            })
            .collect();
        output.json(&json!({
            "dry_run": true,
            "previous": preview.previous,
            "version": preview.version,
            "files": files,
        }))?;
        return Ok(());
    }

    output.header(&format!("{} -> {}", preview.previous, preview.version))?;
    for t in &preview.targets {
        output.field(
            &display_path(root, t.target.path()),
            &format!("{} = {} -> {}", t.target.variable(), t.current, t.next),
        )?;
    }
    output.info("Dry run: no file was changed")?;
    Ok(())
}

fn render_report(report: &BumpReport, root: &Path, output: &OutputManager) -> CliResult<()> {
    let op = &report.operation;

    if output.is_json() {
        let git = match &report.git {
            GitOutcome::Skipped => json!(null),
            GitOutcome::Applied(effect) => json!({ "status": "applied", "effect": effect }),
            GitOutcome::Failed { effect, error } => {
                json!({ "status": "failed", "effect": effect, "error": error })
            }
        };
        output.json(&json!({
            "operation": op,
            "previous": report.previous,
            "git": git,
            "evicted": report.evicted,
        }))?;
        return Ok(());
    }

    output.success(&format!("Bumped {} -> {}", report.previous, op.version))?;
    for change in &op.files {
        output.field(
            "updated",
            &format!(
                "{} ({})",
                display_path(root, &change.path),
                change.post_hash.short()
            ),
        )?;
    }
    output.field("operation", op.id.as_str())?;

    match &report.git {
        GitOutcome::Skipped => {}
        GitOutcome::Applied(effect) => {
            if let Some(commit) = &effect.commit {
                output.field("commit", commit)?;
            }
            if let Some(tag) = &effect.tag {
                output.field("tag", tag)?;
            }
        }
        GitOutcome::Failed { error, .. } => {
            output.warning(&format!("Files were updated but the git step failed: {error}"))?;
        }
    }

    if !report.evicted.is_empty() {
        output.info(&format!(
            "{} old operation(s) dropped from history",
            report.evicted.len()
        ))?;
    }
    Ok(())
}
