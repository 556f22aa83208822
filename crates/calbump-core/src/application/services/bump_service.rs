//! Bump Service - the version-update transaction.
//!
//! A bump runs in phases and touches nothing until every target has been
//! read, parsed and rewritten in memory:
//!
//! 1. **Validate**: read each target and locate its variable.
//! 2. **Resolve**: parse the baseline value and compute the next version.
//! 3. **Snapshot**: back up every distinct file once.
//! 4. **Apply**: write the composed content; any failure restores every
//!    file and discards the snapshots.
//! 5. **Git**: commit and tag. Failures here are reported, not rolled back.
//! 6. **Record**: append the operation to history.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    application::{
        ApplicationError, HistoryService,
        ports::{BackupStore, Filesystem, GitClient},
    },
    domain::{
        BackupEntry, ContentHash, DomainError, FileChange, FileTarget, GitEffect, Operation,
        OperationId, ReleaseSuffix, VersionSpec, VersionStandard,
    },
    error::{CalbumpError, CalbumpResult},
};

// ============================================================================
// Requests and reports
// ============================================================================

/// What the git step should do after the files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitPolicy {
    pub commit: bool,
    pub tag: bool,
    pub tag_prefix: String,
}

impl GitPolicy {
    pub fn disabled() -> Self {
        Self {
            commit: false,
            tag: false,
            tag_prefix: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.commit || self.tag
    }

    pub fn tag_name(&self, version: &str) -> String {
        format!("{}{version}", self.tag_prefix)
    }

    pub fn commit_message(&self, version: &str) -> String {
        format!("Bump version to {version}")
    }
}

impl Default for GitPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Input to [`BumpService::bump`].
#[derive(Debug, Clone)]
pub struct BumpRequest {
    pub spec: VersionSpec,
    pub targets: Vec<FileTarget>,
    pub suffix: Option<ReleaseSuffix>,
    pub git: GitPolicy,
}

impl BumpRequest {
    pub fn new(spec: VersionSpec, targets: Vec<FileTarget>) -> Self {
        Self {
            spec,
            targets,
            suffix: None,
            git: GitPolicy::disabled(),
        }
    }

    pub fn suffix(mut self, suffix: Option<ReleaseSuffix>) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn git(mut self, git: GitPolicy) -> Self {
        self.git = git;
        self
    }
}

/// How the git step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOutcome {
    /// No git step was requested.
    Skipped,
    Applied(GitEffect),
    /// Some git command failed. `effect` holds what succeeded before it.
    Failed { effect: GitEffect, error: String },
}

impl GitOutcome {
    fn effect(&self) -> Option<&GitEffect> {
        match self {
            Self::Skipped => None,
            Self::Applied(effect) | Self::Failed { effect, .. } => {
                Some(effect).filter(|e| !e.is_empty())
            }
        }
    }
}

/// Result of a successful bump.
#[derive(Debug, Clone)]
pub struct BumpReport {
    pub operation: Operation,
    pub previous: String,
    pub git: GitOutcome,
    /// Operations pushed out of history by this one.
    pub evicted: Vec<OperationId>,
}

impl BumpReport {
    pub fn has_warnings(&self) -> bool {
        matches!(self.git, GitOutcome::Failed { .. })
    }
}

/// One target as it would be rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPreview {
    pub target: FileTarget,
    pub current: String,
    pub next: String,
}

/// Result of [`BumpService::preview`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpPreview {
    pub previous: String,
    pub version: String,
    pub targets: Vec<TargetPreview>,
}

// ============================================================================
// Plan
// ============================================================================

/// A file with every edit applied in memory.
struct PlannedFile {
    path: PathBuf,
    original: Vec<u8>,
    updated: String,
}

struct Plan {
    preview: BumpPreview,
    files: Vec<PlannedFile>,
}

// ============================================================================
// Service
// ============================================================================

/// Runs bump transactions against injected adapters.
pub struct BumpService {
    filesystem: Arc<dyn Filesystem>,
    backups: Arc<dyn BackupStore>,
    history: HistoryService,
    git: Option<Arc<dyn GitClient>>,
}

impl BumpService {
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        backups: Arc<dyn BackupStore>,
        history: HistoryService,
    ) -> Self {
        Self {
            filesystem,
            backups,
            history,
            git: None,
        }
    }

    pub fn with_git(mut self, git: Arc<dyn GitClient>) -> Self {
        self.git = Some(git);
        self
    }

    /// Compute what a bump would write, without side effects.
    #[instrument(skip_all, fields(targets = request.targets.len()))]
    pub fn preview(&self, request: &BumpRequest, now: DateTime<Utc>) -> CalbumpResult<BumpPreview> {
        Ok(self.plan(request, now)?.preview)
    }

    /// Run the full transaction.
    #[instrument(skip_all, fields(targets = request.targets.len()))]
    pub fn bump(&self, request: &BumpRequest, now: DateTime<Utc>) -> CalbumpResult<BumpReport> {
        let Plan { preview, files } = self.plan(request, now)?;
        info!(from = %preview.previous, to = %preview.version, "Resolved next version");

        let history = self.history.load()?;
        let id = OperationId::generate(now, history.ids());

        let entries = self.snapshot(&id, &files)?;
        self.apply(&id, &files, &entries)?;

        let changes = files
            .iter()
            .zip(&entries)
            .map(|(file, entry)| FileChange {
                path: file.path.clone(),
                backup: entry.location.clone(),
                pre_hash: ContentHash::of(&file.original),
                post_hash: ContentHash::of(file.updated.as_bytes()),
            })
            .collect();

        let paths: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
        let git = self.run_git(&request.git, &preview.version, &paths);

        let operation = Operation {
            id,
            created_at: now,
            version: preview.version,
            files: changes,
            git: git.effect().cloned(),
        };
        let evicted = self.history.append(operation.clone())?;

        info!(id = %operation.id, files = operation.files.len(), "Bump complete");
        Ok(BumpReport {
            operation,
            previous: preview.previous,
            git,
            evicted,
        })
    }

    // ========================================================================
    // Phases
    // ========================================================================

    fn plan(&self, request: &BumpRequest, now: DateTime<Utc>) -> CalbumpResult<Plan> {
        if request.targets.is_empty() {
            return Err(ApplicationError::ValidationFailed("no target files configured".into()).into());
        }

        // Validate: every file readable, every variable present.
        let mut files: Vec<(PathBuf, Vec<u8>, String)> = Vec::new();
        let mut currents = Vec::with_capacity(request.targets.len());
        for target in &request.targets {
            let path = target.path();
            let at = match files.iter().position(|(p, ..)| p == path) {
                Some(at) => at,
                None => {
                    let (bytes, text) = self.read_text(path)?;
                    files.push((path.to_path_buf(), bytes, text));
                    files.len() - 1
                }
            };
            let current = target
                .handler()
                .read(&files[at].2, target.variable(), target.directive())
                .map_err(|e| on_target(path, e))?;
            debug!(%target, %current, "Located variable");
            currents.push(current);
        }

        // Resolve against the baseline target.
        let (baseline, previous, standard) = self.baseline(&request.targets, &currents)?;
        request
            .spec
            .parse_as(&previous, standard)
            .map_err(|e| on_target(request.targets[baseline].path(), e))?;
        let resolved = request.spec.resolve_as(Some(&previous), standard, now);
        let version = match &request.suffix {
            Some(suffix) => suffix.apply(&resolved),
            None => resolved,
        };

        // Compose every edit per file on the latest content.
        let mut targets = Vec::with_capacity(request.targets.len());
        for (target, current) in request.targets.iter().zip(currents) {
            let next = target.version_standard().normalize(&version);
            let at = files
                .iter()
                .position(|(p, ..)| p == target.path())
                .ok_or_else(|| CalbumpError::Internal {
                    message: format!("{} was not read", target.path().display()),
                })?;
            let written = target
                .handler()
                .write(&files[at].2, target.variable(), &next, target.directive())
                .map_err(|e| on_target(target.path(), e))?;
            files[at].2 = written.content;
            targets.push(TargetPreview {
                target: target.clone(),
                current,
                next,
            });
        }

        Ok(Plan {
            preview: BumpPreview {
                previous,
                version,
                targets,
            },
            files: files
                .into_iter()
                .map(|(path, original, updated)| PlannedFile {
                    path,
                    original,
                    updated,
                })
                .collect(),
        })
    }

    /// Index of the baseline target, the version to resolve from, and the
    /// standard that version is written in.
    ///
    /// A literal target wins. Without one, the last recorded version is
    /// used as long as the file still holds its normalized form; otherwise
    /// the normalized value itself is parsed.
    fn baseline(
        &self,
        targets: &[FileTarget],
        currents: &[String],
    ) -> CalbumpResult<(usize, String, VersionStandard)> {
        if let Some(at) = targets
            .iter()
            .position(|t| t.version_standard() == VersionStandard::Literal)
        {
            return Ok((at, currents[at].clone(), VersionStandard::Literal));
        }

        let standard = targets[0].version_standard();
        let current = &currents[0];
        let recorded = self
            .history
            .load()?
            .latest()
            .map(|op| op.version.clone())
            .filter(|version| standard.normalize(version) == *current);
        Ok(match recorded {
            Some(version) => {
                debug!(%version, "Baseline taken from history");
                (0, version, VersionStandard::Literal)
            }
            None => (0, current.clone(), standard),
        })
    }

    fn read_text(&self, path: &Path) -> CalbumpResult<(Vec<u8>, String)> {
        let bytes = self.filesystem.read(path)?;
        let text = String::from_utf8(bytes.clone()).map_err(|_| ApplicationError::ReadFailed {
            path: path.to_path_buf(),
            reason: "not valid UTF-8".into(),
        })?;
        Ok((bytes, text))
    }

    fn snapshot(&self, id: &OperationId, files: &[PlannedFile]) -> CalbumpResult<Vec<BackupEntry>> {
        let mut entries = Vec::with_capacity(files.len());
        for (index, file) in files.iter().enumerate() {
            match self.backups.snapshot(id, index + 1, &file.path) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    self.discard(id);
                    return Err(e);
                }
            }
        }
        debug!(%id, count = entries.len(), "Snapshots taken");
        Ok(entries)
    }

    fn apply(
        &self,
        id: &OperationId,
        files: &[PlannedFile],
        entries: &[BackupEntry],
    ) -> CalbumpResult<()> {
        for (index, file) in files.iter().enumerate() {
            let Err(cause) = self.filesystem.write(&file.path, file.updated.as_bytes()) else {
                debug!(path = %file.path.display(), "Written");
                continue;
            };
            warn!(path = %file.path.display(), error = %cause, "Write failed, rolling back");

            // The failing file may be partially written, restore it too.
            // One failed restore must not stop the others.
            let mut failed = Vec::new();
            let mut reasons = Vec::new();
            for entry in &entries[..=index] {
                if let Err(e) = self.backups.restore(entry) {
                    error!(path = %entry.original_path.display(), error = %e, "Rollback failed");
                    failed.push(entry.original_path.clone());
                    reasons.push(e.to_string());
                }
            }
            if !failed.is_empty() {
                // Snapshots stay so the files can be recovered by hand.
                return Err(ApplicationError::RollbackFailed {
                    paths: failed,
                    reason: reasons.join("; "),
                }
                .into());
            }
            self.discard(id);
            return Err(ApplicationError::RolledBack {
                path: file.path.clone(),
                reason: cause.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn discard(&self, id: &OperationId) {
        if let Err(e) = self.backups.evict(id) {
            warn!(%id, error = %e, "Could not discard snapshots");
        }
    }

    fn run_git(&self, policy: &GitPolicy, version: &str, paths: &[PathBuf]) -> GitOutcome {
        if !policy.is_enabled() {
            return GitOutcome::Skipped;
        }
        let mut effect = GitEffect::default();
        let Some(git) = &self.git else {
            return GitOutcome::Failed {
                effect,
                error: "git is not available for this project".into(),
            };
        };

        if policy.commit {
            // A repository without commits has no parent to return to.
            match git.current_head() {
                Ok(head) => effect.parent = Some(head),
                Err(e) => debug!(error = %e, "No current HEAD"),
            }
            match git.commit(&policy.commit_message(version), paths) {
                Ok(hash) => {
                    info!(commit = %hash, "Committed");
                    effect.commit = Some(hash);
                }
                Err(e) => return git_failed(effect, e),
            }
        }

        if policy.tag {
            let name = policy.tag_name(version);
            match git.create_tag(&name) {
                Ok(()) => {
                    info!(tag = %name, "Tagged");
                    effect.tag = Some(name);
                }
                Err(e) => return git_failed(effect, e),
            }
        }

        GitOutcome::Applied(effect)
    }
}

fn on_target(path: &Path, source: DomainError) -> CalbumpError {
    ApplicationError::Target {
        path: path.to_path_buf(),
        source,
    }
    .into()
}

fn git_failed(effect: GitEffect, error: CalbumpError) -> GitOutcome {
    warn!(error = %error, "Git step failed, files stay bumped");
    GitOutcome::Failed {
        effect,
        error: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::application::ports::MockGitClient;
    use crate::application::services::testing::{FakeBackups, FakeFs, FakeHistory};
    use crate::domain::FileType;

    struct Fixture {
        fs: Arc<FakeFs>,
        backups: Arc<FakeBackups>,
        history: HistoryService,
    }

    impl Fixture {
        fn new() -> Self {
            let fs = Arc::new(FakeFs::default());
            let backups = Arc::new(FakeBackups::new(fs.clone()));
            let history = HistoryService::new(Arc::new(FakeHistory::default()), backups.clone(), 50);
            Self {
                fs,
                backups,
                history,
            }
        }

        fn service(&self) -> BumpService {
            BumpService::new(self.fs.clone(), self.backups.clone(), self.history.clone())
        }
    }

    fn spec() -> VersionSpec {
        VersionSpec::new("{current_date}.{build_count}", "%Y.%m.%d", "UTC").unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap()
    }

    fn py() -> FileTarget {
        FileTarget::new("/p/version.py", FileType::Python, "__version__", None, VersionStandard::Literal)
            .unwrap()
    }

    fn toml(standard: VersionStandard) -> FileTarget {
        FileTarget::new("/p/pyproject.toml", FileType::Toml, "project.version", None, standard).unwrap()
    }

    fn seed(fs: &FakeFs) {
        fs.insert("/p/version.py", "__version__ = \"2025.09.01.3\"\n");
        fs.insert(
            "/p/pyproject.toml",
            "[project]\nname = \"demo\"\nversion = \"2025.9.1.3\"\n",
        );
    }

    #[test]
    fn bump_writes_every_target_and_records_operation() {
        let fx = Fixture::new();
        seed(&fx.fs);
        let request = BumpRequest::new(spec(), vec![py(), toml(VersionStandard::Normalized)]);

        let report = fx.service().bump(&request, now()).unwrap();

        assert_eq!(report.previous, "2025.09.01.3");
        assert_eq!(report.operation.version, "2025.09.01.4");
        assert_eq!(fx.fs.text("/p/version.py"), "__version__ = \"2025.09.01.4\"\n");
        assert_eq!(
            fx.fs.text("/p/pyproject.toml"),
            "[project]\nname = \"demo\"\nversion = \"2025.9.1.4\"\n"
        );
        assert_eq!(report.git, GitOutcome::Skipped);
        assert_eq!(report.operation.git, None);
        assert_eq!(report.operation.files.len(), 2);
        assert_eq!(
            report.operation.files[0].post_hash,
            ContentHash::of(b"__version__ = \"2025.09.01.4\"\n")
        );
        assert!(report.operation.backups().all(|e| fx.backups.contains(&e)));
        assert_eq!(fx.history.latest().unwrap(), report.operation);
    }

    #[test]
    fn missing_variable_aborts_without_side_effects() {
        let fx = Fixture::new();
        seed(&fx.fs);
        let bad = FileTarget::new("/p/pyproject.toml", FileType::Toml, "tool.missing", None, VersionStandard::Literal)
            .unwrap();
        let request = BumpRequest::new(spec(), vec![py(), bad]);

        let err = fx.service().bump(&request, now()).unwrap_err();

        assert!(err.is_side_effect_free());
        assert!(matches!(
            err,
            CalbumpError::Application(ApplicationError::Target {
                source: DomainError::VariableNotFound { .. },
                ..
            })
        ));
        assert_eq!(fx.fs.text("/p/version.py"), "__version__ = \"2025.09.01.3\"\n");
        assert!(fx.backups.operations().unwrap().is_empty());
        assert!(fx.history.load().unwrap().is_empty());
    }

    #[test]
    fn unparseable_baseline_is_rejected() {
        let fx = Fixture::new();
        fx.fs.insert("/p/version.py", "__version__ = \"1.2.3\"\n");

        let err = fx
            .service()
            .bump(&BumpRequest::new(spec(), vec![py()]), now())
            .unwrap_err();

        assert!(matches!(
            err,
            CalbumpError::Application(ApplicationError::Target {
                source: DomainError::Parse { .. },
                ..
            })
        ));
        assert!(err.is_side_effect_free());
    }

    #[test]
    fn write_failure_restores_every_file() {
        let fx = Fixture::new();
        seed(&fx.fs);
        fx.fs.fail_writes_to("/p/pyproject.toml");
        let request = BumpRequest::new(spec(), vec![py(), toml(VersionStandard::Literal)]);

        let err = fx.service().bump(&request, now()).unwrap_err();

        assert!(matches!(
            err,
            CalbumpError::Application(ApplicationError::RolledBack { .. })
        ));
        assert_eq!(fx.fs.text("/p/version.py"), "__version__ = \"2025.09.01.3\"\n");
        assert!(fx.fs.text("/p/pyproject.toml").contains("2025.9.1.3"));
        assert!(fx.backups.operations().unwrap().is_empty());
        assert!(fx.history.load().unwrap().is_empty());
    }

    #[test]
    fn one_failed_restore_does_not_stop_the_rollback() {
        let fx = Fixture::new();
        seed(&fx.fs);
        fx.fs.insert("/p/pkg/__init__.py", "__version__ = \"2025.09.01.3\"\n");
        fx.fs.fail_writes_to("/p/pkg/__init__.py");
        fx.backups.fail_restore_of("/p/version.py");
        let init = FileTarget::new("/p/pkg/__init__.py", FileType::Python, "__version__", None, VersionStandard::Literal)
            .unwrap();
        let request = BumpRequest::new(spec(), vec![py(), toml(VersionStandard::Literal), init]);

        let err = fx.service().bump(&request, now()).unwrap_err();

        match err {
            CalbumpError::Application(ApplicationError::RollbackFailed { paths, .. }) => {
                assert_eq!(paths, [PathBuf::from("/p/version.py")]);
            }
            other => panic!("expected RollbackFailed, got {other:?}"),
        }
        // Files after the failed restore are still put back.
        assert!(fx.fs.text("/p/pyproject.toml").contains("2025.9.1.3"));
        assert_eq!(fx.fs.text("/p/pkg/__init__.py"), "__version__ = \"2025.09.01.3\"\n");
        // Snapshots survive for manual recovery.
        assert_eq!(fx.backups.operations().unwrap().len(), 1);
        assert!(fx.history.load().unwrap().is_empty());
    }

    #[test]
    fn normalized_only_target_counts_up_on_the_same_day() {
        let fx = Fixture::new();
        fx.fs.insert("/p/pyproject.toml", "[project]\nversion = \"2025.9.1.1\"\n");
        let spec = VersionSpec::new("{current_date}-{build_count:03}", "%Y.%m.%d", "UTC").unwrap();
        let request = BumpRequest::new(spec, vec![toml(VersionStandard::Normalized)]);

        let versions: Vec<String> = (0..3)
            .map(|_| fx.service().bump(&request, now()).unwrap().operation.version)
            .collect();

        assert_eq!(versions, ["2025.09.01-002", "2025.09.01-003", "2025.09.01-004"]);
        assert_eq!(fx.fs.text("/p/pyproject.toml"), "[project]\nversion = \"2025.9.1.4\"\n");
    }

    #[test]
    fn hand_edited_normalized_value_is_parsed_from_the_file() {
        let fx = Fixture::new();
        fx.fs.insert("/p/pyproject.toml", "[project]\nversion = \"2025.9.1.1\"\n");
        let request = BumpRequest::new(spec(), vec![toml(VersionStandard::Normalized)]);
        fx.service().bump(&request, now()).unwrap();
        // The file no longer holds the recorded version.
        fx.fs.insert("/p/pyproject.toml", "[project]\nversion = \"2025.9.1.7\"\n");

        let report = fx.service().bump(&request, now()).unwrap();

        assert_eq!(report.previous, "2025.9.1.7");
        assert_eq!(report.operation.version, "2025.09.01.8");
    }

    #[test]
    fn targets_sharing_a_file_compose() {
        let fx = Fixture::new();
        fx.fs.insert(
            "/p/pyproject.toml",
            "[project]\nversion = \"2025.09.01.1\"\n\n[tool.app]\nversion = \"2025.09.01.1\"\n",
        );
        let second = FileTarget::new("/p/pyproject.toml", FileType::Toml, "tool.app.version", None, VersionStandard::Normalized)
            .unwrap();
        let request = BumpRequest::new(spec(), vec![toml(VersionStandard::Literal), second]);

        let report = fx.service().bump(&request, now()).unwrap();

        assert_eq!(report.operation.files.len(), 1);
        assert_eq!(
            fx.fs.text("/p/pyproject.toml"),
            "[project]\nversion = \"2025.09.01.2\"\n\n[tool.app]\nversion = \"2025.9.1.2\"\n"
        );
    }

    #[test]
    fn suffix_and_preview() {
        let fx = Fixture::new();
        seed(&fx.fs);
        let request = BumpRequest::new(spec(), vec![py()]).suffix(Some(ReleaseSuffix::Rc));

        let preview = fx.service().preview(&request, now()).unwrap();

        assert_eq!(preview.version, "2025.09.01.4.rc");
        assert_eq!(preview.targets[0].current, "2025.09.01.3");
        assert_eq!(preview.targets[0].next, "2025.09.01.4.rc");
        // preview never writes
        assert_eq!(fx.fs.text("/p/version.py"), "__version__ = \"2025.09.01.3\"\n");
        assert!(fx.history.load().unwrap().is_empty());
    }

    #[test]
    fn git_commit_and_tag_are_recorded() {
        let fx = Fixture::new();
        seed(&fx.fs);
        let mut git = MockGitClient::new();
        git.expect_current_head().returning(|| Ok("aaa111".into()));
        git.expect_commit()
            .withf(|msg, paths| msg == "Bump version to 2025.09.01.4" && paths.len() == 1)
            .returning(|_, _| Ok("bbb222".into()));
        git.expect_create_tag()
            .withf(|name| name == "v2025.09.01.4")
            .times(1)
            .returning(|_| Ok(()));

        let policy = GitPolicy {
            commit: true,
            tag: true,
            tag_prefix: "v".into(),
        };
        let request = BumpRequest::new(spec(), vec![py()]).git(policy);
        let report = fx
            .service()
            .with_git(Arc::new(git))
            .bump(&request, now())
            .unwrap();

        let effect = report.operation.git.unwrap();
        assert_eq!(effect.commit.as_deref(), Some("bbb222"));
        assert_eq!(effect.parent.as_deref(), Some("aaa111"));
        assert_eq!(effect.tag.as_deref(), Some("v2025.09.01.4"));
    }

    #[test]
    fn git_failure_keeps_files_and_partial_effect() {
        let fx = Fixture::new();
        seed(&fx.fs);
        let mut git = MockGitClient::new();
        git.expect_current_head().returning(|| Ok("aaa111".into()));
        git.expect_commit().returning(|_, _| Ok("bbb222".into()));
        git.expect_create_tag().returning(|_| {
            Err(ApplicationError::GitFailed {
                command: "tag".into(),
                reason: "already exists".into(),
            }
            .into())
        });

        let policy = GitPolicy {
            commit: true,
            tag: true,
            tag_prefix: String::new(),
        };
        let request = BumpRequest::new(spec(), vec![py()]).git(policy);
        let report = fx
            .service()
            .with_git(Arc::new(git))
            .bump(&request, now())
            .unwrap();

        assert!(report.has_warnings());
        assert_eq!(report.operation.commit(), Some("bbb222"));
        assert_eq!(report.operation.tag(), None);
        assert_eq!(fx.fs.text("/p/version.py"), "__version__ = \"2025.09.01.4\"\n");
    }

    #[test]
    fn history_failure_is_reported_after_writes() {
        let fs = Arc::new(FakeFs::default());
        seed(&fs);
        let backups = Arc::new(FakeBackups::new(fs.clone()));
        let store = Arc::new(FakeHistory::default());
        *store.fail_saves.lock().unwrap() = true;
        let history = HistoryService::new(store, backups.clone(), 50);
        let service = BumpService::new(fs.clone(), backups, history);

        let err = service
            .bump(&BumpRequest::new(spec(), vec![py()]), now())
            .unwrap_err();

        assert!(matches!(
            err,
            CalbumpError::Application(ApplicationError::HistoryWriteFailed { .. })
        ));
        assert!(!err.is_side_effect_free());
        assert_eq!(fs.text("/p/version.py"), "__version__ = \"2025.09.01.4\"\n");
    }
}
