//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the `VersionSpec` and
//! `FileTarget`s built from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `CALBUMP_GIT__TAG=true`, `CALBUMP_VERSION__TIMEZONE=UTC`
//! 3. Project file: `calbump.toml` in the project root, or `--config FILE`
//! 4. Global file: `<config dir>/calbump/config.toml`
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use calbump_core::{
    domain::{
        DEFAULT_HISTORY_LIMIT, FileTarget, FileType, VersionSpec, VersionStandard,
        calver::DEFAULT_BUILD_COUNT_START,
    },
    error::CalbumpResult,
};

/// Name of the per-project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "calbump.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version scheme.
    pub version: VersionConfig,
    /// Git side effects.
    pub git: GitConfig,
    /// Operation log and backups.
    pub history: HistoryConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Files that carry the version.
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    pub format: String,
    pub date_format: String,
    pub timezone: String,
    pub build_count_start: u32,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            format: "{current_date}-{build_count:03}".into(),
            date_format: "%Y.%m.%d".into(),
            timezone: "America/New_York".into(),
            build_count_start: DEFAULT_BUILD_COUNT_START,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Create a tag named `tag_prefix + version`.
    pub tag: bool,
    /// Commit the changed files before tagging. Only honoured with `tag`.
    pub auto_commit: bool,
    pub tag_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Operations kept before the oldest is evicted.
    pub limit: usize,
    /// State directory, relative to the project root.
    pub dir: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            dir: PathBuf::from(".calbump"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

/// One `[[files]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub file_type: String,
    pub variable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directive: Option<String>,
    #[serde(default = "default_standard")]
    pub version_standard: String,
}

fn default_standard() -> String {
    VersionStandard::Literal.as_str().to_string()
}

impl FileEntry {
    /// Validate the entry and resolve its path against `root`.
    pub fn to_target(&self, root: &Path) -> CalbumpResult<FileTarget> {
        let file_type: FileType = self.file_type.parse()?;
        let standard: VersionStandard = self.version_standard.parse()?;
        let target = FileTarget::new(
            module_path(&self.path, file_type),
            file_type,
            &self.variable,
            self.directive.as_deref(),
            standard,
        )?;
        Ok(target.rooted(root))
    }
}

/// A python target may name a module: `src.pkg.version` is
/// `src/pkg/version.py`. Anything that already looks like a path is kept.
fn module_path(path: &Path, file_type: FileType) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };
    if file_type != FileType::Python
        || text.contains(['/', '\\'])
        || path.is_absolute()
        || text.ends_with(".py")
    {
        return path.to_path_buf();
    }
    let mut module: PathBuf = text.split('.').collect();
    module.set_extension("py");
    module
}

impl AppConfig {
    /// Load configuration, layering defaults, files and environment.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist. Without it, `calbump.toml` in `root` is used when present.
    pub fn load(root: &Path, config_file: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        // Layer 1: defaults, serialised so every key exists.
        let defaults = serde_json::to_string(&Self::default())?;
        builder = builder.add_source(File::from_str(&defaults, FileFormat::Json));

        // Layer 2: global file
        if let Some(global) = Self::global_config_path() {
            builder = builder.add_source(File::from(global).format(FileFormat::Toml).required(false));
        }

        // Layer 3: project file
        match config_file {
            Some(path) => {
                if !path.exists() {
                    bail!("config file not found: {}", path.display());
                }
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                let path = root.join(PROJECT_CONFIG_FILE);
                builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
            }
        }

        // Layer 4: environment, double underscore for nesting
        builder = builder.add_source(
            Environment::with_prefix("CALBUMP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// A starter configuration written by `calbump init`.
    pub fn starter() -> Self {
        Self {
            files: vec![FileEntry {
                path: PathBuf::from("pyproject.toml"),
                file_type: FileType::Toml.as_str().into(),
                variable: "project.version".into(),
                directive: None,
                version_standard: VersionStandard::Normalized.as_str().into(),
            }],
            ..Self::default()
        }
    }

    /// The version scheme, with an optional timezone override.
    pub fn version_spec(&self, timezone: Option<&str>) -> CalbumpResult<VersionSpec> {
        let version = &self.version;
        let timezone = timezone.unwrap_or(&version.timezone);
        Ok(VersionSpec::new(&version.format, &version.date_format, timezone)?
            .with_build_count_start(version.build_count_start))
    }

    /// Every `[[files]]` entry as a target rooted at `root`.
    pub fn targets(&self, root: &Path) -> CalbumpResult<Vec<FileTarget>> {
        self.files.iter().map(|entry| entry.to_target(root)).collect()
    }

    /// Directory holding `history.json` and `backups/`.
    pub fn state_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.history.dir)
    }

    /// Path to the global configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness.
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "calbump", "calbump")
            .map(|d| d.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, content: &str) {
        std::fs::write(dir.join(PROJECT_CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.version.format, "{current_date}-{build_count:03}");
        assert_eq!(cfg.version.timezone, "America/New_York");
        assert_eq!(cfg.history.limit, 50);
        assert!(!cfg.git.tag);
        assert!(cfg.files.is_empty());
    }

    #[test]
    fn python_module_paths_become_files() {
        let python = FileType::Python;
        assert_eq!(
            module_path(Path::new("src.pkg.version"), python),
            Path::new("src").join("pkg").join("version.py")
        );
        assert_eq!(module_path(Path::new("version"), python), Path::new("version.py"));
        assert_eq!(module_path(Path::new("version.py"), python), Path::new("version.py"));
        assert_eq!(
            module_path(Path::new("src/version.py"), python),
            Path::new("src/version.py")
        );
        assert_eq!(
            module_path(Path::new("pyproject.toml"), FileType::Toml),
            Path::new("pyproject.toml")
        );
    }

    #[test]
    fn to_target_resolves_module_paths() {
        let entry = FileEntry {
            path: PathBuf::from("pkg.about"),
            file_type: "python".into(),
            variable: "__version__".into(),
            directive: None,
            version_standard: "default".into(),
        };
        let target = entry.to_target(Path::new("/proj")).unwrap();
        assert_eq!(target.path(), Path::new("/proj/pkg/about.py"));
    }

    #[test]
    fn load_without_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load(dir.path(), None).unwrap();
        assert_eq!(cfg.version.date_format, "%Y.%m.%d");
    }

    #[test]
    fn project_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            r#"
[version]
format = "{current_date}.{build_count}"
timezone = "UTC"

[git]
tag = true
tag_prefix = "v"

[[files]]
path = "Dockerfile"
file_type = "dockerfile"
variable = "VERSION"
directive = "ARG"

[[files]]
path = "setup.cfg"
file_type = "setup.cfg"
variable = "metadata.version"
version_standard = "python"
"#,
        );

        let cfg = AppConfig::load(dir.path(), None).unwrap();
        assert_eq!(cfg.version.format, "{current_date}.{build_count}");
        assert_eq!(cfg.version.date_format, "%Y.%m.%d");
        assert!(cfg.git.tag);
        assert_eq!(cfg.files.len(), 2);

        let targets = cfg.targets(dir.path()).unwrap();
        assert_eq!(targets[0].path(), dir.path().join("Dockerfile"));
        assert_eq!(targets[0].directive(), Some("ARG"));
        assert_eq!(targets[1].version_standard(), VersionStandard::Normalized);
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(dir.path(), Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn bad_entries_are_rejected_when_resolved() {
        let entry = FileEntry {
            path: "a.txt".into(),
            file_type: "cobol".into(),
            variable: "V".into(),
            directive: None,
            version_standard: default_standard(),
        };
        assert!(entry.to_target(Path::new("/p")).is_err());
    }

    #[test]
    fn timezone_override() {
        let spec = AppConfig::default().version_spec(Some("UTC")).unwrap();
        assert_eq!(spec.timezone().name(), "UTC");
        assert!(AppConfig::default().version_spec(Some("Mars/Base")).is_err());
    }

    #[test]
    fn starter_round_trips_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::starter()).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.files, AppConfig::starter().files);
    }
}
