//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "calbump",
    bin_name = "calbump",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Calendar versioning with reversible bumps",
    long_about = "calbump computes the next calendar version and writes it into every \
                  configured project file, keeping a backup so the bump can be undone.",
    after_help = "EXAMPLES:\n\
        \x20 calbump init\n\
        \x20 calbump bump --dry-run\n\
        \x20 calbump bump --rc --git-tag\n\
        \x20 calbump history\n\
        \x20 calbump undo",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the next version into every configured file.
    #[command(
        visible_alias = "b",
        about = "Bump the version in every configured file",
        after_help = "EXAMPLES:\n\
            \x20 calbump bump\n\
            \x20 calbump bump --beta\n\
            \x20 calbump bump --custom hotfix --timezone UTC\n\
            \x20 calbump bump --git-tag --auto-commit"
    )]
    Bump(BumpArgs),

    /// Reverse a recorded bump.
    #[command(
        about = "Undo a bump",
        after_help = "EXAMPLES:\n\
            \x20 calbump undo                              # latest bump\n\
            \x20 calbump undo 20250831T101500123456_0001   # a specific bump\n\
            \x20 calbump undo --check                      # report, change nothing"
    )]
    Undo(UndoArgs),

    /// Show recorded bumps.
    #[command(
        visible_alias = "log",
        about = "List recorded bumps",
        after_help = "EXAMPLES:\n\
            \x20 calbump history\n\
            \x20 calbump history --limit 5 --format json\n\
            \x20 calbump history --prune"
    )]
    History(HistoryArgs),

    /// Write a starter `calbump.toml`.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 calbump init\n\
            \x20 calbump init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 calbump completions bash > ~/.local/share/bash-completion/completions/calbump\n\
            \x20 calbump completions zsh  > ~/.zfunc/_calbump\n\
            \x20 calbump completions fish > ~/.config/fish/completions/calbump.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 calbump config get version.format\n\
            \x20 calbump config list\n\
            \x20 calbump config path"
    )]
    Config(ConfigCommands),
}

// ── bump ──────────────────────────────────────────────────────────────────────

/// Arguments for `calbump bump`.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("suffix").args(["beta", "rc", "release", "custom"])))]
pub struct BumpArgs {
    /// Append `.beta` to the version.
    #[arg(long = "beta", help = "Add .beta to the version")]
    pub beta: bool,

    /// Append `.rc` to the version.
    #[arg(long = "rc", help = "Add .rc to the version")]
    pub rc: bool,

    /// Append `.release` to the version.
    #[arg(long = "release", help = "Add .release to the version")]
    pub release: bool,

    /// Append `.<SUFFIX>` to the version.
    #[arg(long = "custom", value_name = "SUFFIX", help = "Add .<SUFFIX> to the version")]
    pub custom: Option<String>,

    /// Override `version.timezone`.
    #[arg(long = "timezone", value_name = "TZ", help = "IANA timezone for the date component")]
    pub timezone: Option<String>,

    #[arg(long = "git-tag", overrides_with = "no_git_tag", help = "Create a git tag")]
    pub git_tag: bool,

    #[arg(long = "no-git-tag", overrides_with = "git_tag", help = "Do not create a git tag")]
    pub no_git_tag: bool,

    #[arg(
        long = "auto-commit",
        overrides_with = "no_auto_commit",
        help = "Commit the changed files before tagging"
    )]
    pub auto_commit: bool,

    #[arg(long = "no-auto-commit", overrides_with = "auto_commit", help = "Do not commit")]
    pub no_auto_commit: bool,

    /// Preview what would be written without touching any file.
    #[arg(long = "dry-run", help = "Show the new version without writing")]
    pub dry_run: bool,
}

impl BumpArgs {
    /// `Some` when either side of `--git-tag/--no-git-tag` was given.
    pub fn git_tag(&self) -> Option<bool> {
        tristate(self.git_tag, self.no_git_tag)
    }

    pub fn auto_commit(&self) -> Option<bool> {
        tristate(self.auto_commit, self.no_auto_commit)
    }
}

fn tristate(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

// ── undo ──────────────────────────────────────────────────────────────────────

/// Arguments for `calbump undo`.
#[derive(Debug, Args)]
pub struct UndoArgs {
    /// Operation id from `calbump history`; the latest bump when omitted.
    #[arg(value_name = "ID")]
    pub id: Option<String>,

    /// Report what an undo would find without changing anything.
    #[arg(long = "check", help = "Only report conflicts")]
    pub check: bool,
}

// ── history ───────────────────────────────────────────────────────────────────

/// Arguments for `calbump history`.
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Show at most N entries.
    #[arg(short = 'n', long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: HistoryFormat,

    /// Delete backups no recorded bump owns.
    #[arg(long = "prune", help = "Remove orphaned backups")]
    pub prune: bool,
}

/// Output format for the `history` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HistoryFormat {
    /// Human-readable table.
    Table,
    /// JSON array, most recent first.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `calbump init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `calbump completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `calbump config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `git.tag_prefix`.
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the configuration file locations.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
