//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

#[derive(Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Info,
}

impl Tone {
    fn mark(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}",
            Self::Warning => "\u{26a0}",
            Self::Info => "\u{2139}",
        }
    }
}

/// Writes command results to stdout in the resolved format.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Colors are used only for `Human` output, and never when the flag,
    /// `NO_COLOR` or `[output] no_color` disable them.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let resolved_format = match args.output_format {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            explicit => explicit,
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    fn emit(&self, line: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(line)
    }

    fn marked(&self, tone: Tone, msg: &str) -> String {
        let mark = tone.mark();
        if self.no_color {
            return format!("{mark} {msg}");
        }
        match tone {
            Tone::Success => format!("{} {}", mark.green().bold(), msg.green()),
            Tone::Warning => format!("{} {}", mark.yellow().bold(), msg.yellow()),
            Tone::Info => format!("{} {}", mark.blue().bold(), msg.blue()),
        }
    }

    /// Unstyled line; suppressed by `--quiet`.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.emit(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.emit(&self.marked(Tone::Success, msg))
    }

    /// Printed even with `--quiet`: a warning changes the exit code, so the
    /// reason must be visible.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.term.write_line(&self.marked(Tone::Warning, msg))
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.emit(&self.marked(Tone::Info, msg))
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.no_color {
            self.emit(text)
        } else {
            self.emit(&text.cyan().bold().to_string())
        }
    }

    /// Indented `label  value` line.
    pub fn field(&self, label: &str, value: &str) -> io::Result<()> {
        if self.no_color {
            self.emit(&format!("  {label:<10} {value}"))
        } else {
            // Pad before styling; ANSI codes would count toward the width.
            self.emit(&format!("  {} {value}", format!("{label:<10}").dimmed()))
        }
    }

    /// Pretty JSON document. Always written, so scripts using `-q` still
    /// receive their data.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    /// Never `Auto`.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(format: OutputFormat, no_color: bool) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color,
            config: None,
            directory: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn colour_only_for_human_output() {
        assert!(!make_manager(OutputFormat::Human, false).no_color);
        assert!(make_manager(OutputFormat::Human, true).no_color);
        assert!(make_manager(OutputFormat::Plain, false).no_color);
        assert!(make_manager(OutputFormat::Json, false).no_color);
    }

    #[test]
    fn plain_marks_are_unstyled() {
        let out = make_manager(OutputFormat::Plain, false);
        assert_eq!(out.marked(Tone::Warning, "tag missing"), "\u{26a0} tag missing");
        assert_eq!(out.marked(Tone::Success, "done"), "\u{2713} done");
    }

    #[test]
    fn config_can_disable_colour() {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            directory: None,
            output_format: OutputFormat::Human,
        };
        let mut config = AppConfig::default();
        config.output.no_color = true;
        assert!(OutputManager::new(&args, &config).no_color);
    }

    #[test]
    fn explicit_format_is_kept() {
        let out = make_manager(OutputFormat::Json, true);
        assert_eq!(out.format(), OutputFormat::Json);
        assert!(out.is_json());
    }
}
