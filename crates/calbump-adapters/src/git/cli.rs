//! `GitClient` backed by the `git` executable.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use calbump_core::{
    application::{ApplicationError, ports::{GitClient, TagDeletion}},
    error::CalbumpResult,
};
use tracing::{debug, instrument};

/// Runs `git -C <root> ...` for every operation.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Whether `root` is inside a git work tree.
    pub fn is_repository(root: &Path) -> bool {
        Command::new("git")
            .arg("-C")
            .arg(root)
            .args(["rev-parse", "--is-inside-work-tree"])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn output(&self, args: &[&str]) -> CalbumpResult<Output> {
        debug!(?args, "git");
        Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(|e| failed(args, e.to_string()))
    }

    /// Run and require success; returns trimmed stdout.
    fn run(&self, args: &[&str]) -> CalbumpResult<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(args, stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn tag_exists(&self, name: &str) -> CalbumpResult<bool> {
        let reference = format!("refs/tags/{name}");
        Ok(self
            .output(&["rev-parse", "--quiet", "--verify", &reference])?
            .status
            .success())
    }
}

fn failed(args: &[&str], reason: String) -> calbump_core::error::CalbumpError {
    ApplicationError::GitFailed {
        command: args.first().copied().unwrap_or("git").to_string(),
        reason,
    }
    .into()
}

impl GitClient for GitCli {
    #[instrument(skip(self))]
    fn create_tag(&self, name: &str) -> CalbumpResult<()> {
        self.run(&["tag", name]).map(drop)
    }

    #[instrument(skip(self))]
    fn delete_tag(&self, name: &str) -> CalbumpResult<TagDeletion> {
        if !self.tag_exists(name)? {
            return Ok(TagDeletion::NotFound);
        }
        self.run(&["tag", "-d", name])?;
        Ok(TagDeletion::Deleted)
    }

    #[instrument(skip(self, paths), fields(files = paths.len()))]
    fn commit(&self, message: &str, paths: &[PathBuf]) -> CalbumpResult<String> {
        let mut add = vec!["add".to_string(), "--".to_string()];
        add.extend(paths.iter().map(|p| p.to_string_lossy().into_owned()));
        let add: Vec<&str> = add.iter().map(String::as_str).collect();
        self.run(&add)?;

        self.run(&["commit", "-m", message])?;
        self.current_head()
    }

    #[instrument(skip(self))]
    fn reset_to(&self, commit: &str) -> CalbumpResult<()> {
        self.run(&["reset", "--mixed", "--quiet", commit]).map(drop)
    }

    fn current_head(&self) -> CalbumpResult<String> {
        self.run(&["rev-parse", "HEAD"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git(root: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .arg("-C")
            .arg(root)
            .args(args)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// A scratch repository with one commit, or `None` without a git binary.
    fn repo() -> Option<tempfile::TempDir> {
        let dir = tempfile::tempdir().ok()?;
        let root = dir.path();
        if !git(root, &["init", "--quiet"]) {
            return None;
        }
        git(root, &["config", "user.email", "calbump@example.com"]);
        git(root, &["config", "user.name", "calbump"]);
        git(root, &["config", "commit.gpgsign", "false"]);
        std::fs::write(root.join("version.txt"), "1\n").ok()?;
        git(root, &["add", "."]);
        git(root, &["commit", "--quiet", "-m", "init"]).then_some(dir)
    }

    #[test]
    fn commit_tag_and_reverse() {
        let Some(dir) = repo() else { return };
        let client = GitCli::new(dir.path());
        assert!(GitCli::is_repository(dir.path()));

        let parent = client.current_head().unwrap();
        std::fs::write(dir.path().join("version.txt"), "2\n").unwrap();
        let commit = client
            .commit("Bump version to 2", &[dir.path().join("version.txt")])
            .unwrap();
        assert_ne!(commit, parent);
        assert_eq!(client.current_head().unwrap(), commit);

        client.create_tag("v2").unwrap();
        assert!(client.create_tag("v2").is_err());
        assert_eq!(client.delete_tag("v2").unwrap(), TagDeletion::Deleted);
        assert_eq!(client.delete_tag("v2").unwrap(), TagDeletion::NotFound);

        client.reset_to(&parent).unwrap();
        assert_eq!(client.current_head().unwrap(), parent);
    }

    #[test]
    fn outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!GitCli::is_repository(dir.path()));
        assert!(GitCli::new(dir.path()).current_head().is_err());
    }
}
