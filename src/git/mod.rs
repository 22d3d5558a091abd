//! Git operations wrapper.
//!
//! A thin, synchronous wrapper around the system `git` command. Like Cargo's
//! `git-fetch-with-cli`, using the installed binary keeps us compatible with
//! the user's git configuration and avoids linking an embedded git library
//! for what amounts to a handful of read-only queries.
//!
//! All queries here are local and read-only: commit metadata, branch
//! information, and working tree status. Command arguments are passed as
//! separate parameters, never through a shell.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::PkgInfoError;

/// Handle to a discovered git repository.
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

/// Aggregate working tree state derived from `git status --porcelain`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    /// Changes staged in the index
    pub staged: bool,
    /// Modifications to tracked files not yet staged
    pub unstaged: bool,
    /// Untracked files present
    pub untracked: bool,
}

impl WorkingTreeStatus {
    /// Any staged, unstaged or untracked change.
    pub fn is_dirty(&self) -> bool {
        self.staged || self.unstaged || self.untracked
    }

    /// Any staged or unstaged change, ignoring untracked files.
    pub fn is_dirty_excluding_untracked(&self) -> bool {
        self.staged || self.unstaged
    }
}

impl GitRepo {
    /// Discover the repository containing `start`.
    ///
    /// With `search_parent_directories` the search walks up the directory
    /// tree (like git itself); otherwise the `.git` entry must live directly
    /// in `start`.
    ///
    /// # Errors
    ///
    /// - [`PkgInfoError::GitNotFound`] when the git binary is unavailable
    /// - [`PkgInfoError::GitRepoNotFound`] when no repository is found
    pub fn discover(start: &Path, search_parent_directories: bool) -> Result<Self> {
        which::which("git").map_err(|_| PkgInfoError::GitNotFound)?;

        let mut dir = start.to_path_buf();
        loop {
            // .git may be a directory or, for worktrees/submodules, a file
            if dir.join(".git").exists() {
                tracing::debug!("Found git repository at {}", dir.display());
                return Ok(Self { root: dir });
            }
            if !search_parent_directories {
                break;
            }
            match dir.parent() {
                Some(parent) => dir = parent.to_path_buf(),
                None => break,
            }
        }

        Err(PkgInfoError::GitRepoNotFound {
            path: start.display().to_string(),
        }
        .into())
    }

    /// Repository root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run a git subcommand in the repository, returning trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(PkgInfoError::IoError)?;

        if !output.status.success() {
            return Err(PkgInfoError::GitCommandError {
                operation: args.first().copied().unwrap_or("git").to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Like [`GitRepo::run`] but maps command failure to `None` rather than
    /// an error, for queries where a non-zero exit is an expected answer.
    fn run_optional(&self, args: &[&str]) -> Result<Option<String>> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(PkgInfoError::IoError)?;

        if !output.status.success() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
    }

    /// Full hash of the current HEAD commit.
    pub fn commit_id(&self) -> Result<String> {
        self.run(&["rev-parse", "HEAD"])
    }

    /// Author name of the HEAD commit.
    pub fn commit_author_name(&self) -> Result<String> {
        self.run(&["log", "-1", "--format=%an"])
    }

    /// Author email of the HEAD commit.
    pub fn commit_author_email(&self) -> Result<String> {
        self.run(&["log", "-1", "--format=%ae"])
    }

    /// Committer timestamp of the HEAD commit.
    pub fn commit_timestamp(&self) -> Result<chrono::DateTime<chrono::FixedOffset>> {
        let raw = self.run(&["log", "-1", "--format=%cI"])?;
        chrono::DateTime::parse_from_rfc3339(&raw).map_err(|e| {
            PkgInfoError::GitCommandError {
                operation: "log".to_string(),
                stderr: format!("unparseable commit timestamp '{raw}': {e}"),
            }
            .into()
        })
    }

    /// Short name of the checked-out branch, `None` on a detached HEAD.
    pub fn branch_name(&self) -> Result<Option<String>> {
        let name = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(if name == "HEAD" { None } else { Some(name) })
    }

    /// Full ref path of the checked-out branch (e.g. `refs/heads/main`),
    /// `None` on a detached HEAD.
    pub fn branch_path(&self) -> Result<Option<String>> {
        // symbolic-ref exits non-zero when HEAD is detached
        Ok(self
            .run_optional(&["symbolic-ref", "-q", "HEAD"])?
            .filter(|s| !s.is_empty()))
    }

    /// Aggregate working tree status flags.
    pub fn status(&self) -> Result<WorkingTreeStatus> {
        let porcelain = self.run(&["status", "--porcelain"])?;
        let mut status = WorkingTreeStatus::default();
        for line in porcelain.lines() {
            let mut chars = line.chars();
            let index = chars.next().unwrap_or(' ');
            let worktree = chars.next().unwrap_or(' ');
            if index == '?' {
                status.untracked = true;
                continue;
            }
            if index != ' ' {
                status.staged = true;
            }
            if worktree != ' ' {
                status.unstaged = true;
            }
        }
        Ok(status)
    }
}
