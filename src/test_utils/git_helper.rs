//! Minimal git driver for building repository fixtures in tests.

use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs git commands against a fixture directory.
///
/// Commands run with `-C <dir>` so the helper never depends on the process
/// working directory, and identity is configured per-repository so tests do
/// not touch the user's global git configuration.
pub struct TestGit {
    dir: PathBuf,
}

impl TestGit {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.dir)
            .args(args)
            .output()?;
        if !output.status.success() {
            return Err(anyhow!(
                "git {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Initialize a repository with a deterministic default branch name.
    pub fn init(&self) -> Result<()> {
        self.run(&["init", "--initial-branch", "main"])?;
        Ok(())
    }

    /// Configure the committer identity used by fixture commits.
    pub fn config_user(&self) -> Result<()> {
        self.run(&["config", "user.name", "Test User"])?;
        self.run(&["config", "user.email", "test@pkginfo.example"])?;
        Ok(())
    }

    pub fn add_all(&self) -> Result<()> {
        self.run(&["add", "-A"])?;
        Ok(())
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "--no-gpg-sign", "-m", message])?;
        Ok(())
    }

    /// Current HEAD commit hash.
    pub fn head(&self) -> Result<String> {
        self.run(&["rev-parse", "HEAD"])
    }

    /// Detach HEAD at the current commit.
    pub fn detach(&self) -> Result<()> {
        let head = self.head()?;
        self.run(&["checkout", "--detach", &head])?;
        Ok(())
    }
}
