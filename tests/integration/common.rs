//! Shared fixtures for integration tests.

use assert_cmd::Command;
use pkginfo_cli::test_utils::TestGit;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A temporary project directory with a pyproject.toml and optionally a git
/// repository.
pub struct TestProject {
    temp: TempDir,
}

impl TestProject {
    /// Create a project with the given pyproject.toml content.
    pub fn new(pyproject: &str) -> Self {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), pyproject).unwrap();
        Self { temp }
    }

    /// Like [`TestProject::new`] but with an initialized git repository
    /// containing one commit of the manifest.
    pub fn with_git(pyproject: &str) -> Self {
        let project = Self::new(pyproject);
        project.commit_all("initial commit");
        project
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Stage and commit everything, initializing the repository on first use.
    pub fn commit_all(&self, message: &str) {
        let git = TestGit::new(self.path());
        if !self.path().join(".git").exists() {
            git.init().unwrap();
            git.config_user().unwrap();
        }
        git.add_all().unwrap();
        git.commit(message).unwrap();
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative)).unwrap()
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path().join(relative).exists()
    }

    /// Command for the pkginfo binary pointed at this project.
    pub fn pkginfo(&self) -> Command {
        let mut cmd = Command::cargo_bin("pkginfo").unwrap();
        cmd.arg("-C").arg(self.path());
        cmd
    }
}

/// Manifest used by most end-to-end scenarios.
pub const BASIC_PYPROJECT: &str = r#"
[project]
name = "git-project-with-config"
version = "1.2.3"
description = "A test project"
authors = [{ name = "Jane Doe", email = "jane@example.com" }]

[tool.package-info]
properties = ["project-name", "project-version"]
"#;
