//! `pkginfo patch` command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::generate::PackageInfoGenerator;

#[derive(Args)]
pub struct PatchCommand {
    /// Directory containing built artifacts, relative to the project
    /// directory unless absolute
    #[arg(long, default_value = "dist", value_name = "DIR")]
    dist_dir: PathBuf,
}

impl PatchCommand {
    pub fn execute(self, project_dir: &Path) -> Result<()> {
        let mut generator = PackageInfoGenerator::from_project_dir(project_dir)?;

        if generator.config().patch_build_formats.is_empty() {
            tracing::warn!(
                "patch-build-formats is not configured; nothing to patch"
            );
            println!("{} no patch-build-formats configured", "Skipped".yellow().bold());
            return Ok(());
        }

        let dist_dir = if self.dist_dir.is_absolute() {
            self.dist_dir
        } else {
            project_dir.join(self.dist_dir)
        };

        let patched = generator.patch_artifacts(&dist_dir)?;
        for path in &patched {
            let shown = path.strip_prefix(project_dir).unwrap_or(path);
            println!("{} {}", "Patched".green().bold(), shown.display());
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn dist_dir(&self) -> PathBuf {
        self.dist_dir.clone()
    }
}
