//! `pkginfo generate` command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

use crate::generate::PackageInfoGenerator;

#[derive(Args)]
pub struct GenerateCommand {
    /// Print the generated source to stdout instead of writing the file
    #[arg(long)]
    stdout: bool,
}

impl GenerateCommand {
    pub fn execute(self, project_dir: &Path) -> Result<()> {
        let mut generator = PackageInfoGenerator::from_project_dir(project_dir)?;

        if self.stdout {
            let content = generator.render()?;
            std::io::stdout().write_all(content.as_bytes())?;
            return Ok(());
        }

        let path = generator.write()?;
        let shown = path.strip_prefix(project_dir).unwrap_or(&path);
        println!("{} {}", "Generated".green().bold(), shown.display());
        Ok(())
    }
}
