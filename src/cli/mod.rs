//! Command-line interface.

mod generate;
mod patch;

pub use generate::GenerateCommand;
pub use patch::PatchCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pkginfo",
    version,
    about = "Generate a package_info.py from project and git metadata",
    long_about = "Reads pyproject.toml and git state, renders the configured properties \
                  through a template, and writes the result as a Python source file. \
                  Configuration lives in the [tool.package-info] section of pyproject.toml."
)]
pub struct Cli {
    /// Project directory containing pyproject.toml (defaults to the current
    /// directory)
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the package info file into the source tree
    Generate(GenerateCommand),
    /// Insert the generated file into built artifacts in the dist directory
    Patch(PatchCommand),
}

impl Cli {
    /// Run the selected command.
    pub fn execute(self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        let project_dir = match self.directory {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        match self.command {
            Commands::Generate(cmd) => cmd.execute(&project_dir),
            Commands::Patch(cmd) => cmd.execute(&project_dir),
        }
    }
}

/// Logging goes to stderr so `generate --stdout` output stays clean.
/// `RUST_LOG` overrides the flag-derived level.
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "pkginfo=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from(["pkginfo", "generate"]).unwrap();
        assert!(matches!(cli.command, Commands::Generate(_)));
        assert!(cli.directory.is_none());
    }

    #[test]
    fn test_global_directory_flag() {
        let cli = Cli::try_parse_from(["pkginfo", "-C", "/tmp/project", "generate"]).unwrap();
        assert_eq!(cli.directory.unwrap(), PathBuf::from("/tmp/project"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["pkginfo", "-v", "-q", "generate"]).is_err());
    }

    #[test]
    fn test_patch_dist_dir_default() {
        let cli = Cli::try_parse_from(["pkginfo", "patch"]).unwrap();
        match cli.command {
            Commands::Patch(cmd) => assert_eq!(cmd.dist_dir(), PathBuf::from("dist")),
            _ => panic!("expected patch command"),
        }
    }
}
