//! pkginfo CLI entry point
//!
//! This is the main executable for the package info generation tool.
//! It handles command-line argument parsing, error display, and command execution.
//!
//! The CLI supports two commands:
//! - `generate` - Render and write the package_info.py file on demand
//! - `patch` - Inject the freshly rendered file into built wheel/sdist artifacts

use anyhow::Result;
use clap::Parser;
use pkginfo_cli::cli;
use pkginfo_cli::core::error::user_friendly_error;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // Execute the command
    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
