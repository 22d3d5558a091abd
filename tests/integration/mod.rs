//! Integration test suite for the pkginfo CLI.
//!
//! End-to-end tests that run the built binary against temporary projects
//! with real git repositories and real build artifacts.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! Organization:
//! - **generate**: file generation, templates, formatters, output paths
//! - **patch**: wheel and sdist artifact patching
//! - **errors**: failure modes and exit codes

mod common;
mod errors;
mod generate;
mod patch;
