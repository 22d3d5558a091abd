//! pkginfo - package info file generation for Python projects
//!
//! A build tool that reads a project's `pyproject.toml` manifest and git state,
//! resolves a configured list of metadata properties, and renders them into a
//! generated `package_info.py` module the package can import at runtime. Built
//! distribution artifacts (wheels and sdists) can be patched after the fact so
//! the generated file inside them is always fresh.
//!
//! # Architecture Overview
//!
//! Generation is a synchronous, single-pass pipeline:
//!
//! 1. `pyproject.toml` is loaded and the `[tool.package-info]` section parsed
//!    into a [`config::PluginConfig`] (all keys optional, defaults applied).
//! 2. A [`generators::GeneratorRegistry`] maps short generator names
//!    (`project`, `git`) to lazily-instantiated [`generators::PropertyGenerator`]
//!    implementations. Third-party generators register a factory at startup.
//! 3. The [`properties`] resolver walks the ordered `properties` list, asking
//!    the right generator for each typed value. Input order is preserved.
//! 4. The [`templating`] renderer feeds the resolved properties through a Tera
//!    template and converts each value to a Python literal.
//! 5. The [`formatters`] chain post-processes the rendered source text.
//! 6. The result is written atomically, or injected into built artifacts by
//!    the [`artifact`] patcher.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface (`generate`, `patch` subcommands)
//! - [`config`] - `[tool.package-info]` configuration surface
//! - [`core`] - Error types and user-friendly error reporting
//! - [`generate`] - Pipeline orchestration
//!
//! ## Property Pipeline
//! - [`generators`] - Property generator trait, registry, and built-ins
//! - [`properties`] - Property data model and reference resolution
//! - [`templating`] - Tera-based rendering of resolved properties
//! - [`formatters`] - Chainable post-processing of generated source
//!
//! ## Collaborators
//! - [`git`] - Synchronous wrapper over the system git command
//! - [`manifest`] - `pyproject.toml` parsing (PEP 621 with poetry fallback)
//! - [`artifact`] - Wheel/sdist archive patching
//! - [`utils`] - Atomic file writes and small filesystem helpers
//!
//! # Configuration Format (`pyproject.toml`)
//!
//! ```toml
//! [tool.package-info]
//! patch-build-formats = ["wheel", "sdist"]
//! package-info-file-path = "my_package/package_info.py"
//! git-search-parent-directories = false
//! formatters = ["command:black -q -"]
//! properties = [
//!     "project-name",
//!     "project-version",
//!     "git-commit-id",
//!     { property-name = "git-is-dirty", variable-name = "dirty" },
//! ]
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Generate package_info.py on demand
//! pkginfo generate
//!
//! # Print the rendered file without writing it
//! pkginfo generate --stdout
//!
//! # Refresh the generated file inside dist/*.whl and dist/*.tar.gz
//! pkginfo patch --dist-dir dist
//! ```

pub mod artifact;
pub mod cli;
pub mod config;
pub mod core;
pub mod formatters;
pub mod generate;
pub mod generators;
pub mod git;
pub mod manifest;
pub mod properties;
pub mod templating;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
