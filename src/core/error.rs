//! Error handling for pkginfo
//!
//! The error system is built around two types:
//! - [`PkgInfoError`] - strongly-typed errors for every failure mode in the
//!   generation and patching pipeline
//! - [`ErrorContext`] - a wrapper that adds user-facing suggestions when an
//!   error surfaces at the CLI boundary
//!
//! Library code returns `anyhow::Result` and constructs [`PkgInfoError`]
//! variants at the point of failure. Errors abort the current generation or
//! patch step immediately; no partial output files are ever left behind
//! (writes go through [`crate::utils::atomic_write`]).
//!
//! # Error Categories
//!
//! - **Property resolution**: [`PkgInfoError::UnknownGenerator`],
//!   [`PkgInfoError::UnknownProperty`], [`PkgInfoError::InvalidPropertyReference`]
//! - **Rendering**: [`PkgInfoError::Template`], [`PkgInfoError::Formatter`],
//!   [`PkgInfoError::UnknownFormatter`]
//! - **Artifact patching**: [`PkgInfoError::UnsupportedFormat`],
//!   [`PkgInfoError::ArtifactNotFound`]
//! - **Manifest / configuration**: [`PkgInfoError::ManifestNotFound`],
//!   [`PkgInfoError::ManifestParseError`], [`PkgInfoError::ConfigError`]
//! - **Git**: [`PkgInfoError::GitNotFound`], [`PkgInfoError::GitRepoNotFound`],
//!   [`PkgInfoError::GitCommandError`]

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for pkginfo operations.
///
/// Each variant represents a specific failure mode and carries the context
/// needed to explain it to the user. Messages are written for end users, not
/// just developers.
#[derive(Error, Debug)]
pub enum PkgInfoError {
    /// A property reference named a generator prefix with no registry entry.
    ///
    /// Raised for bare references like `"bogus-thing"` when no generator is
    /// registered under `bogus`, and for structured overrides whose
    /// `property-generator` is not configured.
    #[error("Unknown property generator '{name}'")]
    UnknownGenerator {
        /// The short generator name that has no registry entry
        name: String,
    },

    /// A configured generator locator has no registered factory.
    ///
    /// Built-in locators are `builtin:project` and `builtin:git`; anything
    /// else must be registered through
    /// [`GeneratorRegistry::register`](crate::generators::GeneratorRegistry::register)
    /// before first use.
    #[error("No generator factory registered for locator '{locator}'")]
    GeneratorLoad {
        /// The locator string from the `generators` configuration table
        locator: String,
    },

    /// A generator was asked for a property name it does not recognize.
    #[error("Generator '{generator}' has no property named '{name}'")]
    UnknownProperty {
        /// Short name of the generator that rejected the request
        generator: String,
        /// The unrecognized base property name
        name: String,
    },

    /// A property reference could not be parsed into generator + property.
    #[error("Invalid property reference '{reference}'")]
    InvalidPropertyReference {
        /// The offending configuration entry
        reference: String,
    },

    /// A formatter locator is not recognized.
    #[error("Unknown content formatter '{name}'")]
    UnknownFormatter {
        /// The locator string from the `formatters` configuration list
        name: String,
    },

    /// A content formatter failed while reformatting generated source.
    ///
    /// The render aborts; no partially formatted output is written.
    #[error("Formatter '{name}' failed: {reason}")]
    Formatter {
        /// Name of the formatter that failed
        name: String,
        /// Why the formatter invocation failed
        reason: String,
    },

    /// Template rendering failed.
    #[error("Template rendering failed: {reason}")]
    Template {
        /// Cleaned-up message from the template engine
        reason: String,
    },

    /// A patch target format is outside the recognized set.
    ///
    /// Recognized configuration values are `wheel`, `sdist` and `all`;
    /// recognized artifact extensions are `.whl`, `.tar.gz` and `.tgz`.
    #[error("Unsupported build artifact format '{format}'")]
    UnsupportedFormat {
        /// The unrecognized format name or file extension
        format: String,
    },

    /// The build artifact selected for patching does not exist.
    #[error("Build artifact not found: {path}")]
    ArtifactNotFound {
        /// Path (or glob) of the missing artifact
        path: String,
    },

    /// No pyproject.toml in the project directory.
    #[error("Manifest file pyproject.toml not found in {dir}")]
    ManifestNotFound {
        /// The directory that was searched
        dir: String,
    },

    /// pyproject.toml exists but could not be parsed.
    #[error("Invalid manifest file syntax in {file}")]
    ManifestParseError {
        /// Path to the manifest file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Git executable not found in PATH.
    ///
    /// Git is only required when the configured property list includes
    /// `git-*` properties.
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// No git repository at (or, with parent search enabled, above) the
    /// project directory.
    #[error("No git repository found at {path}")]
    GitRepoNotFound {
        /// The directory where repository discovery started
        path: String,
    },

    /// A git command returned a non-zero exit code.
    #[error("Git operation '{operation}' failed: {stderr}")]
    GitCommandError {
        /// The git operation that failed (e.g. "rev-parse", "status")
        operation: String,
        /// The error output from the git command
        stderr: String,
    },

    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// An error wrapped with user-facing context for CLI display.
///
/// Adds an optional suggestion and detail line to the underlying error so the
/// terminal output tells the user what to try next, not just what broke.
pub struct ErrorContext {
    /// The underlying error
    pub error: anyhow::Error,
    /// Actionable suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Additional background detail
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no extra context.
    pub fn new(error: anyhow::Error) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion shown below the error message.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach a detail line shown below the error message.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.error);
        for cause in self.error.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".yellow(), cause);
        }
        if let Some(details) = &self.details {
            eprintln!("\n{details}");
        }
        if let Some(suggestion) = &self.suggestion {
            eprintln!("\n{} {}", "suggestion:".cyan().bold(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\n{details}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with contextual suggestions.
///
/// Downcasts to [`PkgInfoError`] where possible and attaches the suggestion
/// appropriate for that failure mode. Unknown error types pass through
/// unchanged.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let ctx = ErrorContext::new(error);
    let Some(pkg_error) = ctx.error.downcast_ref::<PkgInfoError>() else {
        return ctx;
    };

    match pkg_error {
        PkgInfoError::UnknownGenerator { name } => {
            let suggestion = format!(
                "Register '{name}' under [tool.package-info.generators] or fix the property reference"
            );
            ctx.with_suggestion(suggestion).with_details(
                "Built-in generators are 'project' (pyproject.toml fields) and 'git' (repository state)"
                    .to_string(),
            )
        }
        PkgInfoError::UnknownProperty { generator, .. } => {
            let suggestion = format!(
                "Check the property list in [tool.package-info] against the properties the '{generator}' generator supports"
            );
            ctx.with_suggestion(suggestion)
        }
        PkgInfoError::InvalidPropertyReference { .. } => ctx.with_suggestion(
            "Property references use the form '<generator>-<property>', e.g. 'git-commit-id'",
        ),
        PkgInfoError::UnknownFormatter { .. } => ctx.with_suggestion(
            "Recognized formatter locators are 'noop' and 'command:<program> [args...]'",
        ),
        PkgInfoError::ManifestNotFound { .. } => ctx.with_suggestion(
            "Run pkginfo from the project root, or pass --directory <path> pointing at it",
        ),
        PkgInfoError::GitNotFound => {
            ctx.with_suggestion("Install git from https://git-scm.com/ and ensure it is in PATH")
        }
        PkgInfoError::GitRepoNotFound { .. } => ctx.with_suggestion(
            "Initialize a repository with 'git init', or set git-search-parent-directories = true \
             if the repository root is above the project directory",
        ),
        PkgInfoError::ArtifactNotFound { .. } => {
            ctx.with_suggestion("Build the project first so the dist directory contains artifacts")
        }
        PkgInfoError::UnsupportedFormat { .. } => {
            ctx.with_suggestion("Supported patch-build-formats values are 'wheel', 'sdist' and 'all'")
        }
        _ => ctx,
    }
}
