//! Core types shared across the crate.
//!
//! This module hosts the error taxonomy ([`PkgInfoError`]) and the
//! user-friendly error reporting layer ([`ErrorContext`]) used by the CLI.
//! All other modules create typed errors from here and propagate them through
//! `anyhow::Result`, which lets callers downcast when they need to react to a
//! specific failure mode.

pub mod error;

pub use error::{ErrorContext, PkgInfoError, user_friendly_error};
