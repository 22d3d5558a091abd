//! Formatter chain applied to rendered source text.
//!
//! Formatters are configured as an ordered list of locators and applied
//! left-to-right, each receiving the previous formatter's output:
//!
//! - `noop` - passes content through unchanged (the default)
//! - `command:<program> [args...]` - pipes content through an external
//!   command's stdin and reads the formatted result from its stdout, e.g.
//!   `command:black -q -` or `command:ruff format -`
//!
//! External commands are resolved up front when the chain is built, so a
//! missing formatter binary fails before any file is written.

use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::core::PkgInfoError;

/// Locator prefix for external command formatters.
const COMMAND_PREFIX: &str = "command:";

/// A single step in the formatter chain.
pub trait ContentFormatter {
    /// Locator this formatter was built from, used in error messages.
    fn name(&self) -> &str;

    /// Format `content`, returning the replacement text.
    fn format(&self, content: &str) -> Result<String>;
}

/// Formatter that returns its input unchanged.
pub struct PassthroughFormatter;

impl ContentFormatter for PassthroughFormatter {
    fn name(&self) -> &str {
        "noop"
    }

    fn format(&self, content: &str) -> Result<String> {
        Ok(content.to_string())
    }
}

/// Formatter piping content through an external command.
pub struct CommandFormatter {
    locator: String,
    program: PathBuf,
    args: Vec<String>,
}

impl CommandFormatter {
    /// Build from the part of the locator after `command:`.
    ///
    /// The command line is split on whitespace; the program name is resolved
    /// on `PATH` immediately so misconfiguration surfaces before generation.
    pub fn from_command_line(locator: &str, command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace();
        let program_name = parts.next().ok_or_else(|| PkgInfoError::Formatter {
            name: locator.to_string(),
            reason: "empty command line".to_string(),
        })?;

        let program = which::which(program_name).map_err(|_| PkgInfoError::Formatter {
            name: locator.to_string(),
            reason: format!("command '{program_name}' not found on PATH"),
        })?;

        Ok(Self {
            locator: locator.to_string(),
            program,
            args: parts.map(str::to_string).collect(),
        })
    }

    fn failure(&self, reason: String) -> PkgInfoError {
        PkgInfoError::Formatter {
            name: self.locator.clone(),
            reason,
        }
    }
}

impl ContentFormatter for CommandFormatter {
    fn name(&self) -> &str {
        &self.locator
    }

    fn format(&self, content: &str) -> Result<String> {
        tracing::debug!("Running formatter command {}", self.program.display());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(format!("failed to spawn: {e}")))?;

        // Feed stdin from a separate thread while draining stdout, so a
        // command that streams output larger than the pipe buffer cannot
        // deadlock against our write. A command that exits without consuming
        // all input (BrokenPipe) is judged by its exit status instead.
        let writer = child.stdin.take().map(|mut stdin| {
            let bytes = content.as_bytes().to_vec();
            std::thread::spawn(move || match stdin.write_all(&bytes) {
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| self.failure(format!("failed to wait for command: {e}")))?;

        if let Some(handle) = writer {
            handle
                .join()
                .map_err(|_| self.failure("stdin writer thread panicked".to_string()))?
                .map_err(|e| self.failure(format!("failed to write to stdin: {e}")))?;
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(self
                .failure(format!("exited with {}: {stderr}", output.status))
                .into());
        }

        String::from_utf8(output.stdout)
            .map_err(|_| self.failure("produced non-UTF-8 output".to_string()).into())
    }
}

/// Ordered formatter pipeline.
pub struct FormatterChain {
    formatters: Vec<Box<dyn ContentFormatter>>,
}

impl std::fmt::Debug for FormatterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.formatters.iter().map(|formatter| formatter.name()))
            .finish()
    }
}

impl FormatterChain {
    /// Build the chain from configured locators.
    ///
    /// # Errors
    ///
    /// Returns [`PkgInfoError::UnknownFormatter`] for an unrecognized locator
    /// and [`PkgInfoError::Formatter`] when a command cannot be resolved.
    pub fn from_locators(locators: &[String]) -> Result<Self> {
        let mut formatters: Vec<Box<dyn ContentFormatter>> = Vec::with_capacity(locators.len());
        for locator in locators {
            if locator == "noop" {
                formatters.push(Box::new(PassthroughFormatter));
            } else if let Some(command_line) = locator.strip_prefix(COMMAND_PREFIX) {
                formatters.push(Box::new(CommandFormatter::from_command_line(
                    locator,
                    command_line,
                )?));
            } else {
                return Err(PkgInfoError::UnknownFormatter {
                    name: locator.clone(),
                }
                .into());
            }
        }
        Ok(Self { formatters })
    }

    /// Apply every formatter in order.
    pub fn apply(&self, content: &str) -> Result<String> {
        let mut current = content.to_string();
        for formatter in &self.formatters {
            tracing::debug!("Applying formatter '{}'", formatter.name());
            current = formatter.format(&current)?;
        }
        Ok(current)
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}
