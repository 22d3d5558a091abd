//! pyproject.toml parsing.
//!
//! The manifest is the single declarative input for generation: project
//! metadata comes from the standard PEP 621 `[project]` table (with a
//! `[tool.poetry]` fallback for poetry-managed projects), and the plugin's
//! own configuration lives under `[tool.package-info]`.
//!
//! Fields from both metadata dialects are normalized into
//! [`ProjectMetadata`], which is what the `project` property generator reads.
//! PEP 621 contact tables (`{ name = ..., email = ... }`) are rendered into
//! the conventional `"Name <email>"` form poetry uses, so downstream output
//! is identical regardless of dialect.
//!
//! # Example
//!
//! ```toml
//! [project]
//! name = "my-package"
//! version = "1.2.3"
//! description = "An example"
//! authors = [{ name = "Jane Doe", email = "jane@example.com" }]
//! keywords = ["example"]
//!
//! [project.urls]
//! Homepage = "https://example.com"
//! Repository = "https://github.com/example/my-package"
//!
//! [tool.package-info]
//! properties = ["project-name", "project-version", "git-commit-id"]
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::PluginConfig;
use crate::core::PkgInfoError;

/// Manifest file name searched for in the project directory.
pub const MANIFEST_FILENAME: &str = "pyproject.toml";

/// Parsed pyproject.toml.
///
/// Unknown tables and keys are ignored everywhere except inside
/// `[tool.package-info]`, which is strict.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PyProject {
    /// PEP 621 `[project]` table
    pub project: Option<Pep621Project>,
    /// `[tool]` section
    pub tool: Option<ToolSection>,
}

/// The `[tool]` table, reduced to the entries pkginfo cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolSection {
    /// `[tool.poetry]` metadata fallback
    pub poetry: Option<PoetryProject>,
    /// `[tool.package-info]` plugin configuration
    #[serde(rename = "package-info")]
    pub package_info: Option<PluginConfig>,
}

/// PEP 621 `[project]` metadata fields used by the `project` generator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pep621Project {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub authors: Option<Vec<Pep621Contact>>,
    pub maintainers: Option<Vec<Pep621Contact>>,
    pub license: Option<LicenseField>,
    pub keywords: Option<Vec<String>>,
    pub classifiers: Option<Vec<String>>,
    pub urls: Option<BTreeMap<String, String>>,
}

/// A PEP 621 author/maintainer entry. Both fields are optional per the PEP.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pep621Contact {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Pep621Contact {
    /// Render as `"Name <email>"`, falling back to whichever part is present.
    fn display(&self) -> Option<String> {
        match (&self.name, &self.email) {
            (Some(name), Some(email)) => Some(format!("{name} <{email}>")),
            (Some(name), None) => Some(name.clone()),
            (None, Some(email)) => Some(email.clone()),
            (None, None) => None,
        }
    }
}

/// PEP 621 license field: either a plain SPDX string or a table with `text`
/// or `file` keys.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LicenseField {
    Spdx(String),
    Table {
        text: Option<String>,
        file: Option<String>,
    },
}

impl LicenseField {
    fn as_text(&self) -> Option<String> {
        match self {
            Self::Spdx(s) => Some(s.clone()),
            Self::Table { text, file } => text.clone().or_else(|| file.clone()),
        }
    }
}

/// `[tool.poetry]` metadata fields.
///
/// Poetry uses plain `"Name <email>"` strings for contacts and carries its
/// documentation/homepage/repository URLs as top-level keys.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoetryProject {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub authors: Option<Vec<String>>,
    pub maintainers: Option<Vec<String>>,
    pub license: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub classifiers: Option<Vec<String>>,
    pub documentation: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub urls: Option<BTreeMap<String, String>>,
}

/// Normalized project metadata, independent of manifest dialect.
///
/// `[project]` values win over `[tool.poetry]` values field by field.
#[derive(Debug, Clone, Default)]
pub struct ProjectMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub authors: Vec<String>,
    pub maintainers: Vec<String>,
    pub keywords: Vec<String>,
    pub classifiers: Vec<String>,
    pub documentation: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
}

impl ProjectMetadata {
    /// Project name with hyphens replaced by underscores, suitable as the
    /// default source directory name.
    pub fn snake_name(&self) -> Option<String> {
        self.name.as_ref().map(|n| n.replace('-', "_"))
    }
}

impl PyProject {
    /// Load and parse `pyproject.toml` from the given project directory.
    ///
    /// # Errors
    ///
    /// - [`PkgInfoError::ManifestNotFound`] when the file does not exist
    /// - [`PkgInfoError::ManifestParseError`] when the TOML is invalid
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(MANIFEST_FILENAME);
        if !path.exists() {
            return Err(PkgInfoError::ManifestNotFound {
                dir: project_dir.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(&path).map_err(PkgInfoError::IoError)?;
        let manifest: Self = toml::from_str(&content).map_err(|e| PkgInfoError::ManifestParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Loaded manifest from {}", path.display());
        Ok(manifest)
    }

    /// The `[tool.package-info]` configuration, if present.
    pub fn plugin_config(&self) -> Option<&PluginConfig> {
        self.tool.as_ref().and_then(|t| t.package_info.as_ref())
    }

    /// Normalize `[project]` / `[tool.poetry]` into a single metadata view.
    pub fn metadata(&self) -> ProjectMetadata {
        let project = self.project.as_ref();
        let poetry = self.tool.as_ref().and_then(|t| t.poetry.as_ref());

        let url_lookup = |key: &str| -> Option<String> {
            // [project.urls] first (case-insensitive key match), then poetry's
            // top-level keys, then poetry's own urls table.
            project
                .and_then(|p| p.urls.as_ref())
                .and_then(|urls| {
                    urls.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v.clone())
                })
                .or_else(|| {
                    poetry.and_then(|p| p.urls.as_ref()).and_then(|urls| {
                        urls.iter()
                            .find(|(k, _)| k.eq_ignore_ascii_case(key))
                            .map(|(_, v)| v.clone())
                    })
                })
        };

        let contacts = |pep: Option<&Vec<Pep621Contact>>, poetry_list: Option<&Vec<String>>| {
            if let Some(entries) = pep {
                entries.iter().filter_map(Pep621Contact::display).collect()
            } else {
                poetry_list.cloned().unwrap_or_default()
            }
        };

        ProjectMetadata {
            name: project
                .and_then(|p| p.name.clone())
                .or_else(|| poetry.and_then(|p| p.name.clone())),
            version: project
                .and_then(|p| p.version.clone())
                .or_else(|| poetry.and_then(|p| p.version.clone())),
            description: project
                .and_then(|p| p.description.clone())
                .or_else(|| poetry.and_then(|p| p.description.clone())),
            license: project
                .and_then(|p| p.license.as_ref().and_then(LicenseField::as_text))
                .or_else(|| poetry.and_then(|p| p.license.clone())),
            authors: contacts(
                project.and_then(|p| p.authors.as_ref()),
                poetry.and_then(|p| p.authors.as_ref()),
            ),
            maintainers: contacts(
                project.and_then(|p| p.maintainers.as_ref()),
                poetry.and_then(|p| p.maintainers.as_ref()),
            ),
            keywords: project
                .and_then(|p| p.keywords.clone())
                .or_else(|| poetry.and_then(|p| p.keywords.clone()))
                .unwrap_or_default(),
            classifiers: project
                .and_then(|p| p.classifiers.clone())
                .or_else(|| poetry.and_then(|p| p.classifiers.clone()))
                .unwrap_or_default(),
            documentation: url_lookup("documentation")
                .or_else(|| poetry.and_then(|p| p.documentation.clone())),
            homepage: url_lookup("homepage").or_else(|| poetry.and_then(|p| p.homepage.clone())),
            repository: url_lookup("repository")
                .or_else(|| poetry.and_then(|p| p.repository.clone())),
        }
    }
}
