//! Generation pipeline: manifest -> properties -> template -> formatters.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::artifact::{self, ArtifactFormat};
use crate::config::PluginConfig;
use crate::core::PkgInfoError;
use crate::formatters::FormatterChain;
use crate::generators::{GeneratorContext, GeneratorRegistry};
use crate::manifest::{ProjectMetadata, PyProject};
use crate::properties::resolve_properties;
use crate::templating::{DEFAULT_TEMPLATE, TemplateRenderer};
use crate::utils::atomic_write;

/// Drives a full generation run for one project directory.
///
/// Construction reads and validates the manifest; rendering resolves
/// properties (loading generators lazily), runs the template, and applies the
/// formatter chain. Nothing is written until [`PackageInfoGenerator::write`].
pub struct PackageInfoGenerator {
    project_dir: PathBuf,
    config: PluginConfig,
    metadata: ProjectMetadata,
    registry: GeneratorRegistry,
}

impl PackageInfoGenerator {
    /// Load the manifest in `project_dir` and prepare a generation run.
    pub fn from_project_dir(project_dir: &Path) -> Result<Self> {
        let pyproject = PyProject::load(project_dir)?;
        let config = pyproject.plugin_config().cloned().unwrap_or_default();
        let metadata = pyproject.metadata();

        let context = GeneratorContext {
            project_dir: project_dir.to_path_buf(),
            metadata: metadata.clone(),
            git_search_parent_directories: config.git_search_parent_directories,
        };
        let registry = GeneratorRegistry::new(context, config.generators.clone());

        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            config,
            metadata,
            registry,
        })
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Output path relative to the project root, forward-slash separated.
    ///
    /// Defaults to `<package>/package_info.py` where `<package>` is the
    /// project name with hyphens replaced by underscores.
    ///
    /// # Errors
    ///
    /// [`PkgInfoError::ConfigError`] when no explicit path is configured and
    /// the manifest declares no project name to derive one from.
    pub fn relative_output_path(&self) -> Result<String> {
        if let Some(path) = &self.config.package_info_file_path {
            return Ok(path.clone());
        }
        let package = self.metadata.snake_name().ok_or_else(|| {
            PkgInfoError::ConfigError {
                message: "cannot derive the output path: the manifest declares no project \
                          name and package-info-file-path is not set"
                    .to_string(),
            }
        })?;
        Ok(format!("{package}/package_info.py"))
    }

    /// Absolute output path under the project directory.
    pub fn output_path(&self) -> Result<PathBuf> {
        Ok(self.project_dir.join(self.relative_output_path()?))
    }

    /// Resolve properties, render the template and apply the formatter chain.
    pub fn render(&mut self) -> Result<String> {
        let formatters = FormatterChain::from_locators(&self.config.formatters)?;
        let properties = resolve_properties(&self.config.properties, &mut self.registry)?;

        tracing::info!(
            "Rendering {} properties through {} formatter(s)",
            properties.len(),
            formatters.len()
        );

        let template = self.config.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        let rendered = TemplateRenderer::new().render(template, &properties)?;
        formatters.apply(&rendered)
    }

    /// Render and write the generated file, creating parent directories.
    pub fn write(&mut self) -> Result<PathBuf> {
        let path = self.output_path()?;
        let content = self.render()?;
        atomic_write(&path, content.as_bytes())?;
        tracing::info!("Wrote {}", path.display());
        Ok(path)
    }

    /// Render and insert the generated file into built artifacts in
    /// `dist_dir`, honoring the configured `patch-build-formats`.
    ///
    /// Returns the patched artifact paths; empty when no formats are
    /// configured.
    pub fn patch_artifacts(&mut self, dist_dir: &Path) -> Result<Vec<PathBuf>> {
        let formats = artifact::parse_patch_formats(&self.config.patch_build_formats)?;
        if formats.is_empty() {
            return Ok(Vec::new());
        }

        let entry_path = self.relative_output_path()?;
        let content = self.render()?;

        let artifacts = artifact::find_artifacts(dist_dir, &formats)?;
        if artifacts.is_empty() {
            let names: Vec<&str> = formats.iter().map(ArtifactFormat::as_str).collect();
            return Err(PkgInfoError::ArtifactNotFound {
                path: format!("{} ({})", dist_dir.display(), names.join(", ")),
            }
            .into());
        }

        for path in &artifacts {
            artifact::patch_artifact(path, &entry_path, &content)?;
        }
        Ok(artifacts)
    }
}
