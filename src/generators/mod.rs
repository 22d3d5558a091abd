//! Property generators and the registry that resolves short names to them.
//!
//! A generator produces named, typed values from one external source: the
//! `project` generator reads pyproject.toml metadata, the `git` generator
//! queries repository state. Third-party generators plug in by registering a
//! factory under a locator string and mapping a short name to that locator in
//! `[tool.package-info.generators]`:
//!
//! ```toml
//! [tool.package-info.generators]
//! project = "builtin:project"
//! git = "builtin:git"
//! build = "mycorp:build-host"   # requires a registered factory
//! ```
//!
//! Generators are instantiated lazily on first use and cached for the rest of
//! the run. Instantiation is where discovery I/O happens (e.g. locating the
//! git repository), so a run that never asks for `git-*` properties never
//! touches git.

pub mod git;
pub mod project;

use anyhow::Result;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::core::PkgInfoError;
use crate::manifest::ProjectMetadata;
use crate::properties::{Property, PropertyConfig};

/// Locator for the built-in project metadata generator.
pub const BUILTIN_PROJECT_LOCATOR: &str = "builtin:project";
/// Locator for the built-in git metadata generator.
pub const BUILTIN_GIT_LOCATOR: &str = "builtin:git";

/// A pluggable producer of named, typed property values.
pub trait PropertyGenerator {
    /// Short name / prefix for properties belonging to this generator.
    fn short_name(&self) -> &str;

    /// Produce the property for the given parsed configuration.
    ///
    /// # Errors
    ///
    /// [`PkgInfoError::UnknownProperty`] when the base property name is not
    /// recognized; generator-specific errors when reading the external source
    /// fails.
    fn generate_property(&self, config: &PropertyConfig) -> Result<Property>;
}

impl std::fmt::Debug for dyn PropertyGenerator + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyGenerator")
            .field("short_name", &self.short_name())
            .finish()
    }
}

/// Everything a generator factory may need when instantiating.
#[derive(Debug, Clone, Default)]
pub struct GeneratorContext {
    /// Project root (directory containing pyproject.toml)
    pub project_dir: PathBuf,
    /// Normalized project metadata from the manifest
    pub metadata: ProjectMetadata,
    /// Whether the git generator may look for a repository in parent dirs
    pub git_search_parent_directories: bool,
}

/// Factory producing a generator instance from the shared context.
pub type GeneratorFactory = fn(&GeneratorContext) -> Result<Box<dyn PropertyGenerator>>;

/// Resolves short generator names to lazily-loaded generator instances.
///
/// Two-level lookup: the configured `generators` table maps short names to
/// locator strings, and the factory table maps locators to constructors.
/// Built-in factories are pre-registered; additional factories are added with
/// [`GeneratorRegistry::register`] at startup.
pub struct GeneratorRegistry {
    context: GeneratorContext,
    /// short name -> locator, from configuration
    locators: BTreeMap<String, String>,
    /// locator -> factory
    factories: HashMap<String, GeneratorFactory>,
    /// short name -> cached instance for this run
    loaded: HashMap<String, Box<dyn PropertyGenerator>>,
}

impl GeneratorRegistry {
    /// Create a registry for one generation run.
    ///
    /// `locators` is the (possibly defaulted) `generators` configuration
    /// table. The built-in `builtin:project` and `builtin:git` factories are
    /// registered automatically.
    pub fn new(context: GeneratorContext, locators: BTreeMap<String, String>) -> Self {
        let mut registry = Self {
            context,
            locators,
            factories: HashMap::new(),
            loaded: HashMap::new(),
        };
        registry.register(BUILTIN_PROJECT_LOCATOR, |ctx| {
            Ok(Box::new(project::ProjectPropertyGenerator::new(ctx.metadata.clone())))
        });
        registry.register(BUILTIN_GIT_LOCATOR, |ctx| {
            Ok(Box::new(git::GitPropertyGenerator::discover(
                &ctx.project_dir,
                ctx.git_search_parent_directories,
            )?))
        });
        registry
    }

    /// Register a factory for a generator locator.
    pub fn register(&mut self, locator: impl Into<String>, factory: GeneratorFactory) {
        self.factories.insert(locator.into(), factory);
    }

    /// Whether a short name has a configured locator.
    pub fn is_configured(&self, short_name: &str) -> bool {
        self.locators.contains_key(short_name)
    }

    /// Iterate over the configured short names (sorted).
    pub fn configured_names(&self) -> impl Iterator<Item = &str> {
        self.locators.keys().map(String::as_str)
    }

    /// Look up a generator by short name, instantiating it on first use.
    ///
    /// # Errors
    ///
    /// - [`PkgInfoError::UnknownGenerator`] when the short name is not
    ///   configured
    /// - [`PkgInfoError::GeneratorLoad`] when the configured locator has no
    ///   registered factory
    /// - Factory errors (e.g. git repository discovery) on first use
    pub fn get(&mut self, short_name: &str) -> Result<&dyn PropertyGenerator> {
        if !self.loaded.contains_key(short_name) {
            let locator = self.locators.get(short_name).ok_or_else(|| {
                PkgInfoError::UnknownGenerator {
                    name: short_name.to_string(),
                }
            })?;
            let factory =
                self.factories.get(locator.as_str()).ok_or_else(|| PkgInfoError::GeneratorLoad {
                    locator: locator.clone(),
                })?;
            tracing::debug!("Loading generator '{short_name}' from locator '{locator}'");
            let instance = factory(&self.context)?;
            self.loaded.insert(short_name.to_string(), instance);
        }
        Ok(self.loaded.get(short_name).expect("just inserted").as_ref())
    }
}
