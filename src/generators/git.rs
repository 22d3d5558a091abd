//! Built-in `git` generator reading repository state.

use anyhow::Result;

use super::PropertyGenerator;
use crate::core::PkgInfoError;
use crate::git::GitRepo;
use crate::properties::{Property, PropertyConfig, PropertyValue};

/// Exposes commit, branch and working tree state as properties.
///
/// The repository is discovered once when the generator is first loaded;
/// individual properties query git on demand. Branch properties are
/// `str | None` because a detached HEAD has no branch.
pub struct GitPropertyGenerator {
    repo: GitRepo,
}

impl GitPropertyGenerator {
    /// Discover the repository for the project directory.
    ///
    /// With `search_parent_directories` the repository may live above the
    /// project (e.g. a monorepo); otherwise it must be at the project root.
    pub fn discover(project_dir: &std::path::Path, search_parent_directories: bool) -> Result<Self> {
        Ok(Self {
            repo: GitRepo::discover(project_dir, search_parent_directories)?,
        })
    }

    pub fn new(repo: GitRepo) -> Self {
        Self { repo }
    }
}

impl PropertyGenerator for GitPropertyGenerator {
    fn short_name(&self) -> &str {
        "git"
    }

    fn generate_property(&self, config: &PropertyConfig) -> Result<Property> {
        let repo = &self.repo;
        let value = match config.property_name.as_str() {
            "commit-id" => PropertyValue::Str(repo.commit_id()?),
            "commit-author-name" => PropertyValue::Str(repo.commit_author_name()?),
            "commit-author-email" => PropertyValue::Str(repo.commit_author_email()?),
            "commit-timestamp" => PropertyValue::Timestamp(repo.commit_timestamp()?),
            "branch-name" => PropertyValue::OptStr(repo.branch_name()?),
            "branch-path" => PropertyValue::OptStr(repo.branch_path()?),
            "is-dirty" => PropertyValue::Bool(repo.status()?.is_dirty()),
            "is-dirty-excluding-untracked" => {
                PropertyValue::Bool(repo.status()?.is_dirty_excluding_untracked())
            }
            "has-staged-changes" => PropertyValue::Bool(repo.status()?.staged),
            "has-unstaged-changes" => PropertyValue::Bool(repo.status()?.unstaged),
            "has-untracked-changes" => PropertyValue::Bool(repo.status()?.untracked),
            other => {
                return Err(PkgInfoError::UnknownProperty {
                    generator: self.short_name().to_string(),
                    name: other.to_string(),
                }
                .into());
            }
        };

        Ok(Property {
            config: config.clone(),
            value,
        })
    }
}
