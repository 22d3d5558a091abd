//! `[tool.package-info]` configuration surface.
//!
//! Every key is optional; an absent section means "generate the default
//! property set into `<package>/package_info.py` with no formatting and no
//! artifact patching". Unknown keys are rejected so typos fail loudly instead
//! of silently disabling behavior.
//!
//! ```toml
//! [tool.package-info]
//! patch-build-formats = "all"            # or ["wheel", "sdist"]
//! package-info-file-path = "pkg/package_info.py"
//! git-search-parent-directories = false
//! formatters = ["command:black -q -"]
//! template = "..."                       # tera template text
//! properties = ["project-name", "git-commit-id"]
//!
//! [tool.package-info.generators]
//! project = "builtin:project"
//! git = "builtin:git"
//! ```

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use crate::generators::{BUILTIN_GIT_LOCATOR, BUILTIN_PROJECT_LOCATOR};
use crate::properties::PropertyEntry;

/// Parsed `[tool.package-info]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PluginConfig {
    /// Artifact formats to patch after a build: `wheel`, `sdist` or `all`.
    /// Accepts a single string or a list; default is none.
    #[serde(default, deserialize_with = "string_or_list")]
    pub patch_build_formats: Vec<String>,

    /// Relative output path for the generated file. Defaults to
    /// `<project name with - replaced by _>/package_info.py`.
    #[serde(default)]
    pub package_info_file_path: Option<String>,

    /// Whether the git generator may search parent directories for the
    /// repository root.
    #[serde(default)]
    pub git_search_parent_directories: bool,

    /// Ordered formatter locators applied left-to-right to the rendered
    /// source.
    #[serde(default = "default_formatters")]
    pub formatters: Vec<String>,

    /// Short generator name to locator mapping.
    #[serde(default = "default_generators")]
    pub generators: BTreeMap<String, String>,

    /// Template text overriding the built-in template.
    #[serde(default)]
    pub template: Option<String>,

    /// Ordered property references to resolve and render.
    #[serde(default = "default_properties")]
    pub properties: Vec<PropertyEntry>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            patch_build_formats: Vec::new(),
            package_info_file_path: None,
            git_search_parent_directories: false,
            formatters: default_formatters(),
            generators: default_generators(),
            template: None,
            properties: default_properties(),
        }
    }
}

fn default_formatters() -> Vec<String> {
    vec!["noop".to_string()]
}

fn default_generators() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("project".to_string(), BUILTIN_PROJECT_LOCATOR.to_string()),
        ("git".to_string(), BUILTIN_GIT_LOCATOR.to_string()),
    ])
}

/// The default property list covers the common project and git properties.
fn default_properties() -> Vec<PropertyEntry> {
    [
        "project-name",
        "project-description",
        "project-version",
        "project-authors",
        "project-license",
        "project-classifiers",
        "project-documentation",
        "project-repository",
        "project-homepage",
        "project-maintainers",
        "project-keywords",
        "git-commit-id",
        "git-commit-author-name",
        "git-commit-author-email",
        "git-commit-timestamp",
        "git-branch-name",
        "git-branch-path",
        "git-is-dirty",
        "git-is-dirty-excluding-untracked",
        "git-has-staged-changes",
        "git-has-unstaged-changes",
        "git-has-untracked-changes",
    ]
    .into_iter()
    .map(PropertyEntry::from)
    .collect()
}

/// Accept `"wheel"` or `["wheel", "sdist"]`; an empty string means none.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::One(s) if s.is_empty() => Vec::new(),
        StringOrList::One(s) => vec![s],
        StringOrList::Many(list) => list,
    })
}
