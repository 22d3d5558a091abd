//! Built-in `project` generator reading pyproject.toml metadata.

use anyhow::Result;

use super::PropertyGenerator;
use crate::core::PkgInfoError;
use crate::manifest::ProjectMetadata;
use crate::properties::{Property, PropertyConfig, PropertyValue};

/// Exposes the declarative manifest fields as properties.
///
/// `name` and `version` are required (`str`); descriptive fields are
/// optional (`str | None`); contact and classification fields are lists.
pub struct ProjectPropertyGenerator {
    metadata: ProjectMetadata,
}

impl ProjectPropertyGenerator {
    pub fn new(metadata: ProjectMetadata) -> Self {
        Self { metadata }
    }

    fn required(&self, field: &str, value: Option<&String>) -> Result<PropertyValue> {
        let value = value.ok_or_else(|| PkgInfoError::ConfigError {
            message: format!("Manifest does not declare a project {field}"),
        })?;
        Ok(PropertyValue::Str(value.clone()))
    }
}

impl PropertyGenerator for ProjectPropertyGenerator {
    fn short_name(&self) -> &str {
        "project"
    }

    fn generate_property(&self, config: &PropertyConfig) -> Result<Property> {
        let meta = &self.metadata;
        let value = match config.property_name.as_str() {
            "name" => self.required("name", meta.name.as_ref())?,
            "version" => self.required("version", meta.version.as_ref())?,
            "description" => PropertyValue::OptStr(meta.description.clone()),
            "license" => PropertyValue::OptStr(meta.license.clone()),
            "authors" => PropertyValue::StrList(meta.authors.clone()),
            "maintainers" => PropertyValue::StrList(meta.maintainers.clone()),
            "keywords" => PropertyValue::StrList(meta.keywords.clone()),
            "classifiers" => PropertyValue::StrList(meta.classifiers.clone()),
            "documentation" => PropertyValue::OptStr(meta.documentation.clone()),
            "homepage" => PropertyValue::OptStr(meta.homepage.clone()),
            "repository" => PropertyValue::OptStr(meta.repository.clone()),
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

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ProjectMetadata {
        ProjectMetadata {
            name: Some("git-project-with-config".to_string()),
            version: Some("1.2.3".to_string()),
            description: None,
            license: Some("MIT".to_string()),
            authors: vec!["Jane Doe <jane@example.com>".to_string()],
            keywords: vec!["one".to_string(), "two".to_string()],
            ..Default::default()
        }
    }

    fn config_for(name: &str) -> PropertyConfig {
        PropertyConfig {
            generator_name: "project".to_string(),
            property_name: name.to_string(),
            variable_name: format!("project_{}", name.replace('-', "_")),
        }
    }

    #[test]
    fn test_name_and_version() {
        let generator = ProjectPropertyGenerator::new(metadata());
        let name = generator.generate_property(&config_for("name")).unwrap();
        assert_eq!(name.value, PropertyValue::Str("git-project-with-config".to_string()));
        let version = generator.generate_property(&config_for("version")).unwrap();
        assert_eq!(version.value, PropertyValue::Str("1.2.3".to_string()));
    }

    #[test]
    fn test_optional_field_absent() {
        let generator = ProjectPropertyGenerator::new(metadata());
        let description = generator.generate_property(&config_for("description")).unwrap();
        assert_eq!(description.value, PropertyValue::OptStr(None));
    }

    #[test]
    fn test_list_field() {
        let generator = ProjectPropertyGenerator::new(metadata());
        let keywords = generator.generate_property(&config_for("keywords")).unwrap();
        assert_eq!(
            keywords.value,
            PropertyValue::StrList(vec!["one".to_string(), "two".to_string()])
        );
    }

    #[test]
    fn test_unknown_property() {
        let generator = ProjectPropertyGenerator::new(metadata());
        let err = generator.generate_property(&config_for("nonsense")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PkgInfoError>(),
            Some(PkgInfoError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn test_missing_required_field() {
        let generator = ProjectPropertyGenerator::new(ProjectMetadata::default());
        let err = generator.generate_property(&config_for("name")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PkgInfoError>(),
            Some(PkgInfoError::ConfigError { .. })
        ));
    }
}
