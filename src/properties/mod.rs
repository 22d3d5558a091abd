//! Property data model and reference resolution.
//!
//! A *property* is one resolved `(variable name, type, value)` triple destined
//! for the generated file. Users request properties in the
//! `[tool.package-info] properties` list either as bare references
//! (`"git-commit-id"`) or as structured overrides
//! (`{ property-name = "git-is-dirty", variable-name = "dirty" }`).
//!
//! Resolution walks the configured list in order, splits each reference into
//! generator prefix + base property name, and asks the matching generator for
//! the value. Order is preserved verbatim in the output. Duplicate variable
//! names are permitted and rendered in order; in generated Python the last
//! definition wins.

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::core::PkgInfoError;
use crate::generators::GeneratorRegistry;

/// One entry of the configured `properties` list.
///
/// Deserialized untagged: a TOML string becomes [`PropertyEntry::Reference`],
/// an inline table becomes [`PropertyEntry::Override`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PropertyEntry {
    /// Bare `"<generator>-<property>"` reference
    Reference(String),
    /// Structured override with explicit fields
    Override(PropertyOverride),
}

impl From<&str> for PropertyEntry {
    fn from(reference: &str) -> Self {
        Self::Reference(reference.to_string())
    }
}

/// Structured property override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PropertyOverride {
    /// Generator short name; inferred from `property-name` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_generator: Option<String>,
    /// Base property name, optionally prefixed with the generator short name
    pub property_name: String,
    /// Output variable name; defaults to `<generator>_<property>` in snake case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
}

/// Identifies one requested property after parsing. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyConfig {
    /// Short generator prefix, e.g. `git`
    pub generator_name: String,
    /// Base property name within the generator, e.g. `commit-id`
    pub property_name: String,
    /// Variable name used in the generated file, e.g. `git_commit_id`
    pub variable_name: String,
}

/// A resolved property value with its semantic type tag.
///
/// The tag drives both the Python type annotation and the literal rendering
/// in the generated source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Required string (`str`)
    Str(String),
    /// Optional string (`str | None`)
    OptStr(Option<String>),
    /// List of strings (`list[str]`)
    StrList(Vec<String>),
    /// Boolean (`bool`)
    Bool(bool),
    /// Timestamp (`datetime.datetime`), rendered as a constructor call
    Timestamp(DateTime<FixedOffset>),
}

impl PropertyValue {
    /// Python type annotation for this value.
    pub fn python_type(&self) -> &'static str {
        match self {
            Self::Str(_) => "str",
            Self::OptStr(_) => "str | None",
            Self::StrList(_) => "list[str]",
            Self::Bool(_) => "bool",
            Self::Timestamp(_) => "datetime.datetime",
        }
    }

    /// Module the generated file must import to use this value, if any.
    pub fn python_import(&self) -> Option<&'static str> {
        match self {
            Self::Timestamp(_) => Some("datetime"),
            _ => None,
        }
    }
}

/// A resolved property: configuration plus concrete value.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub config: PropertyConfig,
    pub value: PropertyValue,
}

/// Default variable name for a generator/property pair:
/// `<short_name>_<property with hyphens replaced by underscores>`.
pub fn default_variable_name(generator_name: &str, property_name: &str) -> String {
    format!("{}_{}", generator_name, property_name.replace('-', "_"))
}

/// Split a bare reference into `(generator, property)` by matching the
/// longest registered generator prefix followed by a hyphen.
///
/// Hyphens inside the remainder are preserved: `git-commit-author-name`
/// resolves to generator `git`, property `commit-author-name`.
fn split_reference(reference: &str, registry: &GeneratorRegistry) -> Result<(String, String)> {
    let mut best: Option<&str> = None;
    for name in registry.configured_names() {
        if reference.len() > name.len() + 1
            && reference.starts_with(name)
            && reference.as_bytes()[name.len()] == b'-'
            && best.is_none_or(|b| name.len() > b.len())
        {
            best = Some(name);
        }
    }

    if let Some(name) = best {
        return Ok((name.to_string(), reference[name.len() + 1..].to_string()));
    }

    // No registered prefix matched. Report the prefix-shaped part of the
    // reference as an unknown generator, or reject the reference outright
    // when it cannot be split at all.
    match reference.split_once('-') {
        Some((prefix, rest)) if !prefix.is_empty() && !rest.is_empty() => {
            Err(PkgInfoError::UnknownGenerator {
                name: prefix.to_string(),
            }
            .into())
        }
        _ => Err(PkgInfoError::InvalidPropertyReference {
            reference: reference.to_string(),
        }
        .into()),
    }
}

/// Parse one configuration entry into a [`PropertyConfig`].
fn parse_entry(entry: &PropertyEntry, registry: &GeneratorRegistry) -> Result<PropertyConfig> {
    match entry {
        PropertyEntry::Reference(reference) => {
            let (generator_name, property_name) = split_reference(reference, registry)?;
            let variable_name = default_variable_name(&generator_name, &property_name);
            Ok(PropertyConfig {
                generator_name,
                property_name,
                variable_name,
            })
        }
        PropertyEntry::Override(over) => {
            let (generator_name, property_name) = match &over.property_generator {
                Some(generator) => {
                    if !registry.is_configured(generator) {
                        return Err(PkgInfoError::UnknownGenerator {
                            name: generator.clone(),
                        }
                        .into());
                    }
                    (generator.clone(), over.property_name.clone())
                }
                // Without an explicit generator the property name carries the
                // prefix, exactly like a bare reference.
                None => split_reference(&over.property_name, registry)?,
            };
            let variable_name = over
                .variable_name
                .clone()
                .unwrap_or_else(|| default_variable_name(&generator_name, &property_name));
            Ok(PropertyConfig {
                generator_name,
                property_name,
                variable_name,
            })
        }
    }
}

/// Resolve the ordered configuration list into concrete properties.
///
/// Generators are loaded lazily on first use and may perform I/O (manifest
/// reads, git queries); any failure aborts the whole resolution.
pub fn resolve_properties(
    entries: &[PropertyEntry],
    registry: &mut GeneratorRegistry,
) -> Result<Vec<Property>> {
    let mut properties = Vec::with_capacity(entries.len());
    for entry in entries {
        let config = parse_entry(entry, registry)?;
        tracing::debug!(
            "Resolving property '{}' from generator '{}' as '{}'",
            config.property_name,
            config.generator_name,
            config.variable_name
        );
        let generator = registry.get(&config.generator_name)?;
        properties.push(generator.generate_property(&config)?);
    }
    Ok(properties)
}
