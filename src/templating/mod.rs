//! Template rendering with Tera.
//!
//! Turns the resolved, ordered property list into Python source text. The
//! template receives:
//!
//! - `properties` - ordered list of objects with `variable_name`,
//!   `python_type` and a tagged `value`
//! - `imports` - deduplicated, order-stable module names required by the
//!   property types (a timestamp property pulls in `datetime`)
//! - Tera's built-in `now()` function for "generated at" stamps
//!
//! A custom `as_python` filter converts a tagged value into a Python literal:
//! strings are escaped and quoted, lists become `[...]` literals, booleans
//! become `True`/`False`, absent optionals become `None`, and timestamps are
//! rendered as parseable `datetime.datetime.fromisoformat(...)` calls.
//!
//! A fresh Tera instance is created per render (cheap - just empty maps), and
//! `render_str` keeps template execution sandboxed: no file system includes,
//! no network access.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context as TeraContext, Tera, Value};

use crate::core::PkgInfoError;
use crate::properties::{Property, PropertyValue};

/// Built-in template producing the default `package_info.py` shape: module
/// docstring, imports, and one annotated class field per property.
pub const DEFAULT_TEMPLATE: &str = r#""""Auto-generated by pkginfo at {{ now() | date(format="%Y-%m-%dT%H:%M:%S") }}."""
{% for import in imports %}import {{ import }}
{% endfor %}
class PackageInfo:
{% if properties %}{% for property in properties %}    {{ property.variable_name }}: {{ property.python_type }} = {{ property.value | as_python }}
{% endfor %}{% else %}    pass
{% endif %}"#;

/// Shape each property takes inside the template context.
#[derive(Serialize)]
struct TemplateProperty<'a> {
    variable_name: &'a str,
    generator: &'a str,
    property_name: &'a str,
    python_type: &'static str,
    value: &'a PropertyValue,
}

/// Renders resolved properties through a Tera template.
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `template` with the given properties.
    ///
    /// # Errors
    ///
    /// Returns [`PkgInfoError::Template`] with a cleaned-up message when the
    /// template has a syntax error or references unknown variables.
    pub fn render(&self, template: &str, properties: &[Property]) -> Result<String> {
        let template_properties: Vec<TemplateProperty<'_>> = properties
            .iter()
            .map(|p| TemplateProperty {
                variable_name: &p.config.variable_name,
                generator: &p.config.generator_name,
                property_name: &p.config.property_name,
                python_type: p.value.python_type(),
                value: &p.value,
            })
            .collect();

        let mut context = TeraContext::new();
        context.insert("properties", &template_properties);
        context.insert("imports", &imports_for(properties));

        tracing::debug!("Rendering template with {} properties", properties.len());

        let mut tera = Tera::default();
        tera.register_filter("as_python", as_python_filter);

        tera.render_str(template, &context).map_err(|e| {
            PkgInfoError::Template {
                reason: format_tera_error(&e),
            }
            .into()
        })
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Modules the generated source must import, deduplicated and in first-use
/// order.
pub fn imports_for(properties: &[Property]) -> Vec<&'static str> {
    let mut imports = Vec::new();
    for property in properties {
        if let Some(module) = property.value.python_import() {
            if !imports.contains(&module) {
                imports.push(module);
            }
        }
    }
    imports
}

/// Quote and escape a string as a Python literal.
fn python_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Tera filter converting a tagged property value into a Python literal.
fn as_python_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("as_python expects a tagged property value"))?;
    let inner = value.get("value").unwrap_or(&Value::Null);

    let literal = match kind {
        "str" => {
            let s = inner
                .as_str()
                .ok_or_else(|| tera::Error::msg("str value is not a string"))?;
            python_string_literal(s)
        }
        "opt_str" => match inner.as_str() {
            Some(s) => python_string_literal(s),
            None => "None".to_string(),
        },
        "str_list" => {
            let items = inner
                .as_array()
                .ok_or_else(|| tera::Error::msg("str_list value is not an array"))?;
            let rendered: Vec<String> = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(python_string_literal)
                        .ok_or_else(|| tera::Error::msg("str_list item is not a string"))
                })
                .collect::<tera::Result<_>>()?;
            format!("[{}]", rendered.join(", "))
        }
        "bool" => {
            if inner.as_bool().unwrap_or(false) {
                "True".to_string()
            } else {
                "False".to_string()
            }
        }
        "timestamp" => {
            let s = inner
                .as_str()
                .ok_or_else(|| tera::Error::msg("timestamp value is not a string"))?;
            format!("datetime.datetime.fromisoformat(\"{s}\")")
        }
        other => {
            return Err(tera::Error::msg(format!("unknown property value kind '{other}'")));
        }
    };

    Ok(Value::String(literal))
}

/// Format a Tera error chain, filtering out the unhelpful internal
/// `__tera_one_off` template name.
fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = Vec::new();
    let mut all_messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        all_messages.push(err.to_string());
        current = err.source();
    }

    for msg in all_messages {
        let cleaned = msg
            .replace("while rendering '__tera_one_off'", "")
            .replace("Failed to render '__tera_one_off'", "")
            .replace("Failed to parse '__tera_one_off'", "template syntax error")
            .replace("'__tera_one_off'", "template")
            .trim()
            .to_string();
        if !cleaned.is_empty() {
            messages.push(cleaned);
        }
    }

    if messages.is_empty() {
        "template syntax error".to_string()
    } else {
        messages.join(": ")
    }
}
