//! Template emission - serializing descriptors into template markup.
//!
//! One emitter renders the whole expression tree: component calls, literal
//! content, and named references to previously bound set-blocks. There is
//! no post-hoc string surgery; a [`MacroValue::Block`] is the only place a
//! value renders as anything other than JSON.

use crate::descriptor::{Binding, Body, Transformation};
use crate::value::MacroValue;

const INDENT: &str = "  ";

/// Replace every character outside `[A-Za-z0-9_$]` with `_`.
pub fn sanitize_identifier(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Set-block identifier for a descriptor consumed as nested content.
pub fn block_name(id: &str) -> String {
    format!("{}_html", sanitize_identifier(id))
}

/// Render a component call: `{{ name({...}) }}`.
pub fn render_call(name: &str, options: &MacroValue) -> String {
    format!("{{{{ {}({}) }}}}", name, render_value(options, 0))
}

/// Serialize an option value: JSON-style, two-space indentation, keys in
/// insertion order. A [`MacroValue::Block`] renders as the live expression
/// `[ident] | join("")`, never as a quoted string.
pub fn render_value(value: &MacroValue, indent: usize) -> String {
    match value {
        MacroValue::Null => "null".to_string(),
        MacroValue::Bool(b) => b.to_string(),
        MacroValue::Number(n) => n.to_string(),
        MacroValue::String(s) => quote(s),
        MacroValue::Array(items) => {
            if items.is_empty() {
                return "[]".to_string();
            }
            let inner = items
                .iter()
                .map(|item| {
                    format!(
                        "{}{}",
                        INDENT.repeat(indent + 1),
                        render_value(item, indent + 1)
                    )
                })
                .collect::<Vec<_>>()
                .join(",\n");
            format!("[\n{}\n{}]", inner, INDENT.repeat(indent))
        }
        MacroValue::Object(object) => {
            if object.is_empty() {
                return "{}".to_string();
            }
            let inner = object
                .iter()
                .map(|(key, item)| {
                    format!(
                        "{}{}: {}",
                        INDENT.repeat(indent + 1),
                        quote(key),
                        render_value(item, indent + 1)
                    )
                })
                .collect::<Vec<_>>()
                .join(",\n");
            format!("{{\n{}\n{}}}", inner, INDENT.repeat(indent))
        }
        MacroValue::Block(idents) => {
            format!("[{}] | join(\"\")", idents.join(", "))
        }
    }
}

/// Render one descriptor: set-block bindings first, then the body.
pub fn render_transformation(transformation: &Transformation) -> String {
    let mut parts: Vec<String> = transformation.bindings.iter().map(render_binding).collect();
    parts.push(render_body(&transformation.body));
    parts.join("\n")
}

fn render_binding(binding: &Binding) -> String {
    format!(
        "{{% set {} %}}\n{}\n{{% endset %}}",
        binding.name,
        render_body(&binding.body)
    )
}

fn render_body(body: &Body) -> String {
    match body {
        Body::Macro { name, options } => render_call(name, options),
        Body::Content(content) => content.clone(),
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
