//! Transformer dispatch - explicit overrides beat shape-based defaults.

use log::trace;
use serde_json::Value;

use crate::composite;
use crate::descriptor::{Transformation, TransformContext, TransformSet};
use crate::emit;
use crate::error::TransformError;
use crate::fields;
use crate::summary;
use crate::types::{json_type_name, FieldKind, INLINE_CHOICE_MAX, LONG_TEXT_THRESHOLD};

/// Decide which transformer handles a schema node.
///
/// An explicit `component` name in the UI schema entry wins unconditionally;
/// otherwise the schema's shape decides. A node matching neither is a
/// configuration error.
pub fn resolve_field_kind(
    key: &str,
    schema: &Value,
    ui: &Value,
) -> Result<FieldKind, TransformError> {
    if let Some(component) = ui.get("component").and_then(Value::as_str) {
        return FieldKind::parse(component).ok_or_else(|| TransformError::UnknownComponent {
            key: key.to_string(),
            component: component.to_string(),
        });
    }

    let kind = match schema.get("type").and_then(Value::as_str) {
        Some("string") | Some("integer") => {
            let max_length = schema.get("maxLength").and_then(Value::as_u64);
            if max_length.is_some_and(|max| max >= LONG_TEXT_THRESHOLD) {
                FieldKind::Textarea
            } else if let Some(options) = schema.get("oneOf").and_then(Value::as_array) {
                if options.len() < INLINE_CHOICE_MAX {
                    FieldKind::Radios
                } else {
                    FieldKind::Select
                }
            } else if schema.get("format").and_then(Value::as_str) == Some("date-time") {
                FieldKind::DateInput
            } else {
                FieldKind::TextInput
            }
        }
        Some("array") => FieldKind::Checkboxes,
        Some("object") => {
            if schema.get("allOf").is_some() {
                FieldKind::AllOf
            } else {
                FieldKind::Form
            }
        }
        Some("boolean") => FieldKind::YesNo,
        Some(other) => {
            return Err(TransformError::UnsupportedSchema {
                key: key.to_string(),
                type_name: other.to_string(),
            })
        }
        None => {
            if schema.get("summaryInfo").is_some() {
                FieldKind::Summary
            } else if schema.get("taskListSections").is_some() {
                FieldKind::TaskList
            } else if schema.get("description").is_some() {
                FieldKind::Content
            } else {
                return Err(TransformError::UnsupportedSchema {
                    key: key.to_string(),
                    type_name: json_type_name(schema).to_string(),
                });
            }
        }
    };
    trace!("dispatch {key} -> {}", kind.name());
    Ok(kind)
}

/// Transform one schema node into a descriptor.
///
/// Composite nodes recurse back through this function for every child,
/// inserting each result into `set` so later siblings can reference earlier
/// ones. Deterministic: identical inputs produce identical descriptors.
pub fn transform(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
    set: &mut TransformSet,
) -> Result<Transformation, TransformError> {
    match resolve_field_kind(key, schema, ui)? {
        FieldKind::TextInput => fields::text_input(key, schema, ui, ctx),
        FieldKind::Textarea => fields::textarea(key, schema, ui, ctx),
        FieldKind::Radios => fields::radios(key, schema, ui, ctx, set),
        FieldKind::YesNo => fields::yes_no(key, schema, ui, ctx, set),
        FieldKind::Select => fields::select(key, schema, ui, ctx),
        FieldKind::Checkboxes => fields::checkboxes(key, schema, ui, ctx, set),
        FieldKind::DateInput => fields::date_input(key, schema, ui, ctx),
        FieldKind::FileUpload => fields::file_upload(key, schema, ui, ctx),
        FieldKind::Content => Ok(fields::content(key, schema)),
        FieldKind::Summary => summary::summary(key, schema, ui, ctx),
        FieldKind::TaskList => summary::task_list(key, schema, ui, ctx),
        FieldKind::Form => composite::form(key, schema, ui, ctx, set),
        FieldKind::AllOf => composite::all_of(key, schema, ui, ctx, set),
    }
}

/// A fully rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// The emitted template markup.
    pub markup: String,
    /// Derived browser title, when the page reports one.
    pub page_title: Option<String>,
}

/// Top-level entry point: transform a page schema with a fresh accumulator
/// and render the resulting descriptor.
///
/// Composite pages embed their own import lines; for a standalone leaf or
/// summary page the descriptor's dependencies are prepended here so the
/// markup is self-contained either way.
pub fn render_page(
    key: &str,
    schema: &Value,
    ctx: &TransformContext,
) -> Result<RenderedPage, TransformError> {
    let mut set = TransformSet::new();
    let ui = ctx.ui_entry(key);
    let transformation = transform(key, schema, ui, ctx, &mut set)?;

    let rendered = emit::render_transformation(&transformation);
    let markup = if transformation.dependencies.is_empty() {
        rendered
    } else {
        format!("{}\n\n{}", transformation.dependencies.join("\n"), rendered)
    };
    Ok(RenderedPage {
        markup,
        page_title: transformation.page_title,
    })
}
