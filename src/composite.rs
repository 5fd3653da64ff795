//! Composite transformers - object forms and all-of multi-group pages.
//!
//! Both recurse through [`crate::transform`] for every child field, passing
//! the shared accumulator so later siblings can reference earlier
//! descriptors (conditional-reveal wiring), then stitch the collected
//! fragments into one page: error summary, imports, heading, fields.

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::descriptor::{Body, Transformation, TransformContext, TransformSet};
use crate::dispatch;
use crate::emit;
use crate::error::TransformError;
use crate::fields::parse_options;
use crate::html;
use crate::types::{ERROR_TITLE_PREFIX, PAGE_TITLE_SUFFIX};
use crate::value::{MacroObject, MacroValue};

/// Options recognized by the composite transformers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormOptions {
    /// Rendering order. Defaults to the schema's own property key order.
    /// A field transformed but left out of this list renders only where
    /// another field consumes it (conditional reveal).
    pub output_order: Option<Vec<String>>,
    /// Processing order. Defaults to `output_order`. May differ so a
    /// revealed field is transformed before the field whose choice reveals
    /// it.
    pub transform_order: Option<Vec<String>>,
    /// Per-child UI entry overrides, keyed by child field key.
    pub properties: Option<Value>,
}

/// Object with `properties`: one page of fields.
pub(crate) fn form(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
    set: &mut TransformSet,
) -> Result<Transformation, TransformError> {
    let opts: FormOptions = parse_options(key, ui)?;
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Err(TransformError::UnsupportedSchema {
            key: key.to_string(),
            type_name: "object".to_string(),
        });
    };
    let title = schema.get("title").and_then(Value::as_str);

    let default_order: Vec<String> = properties.keys().cloned().collect();
    let output_order = opts.output_order.clone().unwrap_or(default_order);
    let transform_order = opts
        .transform_order
        .clone()
        .unwrap_or_else(|| output_order.clone());
    debug!("form {key}: transform order {transform_order:?}, output order {output_order:?}");

    // Without a page title of its own, the first rendered field carries the
    // page heading.
    let promoted_key = if title.is_none() {
        output_order.first().cloned()
    } else {
        None
    };

    for child_key in &transform_order {
        let child_schema =
            properties
                .get(child_key)
                .ok_or_else(|| TransformError::MissingProperty {
                    parent: key.to_string(),
                    key: child_key.clone(),
                })?;
        let promote = promoted_key.as_deref() == Some(child_key.as_str());
        let child_ui = child_ui_entry(ctx, opts.properties.as_ref(), child_key, promote);
        let transformation = dispatch::transform(child_key, child_schema, &child_ui, ctx, set)?;
        set.insert(transformation);
    }

    assemble(key, title, &output_order, &transform_order, set)
}

/// Object with `allOf`: a page assembled from multiple sub-groups, each
/// optionally wrapped in its own fieldset.
pub(crate) fn all_of(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
    set: &mut TransformSet,
) -> Result<Transformation, TransformError> {
    let opts: FormOptions = parse_options(key, ui)?;
    let Some(entries) = schema.get("allOf").and_then(Value::as_array) else {
        return Err(TransformError::UnsupportedSchema {
            key: key.to_string(),
            type_name: "object".to_string(),
        });
    };
    let title = schema.get("title").and_then(Value::as_str);

    // Flatten every fragment's properties into one combined list, keeping
    // track of which original group each key belongs to.
    let mut groups: Vec<Group> = Vec::new();
    let mut combined: Vec<(String, &Value)> = Vec::new();
    for entry in entries {
        let group_title = entry.get("title").and_then(Value::as_str);
        if let Some(fragments) = entry.get("allOf").and_then(Value::as_array) {
            let mut keys = Vec::new();
            for fragment in fragments {
                collect_properties(fragment, &mut keys, &mut combined);
            }
            groups.push(Group {
                title: group_title,
                keys,
                nested: true,
            });
        } else if entry.get("properties").is_some() {
            let mut keys = Vec::new();
            collect_properties(entry, &mut keys, &mut combined);
            groups.push(Group {
                title: group_title,
                keys,
                nested: false,
            });
        }
        // Fragments with neither properties nor a nested allOf carry
        // cross-field validation annotations only; nothing renders.
    }
    debug!("all-of {key}: {} groups, {} fields", groups.len(), combined.len());

    for (child_key, child_schema) in &combined {
        let child_ui = child_ui_entry(ctx, opts.properties.as_ref(), child_key, false);
        let transformation = dispatch::transform(child_key, child_schema, &child_ui, ctx, set)?;
        set.insert(transformation);
    }

    let all_keys: Vec<String> = combined.iter().map(|(k, _)| k.clone()).collect();
    let output_order = opts.output_order.clone().unwrap_or_else(|| all_keys.clone());
    let single_group = groups.len() == 1;

    let error_list = collect_errors(&all_keys, set);
    let any_errors = !error_list.is_empty();

    let mut sections: Vec<String> = Vec::new();
    if any_errors {
        sections.push(error_summary(error_list));
    }

    let rendered_keys: Vec<String> = groups
        .iter()
        .flat_map(|group| filter_order(&output_order, &group.keys))
        .collect();
    let imports = collect_imports(&rendered_keys, set);
    if !imports.is_empty() {
        sections.push(imports.join("\n"));
    }
    if let Some(title) = title {
        sections.push(heading(title));
    }

    for group in &groups {
        let keys = filter_order(&output_order, &group.keys);
        if keys.is_empty() {
            continue;
        }
        let mut fields = Vec::new();
        for child_key in &keys {
            let transformation =
                set.get(child_key)
                    .ok_or_else(|| TransformError::MissingProperty {
                        parent: key.to_string(),
                        key: child_key.clone(),
                    })?;
            fields.push(emit::render_transformation(transformation));
        }
        let body = fields.join("\n\n");
        if group.nested {
            sections.push(fieldset_block(
                group.title.unwrap_or_default(),
                &body,
                single_group,
            ));
        } else {
            sections.push(body);
        }
    }

    // Page heading resolution: top schema title, else the first group's
    // title, else the title of that group's first property.
    let resolved = title
        .or_else(|| groups.first().and_then(|group| group.title))
        .or_else(|| {
            combined
                .first()
                .and_then(|(_, child)| child.get("title").and_then(Value::as_str))
        });
    let page_title = resolved.map(|heading| {
        let mut page_title = heading.to_string();
        if any_errors {
            page_title = format!("{ERROR_TITLE_PREFIX}{page_title}");
        }
        page_title.push_str(PAGE_TITLE_SUFFIX);
        page_title
    });

    let mut transformation = Transformation::new(key, Body::Content(sections.join("\n\n")));
    transformation.page_title = page_title;
    transformation.has_errors = any_errors;
    Ok(transformation)
}

struct Group<'a> {
    title: Option<&'a str>,
    keys: Vec<String>,
    nested: bool,
}

fn collect_properties<'a>(
    fragment: &'a Value,
    keys: &mut Vec<String>,
    combined: &mut Vec<(String, &'a Value)>,
) {
    if let Some(properties) = fragment.get("properties").and_then(Value::as_object) {
        for (key, child) in properties {
            keys.push(key.clone());
            combined.push((key.clone(), child));
        }
    }
}

/// Resolve the UI entry a child transform receives: its own top-level
/// entry, the composite's per-child override merged on top, and the
/// page-heading flag when this child carries the heading.
fn child_ui_entry(
    ctx: &TransformContext,
    overrides: Option<&Value>,
    child_key: &str,
    promote: bool,
) -> Value {
    let mut entry = ctx.ui_entry(child_key).clone();
    if entry.is_null() {
        entry = Value::Object(Map::new());
    }
    if let Some(child_overrides) = overrides.and_then(|p| p.get(child_key)) {
        crate::merge::merge_json(&mut entry, child_overrides);
    }
    if promote {
        crate::merge::merge_json(
            &mut entry,
            &serde_json::json!({"options": {"setPageHeading": true}}),
        );
    }
    entry
}

fn assemble(
    key: &str,
    title: Option<&str>,
    output_order: &[String],
    transformed_keys: &[String],
    set: &TransformSet,
) -> Result<Transformation, TransformError> {
    let error_list = collect_errors(transformed_keys, set);
    let any_errors = !error_list.is_empty();

    let mut sections: Vec<String> = Vec::new();
    if any_errors {
        sections.push(error_summary(error_list));
    }
    let imports = collect_imports(output_order, set);
    if !imports.is_empty() {
        sections.push(imports.join("\n"));
    }
    if let Some(title) = title {
        sections.push(heading(title));
    }
    for child_key in output_order {
        let transformation = set
            .get(child_key)
            .ok_or_else(|| TransformError::MissingProperty {
                parent: key.to_string(),
                key: child_key.clone(),
            })?;
        sections.push(emit::render_transformation(transformation));
    }

    let page_title = derive_page_title(output_order, set, any_errors);

    let mut transformation = Transformation::new(key, Body::Content(sections.join("\n\n")));
    transformation.page_title = page_title;
    transformation.has_errors = any_errors;
    Ok(transformation)
}

/// Filter `output_order` down to just the keys belonging to one group,
/// preserving `output_order`'s relative sequence. Keys the group does not
/// own are dropped, so grouped fields stay together even though
/// `output_order` is a single flat list.
fn filter_order(output_order: &[String], group_keys: &[String]) -> Vec<String> {
    output_order
        .iter()
        .filter(|key| group_keys.contains(key))
        .cloned()
        .collect()
}

/// Error-summary entries for every transformed child with a rendered
/// validation message, in processing order.
fn collect_errors(keys: &[String], set: &TransformSet) -> Vec<MacroValue> {
    let mut list = Vec::new();
    for key in keys {
        let Some(transformation) = set.get(key) else {
            continue;
        };
        if let Some(message) = &transformation.error_message {
            let href = transformation
                .error_summary_href
                .clone()
                .unwrap_or_else(|| format!("#{key}"));
            let mut entry = MacroObject::new();
            entry.insert("href", href);
            entry.insert("text", message.as_str());
            list.push(MacroValue::Object(entry));
        }
    }
    list
}

/// The leading error-summary block. It carries its own import line so the
/// macro is declared before use; the shared import list follows separately.
fn error_summary(error_list: Vec<MacroValue>) -> String {
    let mut options = MacroObject::new();
    options.insert("titleText", "There is a problem");
    options.insert("errorList", MacroValue::Array(error_list));
    format!(
        "{}\n{}",
        html::import_line("govukErrorSummary"),
        emit::render_call("govukErrorSummary", &MacroValue::Object(options))
    )
}

/// Import lines from every rendered field, deduplicated in first-seen
/// order.
fn collect_imports(keys: &[String], set: &TransformSet) -> Vec<String> {
    let mut imports = Vec::new();
    for key in keys {
        let Some(transformation) = set.get(key) else {
            continue;
        };
        for dependency in &transformation.dependencies {
            if !imports.contains(dependency) {
                imports.push(dependency.clone());
            }
        }
    }
    imports
}

fn heading(title: &str) -> String {
    format!("<h1 class=\"govuk-heading-l\">{title}</h1>")
}

fn fieldset_block(title: &str, fields: &str, single_group: bool) -> String {
    if single_group {
        format!(
            "<fieldset class=\"govuk-fieldset\">\n  <legend class=\"govuk-fieldset__legend govuk-fieldset__legend--l\">\n    <h1 class=\"govuk-fieldset__heading\">{title}</h1>\n  </legend>\n{fields}\n</fieldset>"
        )
    } else {
        format!(
            "<fieldset class=\"govuk-fieldset\">\n  <legend class=\"govuk-fieldset__legend govuk-fieldset__legend--m\">{title}</legend>\n{fields}\n</fieldset>"
        )
    }
}

/// Page title: the first rendered field's own reported title, error-prefixed
/// when anything on the page errored, suffixed with the site name tag. Raw
/// content and summary descriptors report no title and are skipped.
fn derive_page_title(
    output_order: &[String],
    set: &TransformSet,
    any_errors: bool,
) -> Option<String> {
    let mut title = output_order
        .iter()
        .filter_map(|key| set.get(key))
        .find_map(|t| t.page_title.clone())?;
    if any_errors && !title.starts_with(ERROR_TITLE_PREFIX) {
        title = format!("{ERROR_TITLE_PREFIX}{title}");
    }
    title.push_str(PAGE_TITLE_SUFFIX);
    Some(title)
}
