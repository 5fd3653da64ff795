//! Check-your-answers and task-list transformers.
//!
//! One transformer covers both summary structures. Groups carrying
//! `questions` render the original flat rows plus the agree-and-submit
//! block; themes carrying `values` render the themed shape, where
//! `downloadSummary` produces a read-only export with no change links.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::answers::{self, SummaryEntry};
use crate::descriptor::{Body, Transformation, TransformContext};
use crate::emit;
use crate::error::TransformError;
use crate::fields::parse_options;
use crate::html;
use crate::value::{MacroObject, MacroValue};

/// Options recognized by the summary transformer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryOptions {
    /// Read-only export rendering: suppresses every change link.
    pub download_summary: bool,
    /// Overrides the schema's own `summaryInfo.summaryStructure`.
    pub summary_structure: Option<Value>,
}

/// Options recognized by the task list transformer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskListOptions {
    /// Display-text overrides for the built-in status codes.
    pub status_labels: HashMap<String, String>,
}

const AGREE_AND_SUBMIT: &str = "<p class=\"govuk-body\">By submitting this form you are \
confirming that, to the best of your knowledge, the details you are providing are \
correct.</p>\n\n{{ govukButton({\n  \"text\": \"Agree and submit\"\n}) }}";

/// Check-your-answers page.
pub(crate) fn summary(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
) -> Result<Transformation, TransformError> {
    let opts: SummaryOptions = parse_options(key, ui)?;
    let structure = opts
        .summary_structure
        .as_ref()
        .or_else(|| {
            schema
                .get("summaryInfo")
                .and_then(|info| info.get("summaryStructure"))
        })
        .and_then(Value::as_array)
        .ok_or_else(|| TransformError::InvalidUiOption {
            key: key.to_string(),
            option: "summaryStructure".to_string(),
            message: "expected an array of groups".to_string(),
        })?;

    let index = answers::summary_index(ctx.data, ctx.lookup);
    let legacy = structure.iter().any(|group| group.get("questions").is_some());

    let mut sections = Vec::new();
    for group in structure {
        let group_title = group.get("title").and_then(Value::as_str).unwrap_or_default();
        let rows = if legacy {
            legacy_rows(group, &index)
        } else {
            themed_rows(group, &index, opts.download_summary)
        };
        if rows.is_empty() {
            continue;
        }
        let mut options = MacroObject::new();
        options.insert("rows", MacroValue::Array(rows));
        sections.push(format!(
            "<h2 class=\"govuk-heading-m\">{group_title}</h2>\n\n{}",
            emit::render_call("govukSummaryList", &MacroValue::Object(options))
        ));
    }

    let mut dependencies = vec![html::import_line("govukSummaryList")];
    if legacy {
        sections.push(AGREE_AND_SUBMIT.to_string());
        dependencies.push(html::import_line("govukButton"));
    }

    let mut transformation = Transformation::new(key, Body::Content(sections.join("\n\n")));
    transformation.dependencies = dependencies;
    Ok(transformation)
}

fn find_entry<'a>(index: &'a [(String, SummaryEntry)], key: &str) -> Option<&'a SummaryEntry> {
    index.iter().find(|(id, _)| id == key).map(|(_, entry)| entry)
}

/// `(key, label)` out of a question descriptor: a bare key string or a
/// `{key, label}` object.
fn question_parts(question: &Value) -> (Option<&str>, Option<&str>) {
    match question {
        Value::String(key) => (Some(key), None),
        Value::Object(_) => (
            question.get("key").and_then(Value::as_str),
            question.get("label").and_then(Value::as_str),
        ),
        _ => (None, None),
    }
}

fn summary_row(
    label: &str,
    value_html: &str,
    change_href: Option<&str>,
) -> MacroValue {
    let mut row = MacroObject::new();
    let mut key_object = MacroObject::new();
    key_object.insert("text", label);
    row.insert("key", key_object);
    let mut value_object = MacroObject::new();
    value_object.insert("html", value_html);
    row.insert("value", value_object);
    if let Some(href) = change_href {
        let mut action = MacroObject::new();
        action.insert("href", href);
        action.insert("text", "Change");
        action.insert("visuallyHiddenText", label);
        let mut actions = MacroObject::new();
        actions.insert("items", MacroValue::Array(vec![MacroValue::Object(action)]));
        row.insert("actions", actions);
    }
    MacroValue::Object(row)
}

/// Rows for one legacy group: only questions present in the answers render.
fn legacy_rows(group: &Value, index: &[(String, SummaryEntry)]) -> Vec<MacroValue> {
    let Some(questions) = group.get("questions").and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut rows = Vec::new();
    for question in questions {
        let (key, label) = question_parts(question);
        let Some(key) = key else { continue };
        let Some(entry) = find_entry(index, key) else {
            continue;
        };
        rows.push(summary_row(label.unwrap_or(key), &entry.value, Some(&entry.href)));
    }
    rows
}

/// Rows for one theme: values are bare keys, `{key, label}` descriptors, or
/// composite `{label, values}` descriptors.
fn themed_rows(
    theme: &Value,
    index: &[(String, SummaryEntry)],
    download: bool,
) -> Vec<MacroValue> {
    let Some(values) = theme.get("values").and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut rows = Vec::new();
    for descriptor in values {
        if descriptor.get("values").is_some() {
            let label = descriptor.get("label").and_then(Value::as_str).unwrap_or_default();
            let (html, first_href) = composite_value(descriptor, index);
            if html.is_empty() {
                continue;
            }
            let change = if download { None } else { first_href.as_deref() };
            rows.push(summary_row(label, &html, change));
        } else {
            let (key, label) = question_parts(descriptor);
            let Some(key) = key else { continue };
            let Some(entry) = find_entry(index, key) else {
                continue;
            };
            let change = if download { None } else { Some(entry.href.as_str()) };
            rows.push(summary_row(label.unwrap_or(key), &entry.value, change));
        }
    }
    rows
}

/// Format a composite value descriptor: every sub-value renders as a
/// `label: value` line; sibling lines after the first are indented. The
/// first answered sub-value's href becomes the row's change target.
fn composite_value(
    descriptor: &Value,
    index: &[(String, SummaryEntry)],
) -> (String, Option<String>) {
    let mut lines = Vec::new();
    let mut first_href = None;
    composite_lines(descriptor, index, &mut lines, &mut first_href);

    let html = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.clone()
            } else {
                format!("<span class=\"govuk-!-margin-left-2\">{line}</span>")
            }
        })
        .collect::<Vec<_>>()
        .join("<br />");
    (html, first_href)
}

fn composite_lines(
    descriptor: &Value,
    index: &[(String, SummaryEntry)],
    lines: &mut Vec<String>,
    first_href: &mut Option<String>,
) {
    let Some(values) = descriptor.get("values").and_then(Value::as_array) else {
        return;
    };
    for sub in values {
        if sub.get("values").is_some() {
            if let Some(label) = sub.get("label").and_then(Value::as_str) {
                lines.push(format!("{label}:"));
            }
            composite_lines(sub, index, lines, first_href);
        } else {
            let (key, label) = question_parts(sub);
            let Some(key) = key else { continue };
            let Some(entry) = find_entry(index, key) else {
                continue;
            };
            lines.push(format!("{}: {}", label.unwrap_or(key), entry.value));
            if first_href.is_none() {
                *first_href = Some(entry.href.clone());
            }
        }
    }
}

/// Task-list page: one heading and list per section under the page title.
pub(crate) fn task_list(
    key: &str,
    schema: &Value,
    ui: &Value,
    _ctx: &TransformContext,
) -> Result<Transformation, TransformError> {
    let opts: TaskListOptions = parse_options(key, ui)?;
    let section_defs = schema
        .get("taskListSections")
        .and_then(Value::as_array)
        .ok_or_else(|| TransformError::InvalidUiOption {
            key: key.to_string(),
            option: "taskListSections".to_string(),
            message: "expected an array of sections".to_string(),
        })?;
    let title = schema.get("title").and_then(Value::as_str);

    let mut sections = Vec::new();
    if let Some(title) = title {
        sections.push(format!("<h1 class=\"govuk-heading-l\">{title}</h1>"));
    }
    if let Some(description) = schema.get("description").and_then(Value::as_str) {
        sections.push(format!("<p class=\"govuk-body\">{description}</p>"));
    }

    let empty = Vec::new();
    for (i, section) in section_defs.iter().enumerate() {
        let section_title = section.get("title").and_then(Value::as_str).unwrap_or_default();
        let tasks = section
            .get("tasks")
            .and_then(Value::as_array)
            .unwrap_or(&empty);

        let mut items = Vec::new();
        for task in tasks {
            let Some(status) = task_status(task.get("status"), &opts.status_labels) else {
                // Not-applicable tasks are dropped entirely.
                continue;
            };
            let mut item = MacroObject::new();
            let mut item_title = MacroObject::new();
            item_title.insert(
                "text",
                task.get("title").and_then(Value::as_str).unwrap_or_default(),
            );
            item.insert("title", item_title);
            if let Some(href) = task.get("href").and_then(Value::as_str) {
                item.insert("href", href);
            }
            item.insert("status", status);
            items.push(MacroValue::Object(item));
        }

        let mut options = MacroObject::new();
        options.insert("idPrefix", format!("{key}-{}", i + 1));
        options.insert("items", MacroValue::Array(items));
        sections.push(format!(
            "<h2 class=\"govuk-heading-m\">{section_title}</h2>\n\n{}",
            emit::render_call("govukTaskList", &MacroValue::Object(options))
        ));
    }

    let mut transformation = Transformation::new(key, Body::Content(sections.join("\n\n")));
    transformation.dependencies = vec![html::import_line("govukTaskList")];
    transformation.page_title = title.map(str::to_string);
    Ok(transformation)
}

/// Status badge for one task. `None` drops the task from the list.
fn task_status(status: Option<&Value>, labels: &HashMap<String, String>) -> Option<MacroValue> {
    let label = |code: &str, fallback: &str| -> String {
        labels.get(code).cloned().unwrap_or_else(|| fallback.to_string())
    };
    match status {
        // Object overrides pass through verbatim.
        Some(Value::Object(_)) => status.map(MacroValue::from),
        Some(Value::String(code)) => match code.as_str() {
            "notApplicable" => None,
            "completed" => {
                let mut status = MacroObject::new();
                status.insert("text", label("completed", "Completed"));
                Some(MacroValue::Object(status))
            }
            "incomplete" => Some(tag_status(&label("incomplete", "Incomplete"), "govuk-tag--blue")),
            "cannotStartYet" => Some(tag_status(
                &label("cannotStartYet", "Cannot start yet"),
                "govuk-tag--grey",
            )),
            free_text => {
                let mut tag = MacroObject::new();
                if html::contains_html(free_text) {
                    tag.insert("html", free_text);
                } else {
                    tag.insert("text", free_text);
                }
                let mut status = MacroObject::new();
                status.insert("tag", tag);
                Some(MacroValue::Object(status))
            }
        },
        // Missing status reads as not started yet.
        None => Some(tag_status(&label("incomplete", "Incomplete"), "govuk-tag--blue")),
        Some(_) => None,
    }
}

fn tag_status(text: &str, classes: &str) -> MacroValue {
    let mut tag = MacroObject::new();
    tag.insert("text", text);
    tag.insert("classes", classes);
    let mut status = MacroObject::new();
    status.insert("tag", tag);
    MacroValue::Object(status)
}
