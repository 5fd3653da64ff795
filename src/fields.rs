//! Leaf field transformers.
//!
//! Each transformer builds the canonical options object for its GOV.UK
//! component from the schema node (id/name from the key, label/hint from
//! `title`/`description`), applies pre-population from stored answers and
//! error decoration from caller-supplied validation messages, and finally
//! deep-merges any `macroOptions` overrides from the UI schema entry on top.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::dates;
use crate::descriptor::{Binding, Body, Transformation, TransformContext, TransformSet};
use crate::emit;
use crate::error::TransformError;
use crate::html;
use crate::merge::deep_merge;
use crate::types::ERROR_TITLE_PREFIX;
use crate::value::{MacroObject, MacroValue};

/// Width class forced onto a field consumed as conditional-reveal content.
const CONDITIONAL_WIDTH_CLASS: &str = "govuk-!-width-one-third";

/// Deserialize the typed options for a transformer out of a UI entry.
///
/// Unrecognized keys are ignored (options bags also carry keys consumed by
/// other layers); a recognized key with the wrong shape is a configuration
/// error.
pub(crate) fn parse_options<T>(key: &str, ui: &Value) -> Result<T, TransformError>
where
    T: DeserializeOwned + Default,
{
    match ui.get("options") {
        None | Some(Value::Null) => Ok(T::default()),
        Some(options) => {
            serde_json::from_value(options.clone()).map_err(|e| TransformError::InvalidUiOption {
                key: key.to_string(),
                option: "options".to_string(),
                message: e.to_string(),
            })
        }
    }
}

/// Options recognized by the text input transformer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextInputOptions {
    pub set_page_heading: bool,
    pub auto_complete: Option<String>,
    pub macro_options: Option<Value>,
}

/// Options recognized by the textarea transformer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextareaOptions {
    pub set_page_heading: bool,
    pub macro_options: Option<Value>,
}

/// Options recognized by the radios transformer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoiceOptions {
    pub set_page_heading: bool,
    pub conditional_component_map: Vec<ConditionalMapping>,
    pub macro_options: Option<Value>,
}

/// Options recognized by the select transformer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectOptions {
    pub set_page_heading: bool,
    pub default_item: Option<Value>,
    pub macro_options: Option<Value>,
}

/// Options recognized by the checkboxes transformer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckboxesOptions {
    pub set_page_heading: bool,
    pub conditional_component_map: Vec<ConditionalMapping>,
    pub additional_mapping: Vec<AdditionalItem>,
    pub macro_options: Option<Value>,
}

/// Options recognized by the date input transformer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateInputOptions {
    pub set_page_heading: bool,
    pub date_parts: Option<DatePartsShown>,
    pub macro_options: Option<Value>,
}

/// Options recognized by the file upload transformer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileUploadOptions {
    pub set_page_heading: bool,
    pub macro_options: Option<Value>,
}

/// Attaches an already-transformed sibling as reveal-on-selection content
/// for the item with the matching value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalMapping {
    pub item_value: Value,
    pub component_ids: Vec<String>,
}

/// A static item spliced into a checkbox list at a caller-chosen index.
#[derive(Debug, Clone, Deserialize)]
pub struct AdditionalItem {
    pub index: usize,
    pub item: Value,
}

/// Which date-input parts render. Missing keys default to shown.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct DatePartsShown {
    pub day: bool,
    pub month: bool,
    pub year: bool,
}

impl Default for DatePartsShown {
    fn default() -> Self {
        Self {
            day: true,
            month: true,
            year: true,
        }
    }
}

fn schema_str<'a>(schema: &'a Value, key: &str) -> Option<&'a str> {
    schema.get(key).and_then(Value::as_str)
}

fn schema_title<'a>(schema: &'a Value, key: &'a str) -> &'a str {
    schema_str(schema, "title").unwrap_or(key)
}

/// Width class keyed to `maxLength`. Lengths at or above the long-text
/// threshold have no width class; those fields route to the textarea
/// transformer instead.
pub(crate) fn input_width_class(max_length: Option<u64>) -> Option<&'static str> {
    match max_length? {
        0..=19 => Some("govuk-input--width-10"),
        20..=59 => Some("govuk-input--width-20"),
        60..=499 => Some("govuk-input--width-30"),
        _ => None,
    }
}

fn label_object(text: &str, promote: bool) -> MacroObject {
    let mut label = MacroObject::new();
    label.insert("text", text);
    if promote {
        label.insert("classes", "govuk-label--l");
        label.insert("isPageHeading", true);
    }
    label
}

fn hint_object(text: &str) -> MacroObject {
    let mut hint = MacroObject::new();
    hint.insert("text", text);
    hint
}

fn legend_fieldset(text: &str, promote: bool) -> MacroObject {
    let mut legend = MacroObject::new();
    legend.insert("text", text);
    if promote {
        legend.insert("classes", "govuk-fieldset__legend--l");
        legend.insert("isPageHeading", true);
    }
    let mut fieldset = MacroObject::new();
    fieldset.insert("legend", legend);
    fieldset
}

/// Attach the caller-supplied validation message, when present. Returns the
/// message and the page title this field reports (error-prefixed when it
/// errored).
fn decorate_error(
    key: &str,
    options: &mut MacroObject,
    ctx: &TransformContext,
    title: &str,
) -> (Option<String>, String) {
    match ctx.error_for(key) {
        Some(message) => {
            let mut error = MacroObject::new();
            error.insert("text", message);
            options.insert("errorMessage", error);
            (
                Some(message.to_string()),
                format!("{ERROR_TITLE_PREFIX}{title}"),
            )
        }
        None => (None, title.to_string()),
    }
}

fn apply_overrides(options: MacroObject, macro_options: Option<&Value>) -> MacroValue {
    let mut value = MacroValue::Object(options);
    if let Some(overrides) = macro_options {
        deep_merge(&mut value, &MacroValue::from(overrides));
    }
    value
}

fn leaf(
    key: &str,
    component: &str,
    options: MacroValue,
    page_title: String,
    error_message: Option<String>,
) -> Transformation {
    let has_errors = error_message.is_some();
    Transformation {
        id: key.to_string(),
        dependencies: vec![html::import_line(component)],
        body: Body::Macro {
            name: component.to_string(),
            options,
        },
        bindings: Vec::new(),
        page_title: Some(page_title),
        error_message,
        has_errors,
        error_summary_href: None,
    }
}

/// Free text input (`govukInput`).
pub(crate) fn text_input(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
) -> Result<Transformation, TransformError> {
    let opts: TextInputOptions = parse_options(key, ui)?;
    let title = schema_title(schema, key);

    let mut options = MacroObject::new();
    options.insert("id", key);
    options.insert("name", key);
    let input_type = if schema_str(schema, "format") == Some("email") {
        "email"
    } else {
        "text"
    };
    options.insert("type", input_type);
    options.insert("label", label_object(title, opts.set_page_heading));
    if let Some(hint) = schema_str(schema, "description") {
        options.insert("hint", hint_object(hint));
    }
    if let Some(width) = input_width_class(schema.get("maxLength").and_then(Value::as_u64)) {
        options.insert("classes", width);
    }
    if let Some(autocomplete) = &opts.auto_complete {
        options.insert("autocomplete", autocomplete.as_str());
    }
    if let Some(answer) = ctx.answer(key) {
        options.insert("value", MacroValue::from(answer));
    }

    let (error_message, page_title) = decorate_error(key, &mut options, ctx, title);
    let options = apply_overrides(options, opts.macro_options.as_ref());
    Ok(leaf(key, "govukInput", options, page_title, error_message))
}

/// Long text. Renders a character count when the schema declares a
/// `maxLength`, a plain textarea otherwise.
pub(crate) fn textarea(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
) -> Result<Transformation, TransformError> {
    let opts: TextareaOptions = parse_options(key, ui)?;
    let title = schema_title(schema, key);
    let max_length = schema.get("maxLength").and_then(Value::as_u64);

    let mut options = MacroObject::new();
    options.insert("id", key);
    options.insert("name", key);
    if let Some(max) = max_length {
        options.insert("maxlength", max);
    }
    let mut label = label_object(title, opts.set_page_heading);
    if !opts.set_page_heading {
        label.insert("classes", "govuk-label--m");
    }
    options.insert("label", label);
    if let Some(hint) = schema_str(schema, "description") {
        options.insert("hint", hint_object(hint));
    }
    if let Some(answer) = ctx.answer(key) {
        options.insert("value", MacroValue::from(answer));
    }

    let (error_message, page_title) = decorate_error(key, &mut options, ctx, title);
    let options = apply_overrides(options, opts.macro_options.as_ref());
    let component = if max_length.is_some() {
        "govukCharacterCount"
    } else {
        "govukTextarea"
    };
    Ok(leaf(key, component, options, page_title, error_message))
}

/// Single choice rendered as radio buttons.
pub(crate) fn radios(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
    set: &mut TransformSet,
) -> Result<Transformation, TransformError> {
    radios_inner(key, schema, ui, ctx, set, false)
}

/// Boolean rendered as an inline Yes/No radio pair, by injecting a
/// synthetic two-item `oneOf` and delegating to the radios transformer.
pub(crate) fn yes_no(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
    set: &mut TransformSet,
) -> Result<Transformation, TransformError> {
    let mut synthetic = serde_json::Map::new();
    if let Some(title) = schema.get("title") {
        synthetic.insert("title".to_string(), title.clone());
    }
    if let Some(description) = schema.get("description") {
        synthetic.insert("description".to_string(), description.clone());
    }
    synthetic.insert(
        "oneOf".to_string(),
        serde_json::json!([
            {"const": true, "title": "Yes"},
            {"const": false, "title": "No"}
        ]),
    );
    radios_inner(key, &Value::Object(synthetic), ui, ctx, set, true)
}

fn radios_inner(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
    set: &mut TransformSet,
    inline: bool,
) -> Result<Transformation, TransformError> {
    let opts: ChoiceOptions = parse_options(key, ui)?;
    let title = schema_title(schema, key);
    let empty = Vec::new();
    let one_of = schema
        .get("oneOf")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    validate_conditional_map(key, &opts.conditional_component_map, one_of, "const", set)?;

    let answer = ctx.answer(key);
    let mut bindings = Vec::new();
    let mut dependencies = vec![html::import_line("govukRadios")];

    let mut items = Vec::new();
    for option in one_of {
        let Some(const_value) = option.get("const") else {
            continue;
        };
        let mut item = MacroObject::new();
        item.insert("value", MacroValue::from(const_value));
        item.insert("text", option_text(option, const_value));
        if let Some(hint) = schema_str(option, "description") {
            item.insert("hint", hint_object(hint));
        }
        if answer == Some(const_value) {
            item.insert("checked", true);
        }
        if let Some(mapping) = opts
            .conditional_component_map
            .iter()
            .find(|m| &m.item_value == const_value)
        {
            let html = conditional_block(key, mapping, set, &mut bindings, &mut dependencies)?;
            let mut conditional = MacroObject::new();
            conditional.insert("html", html);
            item.insert("conditional", conditional);
        }
        items.push(MacroValue::Object(item));
    }

    let mut options = MacroObject::new();
    options.insert("idPrefix", key);
    options.insert("name", key);
    options.insert("fieldset", legend_fieldset(title, opts.set_page_heading));
    if let Some(hint) = schema_str(schema, "description") {
        options.insert("hint", hint_object(hint));
    }
    if inline {
        options.insert("classes", "govuk-radios--inline");
    }
    options.insert("items", MacroValue::Array(items));

    let (error_message, page_title) = decorate_error(key, &mut options, ctx, title);
    let options = apply_overrides(options, opts.macro_options.as_ref());
    let has_errors = error_message.is_some();
    Ok(Transformation {
        id: key.to_string(),
        dependencies,
        body: Body::Macro {
            name: "govukRadios".to_string(),
            options,
        },
        bindings,
        page_title: Some(page_title),
        error_message,
        has_errors,
        error_summary_href: None,
    })
}

/// Single choice rendered as a dropdown.
pub(crate) fn select(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
) -> Result<Transformation, TransformError> {
    let opts: SelectOptions = parse_options(key, ui)?;
    let title = schema_title(schema, key);
    let empty = Vec::new();
    let one_of = schema
        .get("oneOf")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let answer = ctx.answer(key);
    let mut has_selection = false;
    let mut items = Vec::new();
    for option in one_of {
        let Some(const_value) = option.get("const") else {
            continue;
        };
        let mut item = MacroObject::new();
        item.insert("value", MacroValue::from(const_value));
        item.insert("text", option_text(option, const_value));
        if answer == Some(const_value) {
            item.insert("selected", true);
            has_selection = true;
        }
        items.push(MacroValue::Object(item));
    }

    if let Some(default_item) = &opts.default_item {
        let mut item = MacroValue::from(default_item);
        if has_selection {
            // A stored selection wins; the injected default must not
            // double-select.
            if let Some(object) = item.as_object_mut() {
                object.insert("selected", false);
            }
        }
        items.insert(0, item);
    }

    let mut options = MacroObject::new();
    options.insert("id", key);
    options.insert("name", key);
    options.insert("label", label_object(title, opts.set_page_heading));
    if let Some(hint) = schema_str(schema, "description") {
        options.insert("hint", hint_object(hint));
    }
    options.insert("items", MacroValue::Array(items));

    let (error_message, page_title) = decorate_error(key, &mut options, ctx, title);
    let options = apply_overrides(options, opts.macro_options.as_ref());
    Ok(leaf(key, "govukSelect", options, page_title, error_message))
}

/// Multiple choice rendered as checkboxes.
pub(crate) fn checkboxes(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
    set: &mut TransformSet,
) -> Result<Transformation, TransformError> {
    let opts: CheckboxesOptions = parse_options(key, ui)?;
    let title = schema_title(schema, key);
    let empty = Vec::new();
    let any_of = schema
        .get("items")
        .and_then(|items| items.get("anyOf"))
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    validate_conditional_map(key, &opts.conditional_component_map, any_of, "const", set)?;

    let stored = ctx.answer(key).and_then(Value::as_array);
    let mut bindings = Vec::new();
    let mut dependencies = vec![html::import_line("govukCheckboxes")];

    let mut items = Vec::new();
    for option in any_of {
        let Some(const_value) = option.get("const") else {
            continue;
        };
        let mut item = MacroObject::new();
        item.insert("value", MacroValue::from(const_value));
        let text = option_text(option, const_value);
        if html::contains_html(&text) {
            item.insert("html", text);
        } else {
            item.insert("text", text);
        }
        if let Some(hint) = schema_str(option, "description") {
            item.insert("hint", hint_object(hint));
        }
        if stored.is_some_and(|values| values.contains(const_value)) {
            item.insert("checked", true);
        }
        if let Some(mapping) = opts
            .conditional_component_map
            .iter()
            .find(|m| &m.item_value == const_value)
        {
            let html = conditional_block(key, mapping, set, &mut bindings, &mut dependencies)?;
            let mut conditional = MacroObject::new();
            conditional.insert("html", html);
            item.insert("conditional", conditional);
        }
        items.push(MacroValue::Object(item));
    }

    for extra in &opts.additional_mapping {
        let index = extra.index.min(items.len());
        items.insert(index, MacroValue::from(&extra.item));
    }

    let mut options = MacroObject::new();
    options.insert("idPrefix", key);
    options.insert("name", key);
    options.insert("fieldset", legend_fieldset(title, opts.set_page_heading));
    if let Some(hint) = schema_str(schema, "description") {
        options.insert("hint", hint_object(hint));
    }
    options.insert("items", MacroValue::Array(items));

    let (error_message, page_title) = decorate_error(key, &mut options, ctx, title);
    let options = apply_overrides(options, opts.macro_options.as_ref());
    let has_errors = error_message.is_some();
    Ok(Transformation {
        id: key.to_string(),
        dependencies,
        body: Body::Macro {
            name: "govukCheckboxes".to_string(),
            options,
        },
        bindings,
        page_title: Some(page_title),
        error_message,
        has_errors,
        error_summary_href: None,
    })
}

/// Day/month/year input.
pub(crate) fn date_input(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
) -> Result<Transformation, TransformError> {
    let opts: DateInputOptions = parse_options(key, ui)?;
    let title = schema_title(schema, key);
    let shown = opts.date_parts.unwrap_or_default();
    let parts = ctx
        .answer(key)
        .and_then(Value::as_str)
        .and_then(dates::parse_date);
    let errored = ctx.error_for(key).is_some();

    let mut items = Vec::new();
    let mut first_visible = None;
    for (name, width, visible) in [
        ("day", "govuk-input--width-2", shown.day),
        ("month", "govuk-input--width-2", shown.month),
        ("year", "govuk-input--width-4", shown.year),
    ] {
        if !visible {
            continue;
        }
        if first_visible.is_none() {
            first_visible = Some(name);
        }
        let mut item = MacroObject::new();
        item.insert("name", name);
        let mut classes = width.to_string();
        if errored {
            classes.push_str(" govuk-input--error");
        }
        item.insert("classes", classes);
        if let Some(parts) = parts {
            let value = match name {
                "day" => MacroValue::from(parts.day),
                "month" => MacroValue::from(parts.month),
                _ => MacroValue::from(parts.year),
            };
            item.insert("value", value);
        }
        items.push(MacroValue::Object(item));
    }

    let mut options = MacroObject::new();
    options.insert("id", key);
    options.insert("namePrefix", key);
    options.insert("fieldset", legend_fieldset(title, opts.set_page_heading));
    if let Some(hint) = schema_str(schema, "description") {
        options.insert("hint", hint_object(hint));
    }
    options.insert("items", MacroValue::Array(items));

    let (error_message, page_title) = decorate_error(key, &mut options, ctx, title);
    let options = apply_overrides(options, opts.macro_options.as_ref());
    let mut transformation = leaf(key, "govukDateInput", options, page_title, error_message);
    if errored {
        if let Some(part) = first_visible {
            transformation.error_summary_href = Some(format!("#{key}-{part}"));
        }
    }
    Ok(transformation)
}

/// File upload.
pub(crate) fn file_upload(
    key: &str,
    schema: &Value,
    ui: &Value,
    ctx: &TransformContext,
) -> Result<Transformation, TransformError> {
    let opts: FileUploadOptions = parse_options(key, ui)?;
    let title = schema_title(schema, key);

    let mut options = MacroObject::new();
    options.insert("id", key);
    options.insert("name", key);
    options.insert("label", label_object(title, opts.set_page_heading));
    if let Some(hint) = schema_str(schema, "description") {
        options.insert("hint", hint_object(hint));
    }

    let (error_message, page_title) = decorate_error(key, &mut options, ctx, title);
    let options = apply_overrides(options, opts.macro_options.as_ref());
    Ok(leaf(
        key,
        "govukFileUpload",
        options,
        page_title,
        error_message,
    ))
}

/// Static raw content: the description passes through verbatim, with its
/// embedded component calls scanned into the dependency list.
pub(crate) fn content(key: &str, schema: &Value) -> Transformation {
    let text = schema
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let mut transformation = Transformation::new(key, Body::Content(text));
    if let Body::Content(text) = &transformation.body {
        transformation.dependencies = html::scan_dependencies(text);
    }
    transformation
}

fn option_text(option: &Value, const_value: &Value) -> String {
    match schema_str(option, "title") {
        Some(title) => title.to_string(),
        None => match const_value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}

/// Fail fast when a conditional map names an item value with no matching
/// option or a component that has not been transformed yet. The processing
/// order is author-specified; a miss here is a sequencing mistake, not a
/// lookup failure to paper over.
fn validate_conditional_map(
    key: &str,
    mappings: &[ConditionalMapping],
    options: &[Value],
    value_key: &str,
    set: &TransformSet,
) -> Result<(), TransformError> {
    for mapping in mappings {
        if !options
            .iter()
            .any(|option| option.get(value_key) == Some(&mapping.item_value))
        {
            return Err(TransformError::UnknownConditionalValue {
                key: key.to_string(),
                item_value: mapping.item_value.to_string(),
            });
        }
        for id in &mapping.component_ids {
            if set.get(id).is_none() {
                return Err(TransformError::MissingConditionalComponent {
                    key: key.to_string(),
                    component_id: id.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Bind the already-transformed siblings named by a conditional mapping and
/// return the block reference the revealing item carries.
fn conditional_block(
    key: &str,
    mapping: &ConditionalMapping,
    set: &TransformSet,
    bindings: &mut Vec<Binding>,
    dependencies: &mut Vec<String>,
) -> Result<MacroValue, TransformError> {
    let mut idents = Vec::new();
    for id in &mapping.component_ids {
        let sibling = set
            .get(id)
            .ok_or_else(|| TransformError::MissingConditionalComponent {
                key: key.to_string(),
                component_id: id.clone(),
            })?;

        let mut body = sibling.body.clone();
        if let Body::Macro { options, .. } = &mut body {
            if let Some(object) = options.as_object_mut() {
                object.insert("classes", CONDITIONAL_WIDTH_CLASS);
            }
        }
        for dependency in &sibling.dependencies {
            if !dependencies.contains(dependency) {
                dependencies.push(dependency.clone());
            }
        }

        let name = emit::block_name(id);
        if !bindings.iter().any(|b| b.name == name) {
            bindings.push(Binding {
                name: name.clone(),
                body,
            });
        }
        idents.push(name);
    }
    Ok(MacroValue::Block(idents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::NoLookup;
    use serde_json::json;

    fn ctx<'a>(
        data: &'a Value,
        errors: &'a Value,
        ui: &'a Value,
    ) -> TransformContext<'a> {
        TransformContext::new(data, errors, ui, &NoLookup)
    }

    fn options_of(transformation: &Transformation) -> &MacroObject {
        match &transformation.body {
            Body::Macro { options, .. } => options.as_object().expect("object options"),
            Body::Content(_) => panic!("expected macro body"),
        }
    }

    #[test]
    fn width_classes_follow_the_length_bands() {
        assert_eq!(input_width_class(Some(19)), Some("govuk-input--width-10"));
        assert_eq!(input_width_class(Some(20)), Some("govuk-input--width-20"));
        assert_eq!(input_width_class(Some(59)), Some("govuk-input--width-20"));
        assert_eq!(input_width_class(Some(60)), Some("govuk-input--width-30"));
        assert_eq!(input_width_class(Some(499)), Some("govuk-input--width-30"));
        assert_eq!(input_width_class(Some(500)), None);
        assert_eq!(input_width_class(None), None);
    }

    #[test]
    fn text_input_defaults_from_schema() {
        let data = json!({});
        let errors = json!({});
        let ui = json!({});
        let schema = json!({"type": "string", "title": "Event name", "description": "Its public name"});
        let t = text_input("eventName", &schema, &Value::Null, &ctx(&data, &errors, &ui)).unwrap();

        let options = options_of(&t);
        assert_eq!(options.get("id"), Some(&MacroValue::String("eventName".into())));
        assert_eq!(options.get("type"), Some(&MacroValue::String("text".into())));
        assert_eq!(
            options.get("label").and_then(MacroValue::as_object).and_then(|l| l.get("text")),
            Some(&MacroValue::String("Event name".into()))
        );
        assert_eq!(
            options.get("hint").and_then(MacroValue::as_object).and_then(|h| h.get("text")),
            Some(&MacroValue::String("Its public name".into()))
        );
        assert!(options.get("classes").is_none());
        assert_eq!(t.page_title.as_deref(), Some("Event name"));
        assert!(!t.has_errors);
        assert_eq!(t.dependencies, vec![html::import_line("govukInput")]);
    }

    #[test]
    fn text_input_email_format_sets_the_type() {
        let data = json!({});
        let errors = json!({});
        let ui = json!({});
        let schema = json!({"type": "string", "title": "Email", "format": "email"});
        let t = text_input("email", &schema, &Value::Null, &ctx(&data, &errors, &ui)).unwrap();
        assert_eq!(
            options_of(&t).get("type"),
            Some(&MacroValue::String("email".into()))
        );
    }

    #[test]
    fn text_input_prefills_and_decorates_errors() {
        let data = json!({"eventName": "Summer fair"});
        let errors = json!({"eventName": "Enter the event name"});
        let ui = json!({});
        let schema = json!({"type": "string", "title": "Event name"});
        let t = text_input("eventName", &schema, &Value::Null, &ctx(&data, &errors, &ui)).unwrap();

        let options = options_of(&t);
        assert_eq!(
            options.get("value"),
            Some(&MacroValue::String("Summer fair".into()))
        );
        assert_eq!(
            options.get("errorMessage").and_then(MacroValue::as_object).and_then(|e| e.get("text")),
            Some(&MacroValue::String("Enter the event name".into()))
        );
        assert_eq!(t.page_title.as_deref(), Some("Error: Event name"));
        assert!(t.has_errors);
    }

    #[test]
    fn macro_options_merge_over_defaults() {
        let data = json!({});
        let errors = json!({});
        let ui_schema = json!({});
        let ui = json!({"options": {"macroOptions": {"classes": "app-input", "label": {"classes": "govuk-label--s"}}}});
        let schema = json!({"type": "string", "title": "Name", "maxLength": 30});
        let t = text_input("name", &schema, &ui, &ctx(&data, &errors, &ui_schema)).unwrap();

        let options = options_of(&t);
        assert_eq!(options.get("classes"), Some(&MacroValue::String("app-input".into())));
        let label = options.get("label").and_then(MacroValue::as_object).unwrap();
        assert_eq!(label.get("classes"), Some(&MacroValue::String("govuk-label--s".into())));
        assert_eq!(label.get("text"), Some(&MacroValue::String("Name".into())));
    }

    #[test]
    fn textarea_picks_character_count_when_limited() {
        let data = json!({});
        let errors = json!({});
        let ui = json!({});
        let schema = json!({"type": "string", "title": "Details", "maxLength": 1200});
        let t = textarea("details", &schema, &Value::Null, &ctx(&data, &errors, &ui)).unwrap();

        match &t.body {
            Body::Macro { name, .. } => assert_eq!(name, "govukCharacterCount"),
            _ => panic!("expected macro"),
        }
        assert_eq!(
            options_of(&t).get("maxlength"),
            Some(&MacroValue::Number(1200.into()))
        );
        assert!(options_of(&t).get("classes").is_none());
    }

    #[test]
    fn radios_builds_items_and_checks_the_stored_answer() {
        let data = json!({"contact": "phone"});
        let errors = json!({});
        let ui = json!({});
        let schema = json!({
            "type": "string",
            "title": "How should we contact you?",
            "oneOf": [
                {"const": "email", "title": "Email"},
                {"const": "phone", "title": "Phone"}
            ]
        });
        let mut set = TransformSet::new();
        let t = radios("contact", &schema, &Value::Null, &ctx(&data, &errors, &ui), &mut set)
            .unwrap();

        let items = options_of(&t).get("items").and_then(MacroValue::as_array).unwrap();
        assert_eq!(items.len(), 2);
        let checked: Vec<bool> = items
            .iter()
            .map(|item| {
                item.as_object()
                    .and_then(|o| o.get("checked"))
                    .is_some()
            })
            .collect();
        assert_eq!(checked, [false, true]);
    }

    #[test]
    fn radios_wires_conditional_reveal_from_the_accumulator() {
        let data = json!({});
        let errors = json!({});
        let ui_schema = json!({});
        let context = ctx(&data, &errors, &ui_schema);

        let mut set = TransformSet::new();
        let email_schema = json!({"type": "string", "title": "Email address"});
        let email = text_input("email", &email_schema, &Value::Null, &context).unwrap();
        set.insert(email);

        let ui = json!({"options": {"conditionalComponentMap": [
            {"itemValue": "email", "componentIds": ["email"]}
        ]}});
        let schema = json!({
            "type": "string",
            "title": "Contact",
            "oneOf": [
                {"const": "email", "title": "Email"},
                {"const": "phone", "title": "Phone"}
            ]
        });
        let t = radios("contact", &schema, &ui, &context, &mut set).unwrap();

        let items = options_of(&t).get("items").and_then(MacroValue::as_array).unwrap();
        let email_item = items[0].as_object().unwrap();
        assert_eq!(
            email_item.get("conditional").and_then(MacroValue::as_object).and_then(|c| c.get("html")),
            Some(&MacroValue::Block(vec!["email_html".into()]))
        );
        // Unmapped siblings carry no conditional key at all.
        assert!(items[1].as_object().unwrap().get("conditional").is_none());

        // The revealed field is re-homed as a binding with the forced width.
        assert_eq!(t.bindings.len(), 1);
        assert_eq!(t.bindings[0].name, "email_html");
        match &t.bindings[0].body {
            Body::Macro { options, .. } => assert_eq!(
                options.as_object().unwrap().get("classes"),
                Some(&MacroValue::String(CONDITIONAL_WIDTH_CLASS.into()))
            ),
            _ => panic!("expected macro binding"),
        }
        // And its import travels with the radios.
        assert!(t.dependencies.contains(&html::import_line("govukInput")));
    }

    #[test]
    fn radios_conditional_map_fails_fast_on_missing_component() {
        let data = json!({});
        let errors = json!({});
        let ui_schema = json!({});
        let ui = json!({"options": {"conditionalComponentMap": [
            {"itemValue": "email", "componentIds": ["email"]}
        ]}});
        let schema = json!({"type": "string", "oneOf": [{"const": "email", "title": "Email"}]});
        let mut set = TransformSet::new();
        let result = radios("contact", &schema, &ui, &ctx(&data, &errors, &ui_schema), &mut set);
        assert!(matches!(
            result,
            Err(TransformError::MissingConditionalComponent { .. })
        ));
    }

    #[test]
    fn radios_conditional_map_fails_fast_on_unknown_item_value() {
        let data = json!({});
        let errors = json!({});
        let ui_schema = json!({});
        let ui = json!({"options": {"conditionalComponentMap": [
            {"itemValue": "fax", "componentIds": ["fax"]}
        ]}});
        let schema = json!({"type": "string", "oneOf": [{"const": "email", "title": "Email"}]});
        let mut set = TransformSet::new();
        let result = radios("contact", &schema, &ui, &ctx(&data, &errors, &ui_schema), &mut set);
        assert!(matches!(
            result,
            Err(TransformError::UnknownConditionalValue { .. })
        ));
    }

    #[test]
    fn yes_no_builds_an_inline_two_item_choice() {
        let data = json!({"firstAid": false});
        let errors = json!({});
        let ui = json!({});
        let schema = json!({"type": "boolean", "title": "Is first aid provided?"});
        let mut set = TransformSet::new();
        let t = yes_no("firstAid", &schema, &Value::Null, &ctx(&data, &errors, &ui), &mut set)
            .unwrap();

        let options = options_of(&t);
        assert_eq!(
            options.get("classes"),
            Some(&MacroValue::String("govuk-radios--inline".into()))
        );
        let items = options.get("items").and_then(MacroValue::as_array).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].as_object().unwrap().get("value"),
            Some(&MacroValue::Bool(true))
        );
        assert_eq!(
            items[0].as_object().unwrap().get("text"),
            Some(&MacroValue::String("Yes".into()))
        );
        assert_eq!(
            items[1].as_object().unwrap().get("text"),
            Some(&MacroValue::String("No".into()))
        );
        // Stored false checks the No item.
        assert!(items[1].as_object().unwrap().get("checked").is_some());
        assert!(items[0].as_object().unwrap().get("checked").is_none());
    }

    #[test]
    fn select_injects_the_default_item_without_double_selection() {
        let data = json!({"force": "tvp"});
        let errors = json!({});
        let ui_schema = json!({});
        let ui = json!({"options": {"defaultItem": {"text": "Choose a force", "value": "", "selected": true}}});
        let schema = json!({
            "type": "string",
            "title": "Police force",
            "oneOf": [
                {"const": "met", "title": "Metropolitan Police"},
                {"const": "tvp", "title": "Thames Valley Police"}
            ]
        });
        let t = select("force", &schema, &ui, &ctx(&data, &errors, &ui_schema)).unwrap();

        let items = options_of(&t).get("items").and_then(MacroValue::as_array).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[0].as_object().unwrap().get("selected"),
            Some(&MacroValue::Bool(false))
        );
        assert_eq!(
            items[2].as_object().unwrap().get("selected"),
            Some(&MacroValue::Bool(true))
        );
    }

    #[test]
    fn checkboxes_checks_stored_values_and_sniffs_html_titles() {
        let data = json!({"needs": ["parking"]});
        let errors = json!({});
        let ui = json!({});
        let schema = json!({
            "type": "array",
            "title": "What do you need?",
            "items": {"anyOf": [
                {"const": "parking", "title": "Parking"},
                {"const": "power", "title": "Power <abbr title=\"alternating current\">AC</abbr>", "description": "Mains supply"}
            ]}
        });
        let mut set = TransformSet::new();
        let t = checkboxes("needs", &schema, &Value::Null, &ctx(&data, &errors, &ui), &mut set)
            .unwrap();

        let items = options_of(&t).get("items").and_then(MacroValue::as_array).unwrap();
        let first = items[0].as_object().unwrap();
        assert!(first.get("checked").is_some());
        assert!(first.get("text").is_some());
        let second = items[1].as_object().unwrap();
        assert!(second.get("checked").is_none());
        assert!(second.get("html").is_some());
        assert!(second.get("text").is_none());
        assert_eq!(
            second.get("hint").and_then(MacroValue::as_object).and_then(|h| h.get("text")),
            Some(&MacroValue::String("Mains supply".into()))
        );
    }

    #[test]
    fn checkboxes_splice_additional_items() {
        let data = json!({});
        let errors = json!({});
        let ui_schema = json!({});
        let ui = json!({"options": {"additionalMapping": [
            {"index": 1, "item": {"divider": "or"}}
        ]}});
        let schema = json!({
            "type": "array",
            "items": {"anyOf": [
                {"const": "a", "title": "A"},
                {"const": "b", "title": "B"}
            ]}
        });
        let mut set = TransformSet::new();
        let t = checkboxes("choices", &schema, &ui, &ctx(&data, &errors, &ui_schema), &mut set)
            .unwrap();

        let items = options_of(&t).get("items").and_then(MacroValue::as_array).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[1].as_object().unwrap().get("divider"),
            Some(&MacroValue::String("or".into()))
        );
    }

    #[test]
    fn date_input_prefills_parts_and_marks_errors() {
        let data = json!({"eventDate": "2024-06-07T00:00:00.000Z"});
        let errors = json!({"eventDate": "Enter a real date"});
        let ui = json!({});
        let schema = json!({"type": "string", "format": "date-time", "title": "Event date"});
        let t = date_input("eventDate", &schema, &Value::Null, &ctx(&data, &errors, &ui)).unwrap();

        let items = options_of(&t).get("items").and_then(MacroValue::as_array).unwrap();
        assert_eq!(items.len(), 3);
        let day = items[0].as_object().unwrap();
        assert_eq!(day.get("value"), Some(&MacroValue::Number(7.into())));
        assert_eq!(
            day.get("classes"),
            Some(&MacroValue::String(
                "govuk-input--width-2 govuk-input--error".into()
            ))
        );
        let year = items[2].as_object().unwrap();
        assert_eq!(year.get("value"), Some(&MacroValue::Number(2024.into())));
        assert_eq!(t.error_summary_href.as_deref(), Some("#eventDate-day"));
    }

    #[test]
    fn date_input_hides_filtered_parts() {
        let data = json!({});
        let errors = json!({"expiry": "Enter the expiry date"});
        let ui_schema = json!({});
        let ui = json!({"options": {"dateParts": {"day": false}}});
        let schema = json!({"type": "string", "format": "date-time", "title": "Expiry"});
        let t = date_input("expiry", &schema, &ui, &ctx(&data, &errors, &ui_schema)).unwrap();

        let items = options_of(&t).get("items").and_then(MacroValue::as_array).unwrap();
        let names: Vec<&MacroValue> = items
            .iter()
            .filter_map(|item| item.as_object().and_then(|o| o.get("name")))
            .collect();
        assert_eq!(
            names,
            [
                &MacroValue::String("month".into()),
                &MacroValue::String("year".into())
            ]
        );
        assert_eq!(t.error_summary_href.as_deref(), Some("#expiry-month"));
    }

    #[test]
    fn content_passes_description_through_and_scans_dependencies() {
        let schema = json!({
            "description": "<p class=\"govuk-body\">Read this first.</p>\n{{ govukButton({\"text\": \"Continue\"}) }}"
        });
        let t = content("intro", &schema);

        match &t.body {
            Body::Content(text) => assert!(text.starts_with("<p class=")),
            _ => panic!("expected content"),
        }
        assert_eq!(t.dependencies, vec![html::import_line("govukButton")]);
        assert_eq!(t.page_title, None);
    }

    #[test]
    fn file_upload_promotes_the_label_heading() {
        let data = json!({});
        let errors = json!({});
        let ui_schema = json!({});
        let ui = json!({"options": {"setPageHeading": true}});
        let schema = json!({"type": "string", "title": "Upload your map"});
        let t = file_upload("map", &schema, &ui, &ctx(&data, &errors, &ui_schema)).unwrap();

        let label = options_of(&t).get("label").and_then(MacroValue::as_object).unwrap();
        assert_eq!(
            label.get("classes"),
            Some(&MacroValue::String("govuk-label--l".into()))
        );
        assert_eq!(label.get("isPageHeading"), Some(&MacroValue::Bool(true)));
    }
}
