//! Core types for form transformation.

use serde_json::Value;

/// `maxLength` at or above which a string field renders as a long-text
/// (character count) field instead of a single-line input.
pub const LONG_TEXT_THRESHOLD: u64 = 500;

/// Number of `oneOf` options below which a single choice renders as radios;
/// at or above it, a dropdown.
pub const INLINE_CHOICE_MAX: usize = 20;

/// Site name tag appended to derived page titles.
pub const PAGE_TITLE_SUFFIX: &str = " - GOV.UK";

/// Prefix applied to page titles when a validation error is rendered.
pub const ERROR_TITLE_PREFIX: &str = "Error: ";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The transformer a schema node dispatches to.
///
/// Resolution is two-step: an explicit `component` name in the UI schema
/// entry wins unconditionally, otherwise the schema's shape decides (see
/// [`crate::resolve_field_kind`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single-line text input (`govukInput`).
    TextInput,
    /// Long text with a character count (`govukCharacterCount`), or a plain
    /// textarea when no limit is declared.
    Textarea,
    /// Single choice rendered as radio buttons (`govukRadios`).
    Radios,
    /// Boolean rendered as an inline Yes/No radio pair.
    YesNo,
    /// Single choice rendered as a dropdown (`govukSelect`).
    Select,
    /// Multiple choice (`govukCheckboxes`).
    Checkboxes,
    /// Day/month/year input (`govukDateInput`).
    DateInput,
    /// File upload (`govukFileUpload`).
    FileUpload,
    /// Literal markup taken from the schema description.
    Content,
    /// Check-your-answers page built from a summary structure.
    Summary,
    /// Task-list page built from sections of tasks.
    TaskList,
    /// Object with `properties` - a page of fields.
    Form,
    /// Object with `allOf` - a multi-group page.
    AllOf,
}

impl FieldKind {
    /// Parse an explicit component name from a UI schema entry.
    ///
    /// Returns `None` for unknown names (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text-input" => Some(FieldKind::TextInput),
            "textarea" => Some(FieldKind::Textarea),
            "radios" => Some(FieldKind::Radios),
            "yes-no" => Some(FieldKind::YesNo),
            "select" => Some(FieldKind::Select),
            "checkboxes" => Some(FieldKind::Checkboxes),
            "date-input" => Some(FieldKind::DateInput),
            "file-upload" => Some(FieldKind::FileUpload),
            "content" => Some(FieldKind::Content),
            "summary-list" => Some(FieldKind::Summary),
            "task-list" => Some(FieldKind::TaskList),
            "form" => Some(FieldKind::Form),
            _ => None,
        }
    }

    /// The UI schema name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::TextInput => "text-input",
            FieldKind::Textarea => "textarea",
            FieldKind::Radios => "radios",
            FieldKind::YesNo => "yes-no",
            FieldKind::Select => "select",
            FieldKind::Checkboxes => "checkboxes",
            FieldKind::DateInput => "date-input",
            FieldKind::FileUpload => "file-upload",
            FieldKind::Content => "content",
            FieldKind::Summary => "summary-list",
            FieldKind::TaskList => "task-list",
            FieldKind::Form => "form",
            FieldKind::AllOf => "form",
        }
    }
}
