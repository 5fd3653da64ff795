//! Schema-driven generation of GOV.UK form markup.
//!
//! This library transforms a JSON Schema form description, plus a parallel
//! "UI schema" of per-field rendering hints, into GOV.UK Frontend template
//! markup: Nunjucks component invocations and literal HTML, threaded
//! through with stored answers, validation errors, and ordering rules.
//!
//! The engine is a pure, synchronous function over its inputs: no I/O, no
//! shared state outside one call's accumulator, byte-identical output for
//! identical inputs.
//!
//! # Example
//!
//! ```
//! use govform::{render_page, NoLookup, TransformContext};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "title": "Event details",
//!     "properties": {
//!         "eventName": {
//!             "type": "string",
//!             "title": "Event name",
//!             "description": "The name shown on the public listing"
//!         }
//!     }
//! });
//! let ui = json!({});
//! let data = json!({});
//! let errors = json!({});
//!
//! let ctx = TransformContext::new(&data, &errors, &ui, &NoLookup);
//! let page = render_page("event", &schema, &ctx).unwrap();
//!
//! assert!(page.markup.contains("{{ govukInput("));
//! assert_eq!(page.page_title.as_deref(), Some("Event name - GOV.UK"));
//! ```
//!
//! # Dispatch
//!
//! | Schema shape | Transformer |
//! |--------------|-------------|
//! | `string`/`integer`, `maxLength >= 500` | character count |
//! | `string`/`integer` with `oneOf` (< 20 options) | radios |
//! | `string`/`integer` with `oneOf` (20+) | select |
//! | `string` with `format: date-time` | date input |
//! | `string`/`integer` otherwise | text input |
//! | `array` | checkboxes |
//! | `boolean` | inline Yes/No radios |
//! | `object` with `allOf` | multi-group page |
//! | `object` with `properties` | form page |
//! | no type, `summaryInfo` | check-your-answers page |
//! | no type, `taskListSections` | task list |
//! | no type, `description` | literal content |
//!
//! An explicit `component` name in a UI schema entry overrides all of the
//! above. Anything else is a configuration error.

mod answers;
mod composite;
mod dates;
mod descriptor;
mod dispatch;
mod emit;
mod error;
mod fields;
mod html;
mod merge;
mod summary;
mod types;
mod value;

pub use answers::{format_answer, summary_index, AnswerLookup, NoLookup, SummaryEntry};
pub use dates::{format_date, is_valid_date, parse_date, DateParts};
pub use descriptor::{Binding, Body, TransformContext, TransformSet, Transformation};
pub use dispatch::{render_page, resolve_field_kind, transform, RenderedPage};
pub use emit::{block_name, render_call, render_transformation, render_value, sanitize_identifier};
pub use error::TransformError;
pub use fields::{
    AdditionalItem, CheckboxesOptions, ChoiceOptions, ConditionalMapping, DateInputOptions,
    DatePartsShown, FileUploadOptions, SelectOptions, TextInputOptions, TextareaOptions,
};
pub use html::{contains_html, import_line, scan_dependencies};
pub use merge::{deep_merge, merge_json};
pub use summary::{SummaryOptions, TaskListOptions};
pub use types::FieldKind;
pub use value::{MacroObject, MacroValue};

pub use composite::FormOptions;
