//! Transformation descriptors and the per-call build context.

use serde_json::Value;

use crate::answers::AnswerLookup;
use crate::value::MacroValue;

static NULL: Value = Value::Null;

/// What a transformer produced for one schema node: a component macro call
/// or literal markup, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A component call, rendered as `{{ name({...}) }}`.
    Macro { name: String, options: MacroValue },
    /// Literal markup, passed through verbatim.
    Content(String),
}

/// A named `{% set %}` block that a descriptor's options reference through
/// [`MacroValue::Block`].
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub body: Body,
}

/// The result of transforming one schema node.
///
/// Descriptors are transient: built fresh per transform call and never
/// mutated after construction, except by the owning transformer's own
/// merge-with-overrides step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    /// Schema key this descriptor was built for.
    pub id: String,
    /// Import lines the rendered output needs, first-seen order.
    pub dependencies: Vec<String>,
    /// Macro call or literal content.
    pub body: Body,
    /// Set-blocks that must render before the body.
    pub bindings: Vec<Binding>,
    /// Title this node reports for page-title derivation.
    pub page_title: Option<String>,
    /// Validation message rendered into this node, when the caller supplied
    /// one for its key.
    pub error_message: Option<String>,
    /// Whether this node or anything beneath it rendered an error.
    pub has_errors: bool,
    /// Error-summary link target override (multi-part fields such as dates).
    pub error_summary_href: Option<String>,
}

impl Transformation {
    pub fn new(id: impl Into<String>, body: Body) -> Self {
        Self {
            id: id.into(),
            dependencies: Vec::new(),
            body,
            bindings: Vec::new(),
            page_title: None,
            error_message: None,
            has_errors: false,
            error_summary_href: None,
        }
    }
}

/// Insertion-ordered accumulator of descriptors within one transform call.
///
/// Later transforms look up earlier siblings by id to wire conditional
/// reveals, so processing order is the author's contract, not an
/// implementation detail. One set lives exactly as long as one top-level
/// transform call.
#[derive(Debug, Default)]
pub struct TransformSet {
    entries: Vec<Transformation>,
}

impl TransformSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a descriptor. A descriptor with an id already in the set
    /// replaces the earlier one in place.
    pub fn insert(&mut self, transformation: Transformation) {
        match self.entries.iter_mut().find(|t| t.id == transformation.id) {
            Some(slot) => *slot = transformation,
            None => self.entries.push(transformation),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Transformation> {
        self.entries.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transformation> {
        self.entries.iter()
    }
}

/// Read-only inputs shared by every transformer within one call.
///
/// The caller owns these values and must not mutate them for the duration
/// of the call; transformers treat them as read-only.
pub struct TransformContext<'a> {
    /// Stored answers keyed by field key.
    pub data: &'a Value,
    /// Caller-supplied validation messages keyed by field key.
    pub schema_errors: &'a Value,
    /// The full UI schema tree, keyed by field key.
    pub ui_schema: &'a Value,
    /// External answer tables.
    pub lookup: &'a dyn AnswerLookup,
}

impl<'a> TransformContext<'a> {
    pub fn new(
        data: &'a Value,
        schema_errors: &'a Value,
        ui_schema: &'a Value,
        lookup: &'a dyn AnswerLookup,
    ) -> Self {
        Self {
            data,
            schema_errors,
            ui_schema,
            lookup,
        }
    }

    /// UI schema entry for a field key; `Null` when absent.
    pub fn ui_entry(&self, key: &str) -> &'a Value {
        self.ui_schema.get(key).unwrap_or(&NULL)
    }

    /// Stored answer for a field key.
    pub fn answer(&self, key: &str) -> Option<&'a Value> {
        self.data.get(key)
    }

    /// Validation message for a field key. Accepts a bare string or an
    /// object carrying `text`.
    pub fn error_for(&self, key: &str) -> Option<&'a str> {
        let entry = self.schema_errors.get(key)?;
        entry
            .as_str()
            .or_else(|| entry.get("text").and_then(Value::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::NoLookup;
    use serde_json::json;

    fn content(id: &str) -> Transformation {
        Transformation::new(id, Body::Content(String::new()))
    }

    #[test]
    fn set_preserves_insertion_order() {
        let mut set = TransformSet::new();
        set.insert(content("email"));
        set.insert(content("phone"));
        set.insert(content("contact"));

        let ids: Vec<&str> = set.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["email", "phone", "contact"]);
        assert!(set.get("phone").is_some());
        assert!(set.get("address").is_none());
    }

    #[test]
    fn set_replaces_same_id_in_place() {
        let mut set = TransformSet::new();
        set.insert(content("email"));
        set.insert(content("phone"));

        let mut replacement = content("email");
        replacement.has_errors = true;
        set.insert(replacement);

        assert_eq!(set.len(), 2);
        let ids: Vec<&str> = set.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["email", "phone"]);
        assert!(set.get("email").unwrap().has_errors);
    }

    #[test]
    fn context_reads_errors_in_both_shapes() {
        let data = json!({});
        let errors = json!({
            "eventName": "Enter the event name",
            "eventDate": {"text": "Enter the event date"}
        });
        let ui = json!({});
        let ctx = TransformContext::new(&data, &errors, &ui, &NoLookup);

        assert_eq!(ctx.error_for("eventName"), Some("Enter the event name"));
        assert_eq!(ctx.error_for("eventDate"), Some("Enter the event date"));
        assert_eq!(ctx.error_for("other"), None);
    }

    #[test]
    fn context_ui_entry_is_null_when_absent() {
        let data = json!({});
        let errors = json!({});
        let ui = json!({"eventName": {"component": "textarea"}});
        let ctx = TransformContext::new(&data, &errors, &ui, &NoLookup);

        assert_eq!(
            ctx.ui_entry("eventName"),
            &json!({"component": "textarea"})
        );
        assert_eq!(ctx.ui_entry("missing"), &Value::Null);
    }
}
