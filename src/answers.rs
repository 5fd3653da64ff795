//! Formatting stored answers for display and check-your-answers pages.

use serde_json::Value;

use crate::dates;

/// Lookup seam for externally maintained answer tables.
///
/// The real tables (canned answer labels, police force names) live outside
/// this crate; transformers only ever consume this interface.
pub trait AnswerLookup {
    /// Display label for a coded enumerated answer.
    fn answer_label(&self, code: &str) -> Option<String>;

    /// Display name for a police force index.
    fn police_force(&self, index: u64) -> Option<String>;
}

/// Lookup that resolves nothing; codes and indices display verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl AnswerLookup for NoLookup {
    fn answer_label(&self, _code: &str) -> Option<String> {
        None
    }

    fn police_force(&self, _index: u64) -> Option<String> {
        None
    }
}

/// One entry of the summary index: a change-link target and the formatted
/// display value for a form section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub href: String,
    pub value: String,
}

/// Prefix stripped from section keys when deriving change-link targets.
const SECTION_PREFIX: &str = "section-";

/// Query string appended to change links so the form returns to the summary.
const CONTINUE_QUERY: &str = "?continue=true";

/// Convert a raw stored answer into a display string.
///
/// Booleans map to Yes/No, stored timestamps to display dates, coded
/// strings through the label table, numbers through the police force table,
/// and arrays to their formatted elements joined with line breaks. The
/// result may contain markup and is consumed through `html` option fields.
pub fn format_answer(value: &Value, lookup: &dyn AnswerLookup) -> String {
    match value {
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::String(s) if dates::is_valid_date(s) => {
            dates::format_date(s).unwrap_or_else(|| s.clone())
        }
        Value::String(s) => lookup.answer_label(s).unwrap_or_else(|| s.clone()),
        Value::Number(n) => n
            .as_u64()
            .and_then(|i| lookup.police_force(i))
            .unwrap_or_else(|| n.to_string()),
        Value::Array(items) => items
            .iter()
            .map(|item| format_answer(item, lookup))
            .collect::<Vec<_>>()
            .join("<br />"),
        _ => String::new(),
    }
}

/// Build the summary index: section key to change link and formatted value,
/// in the answer data's own key order.
pub fn summary_index(data: &Value, lookup: &dyn AnswerLookup) -> Vec<(String, SummaryEntry)> {
    let Some(map) = data.as_object() else {
        return Vec::new();
    };

    map.iter()
        .map(|(key, value)| {
            let page = key.strip_prefix(SECTION_PREFIX).unwrap_or(key);
            let entry = SummaryEntry {
                href: format!("/{page}{CONTINUE_QUERY}"),
                value: format_answer(value, lookup),
            };
            (key.clone(), entry)
        })
        .collect()
}
