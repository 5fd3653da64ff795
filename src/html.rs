//! Detection of HTML fragments and embedded component calls.

use std::sync::OnceLock;

use regex::Regex;

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"</?[A-Za-z][^>]*>").unwrap())
}

fn component_call_regex() -> &'static Regex {
    static CALL: OnceLock<Regex> = OnceLock::new();
    CALL.get_or_init(|| Regex::new(r"govuk([A-Z][A-Za-z0-9]*)\(").unwrap())
}

/// Returns true when the fragment contains HTML markup.
///
/// Entity-escaped text (`&lt;p&gt;`) carries no literal tags and is treated
/// as plain text. Used to decide between `text` and `html` option fields.
pub fn contains_html(s: &str) -> bool {
    tag_regex().is_match(s)
}

/// Import statement for a GOV.UK component macro.
///
/// `govukCharacterCount` imports from
/// `govuk/components/character-count/macro.njk`.
pub fn import_line(component: &str) -> String {
    let stem = component.strip_prefix("govuk").unwrap_or(component);
    format!(
        "{{% from \"govuk/components/{}/macro.njk\" import {} %}}",
        kebab_case(stem),
        component
    )
}

/// Scan literal markup for embedded `govuk<Name>(` component calls and
/// return the import lines they need, deduplicated in first-seen order.
///
/// Raw content is passed through verbatim, so this is the only way its
/// component usage surfaces in the emitted import block.
pub fn scan_dependencies(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for capture in component_call_regex().captures_iter(content) {
        let line = import_line(&format!("govuk{}", &capture[1]));
        if !lines.contains(&line) {
            lines.push(line);
        }
    }
    lines
}

fn kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_html() {
        assert!(!contains_html("Event name"));
        assert!(!contains_html("a < b and b > c"));
        assert!(!contains_html(""));
    }

    #[test]
    fn entity_escaped_text_is_not_html() {
        assert!(!contains_html("&lt;p&gt;escaped&lt;/p&gt;"));
    }

    #[test]
    fn tags_are_html() {
        assert!(contains_html("<p>hello</p>"));
        assert!(contains_html("line<br />break"));
        assert!(contains_html("<a href=\"/start\">Start</a>"));
        assert!(contains_html("</span>"));
    }

    #[test]
    fn import_line_kebab_cases_the_component_path() {
        assert_eq!(
            import_line("govukInput"),
            "{% from \"govuk/components/input/macro.njk\" import govukInput %}"
        );
        assert_eq!(
            import_line("govukCharacterCount"),
            "{% from \"govuk/components/character-count/macro.njk\" import govukCharacterCount %}"
        );
        assert_eq!(
            import_line("govukErrorSummary"),
            "{% from \"govuk/components/error-summary/macro.njk\" import govukErrorSummary %}"
        );
    }

    #[test]
    fn scan_finds_each_component_once_in_first_seen_order() {
        let content = "\
            {{ govukButton({\"text\": \"Start\"}) }}\n\
            {{ govukInput({\"id\": \"a\"}) }}\n\
            {{ govukButton({\"text\": \"Again\"}) }}";
        assert_eq!(
            scan_dependencies(content),
            vec![import_line("govukButton"), import_line("govukInput")]
        );
    }

    #[test]
    fn scan_ignores_plain_markup() {
        assert!(scan_dependencies("<p class=\"govuk-body\">No calls here</p>").is_empty());
    }
}
