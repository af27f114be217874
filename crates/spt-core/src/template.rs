//! `{{token}}` placeholder substitution for message templates.

use crate::models::{FilledMessage, MessageTemplate, Replacements};

/// Fill every `{{key}}` in the template's subject and body.
///
/// Subject and body are each scanned once; inserted values are never scanned
/// again. Tokens whose key is absent from `replacements` stay verbatim; a key
/// present with `None` expands to the empty string.
pub fn fill_template(template: &MessageTemplate, replacements: &Replacements) -> FilledMessage {
    FilledMessage {
        subject: fill_text(&template.subject, replacements),
        body: fill_text(&template.body, replacements),
        is_html: template.is_html,
    }
}

fn fill_text(text: &str, replacements: &Replacements) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);

        match replacements.get(&after[..end]) {
            Some(value) => {
                out.push_str(value.as_deref().unwrap_or(""));
                rest = &after[end + 2..];
            }
            None => {
                // Not a known token; keep one brace and rescan from the next
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replacements(pairs: &[(&str, Option<&str>)]) -> Replacements {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_fills_subject_and_body() {
        let template = MessageTemplate::new("t", "Hi {{name}}", "Role: {{role}}");
        let filled = fill_template(
            &template,
            &replacements(&[("name", Some("Ana")), ("role", Some("Chair"))]),
        );
        assert_eq!(filled.subject, "Hi Ana");
        assert_eq!(filled.body, "Role: Chair");
    }

    #[test]
    fn test_absent_key_leaves_token_verbatim() {
        let template = MessageTemplate::new("t", "Hi {{name}}", "Round {{round}} on {{date}}");
        let filled = fill_template(&template, &replacements(&[("name", Some("Ana"))]));
        assert_eq!(filled.subject, "Hi Ana");
        assert_eq!(filled.body, "Round {{round}} on {{date}}");
    }

    #[test]
    fn test_null_value_expands_to_empty_string() {
        let template = MessageTemplate::new("t", "Hi {{name}}!", "{{note}}done");
        let filled = fill_template(&template, &replacements(&[("name", None), ("note", None)]));
        assert_eq!(filled.subject, "Hi !");
        assert_eq!(filled.body, "done");
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let template = MessageTemplate::new("t", "{{x}}", "{{x}} and {{x}}");
        let filled = fill_template(&template, &replacements(&[("x", Some("y"))]));
        assert_eq!(filled.subject, "y");
        assert_eq!(filled.body, "y and y");
    }

    #[test]
    fn test_single_braces_are_not_tokens() {
        let template = MessageTemplate::new("t", "{name}", "{{ name }}");
        let filled = fill_template(&template, &replacements(&[("name", Some("Ana"))]));
        assert_eq!(filled.subject, "{name}");
        assert_eq!(filled.body, "{{ name }}");
    }

    #[test]
    fn test_inserted_values_are_not_expanded_again() {
        let template = MessageTemplate::new("t", "{{a}}", "{{b}} then {{a}}");
        let filled = fill_template(
            &template,
            &replacements(&[("a", Some("{{b}}")), ("b", Some("X"))]),
        );
        assert_eq!(filled.subject, "{{b}}");
        assert_eq!(filled.body, "X then {{b}}");
    }

    #[test]
    fn test_extra_braces_around_token() {
        let template = MessageTemplate::new("t", "{{{name}}}", "{{ {{name}}");
        let filled = fill_template(&template, &replacements(&[("name", Some("Ana"))]));
        assert_eq!(filled.subject, "{Ana}");
        assert_eq!(filled.body, "{{ Ana");
    }

    #[test]
    fn test_unterminated_token_is_kept() {
        let template = MessageTemplate::new("t", "Hi {{name", "{{name}} {{");
        let filled = fill_template(&template, &replacements(&[("name", Some("Ana"))]));
        assert_eq!(filled.subject, "Hi {{name");
        assert_eq!(filled.body, "Ana {{");
    }

    #[test]
    fn test_keeps_html_flag() {
        let template = MessageTemplate::new("t", "s", "b").plain_text();
        assert!(!fill_template(&template, &Replacements::new()).is_html);
    }
}
