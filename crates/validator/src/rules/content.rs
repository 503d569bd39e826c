//! Text content rules: email, prose text, user-supplied patterns

use std::any::Any;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::foundation::prelude::*;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@.]+\.[^@]+$").unwrap());

// ============================================================================
// EMAIL
// ============================================================================

/// Checks the overall shape and rejects runs of `@`/`.` that the
/// one-of-each regex cannot see (`a..b@x.com`, `a.@x.com`).
pub fn is_valid_email(text: &str) -> bool {
    if !EMAIL_REGEX.is_match(text) {
        return false;
    }
    let mut previous_was_separator = false;
    for c in text.chars() {
        let separator = c == '@' || c == '.';
        if separator && previous_was_separator {
            return false;
        }
        previous_was_separator = separator;
    }
    true
}

pub(crate) fn email_message() -> Message {
    Message::new("email", "Must be a valid email address")
}

/// Validates email address format.
#[derive(Debug, Clone, Default)]
pub struct EmailRule {
    fields: FieldList,
}

impl Rule for EmailRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        match value_as_text(value) {
            Some(text) if is_valid_email(&text) => Ok(()),
            _ => Err(Violation::Broadcast(email_message())),
        }
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// PROSE TEXT
// ============================================================================

const PROSE_PUNCTUATION: &str = "'\"/!?@#$%&():;.,-";

/// Letters, digits, whitespace, and a limited punctuation set.
pub fn is_prose_text(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_alphanumeric() || c.is_whitespace() || PROSE_PUNCTUATION.contains(c))
}

pub(crate) fn prose_message() -> Message {
    Message::new("prose_text", "Contains characters that are not allowed")
}

/// Validates free-form text against the prose character set.
#[derive(Debug, Clone, Default)]
pub struct ProseTextRule {
    fields: FieldList,
}

impl Rule for ProseTextRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        match value_as_text(value) {
            Some(text) if is_prose_text(&text) => Ok(()),
            _ => Err(Violation::Broadcast(prose_message())),
        }
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// REGEX
// ============================================================================

/// Validates text against a pattern supplied in the ruleset.
///
/// The pattern compiles at parse time, so a bad pattern is a
/// configuration error, never a per-record failure.
#[derive(Debug, Clone, Default)]
pub struct RegexRule {
    fields: FieldList,
    pattern: Option<Regex>,
}

impl Rule for RegexRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        let source = spec.require_str("pattern")?;
        let pattern = Regex::new(source).map_err(|source| RulesetError::Pattern {
            rule: self.name().into_owned(),
            source,
        })?;
        self.pattern = Some(pattern);
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        // Unparsed templates have nothing to check against.
        let Some(pattern) = &self.pattern else {
            return Ok(());
        };
        match value_as_text(value) {
            Some(text) if pattern.is_match(&text) => Ok(()),
            _ => Err(Violation::Broadcast(Message::new(
                "regex",
                "Does not match the expected format",
            ))),
        }
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_accepts_plain_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
    }

    #[test]
    fn email_rejects_malformed_shapes() {
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@example"));
    }

    #[test]
    fn email_rejects_consecutive_separators() {
        assert!(!is_valid_email("a..b@example.com"));
        assert!(!is_valid_email("a.@example.com"));
        assert!(!is_valid_email("a@@example.com"));
    }

    #[test]
    fn prose_allows_common_punctuation() {
        assert!(is_prose_text("Hello, world! (Really?) #1 & done; 50% \"sure\"."));
        assert!(is_prose_text("it's a/b - fine."));
    }

    #[test]
    fn prose_rejects_exotic_characters() {
        assert!(!is_prose_text("angle <brackets>"));
        assert!(!is_prose_text("back`tick"));
        assert!(!is_prose_text("pipe|char"));
    }

    #[test]
    fn prose_allows_unicode_letters() {
        assert!(is_prose_text("Zoë naïve café"));
    }

    #[test]
    fn regex_rule_requires_pattern() {
        let mut rule = RegexRule::default();
        let spec = RuleSpec::from_entry("regex", &json!(["code"])).unwrap();
        assert!(matches!(
            rule.parse(&spec),
            Err(RulesetError::MissingOption { .. })
        ));
    }

    #[test]
    fn regex_rule_rejects_bad_pattern_at_parse() {
        let mut rule = RegexRule::default();
        let spec = RuleSpec::from_entry("regex", &json!(["code", {"pattern": "("}])).unwrap();
        assert!(matches!(rule.parse(&spec), Err(RulesetError::Pattern { .. })));
    }

    #[test]
    fn regex_rule_matches() {
        let mut rule = RegexRule::default();
        let spec =
            RuleSpec::from_entry("regex", &json!(["code", {"pattern": r"^\d{3}-\d{4}$"}])).unwrap();
        rule.parse(&spec).unwrap();
        assert!(rule.validate_one("code", &json!("123-4567")).is_ok());
        assert!(rule.validate_one("code", &json!("1234567")).is_err());
    }

    #[test]
    fn email_rule_through_the_field_loop() {
        let mut rule = EmailRule::default();
        rule.parse(&RuleSpec::from_entry("email", &json!(["email"])).unwrap())
            .unwrap();
        assert!(rule.validate(&json!({"email": "user@example.com"})).is_ok());
        assert!(rule.validate(&json!({"email": ""})).is_ok()); // empty skips
        assert!(rule.validate(&json!({"email": "nope"})).is_err());
    }
}
