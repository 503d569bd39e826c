//! String length rule
//!
//! Length is measured in Unicode scalar values, so multibyte text is
//! counted the way users perceive it, not by bytes.

use std::any::Any;

use serde_json::Value;

use crate::foundation::prelude::*;

/// Validates that text length falls within `[min, max]`.
#[derive(Debug, Clone, Default)]
pub struct LengthRule {
    fields: FieldList,
    min: usize,
    max: Option<usize>,
}

impl LengthRule {
    /// Builds an unbound template with explicit bounds.
    #[must_use]
    pub fn new(min: usize, max: Option<usize>) -> Self {
        Self {
            fields: FieldList::new(),
            min,
            max,
        }
    }
}

pub(crate) fn min_message(min: usize) -> Message {
    Message::new(
        "length_min",
        format!("Shorter than minimum allowed length of {min}"),
    )
}

pub(crate) fn max_message(max: usize) -> Message {
    Message::new(
        "length_max",
        format!("Longer than maximum allowed length of {max}"),
    )
}

impl Rule for LengthRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        self.min = spec.usize_option("min", 0)?;
        self.max = spec.opt_usize_option("max")?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        let Some(text) = value_as_text(value) else {
            return Err(Violation::Broadcast(Message::new(
                "length",
                "Must be a text value",
            )));
        };
        let len = text.chars().count();
        if len < self.min {
            return Err(Violation::Broadcast(min_message(self.min)));
        }
        if let Some(max) = self.max {
            if len > max {
                return Err(Violation::Broadcast(max_message(max)));
            }
        }
        Ok(())
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(min: usize, max: Option<usize>) -> LengthRule {
        let mut rule = LengthRule::default();
        let mut entry = vec![json!("f")];
        let mut options = serde_json::Map::new();
        options.insert("min".into(), json!(min));
        if let Some(max) = max {
            options.insert("max".into(), json!(max));
        }
        entry.push(Value::Object(options));
        rule.parse(&RuleSpec::from_entry("length", &Value::Array(entry)).unwrap())
            .unwrap();
        rule
    }

    #[test]
    fn boundaries_pass() {
        let rule = rule(2, Some(4));
        assert!(rule.validate_one("f", &json!("ab")).is_ok());
        assert!(rule.validate_one("f", &json!("abcd")).is_ok());
    }

    #[test]
    fn outside_boundaries_fail() {
        let rule = rule(2, Some(4));
        assert!(rule.validate_one("f", &json!("a")).is_err());
        assert!(rule.validate_one("f", &json!("abcde")).is_err());
    }

    #[test]
    fn max_message_text() {
        let rule = rule(1, Some(3));
        let Err(Violation::Broadcast(message)) = rule.validate_one("f", &json!("abcd")) else {
            panic!("expected failure");
        };
        assert_eq!(message.text, "Longer than maximum allowed length of 3");
    }

    #[test]
    fn multibyte_counts_chars_not_bytes() {
        let rule = rule(0, Some(5));
        // 5 chars, more than 5 bytes
        assert!(rule.validate_one("f", &json!("héllo")).is_ok());
    }

    #[test]
    fn numbers_are_measured_as_text() {
        let rule = rule(0, Some(3));
        assert!(rule.validate_one("f", &json!(123)).is_ok());
        assert!(rule.validate_one("f", &json!(1234)).is_err());
    }

    #[test]
    fn non_text_is_rejected() {
        let rule = rule(0, None);
        assert!(rule.validate_one("f", &json!([1, 2])).is_err());
    }

    #[test]
    fn no_max_means_unbounded() {
        let rule = rule(1, None);
        assert!(rule.validate_one("f", &json!("a".repeat(10_000))).is_ok());
    }
}
