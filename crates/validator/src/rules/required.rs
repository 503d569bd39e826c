//! The required rule
//!
//! Required-ness gates every other check: the engine evaluates it through
//! a dedicated step rather than the generic per-rule loop, and non-required
//! rules skip empty values by contract, so an empty required field only
//! ever yields the one `required` error.

use std::any::Any;

use crate::foundation::prelude::*;

/// Flags bound fields that are missing or empty.
#[derive(Debug, Clone, Default)]
pub struct RequiredRule {
    fields: FieldList,
}

impl RequiredRule {
    /// Builds an instance bound to the given fields directly.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for RequiredRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    // Mirrors the engine's dedicated step so direct use behaves the same.
    fn validate(&self, record: &dyn Record) -> Result<(), Violation> {
        let mut errors = FieldErrors::new();
        check_required_fields(&self.fields, record, &mut errors);
        match errors.into_violation() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The required step: appends the required message for every missing or
/// empty field. Shared by the engine and the tag-driven validator.
pub(crate) fn check_required_fields(
    fields: &[String],
    record: &dyn Record,
    errors: &mut FieldErrors,
) {
    for field in fields {
        let empty = match record.get(field) {
            None => true,
            Some(value) => is_empty_value(value),
        };
        if empty {
            errors.push(field.clone(), Message::required());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(fields: &[&str]) -> RequiredRule {
        RequiredRule::new(fields.iter().copied())
    }

    #[test]
    fn missing_field_is_flagged() {
        let data = json!({});
        let Err(Violation::PerField(errors)) = rule(&["f"]).validate(&data) else {
            panic!("expected failure");
        };
        let messages = errors.get("f").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].code, "required");
        assert_eq!(messages[0].text, "This field is required");
    }

    #[test]
    fn empty_shapes_are_flagged() {
        for value in [json!(""), json!([]), json!(null)] {
            let data = json!({ "f": value });
            assert!(rule(&["f"]).validate(&data).is_err(), "value {value} should be empty");
        }
    }

    #[test]
    fn numeric_zero_is_present() {
        for value in [json!(0), json!("0")] {
            let data = json!({ "f": value });
            assert!(rule(&["f"]).validate(&data).is_ok(), "value {value} should count as present");
        }
    }

    #[test]
    fn multiple_fields_flag_independently() {
        let data = json!({"a": "x"});
        let Err(Violation::PerField(errors)) = rule(&["a", "b", "c"]).validate(&data) else {
            panic!("expected failure");
        };
        assert!(errors.get("a").is_none());
        assert!(errors.get("b").is_some());
        assert!(errors.get("c").is_some());
    }

    #[test]
    fn derived_name() {
        assert_eq!(RequiredRule::default().name(), "required");
    }
}
