//! Password strength rule

use std::any::Any;

use serde_json::Value;

use crate::foundation::prelude::*;

const DEFAULT_MIN: usize = 8;

/// Validates minimum length plus character-class coverage: at least one
/// lowercase letter, one uppercase letter, and one digit.
#[derive(Debug, Clone)]
pub struct PasswordRule {
    fields: FieldList,
    min: usize,
}

impl Default for PasswordRule {
    fn default() -> Self {
        Self {
            fields: FieldList::new(),
            min: DEFAULT_MIN,
        }
    }
}

fn password_message(min: usize) -> Message {
    Message::new(
        "password",
        format!("Must be at least {min} characters with lowercase, uppercase and numeric characters"),
    )
}

impl Rule for PasswordRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        self.min = spec.usize_option("min", DEFAULT_MIN)?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        let Some(text) = value_as_text(value) else {
            return Err(Violation::Broadcast(password_message(self.min)));
        };
        let long_enough = text.chars().count() >= self.min;
        let has_lower = text.chars().any(char::is_lowercase);
        let has_upper = text.chars().any(char::is_uppercase);
        let has_digit = text.chars().any(|c| c.is_ascii_digit());
        if long_enough && has_lower && has_upper && has_digit {
            Ok(())
        } else {
            Err(Violation::Broadcast(password_message(self.min)))
        }
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
