//! Phone number rule
//!
//! Deliberately format-tolerant: a leading `+` country code and one
//! parenthesized area code are stripped, separators are ignored, and
//! only the national digit count is judged.

use std::any::Any;

use serde_json::Value;

use crate::foundation::prelude::*;

const DEFAULT_MIN_DIGITS: usize = 7;
const MAX_DIGITS: usize = 15;

/// Validates phone numbers by national digit count.
#[derive(Debug, Clone)]
pub struct PhoneRule {
    fields: FieldList,
    min: usize,
}

impl Default for PhoneRule {
    fn default() -> Self {
        Self {
            fields: FieldList::new(),
            min: DEFAULT_MIN_DIGITS,
        }
    }
}

/// Counts national digits, or `None` when the text contains characters
/// outside digits/space/`-`/`.`/one balanced parenthesized group.
fn national_digit_count(text: &str) -> Option<usize> {
    let mut digits = 0usize;
    let mut inside_parens = false;
    let mut seen_parens = false;
    for c in text.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' => {}
            '(' => {
                if seen_parens || inside_parens {
                    return None;
                }
                inside_parens = true;
                seen_parens = true;
            }
            ')' => {
                if !inside_parens {
                    return None;
                }
                inside_parens = false;
            }
            _ => return None,
        }
    }
    if inside_parens { None } else { Some(digits) }
}

impl Rule for PhoneRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        self.min = spec.usize_option("min", DEFAULT_MIN_DIGITS)?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        let Some(text) = value_as_text(value) else {
            return Err(Violation::Broadcast(Message::new(
                "phone",
                "Must be a valid phone number",
            )));
        };
        let mut national = text.trim();

        // Country code: `+` followed by 1-3 digits, not counted.
        if let Some(rest) = national.strip_prefix('+') {
            let code_len = rest.bytes().take_while(u8::is_ascii_digit).count();
            if !(1..=3).contains(&code_len) {
                return Err(Violation::Broadcast(Message::new(
                    "phone",
                    "Must be a valid phone number",
                )));
            }
            national = rest[code_len..].trim_start_matches([' ', '-', '.']);
        }

        match national_digit_count(national) {
            None => Err(Violation::Broadcast(Message::new(
                "phone_chars",
                "Contains characters that are not allowed in a phone number",
            ))),
            Some(digits) if digits < self.min || digits > MAX_DIGITS => {
                Err(Violation::Broadcast(Message::new(
                    "phone_digits",
                    format!("Must contain between {} and {MAX_DIGITS} digits", self.min),
                )))
            }
            Some(_) => Ok(()),
        }
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
