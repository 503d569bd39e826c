//! Numeric rules: numeric strings, positive integers, binary flags, ranges

use std::any::Any;

use serde_json::Value;

use crate::foundation::prelude::*;

// ============================================================================
// NUMERIC PREDICATES
// ============================================================================

/// Numeric-string check: optional sign, digits with at most one decimal
/// point, optional exponent. Leading whitespace is tolerated, trailing is
/// not; `inf`/`NaN` spellings are rejected.
pub fn is_numeric_text(text: &str) -> bool {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_digits = count_digits(bytes, i);
    i += int_digits;

    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        frac_digits = count_digits(bytes, i);
        i += frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_digits = count_digits(bytes, i);
        if exp_digits == 0 {
            return false;
        }
        i += exp_digits;
    }

    i == bytes.len()
}

fn count_digits(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// A JSON number, or a string that satisfies [`is_numeric_text`].
pub fn is_numeric_value(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(text) => is_numeric_text(text),
        _ => false,
    }
}

/// Numeric interpretation of a value, if it has one.
pub(crate) fn numeric_value_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) if is_numeric_text(text) => text.trim_start().parse().ok(),
        _ => None,
    }
}

/// All-digit text (or integer number) with value greater than zero.
pub fn is_positive_int_value(value: &Value) -> bool {
    match value {
        Value::Number(number) => number.as_u64().is_some_and(|n| n > 0),
        Value::String(text) => {
            !text.is_empty()
                && text.bytes().all(|b| b.is_ascii_digit())
                && text.bytes().any(|b| b != b'0')
        }
        _ => false,
    }
}

/// Exactly `1`, `"1"`, `0`, or `"0"`. Booleans do not qualify.
pub fn is_binary_value(value: &Value) -> bool {
    match value {
        Value::Number(number) => number.as_u64().is_some_and(|n| n <= 1),
        Value::String(text) => text == "0" || text == "1",
        _ => false,
    }
}

pub(crate) fn numeric_message() -> Message {
    Message::new("numeric", "Must be a number")
}

pub(crate) fn positive_int_message() -> Message {
    Message::new("positive_int", "Must be a positive whole number")
}

pub(crate) fn binary_message() -> Message {
    Message::new("binary", "Must be 0 or 1")
}

// ============================================================================
// NUMERIC RULE
// ============================================================================

/// Validates that a value is numeric.
#[derive(Debug, Clone, Default)]
pub struct NumericRule {
    fields: FieldList,
}

impl Rule for NumericRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        if is_numeric_value(value) {
            Ok(())
        } else {
            Err(Violation::Broadcast(numeric_message()))
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
// POSITIVE INT RULE
// ============================================================================

/// Validates positive whole numbers.
#[derive(Debug, Clone, Default)]
pub struct PositiveIntRule {
    fields: FieldList,
}

impl Rule for PositiveIntRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        if is_positive_int_value(value) {
            Ok(())
        } else {
            Err(Violation::Broadcast(positive_int_message()))
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
// BINARY RULE
// ============================================================================

/// Validates two-state flags stored as 0/1.
#[derive(Debug, Clone, Default)]
pub struct BinaryRule {
    fields: FieldList,
}

impl Rule for BinaryRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        if is_binary_value(value) {
            Ok(())
        } else {
            Err(Violation::Broadcast(binary_message()))
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
// RANGE RULE
// ============================================================================

/// Validates that a numeric value lies within `[min, max]` inclusive.
///
/// Configured through a `between` option that must supply exactly two
/// numeric bounds.
#[derive(Debug, Clone, Default)]
pub struct RangeRule {
    fields: FieldList,
    min: f64,
    max: f64,
}

impl Rule for RangeRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        let between = spec.require_values("between")?;
        if between.len() != 2 {
            return Err(spec.invalid_option("between", "must supply exactly 2 values"));
        }
        let min = numeric_value_of(&between[0])
            .ok_or_else(|| spec.invalid_option("between", "bounds must be numeric"))?;
        let max = numeric_value_of(&between[1])
            .ok_or_else(|| spec.invalid_option("between", "bounds must be numeric"))?;
        if min > max {
            return Err(spec.invalid_option("between", "lower bound is greater than upper bound"));
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        let Some(number) = numeric_value_of(value) else {
            return Err(Violation::Broadcast(Message::new("range", "Must be a number")));
        };
        if number < self.min || number > self.max {
            // f64 Display renders whole bounds without a decimal point
            return Err(Violation::Broadcast(Message::new(
                "range",
                format!("Must be between {} and {}", self.min, self.max),
            )));
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

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_text_shapes() {
        assert!(is_numeric_text("42"));
        assert!(is_numeric_text("-3.5"));
        assert!(is_numeric_text("+0.5"));
        assert!(is_numeric_text(".5"));
        assert!(is_numeric_text("1e10"));
        assert!(is_numeric_text("2.5E-3"));
        assert!(is_numeric_text("  7"));
    }

    #[test]
    fn non_numeric_text_shapes() {
        assert!(!is_numeric_text(""));
        assert!(!is_numeric_text("abc"));
        assert!(!is_numeric_text("1.2.3"));
        assert!(!is_numeric_text("1e"));
        assert!(!is_numeric_text("7 "));
        assert!(!is_numeric_text("inf"));
        assert!(!is_numeric_text("NaN"));
        assert!(!is_numeric_text("0x1A"));
    }

    #[test]
    fn positive_int_values() {
        assert!(is_positive_int_value(&json!("7")));
        assert!(is_positive_int_value(&json!("007")));
        assert!(is_positive_int_value(&json!(7)));
        assert!(!is_positive_int_value(&json!("0")));
        assert!(!is_positive_int_value(&json!(0)));
        assert!(!is_positive_int_value(&json!(-3)));
        assert!(!is_positive_int_value(&json!("3.5")));
        assert!(!is_positive_int_value(&json!("12a")));
    }

    #[test]
    fn binary_values() {
        assert!(is_binary_value(&json!(0)));
        assert!(is_binary_value(&json!(1)));
        assert!(is_binary_value(&json!("0")));
        assert!(is_binary_value(&json!("1")));
        assert!(!is_binary_value(&json!(2)));
        assert!(!is_binary_value(&json!("01")));
        assert!(!is_binary_value(&json!(true)));
    }

    fn range_rule(min: i64, max: i64) -> RangeRule {
        let mut rule = RangeRule::default();
        rule.parse(
            &RuleSpec::from_entry("range", &json!(["f", {"between": [min, max]}])).unwrap(),
        )
        .unwrap();
        rule
    }

    #[test]
    fn range_boundaries_pass() {
        let rule = range_rule(0, 5000);
        assert!(rule.validate_one("f", &json!(0)).is_ok());
        assert!(rule.validate_one("f", &json!(5000)).is_ok());
        assert!(rule.validate_one("f", &json!("2500")).is_ok());
    }

    #[test]
    fn range_outside_boundaries_fails() {
        let rule = range_rule(0, 5000);
        assert!(rule.validate_one("f", &json!(-1)).is_err());
        assert!(rule.validate_one("f", &json!(5001)).is_err());
    }

    #[test]
    fn range_non_numeric_message() {
        let rule = range_rule(0, 5000);
        let Err(Violation::Broadcast(message)) = rule.validate_one("f", &json!("abc")) else {
            panic!("expected failure");
        };
        assert_eq!(message.text, "Must be a number");
    }

    #[test]
    fn range_message_names_bounds() {
        let rule = range_rule(0, 5000);
        let Err(Violation::Broadcast(message)) = rule.validate_one("f", &json!(9999)) else {
            panic!("expected failure");
        };
        assert_eq!(message.text, "Must be between 0 and 5000");
    }

    #[test]
    fn range_requires_exactly_two_bounds() {
        let mut rule = RangeRule::default();
        let spec = RuleSpec::from_entry("range", &json!(["f", {"between": [1]}])).unwrap();
        assert!(matches!(
            rule.parse(&spec),
            Err(RulesetError::InvalidOption { .. })
        ));

        let spec = RuleSpec::from_entry("range", &json!(["f", {"between": [1, 2, 3]}])).unwrap();
        assert!(rule.parse(&spec).is_err());
    }

    #[test]
    fn range_requires_between() {
        let mut rule = RangeRule::default();
        let spec = RuleSpec::from_entry("range", &json!(["f"])).unwrap();
        assert!(matches!(
            rule.parse(&spec),
            Err(RulesetError::MissingOption { .. })
        ));
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        let mut rule = RangeRule::default();
        let spec = RuleSpec::from_entry("range", &json!(["f", {"between": [10, 1]}])).unwrap();
        assert!(rule.parse(&spec).is_err());
    }
}
