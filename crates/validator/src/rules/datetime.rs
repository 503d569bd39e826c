//! MySQL-style date and time rules
//!
//! Strict shape checks: `YYYY-MM-DD`, `HH:MM:SS`, and the two joined by a
//! single space. Ranges are checked per component (year 1900–2100, month
//! 1–12, day 1–31, hour 0–23, minute/second 0–59); calendar-aware day
//! validation is out of scope, matching the storage format being guarded.

use std::any::Any;
use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::foundation::prelude::*;

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());

static TIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2})$").unwrap());

// ============================================================================
// PREDICATES
// ============================================================================

/// `YYYY-MM-DD` with component range checks.
pub fn is_mysql_date(text: &str) -> bool {
    DATE_REGEX.captures(text).is_some_and(|captures| {
        let year: u32 = captures[1].parse().unwrap_or(0);
        let month: u32 = captures[2].parse().unwrap_or(0);
        let day: u32 = captures[3].parse().unwrap_or(0);
        (1900..=2100).contains(&year) && (1..=12).contains(&month) && (1..=31).contains(&day)
    })
}

/// `HH:MM:SS` with component range checks.
pub fn is_mysql_time(text: &str) -> bool {
    TIME_REGEX.captures(text).is_some_and(|captures| {
        let hour: u32 = captures[1].parse().unwrap_or(99);
        let minute: u32 = captures[2].parse().unwrap_or(99);
        let second: u32 = captures[3].parse().unwrap_or(99);
        hour <= 23 && minute <= 59 && second <= 59
    })
}

/// `YYYY-MM-DD HH:MM:SS`, both halves valid.
pub fn is_mysql_datetime(text: &str) -> bool {
    text.split_once(' ')
        .is_some_and(|(date, time)| is_mysql_date(date) && is_mysql_time(time))
}

pub(crate) fn date_message() -> Message {
    Message::new("date", "Must be a valid date in YYYY-MM-DD format")
}

fn time_message() -> Message {
    Message::new("time", "Must be a valid time in HH:MM:SS format")
}

fn datetime_message() -> Message {
    Message::new(
        "datetime",
        "Must be a valid datetime in YYYY-MM-DD HH:MM:SS format",
    )
}

// ============================================================================
// DATE / TIME / DATETIME RULES
// ============================================================================

/// Validates `YYYY-MM-DD` date strings.
#[derive(Debug, Clone, Default)]
pub struct DateMySqlRule {
    fields: FieldList,
}

impl Rule for DateMySqlRule {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("dateMySQL")
    }

    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        match value_as_text(value) {
            Some(text) if is_mysql_date(&text) => Ok(()),
            _ => Err(Violation::Broadcast(date_message())),
        }
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Validates `HH:MM:SS` time strings.
#[derive(Debug, Clone, Default)]
pub struct TimeMySqlRule {
    fields: FieldList,
}

impl Rule for TimeMySqlRule {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("timeMySQL")
    }

    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        match value_as_text(value) {
            Some(text) if is_mysql_time(&text) => Ok(()),
            _ => Err(Violation::Broadcast(time_message())),
        }
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Validates `YYYY-MM-DD HH:MM:SS` datetime strings.
#[derive(Debug, Clone, Default)]
pub struct DateTimeMySqlRule {
    fields: FieldList,
}

impl Rule for DateTimeMySqlRule {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("datetimeMySQL")
    }

    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        match value_as_text(value) {
            Some(text) if is_mysql_datetime(&text) => Ok(()),
            _ => Err(Violation::Broadcast(datetime_message())),
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
// DATE RANGE RULE
// ============================================================================

/// Validates a start/end date pair.
///
/// Binds exactly two fields. Each non-empty value must be a valid MySQL
/// date; unless `ordered` is disabled, the start must not be later than
/// the end. Optional `min`/`max` options bound both dates. `YYYY-MM-DD`
/// strings order correctly under plain lexicographic comparison, which is
/// what the comparisons below rely on.
#[derive(Debug, Clone)]
pub struct DateRangeRule {
    fields: FieldList,
    ordered: bool,
    min: Option<String>,
    max: Option<String>,
}

impl Default for DateRangeRule {
    fn default() -> Self {
        Self {
            fields: FieldList::new(),
            ordered: true,
            min: None,
            max: None,
        }
    }
}

impl Rule for DateRangeRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        if self.fields.len() != 2 {
            return Err(RulesetError::FieldCount {
                rule: self.name().into_owned(),
                expected: 2,
                actual: self.fields.len(),
            });
        }
        self.ordered = spec.bool_option("ordered", true)?;
        for (key, slot) in [("min", &mut self.min), ("max", &mut self.max)] {
            *slot = match spec.str_option(key)? {
                None => None,
                Some(bound) if is_mysql_date(bound) => Some(bound.to_string()),
                Some(_) => {
                    return Err(spec.invalid_option(key, "must be a YYYY-MM-DD date"));
                }
            };
        }
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate(&self, record: &dyn Record) -> Result<(), Violation> {
        let mut errors = FieldErrors::new();
        let mut dates: Vec<Option<&str>> = vec![None; self.fields.len()];

        for (index, field) in self.fields.iter().enumerate() {
            let Some(value) = record.get(field) else {
                continue;
            };
            if is_empty_value(value) {
                continue;
            }
            match value.as_str() {
                Some(text) if is_mysql_date(text) => {
                    if let Some(min) = &self.min {
                        if text < min.as_str() {
                            errors.push(
                                field.clone(),
                                Message::new(
                                    "date_range",
                                    format!("Must not be earlier than {min}"),
                                ),
                            );
                            continue;
                        }
                    }
                    if let Some(max) = &self.max {
                        if text > max.as_str() {
                            errors.push(
                                field.clone(),
                                Message::new("date_range", format!("Must not be later than {max}")),
                            );
                            continue;
                        }
                    }
                    dates[index] = Some(text);
                }
                _ => errors.push(field.clone(), date_message()),
            }
        }

        if self.ordered {
            if let (Some(start), Some(end)) = (dates[0], dates[1]) {
                if start > end {
                    let message =
                        Message::new("date_range", "Start date must not be later than end date");
                    for field in &self.fields {
                        errors.push(field.clone(), message.clone());
                    }
                }
            }
        }

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

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_dates() {
        assert!(is_mysql_date("2024-01-10"));
        assert!(is_mysql_date("1900-01-01"));
        assert!(is_mysql_date("2100-12-31"));
    }

    #[test]
    fn invalid_dates() {
        assert!(!is_mysql_date("1899-12-31")); // year below range
        assert!(!is_mysql_date("2101-01-01")); // year above range
        assert!(!is_mysql_date("2024-00-10")); // month 0
        assert!(!is_mysql_date("2024-13-10")); // month 13
        assert!(!is_mysql_date("2024-01-32")); // day 32
        assert!(!is_mysql_date("2024-1-10")); // missing zero-pad
        assert!(!is_mysql_date("2024/01/10"));
    }

    #[test]
    fn valid_times() {
        assert!(is_mysql_time("00:00:00"));
        assert!(is_mysql_time("23:59:59"));
    }

    #[test]
    fn invalid_times() {
        assert!(!is_mysql_time("24:00:00"));
        assert!(!is_mysql_time("12:60:00"));
        assert!(!is_mysql_time("12:00:60"));
        assert!(!is_mysql_time("12:00"));
    }

    #[test]
    fn datetime_needs_both_halves() {
        assert!(is_mysql_datetime("2024-01-10 12:30:00"));
        assert!(!is_mysql_datetime("2024-01-10"));
        assert!(!is_mysql_datetime("2024-01-10T12:30:00"));
        assert!(!is_mysql_datetime("2024-01-10 25:00:00"));
    }

    fn range_rule(options: Value) -> DateRangeRule {
        let mut rule = DateRangeRule::default();
        rule.parse(
            &RuleSpec::from_entry("dateRange", &json!(["start", "end", options])).unwrap(),
        )
        .unwrap();
        rule
    }

    #[test]
    fn ordered_pair_passes() {
        let rule = range_rule(json!({}));
        let data = json!({"start": "2024-01-01", "end": "2024-01-10"});
        assert!(rule.validate(&data).is_ok());
    }

    #[test]
    fn reversed_pair_fails_on_both_fields() {
        let rule = range_rule(json!({}));
        let data = json!({"start": "2024-01-10", "end": "2024-01-01"});
        let Err(Violation::PerField(errors)) = rule.validate(&data) else {
            panic!("expected failure");
        };
        assert!(errors.get("start").is_some());
        assert!(errors.get("end").is_some());
    }

    #[test]
    fn unordered_option_allows_reversed_pair() {
        let rule = range_rule(json!({"ordered": false}));
        let data = json!({"start": "2024-01-10", "end": "2024-01-01"});
        assert!(rule.validate(&data).is_ok());
    }

    #[test]
    fn invalid_date_is_field_scoped() {
        let rule = range_rule(json!({}));
        let data = json!({"start": "not-a-date", "end": "2024-01-01"});
        let Err(Violation::PerField(errors)) = rule.validate(&data) else {
            panic!("expected failure");
        };
        assert!(errors.get("start").is_some());
        assert!(errors.get("end").is_none());
    }

    #[test]
    fn bounds_are_enforced_per_field() {
        let rule = range_rule(json!({"min": "2024-01-01", "max": "2024-12-31"}));
        let data = json!({"start": "2023-12-31", "end": "2025-01-01"});
        let Err(Violation::PerField(errors)) = rule.validate(&data) else {
            panic!("expected failure");
        };
        assert!(errors.get("start").unwrap()[0].text.contains("earlier"));
        assert!(errors.get("end").unwrap()[0].text.contains("later"));
    }

    #[test]
    fn empty_fields_are_skipped() {
        let rule = range_rule(json!({}));
        assert!(rule.validate(&json!({"start": "", "end": ""})).is_ok());
        assert!(rule.validate(&json!({"start": "2024-01-01"})).is_ok());
    }

    #[test]
    fn wrong_field_count_is_config_error() {
        let mut rule = DateRangeRule::default();
        let spec = RuleSpec::from_entry("dateRange", &json!(["start"])).unwrap();
        assert!(matches!(
            rule.parse(&spec),
            Err(RulesetError::FieldCount {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn overridden_names() {
        assert_eq!(DateMySqlRule::default().name(), "dateMySQL");
        assert_eq!(TimeMySqlRule::default().name(), "timeMySQL");
        assert_eq!(DateTimeMySqlRule::default().name(), "datetimeMySQL");
        assert_eq!(DateRangeRule::default().name(), "dateRange");
    }
}
