//! Field-accessible records and the shared emptiness rule
//!
//! A [`Record`] is anything the engine can read fields out of by name.
//! The trait is object-safe so rules can hold `&dyn Record` without
//! caring which concrete map the host handed in.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

// ============================================================================
// RECORD TRAIT
// ============================================================================

/// Get-by-name access over a data record.
pub trait Record {
    /// Returns the value stored under `field`, if present.
    fn get(&self, field: &str) -> Option<&Value>;

    /// Returns true if the record has an entry for `field`.
    fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }
}

impl Record for Map<String, Value> {
    fn get(&self, field: &str) -> Option<&Value> {
        Map::get(self, field)
    }
}

/// Only the object variant is field-accessible; every other variant has
/// no fields.
impl Record for Value {
    fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(field),
            _ => None,
        }
    }
}

impl Record for HashMap<String, Value> {
    fn get(&self, field: &str) -> Option<&Value> {
        HashMap::get(self, field)
    }
}

impl Record for BTreeMap<String, Value> {
    fn get(&self, field: &str) -> Option<&Value> {
        BTreeMap::get(self, field)
    }
}

// ============================================================================
// EMPTINESS
// ============================================================================

/// The shared emptiness rule.
///
/// Empty values are exempt from every non-required check and flagged by
/// the required step. The numeric-zero carve-out is deliberate and
/// load-bearing: `0` and `"0"` are values a user actually entered, so
/// they are never empty.
///
/// - `null` is empty
/// - an array or object with zero entries is empty
/// - `""` is empty; any other string (including `"0"`) is not
/// - numbers and booleans are never empty
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::String(text) => text.is_empty(),
        Value::Number(_) | Value::Bool(_) => false,
    }
}

/// Text view of a scalar value.
///
/// Strings borrow; numbers render once. Arrays, objects, booleans and
/// null have no text form; rules that need text reject them.
#[must_use]
pub fn value_as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text.as_str())),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        _ => None,
    }
}

// ============================================================================
// TESTS
// ============================================================================
