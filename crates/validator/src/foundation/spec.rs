//! Normalized rule specifications
//!
//! One ruleset entry, whatever shape it arrived in, normalizes to a
//! [`RuleSpec`]: the positional string entries become target fields, the
//! keyed entries become options. Rules consume the spec during
//! `parse`: fields first, then their own options with explicit defaults.

use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::foundation::error::{RulesetError, ValueKind};

/// Per-rule field list; almost every rule binds one or two fields.
pub type FieldList = SmallVec<[String; 4]>;

// ============================================================================
// RULE SPEC
// ============================================================================

/// The normalized form of one ruleset entry.
#[derive(Debug, Clone, Default)]
pub struct RuleSpec {
    rule: String,
    fields: FieldList,
    options: Map<String, Value>,
}

impl RuleSpec {
    /// Normalizes a flat array entry: `["field1", "field2", {"min": 1}]`.
    ///
    /// String elements bind fields in order; object elements merge into
    /// the keyed options. Anything else is an unsupported shape.
    pub fn from_entry(rule: &str, entry: &Value) -> Result<Self, RulesetError> {
        let Value::Array(items) = entry else {
            return Err(RulesetError::InvalidShape {
                key: rule.to_string(),
                kind: ValueKind::of(entry),
            });
        };

        let mut spec = Self {
            rule: rule.to_string(),
            fields: FieldList::new(),
            options: Map::new(),
        };
        spec.absorb(items)?;
        Ok(spec)
    }

    /// Normalizes a field-keyed sub-entry: the field is fixed up front and
    /// `args` supplies extra fields and/or options.
    ///
    /// Accepted `args` shapes: an array (as in [`Self::from_entry`]), a
    /// bare options object, or `null` for argument-less rules.
    pub fn for_field(rule: &str, field: &str, args: &Value) -> Result<Self, RulesetError> {
        let mut spec = Self {
            rule: rule.to_string(),
            fields: FieldList::new(),
            options: Map::new(),
        };
        spec.fields.push(field.to_string());

        match args {
            Value::Null => {}
            Value::Array(items) => spec.absorb(items)?,
            Value::Object(options) => spec.options.extend(options.clone()),
            other => {
                return Err(RulesetError::InvalidShape {
                    key: field.to_string(),
                    kind: ValueKind::of(other),
                });
            }
        }
        Ok(spec)
    }

    fn absorb(&mut self, items: &[Value]) -> Result<(), RulesetError> {
        for item in items {
            match item {
                Value::String(field) => self.fields.push(field.clone()),
                Value::Object(options) => self.options.extend(options.clone()),
                other => {
                    return Err(RulesetError::InvalidShape {
                        key: self.rule.clone(),
                        kind: ValueKind::of(other),
                    });
                }
            }
        }
        Ok(())
    }

    /// Name of the rule this spec was written against.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Positional target fields, in authoring order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Clones the field list for a rule to own; a spec with no fields is
    /// a configuration error.
    pub fn bind_fields(&self) -> Result<FieldList, RulesetError> {
        if self.fields.is_empty() {
            return Err(RulesetError::NoFields {
                rule: self.rule.clone(),
            });
        }
        Ok(self.fields.clone())
    }

    /// Raw keyed option, if present.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Returns true if the keyed option is present.
    #[must_use]
    pub fn has_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Non-negative integer option with a default.
    pub fn usize_option(&self, key: &str, default: usize) -> Result<usize, RulesetError> {
        Ok(self.opt_usize_option(key)?.unwrap_or(default))
    }

    /// Optional non-negative integer option.
    pub fn opt_usize_option(&self, key: &str) -> Result<Option<usize>, RulesetError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.invalid_option(key, "expected a non-negative integer")),
        }
    }

    /// Boolean option with a default.
    pub fn bool_option(&self, key: &str, default: bool) -> Result<bool, RulesetError> {
        match self.options.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| self.invalid_option(key, "expected a boolean")),
        }
    }

    /// Optional string option.
    pub fn str_option(&self, key: &str) -> Result<Option<&str>, RulesetError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| self.invalid_option(key, "expected a string")),
        }
    }

    /// String option that must be present.
    pub fn require_str(&self, key: &str) -> Result<&str, RulesetError> {
        self.str_option(key)?
            .ok_or_else(|| self.missing_option(key))
    }

    /// Optional array option.
    pub fn values_option(&self, key: &str) -> Result<Option<&[Value]>, RulesetError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_array()
                .map(|items| Some(items.as_slice()))
                .ok_or_else(|| self.invalid_option(key, "expected an array")),
        }
    }

    /// Array option that must be present.
    pub fn require_values(&self, key: &str) -> Result<&[Value], RulesetError> {
        self.values_option(key)?
            .ok_or_else(|| self.missing_option(key))
    }

    /// Builds an [`RulesetError::InvalidOption`] for this spec's rule.
    #[must_use]
    pub fn invalid_option(&self, key: &str, reason: &str) -> RulesetError {
        RulesetError::InvalidOption {
            rule: self.rule.clone(),
            option: key.to_string(),
            reason: reason.to_string(),
        }
    }

    fn missing_option(&self, key: &str) -> RulesetError {
        RulesetError::MissingOption {
            rule: self.rule.clone(),
            option: key.to_string(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
