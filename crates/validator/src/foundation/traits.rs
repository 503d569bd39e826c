//! The rule capability
//!
//! [`Rule`] is the closed interface every validation rule implements.
//! Templates live in the registry and are immutable; binding a ruleset
//! entry clones the template and runs [`Rule::parse`] on the clone
//! (clone-then-parse). Parsed instances are never shared between engines.
//!
//! The default [`Rule::validate`] walks the bound fields, skips empty
//! values, and funnels everything through [`Rule::validate_one`];
//! single-value rules override only that. Cross-field rules override
//! `validate` wholesale and leave `validate_one` as the no-op.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::foundation::error::{FieldErrors, RulesetError, Violation};
use crate::foundation::record::{Record, is_empty_value};
use crate::foundation::spec::RuleSpec;

// ============================================================================
// RULE TRAIT
// ============================================================================

/// A single-field-set validation unit.
pub trait Rule: fmt::Debug + Send + Sync {
    /// Stable identifier for registry lookup.
    ///
    /// The default derives from the concrete type: last path segment,
    /// trailing `Rule` stripped, first character lowered
    /// (`PositiveIntRule` → `positiveInt`). Rules with unconventional
    /// capitalization override this.
    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(rule_name_from_type(std::any::type_name::<Self>()))
    }

    /// Consumes a normalized spec: binds fields, then extracts the rule's
    /// keyed options with explicit defaults.
    ///
    /// Missing required options and empty field sets are configuration
    /// errors; nothing is validated until every rule parsed cleanly.
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError>;

    /// The fields this rule is bound to, in authoring order.
    fn fields(&self) -> &[String];

    /// Validates a record.
    ///
    /// Default: per bound field, skip missing or empty values, otherwise
    /// call [`Rule::validate_one`]. Field-attributed failures merge
    /// as-is; broadcast failures attach under the current field. Raises
    /// one aggregate violation if anything accumulated.
    fn validate(&self, record: &dyn Record) -> Result<(), Violation> {
        let mut errors = FieldErrors::new();
        for field in self.fields() {
            let Some(value) = record.get(field) else {
                continue;
            };
            if is_empty_value(value) {
                continue;
            }
            match self.validate_one(field, value) {
                Ok(()) => {}
                Err(Violation::PerField(map)) => errors.merge(map),
                Err(Violation::Broadcast(message)) => errors.push(field.clone(), message),
            }
        }
        match errors.into_violation() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    /// Validates one non-empty field value. Default no-op; single-value
    /// rules override this.
    fn validate_one(&self, _field: &str, _value: &Value) -> Result<(), Violation> {
        Ok(())
    }

    /// Clones the rule behind the trait object.
    fn boxed_clone(&self) -> Box<dyn Rule>;

    /// Downcast support, used to recognize the required rule.
    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Rule> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// Ordered `(field, value)` pairs for the rule's non-empty bound fields.
///
/// Cross-field rules (matching, uniqueness, one-required, date ranges)
/// compare over this instead of re-implementing the emptiness skip.
pub fn field_values<'a>(rule: &'a dyn Rule, record: &'a dyn Record) -> Vec<(&'a str, &'a Value)> {
    rule.fields()
        .iter()
        .filter_map(|field| record.get(field).map(|value| (field.as_str(), value)))
        .filter(|(_, value)| !is_empty_value(value))
        .collect()
}

// ============================================================================
// NAME DERIVATION
// ============================================================================

/// Derives a registry name from a concrete type name.
pub(crate) fn rule_name_from_type(type_name: &str) -> String {
    let base = type_name.rsplit("::").next().unwrap_or(type_name);
    let base = base.strip_suffix("Rule").unwrap_or(base);
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
