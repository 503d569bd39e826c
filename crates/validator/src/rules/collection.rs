//! Membership and cross-field rules
//!
//! The cross-field rules (`allMatch`, `allUnique`, `oneRequired`) override
//! `validate` wholesale: they compare over the non-empty bound values and
//! report one broadcast message, which the engine attributes to every
//! bound field.

use std::any::Any;

use serde_json::Value;

use crate::foundation::prelude::*;

// ============================================================================
// IN ARRAY
// ============================================================================

/// Validates membership in an allowed set (strict JSON equality).
#[derive(Debug, Clone, Default)]
pub struct InArrayRule {
    fields: FieldList,
    allowed: Vec<Value>,
}

impl Rule for InArrayRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        self.allowed = spec.require_values("allowed")?.to_vec();
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        if self.allowed.contains(value) {
            Ok(())
        } else {
            Err(Violation::Broadcast(Message::new(
                "in_array",
                "Is not one of the allowed values",
            )))
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
// ALL IN ARRAY
// ============================================================================

/// Validates that a value is an array whose every element is allowed.
#[derive(Debug, Clone, Default)]
pub struct AllInArrayRule {
    fields: FieldList,
    allowed: Vec<Value>,
}

impl Rule for AllInArrayRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        self.allowed = spec.require_values("allowed")?.to_vec();
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        let Value::Array(items) = value else {
            return Err(Violation::Broadcast(Message::new(
                "all_in_array",
                "Must be a list of allowed values",
            )));
        };
        if items.iter().all(|item| self.allowed.contains(item)) {
            Ok(())
        } else {
            Err(Violation::Broadcast(Message::new(
                "all_in_array",
                "Contains a value that is not allowed",
            )))
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
// ALL MATCH
// ============================================================================

/// Validates that every non-empty bound field holds the same value.
#[derive(Debug, Clone, Default)]
pub struct AllMatchRule {
    fields: FieldList,
}

impl Rule for AllMatchRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate(&self, record: &dyn Record) -> Result<(), Violation> {
        let values = field_values(self, record);
        let Some((_, first)) = values.first() else {
            return Ok(());
        };
        if values.iter().all(|(_, value)| value == first) {
            Ok(())
        } else {
            Err(Violation::Broadcast(Message::new(
                "all_match",
                "Fields must match",
            )))
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
// ALL UNIQUE
// ============================================================================

/// Validates that the non-empty bound fields hold pairwise distinct values.
#[derive(Debug, Clone, Default)]
pub struct AllUniqueRule {
    fields: FieldList,
}

impl Rule for AllUniqueRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate(&self, record: &dyn Record) -> Result<(), Violation> {
        let values = field_values(self, record);
        for (i, (_, a)) in values.iter().enumerate() {
            if values[i + 1..].iter().any(|(_, b)| a == b) {
                return Err(Violation::Broadcast(Message::new(
                    "all_unique",
                    "Fields must be unique",
                )));
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

// ============================================================================
// ONE REQUIRED
// ============================================================================

/// Validates that at least one bound field is non-empty.
#[derive(Debug, Clone, Default)]
pub struct OneRequiredRule {
    fields: FieldList,
    group: Option<String>,
}

impl Rule for OneRequiredRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        self.group = spec.str_option("group")?.map(str::to_owned);
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate(&self, record: &dyn Record) -> Result<(), Violation> {
        if field_values(self, record).is_empty() {
            let text = match &self.group {
                Some(group) => format!("At least one {group} field is required"),
                None => "At least one of these fields is required".to_string(),
            };
            Err(Violation::Broadcast(Message::new("one_required", text)))
        } else {
            Ok(())
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
