//! Tag-driven validation
//!
//! The alternate front door: instead of a ruleset specification, rules
//! arrive as an ordered list of [`RuleTag`]s discovered from per-field
//! metadata. How the tags were discovered (derive macros, schema files,
//! doc annotations) is a host concern; this module only consumes
//! `(field, rule, args)` tuples, in declaration order.
//!
//! Tags resolve to callables eagerly at construction, so an unknown rule
//! name is a configuration error before any record is seen. Validation
//! shares the engine's emptiness and required semantics and produces the
//! same [`Report`].

use std::fmt;

use serde_json::Value;

use crate::engine::Report;
use crate::foundation::error::{FieldErrors, Message, RulesetError};
use crate::foundation::record::{Record, is_empty_value};
use crate::validity::{CheckFn, ValidityTable};

// ============================================================================
// RULE TAG
// ============================================================================

/// One discovered metadata tag: apply `rule` to `field` with `args`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTag {
    pub field: String,
    pub rule: String,
    pub args: Vec<Value>,
}

impl RuleTag {
    /// A tag with no arguments.
    pub fn new(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            args: Vec::new(),
        }
    }

    /// Attaches declared arguments.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }
}

// ============================================================================
// ATTRIBUTE VALIDATOR
// ============================================================================

enum TagCheck {
    /// Required-field semantics, applied directly.
    Required,
    /// A resolved named check.
    Check(CheckFn),
}

struct BoundTag {
    field: String,
    check: TagCheck,
    args: Vec<Value>,
}

/// Validates records against metadata-derived tags.
pub struct AttributeValidator {
    tags: Vec<BoundTag>,
}

impl AttributeValidator {
    /// Resolves tags against a validity table.
    pub fn new(tags: Vec<RuleTag>, validity: &ValidityTable) -> Result<Self, RulesetError> {
        Self::with_overrides(tags, validity, &ValidityTable::new())
    }

    /// Resolves tags, preferring caller-supplied `overrides` (the hook
    /// for per-target custom checks) before the shared table.
    pub fn with_overrides(
        tags: Vec<RuleTag>,
        validity: &ValidityTable,
        overrides: &ValidityTable,
    ) -> Result<Self, RulesetError> {
        let mut bound = Vec::with_capacity(tags.len());
        for tag in tags {
            let check = if tag.rule == "required" {
                TagCheck::Required
            } else {
                let check = overrides
                    .get(&tag.rule)
                    .or_else(|| validity.get(&tag.rule))
                    .ok_or_else(|| RulesetError::UnknownCheck {
                        func: tag.rule.clone(),
                    })?;
                TagCheck::Check(check)
            };
            bound.push(BoundTag {
                field: tag.field,
                check,
                args: tag.args,
            });
        }
        Ok(Self { tags: bound })
    }

    /// Number of resolved tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if no tags were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Runs every tag against the record, in declaration order.
    ///
    /// Required tags flag missing or empty fields; every other tag skips
    /// empty values and records check failures under its field.
    pub fn validate(&self, record: &dyn Record) -> Report {
        let mut errors = FieldErrors::new();
        for tag in &self.tags {
            let value = record.get(&tag.field);
            match &tag.check {
                TagCheck::Required => {
                    let empty = match value {
                        None => true,
                        Some(value) => is_empty_value(value),
                    };
                    if empty {
                        errors.push(tag.field.clone(), Message::required());
                    }
                }
                TagCheck::Check(check) => {
                    let Some(value) = value else {
                        continue;
                    };
                    if is_empty_value(value) {
                        continue;
                    }
                    if let Err(message) = check(value, &tag.args) {
                        errors.push(tag.field.clone(), message);
                    }
                }
            }
        }
        Report::new(errors)
    }
}

impl fmt::Debug for AttributeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<String> = self
            .tags
            .iter()
            .map(|tag| match &tag.check {
                TagCheck::Required => format!("{}: required", tag.field),
                TagCheck::Check(_) => format!("{}: check({} args)", tag.field, tag.args.len()),
            })
            .collect();
        f.debug_struct("AttributeValidator").field("tags", &tags).finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
