//! Prelude module for convenient imports.
//!
//! A single `use kb_validator::prelude::*;` brings in the engine, the
//! registry, the rule catalog, and the core types.

// ============================================================================
// FOUNDATION: traits, errors, specs
// ============================================================================

pub use crate::foundation::{
    FieldErrors, FieldList, Message, Record, Rule, RuleSpec, RulesetError, ValueKind, Violation,
    field_values, is_empty_value, value_as_text,
};

// ============================================================================
// ENGINE AND REGISTRY
// ============================================================================

pub use crate::engine::{Report, RulesValidator, humanize_field};
pub use crate::registry::Registry;

// ============================================================================
// TAG-DRIVEN VARIANT AND VALIDITY CHECKS
// ============================================================================

pub use crate::attributes::{AttributeValidator, RuleTag};
pub use crate::validity::{CheckFn, ValidityTable};

// ============================================================================
// RULES: the builtin catalog
// ============================================================================

#[allow(clippy::wildcard_imports, ambiguous_glob_reexports)]
pub use crate::rules::*;
