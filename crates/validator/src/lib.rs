//! # kb-validator
//!
//! A rules-based validation engine for field-accessible records.
//!
//! Named rule templates live in a [`Registry`](registry::Registry); a
//! [`RulesValidator`](engine::RulesValidator) resolves a polymorphic
//! ruleset specification against the catalog (clone-then-parse, fail-fast
//! on configuration errors) and runs the resulting ordered rule list
//! against JSON-shaped records, collecting a field-keyed error map.
//!
//! ## Quick Start
//!
//! ```
//! use kb_validator::prelude::*;
//! use serde_json::json;
//!
//! let mut validator = RulesValidator::new();
//! validator.set_rules(json!({
//!     "required": ["email"],
//!     "email": ["email"],
//!     "length": ["name", {"min": 1, "max": 40}],
//! }))?;
//!
//! let report = validator.validate(&json!({"email": "user@example.com", "name": "Ada"}));
//! assert!(report.is_valid());
//!
//! let report = validator.validate(&json!({"name": "Ada"}));
//! assert_eq!(report.messages_for("email")[0].code, "required");
//! # Ok::<(), kb_validator::foundation::RulesetError>(())
//! ```
//!
//! ## Tag-driven validation
//!
//! [`AttributeValidator`](attributes::AttributeValidator) consumes
//! metadata-derived `(field, rule, args)` tags instead of a ruleset
//! specification, dispatching to named checks in a
//! [`ValidityTable`](validity::ValidityTable) with the same emptiness and
//! required semantics.

pub mod attributes;
pub mod engine;
pub mod foundation;
pub mod prelude;
pub mod registry;
pub mod rules;
pub mod validity;
