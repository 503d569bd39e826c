//! Core validation types and traits
//!
//! The fundamental building blocks of the engine:
//!
//! - **Traits**: [`Rule`], [`Record`]
//! - **Errors**: [`Message`], [`Violation`], [`FieldErrors`], [`RulesetError`]
//! - **Specs**: [`RuleSpec`] — the normalized form of one ruleset entry
//!
//! # Architecture
//!
//! Rules are runtime-registered templates, not compile-time typed
//! validators: a registry maps names to immutable rule templates, and
//! binding a ruleset entry is clone-then-parse. Configuration problems
//! surface as [`RulesetError`] before any data is seen; per-record
//! failures flow as [`Violation`] values that the engine folds into an
//! insertion-ordered, field-keyed error map.

pub mod error;
pub mod record;
pub mod spec;
pub mod traits;

pub use error::{FieldErrors, Message, RulesetError, ValueKind, Violation};
pub use record::{Record, is_empty_value, value_as_text};
pub use spec::{FieldList, RuleSpec};
pub use traits::{Rule, field_values};

/// Common imports for implementing rules.
pub mod prelude {
    pub use super::{
        FieldErrors, FieldList, Message, Record, Rule, RuleSpec, RulesetError, Violation,
        field_values, is_empty_value, value_as_text,
    };
}
