//! Error types for the validation engine
//!
//! Two kinds of failure live here and they never mix:
//!
//! - [`RulesetError`] — configuration errors: malformed ruleset shapes,
//!   unknown rule names, missing options. Raised while a ruleset is being
//!   resolved, always before any data is validated.
//! - [`Violation`] — an expected, per-record validation failure raised by a
//!   rule. The engine catches these and folds them into a [`FieldErrors`]
//!   map; they never escape a validation run.
//!
//! Message strings use `Cow<'static, str>` for zero-allocation in the
//! common case of fixed error texts.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// MESSAGE
// ============================================================================

/// A single user-facing validation message.
///
/// The `code` is a stable identifier for programmatic handling and i18n
/// (`"required"`, `"length_max"`, ...); `text` is the default English
/// rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Stable error code, e.g. `"required"`, `"range"`.
    pub code: Cow<'static, str>,
    /// Human-readable message in English.
    pub text: Cow<'static, str>,
}

impl Message {
    /// Creates a new message from a code and text.
    ///
    /// Static strings stay borrowed; formatted strings allocate once.
    pub fn new(code: impl Into<Cow<'static, str>>, text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            text: text.into(),
        }
    }

    /// The distinguished required-field message.
    #[must_use]
    pub fn required() -> Self {
        Self::new("required", "This field is required")
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.text)
    }
}

// ============================================================================
// FIELD ERRORS
// ============================================================================

/// An insertion-ordered, append-only map from field name to messages.
///
/// Duplicate fields across failing rules append, never overwrite; iteration
/// order is the order in which errors were first recorded, which matches
/// rule evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    entries: IndexMap<String, Vec<Message>>,
}

impl FieldErrors {
    /// Creates an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one message under a field.
    pub fn push(&mut self, field: impl Into<String>, message: Message) {
        self.entries.entry(field.into()).or_default().push(message);
    }

    /// Appends every entry of `other`, preserving both orders.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.entries {
            self.entries.entry(field).or_default().extend(messages);
        }
    }

    /// Returns true if no field has recorded an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields with at least one error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Messages recorded for a field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[Message]> {
        self.entries.get(field).map(Vec::as_slice)
    }

    /// Iterates `(field, messages)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Message])> {
        self.entries
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Converts a non-empty map into a [`Violation::PerField`].
    #[must_use]
    pub fn into_violation(self) -> Option<Violation> {
        if self.is_empty() {
            None
        } else {
            Some(Violation::PerField(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, messages)) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{field}: ")?;
            for (j, message) in messages.iter().enumerate() {
                if j > 0 {
                    write!(f, "; ")?;
                }
                write!(f, "{}", message.text)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// VIOLATION
// ============================================================================

/// How a rule reports failure to the engine.
///
/// The two cases are part of the contract, not an implementation detail:
/// a rule either attributes messages to specific fields (possibly fields
/// other than its own) or raises one message that applies to every field
/// it owns.
#[derive(Debug, Clone)]
pub enum Violation {
    /// Field-attributed messages; merged into the engine map as-is.
    PerField(FieldErrors),
    /// One message the engine attaches to every field the rule owns.
    Broadcast(Message),
}

impl Violation {
    /// Single-field convenience constructor.
    #[must_use]
    pub fn per_field(field: impl Into<String>, message: Message) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(field, message);
        Self::PerField(errors)
    }

    /// Broadcast convenience constructor.
    #[must_use]
    pub fn broadcast(message: Message) -> Self {
        Self::Broadcast(message)
    }
}

// ============================================================================
// VALUE KIND
// ============================================================================

/// Coarse kind of a JSON value, used in shape diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Kind of the given value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

// ============================================================================
// RULESET ERROR
// ============================================================================

/// Configuration errors raised while resolving a ruleset.
///
/// These are programmer errors: they abort resolution entirely and are
/// never folded into a per-field error map.
#[derive(Debug, Error)]
pub enum RulesetError {
    /// A ruleset entry names a rule that is not registered.
    #[error("unknown rule `{name}` in ruleset")]
    UnknownRule { name: String },

    /// The name resolves to a validity check rather than a rule.
    #[error("`{name}` names a validity check, not a rule; invoke it through a callback entry")]
    NotARule { name: String },

    /// Parsing a rule spec produced no target fields.
    #[error("rule `{rule}` has no target fields")]
    NoFields { rule: String },

    /// A required keyed option is absent.
    #[error("rule `{rule}` is missing required option `{option}`")]
    MissingOption { rule: String, option: String },

    /// A keyed option is present but malformed.
    #[error("rule `{rule}` option `{option}` is invalid: {reason}")]
    InvalidOption {
        rule: String,
        option: String,
        reason: String,
    },

    /// A fixed-arity rule was bound to the wrong number of fields.
    #[error("rule `{rule}` expects exactly {expected} fields, got {actual}")]
    FieldCount {
        rule: String,
        expected: usize,
        actual: usize,
    },

    /// A ruleset entry matches none of the supported shapes.
    #[error("unsupported ruleset entry `{key}` of kind {kind}")]
    InvalidShape { key: String, kind: ValueKind },

    /// The `validity` override names an unregistered table.
    #[error("unknown validity table `{name}`")]
    UnknownValidity { name: String },

    /// A callback entry names a check absent from the active table.
    #[error("unknown validity check `{func}` for callback rule")]
    UnknownCheck { func: String },

    /// A user-supplied regex pattern failed to compile.
    #[error("invalid pattern for rule `{rule}`")]
    Pattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

// ============================================================================
// TESTS
// ============================================================================
