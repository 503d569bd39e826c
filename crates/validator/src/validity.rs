//! Named validity checks
//!
//! A [`ValidityTable`] is a resolvable set of named functions taking
//! `(value, args)` and reporting a [`Message`] on rejection. Two paths
//! dispatch through it: legacy callback rules and the tag-driven
//! validator. The standard table exposes the bare checks behind the
//! builtin rules; hosts register their own tables and select one per
//! ruleset via the `validity` key.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::foundation::error::Message;
use crate::foundation::record::value_as_text;
use crate::rules::content::{email_message, is_prose_text, is_valid_email, prose_message};
use crate::rules::datetime::{date_message, is_mysql_date};
use crate::rules::length::{max_message, min_message};
use crate::rules::network::{ipv4_message, is_ipv4_addr};
use crate::rules::numeric::{
    binary_message, is_binary_value, is_numeric_value, is_positive_int_value, numeric_message,
    positive_int_message,
};

/// A named validity check: `(value, args) -> Result<(), Message>`.
pub type CheckFn = Arc<dyn Fn(&Value, &[Value]) -> Result<(), Message> + Send + Sync>;

// ============================================================================
// VALIDITY TABLE
// ============================================================================

/// A name-to-check mapping, shared read-only once built.
#[derive(Clone, Default)]
pub struct ValidityTable {
    checks: HashMap<String, CheckFn>,
}

impl ValidityTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a check under a name, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, check: F)
    where
        F: Fn(&Value, &[Value]) -> Result<(), Message> + Send + Sync + 'static,
    {
        self.checks.insert(name.into(), Arc::new(check));
    }

    /// Looks up a check by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<CheckFn> {
        self.checks.get(name).cloned()
    }

    /// Returns true if a check is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true if no checks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// The standard table: bare versions of the builtin checks, under the
    /// same names the rule catalog uses.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register("email", |value, _| {
            text_check(value, is_valid_email, email_message)
        });
        table.register("proseText", |value, _| {
            text_check(value, is_prose_text, prose_message)
        });
        table.register("numeric", |value, _| {
            flag_check(is_numeric_value(value), numeric_message)
        });
        table.register("positiveInt", |value, _| {
            flag_check(is_positive_int_value(value), positive_int_message)
        });
        table.register("binary", |value, _| {
            flag_check(is_binary_value(value), binary_message)
        });
        table.register("ipv4Addr", |value, _| {
            text_check(value, is_ipv4_addr, ipv4_message)
        });
        table.register("dateMySQL", |value, _| {
            text_check(value, is_mysql_date, date_message)
        });
        table.register("length", |value, args| {
            let Some(text) = value_as_text(value) else {
                return Err(Message::new("length", "Must be a text value"));
            };
            let len = text.chars().count();
            let min = arg_usize(args, 0).unwrap_or(0);
            if len < min {
                return Err(min_message(min));
            }
            if let Some(max) = arg_usize(args, 1) {
                if len > max {
                    return Err(max_message(max));
                }
            }
            Ok(())
        });
        table
    }
}

impl fmt::Debug for ValidityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.checks.keys().collect();
        names.sort();
        f.debug_struct("ValidityTable").field("checks", &names).finish()
    }
}

fn text_check(
    value: &Value,
    predicate: impl Fn(&str) -> bool,
    message: impl Fn() -> Message,
) -> Result<(), Message> {
    match value_as_text(value) {
        Some(text) if predicate(&text) => Ok(()),
        _ => Err(message()),
    }
}

fn flag_check(ok: bool, message: impl Fn() -> Message) -> Result<(), Message> {
    if ok { Ok(()) } else { Err(message()) }
}

fn arg_usize(args: &[Value], index: usize) -> Option<usize> {
    args.get(index)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn standard_table_has_the_bare_checks() {
        let table = ValidityTable::standard();
        for name in [
            "email",
            "proseText",
            "numeric",
            "positiveInt",
            "binary",
            "ipv4Addr",
            "dateMySQL",
            "length",
        ] {
            assert!(table.contains(name), "missing check `{name}`");
        }
    }

    #[test]
    fn email_check_dispatch() {
        let table = ValidityTable::standard();
        let check = table.get("email").unwrap();
        assert!(check(&json!("user@example.com"), &[]).is_ok());
        assert!(check(&json!("not-an-email"), &[]).is_err());
    }

    #[test]
    fn length_check_reads_positional_args() {
        let table = ValidityTable::standard();
        let check = table.get("length").unwrap();
        assert!(check(&json!("abc"), &[json!(1), json!(3)]).is_ok());
        let err = check(&json!("abcd"), &[json!(1), json!(3)]).unwrap_err();
        assert_eq!(err.code, "length_max");
    }

    #[test]
    fn custom_registration_overrides() {
        let mut table = ValidityTable::standard();
        table.register("email", |_, _| Err(Message::new("email", "never")));
        let check = table.get("email").unwrap();
        assert!(check(&json!("user@example.com"), &[]).is_err());
    }

    #[test]
    fn unknown_check_is_absent() {
        assert!(ValidityTable::standard().get("bogus").is_none());
    }
}
