//! Legacy callback rule
//!
//! Wraps a named check from the active [`ValidityTable`] plus fixed
//! arguments, so function-style validation specs stay engine-visible like
//! any other rule. The check resolves at construction; an unknown name is
//! a configuration error, raised before any data is validated.

use std::any::Any;
use std::fmt;

use serde_json::Value;

use crate::foundation::prelude::*;
use crate::validity::{CheckFn, ValidityTable};

/// A rule backed by a named `(value, args)` check.
#[derive(Clone, Default)]
pub struct CallbackRule {
    fields: FieldList,
    func: String,
    args: Vec<Value>,
    check: Option<CheckFn>,
}

impl CallbackRule {
    /// Builds a callback rule from a normalized spec carrying a `func`
    /// option (and optionally `args`), resolved against `validity`.
    pub fn from_spec(spec: &RuleSpec, validity: &ValidityTable) -> Result<Self, RulesetError> {
        let mut rule = Self::default();
        rule.parse(spec)?;
        rule.resolve(validity)?;
        Ok(rule)
    }

    /// Builds a callback rule from a positional legacy entry:
    /// `[field, func, ...args]`.
    pub fn positional(
        field: String,
        func: String,
        args: Vec<Value>,
        validity: &ValidityTable,
    ) -> Result<Self, RulesetError> {
        let mut rule = Self {
            fields: FieldList::new(),
            func,
            args,
            check: None,
        };
        rule.fields.push(field);
        rule.resolve(validity)?;
        Ok(rule)
    }

    /// The name of the wrapped check.
    #[must_use]
    pub fn func(&self) -> &str {
        &self.func
    }

    fn resolve(&mut self, validity: &ValidityTable) -> Result<(), RulesetError> {
        let check = validity
            .get(&self.func)
            .ok_or_else(|| RulesetError::UnknownCheck {
                func: self.func.clone(),
            })?;
        self.check = Some(check);
        Ok(())
    }
}

impl fmt::Debug for CallbackRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRule")
            .field("fields", &self.fields)
            .field("func", &self.func)
            .field("args", &self.args)
            .field("resolved", &self.check.is_some())
            .finish()
    }
}

impl Rule for CallbackRule {
    fn parse(&mut self, spec: &RuleSpec) -> Result<(), RulesetError> {
        self.fields = spec.bind_fields()?;
        self.func = spec.require_str("func")?.to_owned();
        self.args = spec
            .values_option("args")?
            .map(<[Value]>::to_vec)
            .unwrap_or_default();
        Ok(())
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn validate_one(&self, _field: &str, value: &Value) -> Result<(), Violation> {
        // Construction goes through `resolve`; an unresolved check means
        // the template was never bound to a table and has nothing to run.
        let Some(check) = &self.check else {
            return Ok(());
        };
        check(value, &self.args).map_err(Violation::Broadcast)
    }

    fn boxed_clone(&self) -> Box<dyn Rule> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_spec_resolves_and_runs() {
        let spec =
            RuleSpec::from_entry("callback", &json!(["email", {"func": "email"}])).unwrap();
        let rule = CallbackRule::from_spec(&spec, &ValidityTable::standard()).unwrap();
        assert!(rule.validate_one("email", &json!("user@example.com")).is_ok());
        assert!(rule.validate_one("email", &json!("nope")).is_err());
    }

    #[test]
    fn args_are_forwarded() {
        let spec = RuleSpec::from_entry(
            "callback",
            &json!(["name", {"func": "length", "args": [1, 3]}]),
        )
        .unwrap();
        let rule = CallbackRule::from_spec(&spec, &ValidityTable::standard()).unwrap();
        assert!(rule.validate_one("name", &json!("abc")).is_ok());
        assert!(rule.validate_one("name", &json!("abcd")).is_err());
    }

    #[test]
    fn unknown_check_is_config_error() {
        let spec =
            RuleSpec::from_entry("callback", &json!(["x", {"func": "bogus"}])).unwrap();
        let err = CallbackRule::from_spec(&spec, &ValidityTable::standard()).unwrap_err();
        assert!(matches!(err, RulesetError::UnknownCheck { .. }));
    }

    #[test]
    fn positional_form() {
        let rule = CallbackRule::positional(
            "email".into(),
            "email".into(),
            Vec::new(),
            &ValidityTable::standard(),
        )
        .unwrap();
        assert_eq!(rule.fields(), ["email"]);
        assert_eq!(rule.func(), "email");
    }

    #[test]
    fn derived_name() {
        assert_eq!(CallbackRule::default().name(), "callback");
    }

    #[test]
    fn missing_func_is_config_error() {
        let spec = RuleSpec::from_entry("callback", &json!(["x"])).unwrap();
        let mut rule = CallbackRule::default();
        assert!(matches!(
            rule.parse(&spec),
            Err(RulesetError::MissingOption { .. })
        ));
    }
}
