//! Rule registry
//!
//! A name-to-template catalog. Templates are immutable once stored;
//! binding a ruleset entry clones the template and parses the clone, so
//! concurrent validation runs never share parsed rule state.
//!
//! Resolution precedence for a named entry is fixed and documented:
//!
//! 1. a registered template — clone-then-parse;
//! 2. an entry carrying a `func` marker — a callback rule bound against
//!    the active validity table;
//! 3. a name present in the validity table but not the registry — the
//!    distinct [`RulesetError::NotARule`] diagnostic;
//! 4. anything else — [`RulesetError::UnknownRule`].

use indexmap::IndexMap;
use tracing::debug;

use crate::foundation::error::RulesetError;
use crate::foundation::spec::RuleSpec;
use crate::foundation::traits::Rule;
use crate::rules::{
    AllInArrayRule, AllMatchRule, AllUniqueRule, BinaryRule, CallbackRule, DateMySqlRule,
    DateRangeRule, DateTimeMySqlRule, EmailRule, InArrayRule, Ipv4AddrOrCidrRule, Ipv4AddrRule,
    Ipv4CidrRule, LengthRule, NumericRule, OneRequiredRule, PasswordRule, PhoneRule,
    PositiveIntRule, ProseTextRule, RangeRule, RegexRule, RequiredRule, TimeMySqlRule,
};
use crate::validity::ValidityTable;

/// The rule template catalog.
#[derive(Debug, Clone)]
pub struct Registry {
    templates: IndexMap<String, Box<dyn Rule>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// An empty registry. Even an empty catalog guarantees a `required`
    /// entry, since required-ness gates everything else.
    #[must_use]
    pub fn empty() -> Self {
        let mut registry = Self {
            templates: IndexMap::new(),
        };
        registry.ensure_required();
        registry
    }

    /// The full builtin catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self {
            templates: IndexMap::new(),
        };
        let templates: Vec<Box<dyn Rule>> = vec![
            Box::new(LengthRule::default()),
            Box::new(EmailRule::default()),
            Box::new(PasswordRule::default()),
            Box::new(PhoneRule::default()),
            Box::new(PositiveIntRule::default()),
            Box::new(ProseTextRule::default()),
            Box::new(DateMySqlRule::default()),
            Box::new(TimeMySqlRule::default()),
            Box::new(DateTimeMySqlRule::default()),
            Box::new(NumericRule::default()),
            Box::new(BinaryRule::default()),
            Box::new(RangeRule::default()),
            Box::new(RegexRule::default()),
            Box::new(Ipv4AddrRule::default()),
            Box::new(Ipv4CidrRule::default()),
            Box::new(Ipv4AddrOrCidrRule::default()),
            Box::new(InArrayRule::default()),
            Box::new(AllInArrayRule::default()),
            Box::new(AllMatchRule::default()),
            Box::new(AllUniqueRule::default()),
            Box::new(OneRequiredRule::default()),
            Box::new(DateRangeRule::default()),
            Box::new(RequiredRule::default()),
        ];
        for template in templates {
            registry.add_rule(template);
        }
        registry
    }

    /// Stores a template under its self-reported name, overwriting any
    /// previous entry.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        let name = rule.name().into_owned();
        self.add_rule_as(name, rule);
    }

    /// Stores a template under an explicit name.
    pub fn add_rule_as(&mut self, name: impl Into<String>, rule: Box<dyn Rule>) {
        let name = name.into();
        debug!(rule = %name, "registering rule template");
        self.templates.insert(name, rule);
    }

    /// Replaces the whole catalog. A `required` entry of the right
    /// concrete kind is always re-guaranteed afterwards.
    pub fn replace_catalog<I>(&mut self, rules: I)
    where
        I: IntoIterator<Item = Box<dyn Rule>>,
    {
        self.templates.clear();
        for rule in rules {
            self.add_rule(rule);
        }
        self.ensure_required();
    }

    fn ensure_required(&mut self) {
        let intact = self
            .templates
            .get("required")
            .is_some_and(|rule| rule.as_any().downcast_ref::<RequiredRule>().is_some());
        if !intact {
            self.add_rule_as("required", Box::new(RequiredRule::default()));
        }
    }

    /// Looks up a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.templates.get(name).map(Box::as_ref)
    }

    /// Returns true if a template is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Number of registered templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Resolves one named ruleset entry into a parsed rule instance.
    pub fn resolve(
        &self,
        name: &str,
        spec: &RuleSpec,
        validity: &ValidityTable,
    ) -> Result<Box<dyn Rule>, RulesetError> {
        if let Some(template) = self.templates.get(name) {
            let mut rule = template.boxed_clone();
            rule.parse(spec)?;
            return Ok(rule);
        }
        if spec.has_option("func") {
            return Ok(Box::new(CallbackRule::from_spec(spec, validity)?));
        }
        if validity.contains(name) {
            return Err(RulesetError::NotARule {
                name: name.to_string(),
            });
        }
        Err(RulesetError::UnknownRule {
            name: name.to_string(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_catalog_is_complete() {
        let registry = Registry::builtin();
        for name in [
            "length",
            "email",
            "password",
            "phone",
            "positiveInt",
            "proseText",
            "dateMySQL",
            "timeMySQL",
            "datetimeMySQL",
            "numeric",
            "binary",
            "range",
            "regex",
            "ipv4Addr",
            "ipv4Cidr",
            "ipv4AddrOrCidr",
            "inArray",
            "allInArray",
            "allMatch",
            "allUnique",
            "oneRequired",
            "dateRange",
            "required",
        ] {
            assert!(registry.contains(name), "missing builtin `{name}`");
        }
    }

    #[test]
    fn resolve_clones_then_parses() {
        let registry = Registry::builtin();
        let spec = RuleSpec::from_entry("length", &json!(["name", {"min": 1}])).unwrap();
        let rule = registry
            .resolve("length", &spec, &ValidityTable::standard())
            .unwrap();
        assert_eq!(rule.fields(), ["name"]);
        // the template itself stays unbound
        assert!(registry.get("length").unwrap().fields().is_empty());
    }

    #[test]
    fn unknown_name_fails() {
        let registry = Registry::builtin();
        let spec = RuleSpec::from_entry("bogusRule", &json!(["f"])).unwrap();
        let err = registry
            .resolve("bogusRule", &spec, &ValidityTable::standard())
            .unwrap_err();
        assert!(matches!(err, RulesetError::UnknownRule { .. }));
    }

    #[test]
    fn validity_name_gets_the_distinct_diagnostic() {
        // `proseText` exists in both; remove the template to expose the case
        let mut registry = Registry::builtin();
        registry.templates.shift_remove("proseText");
        let spec = RuleSpec::from_entry("proseText", &json!(["bio"])).unwrap();
        let err = registry
            .resolve("proseText", &spec, &ValidityTable::standard())
            .unwrap_err();
        assert!(matches!(err, RulesetError::NotARule { .. }));
    }

    #[test]
    fn func_marker_builds_a_callback() {
        let registry = Registry::builtin();
        let spec =
            RuleSpec::from_entry("checkEmail", &json!(["email", {"func": "email"}])).unwrap();
        let rule = registry
            .resolve("checkEmail", &spec, &ValidityTable::standard())
            .unwrap();
        assert_eq!(rule.name(), "callback");
    }

    #[test]
    fn replace_catalog_reinjects_required() {
        let mut registry = Registry::builtin();
        registry.replace_catalog(vec![Box::new(LengthRule::default()) as Box<dyn Rule>]);
        assert!(registry.contains("required"));
        assert!(registry.contains("length"));
        assert!(!registry.contains("email"));
    }

    #[test]
    fn shadowed_required_is_replaced_by_the_default() {
        let mut registry = Registry::empty();
        // a non-required rule squatting on the name
        registry.add_rule_as("required", Box::new(LengthRule::default()));
        registry.replace_catalog(std::iter::empty());
        let rule = registry.get("required").unwrap();
        assert!(rule.as_any().downcast_ref::<RequiredRule>().is_some());
    }

    #[test]
    fn add_rule_overwrites() {
        let mut registry = Registry::builtin();
        let before = registry.len();
        registry.add_rule(Box::new(LengthRule::default()));
        assert_eq!(registry.len(), before);
    }
}
