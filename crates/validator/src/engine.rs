//! Ruleset parser and validation engine
//!
//! [`RulesValidator`] stores ruleset sources verbatim, resolves them into
//! an ordered rule list (fail-fast: every configuration error surfaces
//! before any data is seen), and runs the list against a record,
//! accumulating a field-keyed error map.
//!
//! # Ruleset shapes
//!
//! The ruleset map is polymorphic. For each object entry `K => V`
//! the parser dispatches, in this fixed precedence order:
//!
//! 1. **required** — `K == "required"`, `V` a field list: the dedicated
//!    required step.
//! 2. **validity override** — `K == "validity"`, `V` a table name:
//!    switches the table callback entries resolve against.
//! 3. **multi-instance** — `V` is an array whose every element is an
//!    array: one instance of rule `K` per sub-entry (the same rule
//!    reused with different fields or options).
//! 4. **standard** — `V` is a flat array: one ruleset for rule `K`.
//! 5. **field-keyed** — `V` is an object: `K` is a *field* name and each
//!    sub-entry `rule => args` binds that rule to the field.
//! 6. anything else is rejected, reporting the offending key and a
//!    coarse value kind.
//!
//! A top-level array is accepted as positional legacy entries
//! `[field, func, ...args]`, resolved through the validity table.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::foundation::error::{FieldErrors, Message, RulesetError, ValueKind, Violation};
use crate::foundation::record::Record;
use crate::foundation::spec::RuleSpec;
use crate::foundation::traits::Rule;
use crate::registry::Registry;
use crate::rules::callback::CallbackRule;
use crate::rules::required::{RequiredRule, check_required_fields};
use crate::validity::ValidityTable;

// ============================================================================
// RULE SOURCES
// ============================================================================

/// What a resolved rule list is rebuilt from on refresh.
#[derive(Debug, Clone)]
enum RuleSource {
    /// A verbatim specification value, re-parsed on every refresh.
    Spec(Value),
    /// An already-instantiated rule, re-cloned on every refresh.
    Instance(Box<dyn Rule>),
}

// ============================================================================
// ENGINE
// ============================================================================

/// The validation engine.
///
/// Holds shared, read-only rule templates; each `validate` call builds
/// its own error state and returns it as an owned [`Report`], so one
/// engine can serve any number of records.
#[derive(Debug)]
pub struct RulesValidator {
    registry: Registry,
    tables: HashMap<String, Arc<ValidityTable>>,
    validity: Arc<ValidityTable>,
    sources: Vec<RuleSource>,
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RulesValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesValidator {
    /// An engine over the builtin catalog and the standard validity table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Registry::builtin())
    }

    /// An engine over a caller-supplied catalog.
    #[must_use]
    pub fn with_registry(registry: Registry) -> Self {
        let standard = Arc::new(ValidityTable::standard());
        let mut tables = HashMap::new();
        tables.insert("default".to_string(), Arc::clone(&standard));
        Self {
            registry,
            tables,
            validity: standard,
            sources: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// The active rule catalog.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The rules resolved from the current sources, in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Registers a validity table under a name, selectable via the
    /// ruleset `validity` key.
    pub fn register_validity(&mut self, name: impl Into<String>, table: ValidityTable) {
        self.tables.insert(name.into(), Arc::new(table));
    }

    /// Adds one rule template to the catalog. Resolved rules are
    /// refreshed immediately so the change takes effect.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) -> Result<(), RulesetError> {
        self.registry.add_rule(rule);
        self.refresh_rules()
    }

    /// Adds one rule template under an explicit name.
    pub fn add_rule_as(
        &mut self,
        name: impl Into<String>,
        rule: Box<dyn Rule>,
    ) -> Result<(), RulesetError> {
        self.registry.add_rule_as(name, rule);
        self.refresh_rules()
    }

    /// Replaces the whole catalog (a `required` entry is re-guaranteed)
    /// and refreshes any resolved rules.
    pub fn replace_catalog<I>(&mut self, rules: I) -> Result<(), RulesetError>
    where
        I: IntoIterator<Item = Box<dyn Rule>>,
    {
        self.registry.replace_catalog(rules);
        self.refresh_rules()
    }

    /// Stores a ruleset specification and resolves it immediately.
    ///
    /// Any configuration error aborts the whole resolution: the engine
    /// keeps no partial rule list and nothing has been validated.
    pub fn set_rules(&mut self, spec: Value) -> Result<(), RulesetError> {
        self.sources = vec![RuleSource::Spec(spec)];
        self.refresh_rules()
    }

    /// Appends an already-instantiated rule after the current sources.
    pub fn push_rule(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule.boxed_clone());
        self.sources.push(RuleSource::Instance(rule));
    }

    /// Re-resolves every stored source in order. Resolving the same
    /// sources twice yields the same rule list.
    pub fn refresh_rules(&mut self) -> Result<(), RulesetError> {
        let mut active = Arc::clone(
            self.tables
                .get("default")
                .unwrap_or(&self.validity),
        );
        let mut resolved = Vec::new();
        for source in &self.sources {
            match source {
                RuleSource::Instance(rule) => resolved.push(rule.boxed_clone()),
                RuleSource::Spec(spec) => self.resolve_spec(spec, &mut active, &mut resolved)?,
            }
        }
        debug!(rules = resolved.len(), "ruleset resolved");
        self.rules = resolved;
        self.validity = active;
        Ok(())
    }

    fn resolve_spec(
        &self,
        spec: &Value,
        active: &mut Arc<ValidityTable>,
        out: &mut Vec<Box<dyn Rule>>,
    ) -> Result<(), RulesetError> {
        match spec {
            Value::Object(entries) => {
                for (key, value) in entries {
                    self.resolve_entry(key, value, active, out)?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for item in items {
                    out.push(self.resolve_positional(item, active)?);
                }
                Ok(())
            }
            other => Err(RulesetError::InvalidShape {
                key: "<ruleset>".to_string(),
                kind: ValueKind::of(other),
            }),
        }
    }

    fn resolve_entry(
        &self,
        key: &str,
        value: &Value,
        active: &mut Arc<ValidityTable>,
        out: &mut Vec<Box<dyn Rule>>,
    ) -> Result<(), RulesetError> {
        // Case 2: validity override
        if key == "validity" {
            let Some(name) = value.as_str() else {
                return Err(RulesetError::InvalidShape {
                    key: key.to_string(),
                    kind: ValueKind::of(value),
                });
            };
            *active = Arc::clone(self.tables.get(name).ok_or_else(|| {
                RulesetError::UnknownValidity {
                    name: name.to_string(),
                }
            })?);
            return Ok(());
        }

        match value {
            // Case 3: multi-instance — every element its own sub-entry
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_array) => {
                for item in items {
                    let spec = RuleSpec::from_entry(key, item)?;
                    out.push(self.registry.resolve(key, &spec, active)?);
                }
                Ok(())
            }
            // Cases 1 and 4: required and standard rulesets are both flat
            // arrays; `required` just resolves to its dedicated rule.
            Value::Array(_) => {
                let spec = RuleSpec::from_entry(key, value)?;
                out.push(self.registry.resolve(key, &spec, active)?);
                Ok(())
            }
            // Case 5: field-keyed — `key` is a field, sub-entries are rules
            Value::Object(rules) => {
                for (rule_name, args) in rules {
                    let spec = RuleSpec::for_field(rule_name, key, args)?;
                    out.push(self.registry.resolve(rule_name, &spec, active)?);
                }
                Ok(())
            }
            other => Err(RulesetError::InvalidShape {
                key: key.to_string(),
                kind: ValueKind::of(other),
            }),
        }
    }

    fn resolve_positional(
        &self,
        item: &Value,
        active: &Arc<ValidityTable>,
    ) -> Result<Box<dyn Rule>, RulesetError> {
        match item {
            Value::Array(parts) => {
                let (Some(field), Some(func)) = (
                    parts.first().and_then(Value::as_str),
                    parts.get(1).and_then(Value::as_str),
                ) else {
                    return Err(RulesetError::InvalidShape {
                        key: "<positional>".to_string(),
                        kind: ValueKind::of(item),
                    });
                };
                let args = parts[2..].to_vec();
                Ok(Box::new(CallbackRule::positional(
                    field.to_string(),
                    func.to_string(),
                    args,
                    active,
                )?))
            }
            other => Err(RulesetError::InvalidShape {
                key: "<positional>".to_string(),
                kind: ValueKind::of(other),
            }),
        }
    }

    /// Runs the resolved rules against a record.
    ///
    /// The required rule is dispatched to its dedicated step; every other
    /// rule reports through the two-case violation contract. Validation
    /// failures never escape as errors; only configuration problems are
    /// fallible, and those were consumed by [`Self::set_rules`].
    pub fn validate(&self, record: &dyn Record) -> Report {
        let mut errors = FieldErrors::new();
        for rule in &self.rules {
            if let Some(required) = rule.as_any().downcast_ref::<RequiredRule>() {
                check_required_fields(required.fields(), record, &mut errors);
                continue;
            }
            trace!(rule = %rule.name(), "evaluating rule");
            match rule.validate(record) {
                Ok(()) => {}
                Err(Violation::PerField(map)) => errors.merge(map),
                Err(Violation::Broadcast(message)) => {
                    for field in rule.fields() {
                        errors.push(field.clone(), message.clone());
                    }
                }
            }
        }
        Report::new(errors)
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// The outcome of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Report {
    errors: FieldErrors,
}

impl Report {
    pub(crate) fn new(errors: FieldErrors) -> Self {
        Self { errors }
    }

    /// True iff no rule recorded an error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// True iff at least one field has an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The field-keyed error map, in evaluation order.
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Consumes the report, returning the error map.
    #[must_use]
    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }

    /// Messages recorded for one field.
    #[must_use]
    pub fn messages_for(&self, field: &str) -> &[Message] {
        self.errors.get(field).unwrap_or(&[])
    }

    /// Display-only view: one joined line per field, keyed by a label.
    ///
    /// Labels come from `labels` when present, otherwise from
    /// [`humanize_field`]. This is presentation sugar, not part of the
    /// error-map contract.
    #[must_use]
    pub fn humanized(&self, labels: &HashMap<String, String>) -> IndexMap<String, String> {
        let mut view = IndexMap::new();
        for (field, messages) in self.errors.iter() {
            let label = labels
                .get(field)
                .cloned()
                .unwrap_or_else(|| humanize_field(field));
            let joined = messages
                .iter()
                .map(|message| message.text.as_ref())
                .collect::<Vec<_>>()
                .join("; ");
            view.insert(label, joined);
        }
        view
    }
}

/// Field-name beautifier: `first_name` and `firstName` both become
/// `First name`.
#[must_use]
pub fn humanize_field(field: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in field.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.extend(c.to_lowercase());
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    let joined = words.join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
