//! Basic usage example for kb-validator

use kb_validator::prelude::*;
use serde_json::json;

fn main() -> Result<(), RulesetError> {
    let mut validator = RulesValidator::new();
    validator.set_rules(json!({
        "required": ["email"],
        "email": ["email"],
        "length": ["name", {"min": 1, "max": 40}],
        "range": ["age", {"between": [0, 130]}],
        "allMatch": ["password", "password_confirm"],
    }))?;

    // A record that passes every rule
    let good = json!({
        "email": "ada@example.com",
        "name": "Ada",
        "age": 36,
        "password": "Secret123",
        "password_confirm": "Secret123",
    });
    let report = validator.validate(&good);
    println!("good record valid: {}", report.is_valid());

    // A record that trips several rules at once
    let bad = json!({
        "name": "A very long name that does not fit the allowed length at all",
        "age": 200,
        "password": "Secret123",
        "password_confirm": "secret123",
    });
    let report = validator.validate(&bad);
    println!("bad record valid: {}", report.is_valid());
    for (field, messages) in report.errors().iter() {
        for message in messages {
            println!("  {field}: {}", message.text);
        }
    }

    // The same checks, driven by metadata tags instead of a ruleset
    let tags = AttributeValidator::new(
        vec![
            RuleTag::new("email", "required"),
            RuleTag::new("email", "email"),
            RuleTag::new("name", "length").with_args(vec![json!(1), json!(40)]),
        ],
        &ValidityTable::standard(),
    )?;
    let report = tags.validate(&bad);
    println!("tag-driven verdict: {}", report.is_valid());

    Ok(())
}
