//! Rule engine micro-benchmarks: ruleset resolution and validation runs.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use kb_validator::prelude::*;
use serde_json::{Value, json};

fn ruleset() -> Value {
    json!({
        "required": ["email", "name"],
        "email": ["email"],
        "length": ["name", {"min": 1, "max": 40}],
        "range": ["age", {"between": [0, 130]}],
        "phone": ["phone"],
        "allMatch": ["password", "password_confirm"],
    })
}

fn record() -> Value {
    json!({
        "email": "ada@example.com",
        "name": "Ada Lovelace",
        "age": 36,
        "phone": "+44 (020) 123-4567",
        "password": "Secret123",
        "password_confirm": "Secret123",
    })
}

fn bench_resolution(c: &mut Criterion) {
    let spec = ruleset();
    c.bench_function("set_rules", |b| {
        b.iter(|| {
            let mut engine = RulesValidator::new();
            engine.set_rules(black_box(spec.clone())).unwrap();
            black_box(engine.rules().len())
        });
    });
}

fn bench_validation(c: &mut Criterion) {
    let mut engine = RulesValidator::new();
    engine.set_rules(ruleset()).unwrap();
    let valid = record();
    let invalid = json!({"name": "x", "age": 999, "phone": "nope"});

    c.bench_function("validate_valid_record", |b| {
        b.iter(|| black_box(engine.validate(black_box(&valid))).is_valid());
    });
    c.bench_function("validate_invalid_record", |b| {
        b.iter(|| black_box(engine.validate(black_box(&invalid))).has_errors());
    });
}

criterion_group!(benches, bench_resolution, bench_validation);
criterion_main!(benches);
