//! Bindings exercised through the JS boundary.
//!
//! Run with `wasm-pack test --node wasm`.

#![cfg(target_arch = "wasm32")]

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{json, Value};
use wasm_bindgen_test::*;
use whiskey_wiz_wasm::{clamp_guess, default_scoring_rules, max_possible_score, score_sample};

fn sample() -> String {
    json!({ "id": "A", "age": 10, "proof": "100", "mashbill": "Bourbon" }).to_string()
}

fn dec(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

#[wasm_bindgen_test]
fn exact_guess_earns_the_ceiling() {
    let guess = json!({ "age": 10, "proof": "100", "mashbill": "bourbon" }).to_string();
    let score: Value = serde_json::from_str(&score_sample(&sample(), &guess, None).unwrap()).unwrap();

    assert_eq!(dec(&score["total"]), Decimal::from(130));
    assert_eq!(max_possible_score(None).unwrap(), 130.0);
}

#[wasm_bindgen_test]
fn rejected_input_becomes_a_js_string() {
    let guess = json!({ "age": 10, "proof": "100", "mashbill": "Moonshine" }).to_string();
    let err = score_sample(&sample(), &guess, None).unwrap_err();
    assert!(err.as_string().is_some_and(|msg| msg.contains("guess.mashbill")));

    let mut rules: Value = serde_json::from_str(&default_scoring_rules().unwrap()).unwrap();
    rules["age"]["maxPoints"] = json!(Decimal::MAX.to_string());
    let err = max_possible_score(Some(rules.to_string())).unwrap_err();
    assert_eq!(err.as_string().as_deref(), Some("point values are too large"));
}

#[wasm_bindgen_test]
fn clamped_guess_keeps_its_mashbill() {
    let guess = json!({ "age": 75, "proof": "60", "mashbill": "Rye" }).to_string();
    let clamped: Value =
        serde_json::from_str(&clamp_guess(&guess, default_scoring_rules().ok()).unwrap()).unwrap();
    assert_eq!(clamped["mashbill"], "Rye");
}
