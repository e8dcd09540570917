//! WebAssembly module for Whiskey Wiz
//!
//! Lets the game client preview scores with the same engine the server uses:
//! - Per-sample scoring and quarter aggregation
//! - Scoring rule validation for the quarter editor
//! - Clamping numeric guesses into the allowed range
//!
//! Values cross the boundary as JSON strings in the server's wire format.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use shared::{
    aggregate, QuarterAggregate, SampleId, ScoreResult, ScoringRules, WhiskeySample,
    DEFAULT_SCORING_CONFIG,
};
use wasm_bindgen::prelude::*;

/// Score of every guessed sample plus the quarter totals
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuarterPreview {
    scores: BTreeMap<SampleId, ScoreResult>,
    aggregate: QuarterAggregate,
}

/// Score one guess against one sample
#[wasm_bindgen]
pub fn score_sample(
    sample_json: &str,
    guess_json: &str,
    rules_json: Option<String>,
) -> Result<String, JsValue> {
    to_js(score_sample_json(sample_json, guess_json, rules_json.as_deref()))
}

/// Score a set of guesses (keyed by sample label) and aggregate them
#[wasm_bindgen]
pub fn score_quarter(
    samples_json: &str,
    guesses_json: &str,
    rules_json: Option<String>,
) -> Result<String, JsValue> {
    to_js(score_quarter_json(samples_json, guesses_json, rules_json.as_deref()))
}

/// Fold per-sample scores (keyed by sample label) into quarter totals
#[wasm_bindgen]
pub fn aggregate_results(scores_json: &str) -> Result<String, JsValue> {
    to_js(aggregate_results_json(scores_json))
}

/// List every problem with a rule set; `[]` means the rules are usable
#[wasm_bindgen]
pub fn validate_scoring_rules(rules_json: &str) -> Result<String, JsValue> {
    to_js(validate_scoring_rules_json(rules_json))
}

/// The rules new quarters start from
#[wasm_bindgen]
pub fn default_scoring_rules() -> Result<String, JsValue> {
    to_js(to_json(&DEFAULT_SCORING_CONFIG))
}

/// Highest score a single sample can earn under `rules_json`
#[wasm_bindgen]
pub fn max_possible_score(rules_json: Option<String>) -> Result<f64, JsValue> {
    to_js(max_possible_score_value(rules_json.as_deref()))
}

fn max_possible_score_value(rules_json: Option<&str>) -> Result<f64, String> {
    parse_rules(rules_json)?
        .checked_max_possible_score()
        .map(|ceiling| ceiling.to_f64().unwrap_or(0.0))
        .ok_or_else(|| shared::POINTS_TOO_LARGE.to_string())
}

/// Pull a guess's age and proof into the allowed range
#[wasm_bindgen]
pub fn clamp_guess(guess_json: &str, rules_json: Option<String>) -> Result<String, JsValue> {
    to_js(clamp_guess_json(guess_json, rules_json.as_deref()))
}

fn score_sample_json(
    sample_json: &str,
    guess_json: &str,
    rules_json: Option<&str>,
) -> Result<String, String> {
    let sample: WhiskeySample = parse("sample", sample_json)?;
    let guess = parse("guess", guess_json)?;
    let rules = parse_rules(rules_json)?;

    let score = shared::score_sample(&sample, &guess, &rules).map_err(|e| e.to_string())?;
    to_json(&score)
}

fn score_quarter_json(
    samples_json: &str,
    guesses_json: &str,
    rules_json: Option<&str>,
) -> Result<String, String> {
    let samples: Vec<WhiskeySample> = parse("samples", samples_json)?;
    let guesses = parse("guesses", guesses_json)?;
    let rules = parse_rules(rules_json)?;

    let scores = shared::score_guesses(&samples, &guesses, &rules).map_err(|e| e.to_string())?;
    let aggregate = aggregate(&scores).map_err(|e| e.to_string())?;
    to_json(&QuarterPreview { scores, aggregate })
}

fn aggregate_results_json(scores_json: &str) -> Result<String, String> {
    let scores: BTreeMap<SampleId, ScoreResult> = parse("scores", scores_json)?;
    to_json(&aggregate(&scores).map_err(|e| e.to_string())?)
}

fn validate_scoring_rules_json(rules_json: &str) -> Result<String, String> {
    let rules: ScoringRules = parse("rules", rules_json)?;
    to_json(&shared::scoring_rule_violations(&rules))
}

fn clamp_guess_json(guess_json: &str, rules_json: Option<&str>) -> Result<String, String> {
    let guess: shared::Guess = parse("guess", guess_json)?;
    let rules = parse_rules(rules_json)?;
    to_json(&guess.clamped(&rules))
}

fn parse_rules(rules_json: Option<&str>) -> Result<ScoringRules, String> {
    match rules_json {
        Some(json) if !json.trim().is_empty() => parse("rules", json),
        _ => Ok(ScoringRules::default()),
    }
}

fn parse<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

fn to_js<T>(result: Result<T, String>) -> Result<T, JsValue> {
    result.map_err(|msg| {
        #[cfg(target_arch = "wasm32")]
        web_sys::console::warn_1(&JsValue::from_str(&msg));
        JsValue::from_str(&msg)
    })
}
