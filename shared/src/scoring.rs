//! Scoring engine
//!
//! Converts a player's guesses into points against the true sample attributes.
//!
//! Numeric attributes (age, proof) use one policy:
//! - exact match: `max_points + exact_match_bonus`
//! - inside the grace band (`0 < deviation <= grace_period`): the flat penalty is
//!   scaled by the share of the band used, `penalty = deviation * rate * deviation / grace`
//! - otherwise: `max(0, max_points - deviation * rate)`
//!
//! Both branches meet at `deviation == grace_period`, so the score never rises
//! as the deviation grows.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{ScoringError, ScoringResult};
use crate::models::{CategoricalRule, Guess, NumericRule, ScoreResult, ScoringRules, WhiskeySample};
use crate::types::{MashbillType, SampleId};

/// Score an age estimate in whole years
pub fn score_age(actual_age: u32, guessed_age: u32, rule: &NumericRule) -> Decimal {
    score_numeric(Decimal::from(actual_age), Decimal::from(guessed_age), rule)
}

/// Score a proof estimate; proof may be fractional
pub fn score_proof(actual_proof: Decimal, guessed_proof: Decimal, rule: &NumericRule) -> Decimal {
    score_numeric(actual_proof, guessed_proof, rule)
}

/// Score a mashbill label: the full bonus on a case-insensitive match, zero otherwise
pub fn score_mashbill(actual: MashbillType, guessed: &str, rule: &CategoricalRule) -> Decimal {
    if actual.label().eq_ignore_ascii_case(guessed.trim()) {
        rule.exact_match_bonus
    } else {
        Decimal::ZERO
    }
}

fn score_numeric(actual: Decimal, guessed: Decimal, rule: &NumericRule) -> Decimal {
    let deviation = actual.saturating_sub(guessed).abs();
    if deviation.is_zero() {
        return rule.ceiling();
    }

    let penalty = match rule.grace_period {
        Some(grace) if grace > Decimal::ZERO && deviation <= grace => deviation
            .checked_mul(rule.penalty_per_unit)
            .and_then(|flat| flat.checked_mul(deviation))
            .and_then(|scaled| scaled.checked_div(grace)),
        _ => deviation.checked_mul(rule.penalty_per_unit),
    };

    match penalty {
        Some(penalty) => rule.max_points.saturating_sub(penalty).max(Decimal::ZERO),
        // Overflow only happens for absurd deviations, which earn nothing.
        None => Decimal::ZERO,
    }
}

/// Check a guess before scoring it.
///
/// Rejects negative estimates, empty or unknown mashbill labels, and values
/// outside the configured limits. Use [`Guess::clamped`] upstream to pull
/// numeric estimates into range.
pub fn validate_guess(guess: &Guess, rules: &ScoringRules) -> ScoringResult<MashbillType> {
    if guess.age < 0 {
        return Err(ScoringError::invalid_input("guess.age", "must not be negative"));
    }
    if !rules.age.admits(Decimal::from(guess.age)) {
        return Err(ScoringError::invalid_input(
            "guess.age",
            format!("{} is outside the allowed range", guess.age),
        ));
    }

    if guess.proof < Decimal::ZERO {
        return Err(ScoringError::invalid_input("guess.proof", "must not be negative"));
    }
    if !rules.proof.admits(guess.proof) {
        return Err(ScoringError::invalid_input(
            "guess.proof",
            format!("{} is outside the allowed range", guess.proof),
        ));
    }

    if guess.mashbill.trim().is_empty() {
        return Err(ScoringError::invalid_input("guess.mashbill", "is required"));
    }
    MashbillType::parse(&guess.mashbill).ok_or_else(|| {
        ScoringError::invalid_input(
            "guess.mashbill",
            format!("'{}' is not a recognized mashbill", guess.mashbill),
        )
    })
}

/// Score one guess against one sample
pub fn score_sample(
    sample: &WhiskeySample,
    guess: &Guess,
    rules: &ScoringRules,
) -> ScoringResult<ScoreResult> {
    if sample.proof < Decimal::ZERO {
        return Err(ScoringError::invalid_input(
            format!("sample.{}.proof", sample.id),
            "must not be negative",
        ));
    }
    validate_guess(guess, rules)?;

    // validate_guess rejected negative ages
    let guessed_age = guess.age.unsigned_abs();

    let age = score_age(sample.age, guessed_age, &rules.age);
    let proof = score_proof(sample.proof, guess.proof, &rules.proof);
    let mashbill = score_mashbill(sample.mashbill, &guess.mashbill, &rules.mashbill);

    let max_possible = rules
        .checked_max_possible_score()
        .ok_or_else(|| ScoringError::too_large("scoringRules"))?;
    ScoreResult::new(age, proof, mashbill, max_possible)
}

/// Score every submitted guess of a play-through.
///
/// Guesses for labels the quarter does not contain are rejected; samples
/// without a guess are simply absent from the output.
pub fn score_guesses(
    samples: &[WhiskeySample],
    guesses: &BTreeMap<SampleId, Guess>,
    rules: &ScoringRules,
) -> ScoringResult<BTreeMap<SampleId, ScoreResult>> {
    guesses
        .iter()
        .map(|(id, guess)| {
            let sample = samples.iter().find(|s| s.id == *id).ok_or_else(|| {
                ScoringError::invalid_input(
                    format!("guesses.{}", id),
                    "quarter has no sample with this label",
                )
            })?;
            let result = score_sample(sample, guess, rules)
                .map_err(|err| prefix_field(err, *id))?;
            Ok((*id, result))
        })
        .collect()
}

fn prefix_field(err: ScoringError, id: SampleId) -> ScoringError {
    match err {
        ScoringError::InvalidInput { field, reason } if field.starts_with("guess.") => {
            ScoringError::InvalidInput {
                field: format!("guesses.{}.{}", id, &field["guess.".len()..]),
                reason,
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_SCORING_CONFIG;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bourbon_10_100() -> WhiskeySample {
        WhiskeySample::new(SampleId::A, 10, dec("100"), MashbillType::Bourbon)
    }

    fn rules_with_grace(grace: &str) -> ScoringRules {
        let mut rules = DEFAULT_SCORING_CONFIG;
        rules.age.grace_period = Some(dec(grace));
        rules.proof.grace_period = Some(dec(grace));
        rules
    }

    #[test]
    fn test_exact_guess_scores_ceiling() {
        let guess = Guess::new(10, dec("100"), "Bourbon");
        let result = score_sample(&bourbon_10_100(), &guess, &DEFAULT_SCORING_CONFIG).unwrap();

        assert_eq!(result.age, dec("55"));
        assert_eq!(result.proof, dec("55"));
        assert_eq!(result.mashbill, dec("20"));
        assert_eq!(result.total, dec("130"));
        assert_eq!(result.accuracy, dec("100"));
    }

    #[test]
    fn test_age_off_by_two_without_grace() {
        assert_eq!(score_age(10, 12, &DEFAULT_SCORING_CONFIG.age), dec("23"));
        assert_eq!(score_age(12, 10, &DEFAULT_SCORING_CONFIG.age), dec("23"));
    }

    #[test]
    fn test_age_penalty_floors_at_zero() {
        assert_eq!(score_age(10, 16, &DEFAULT_SCORING_CONFIG.age), dec("0"));
        assert_eq!(score_age(1, 50, &DEFAULT_SCORING_CONFIG.age), dec("0"));
    }

    #[test]
    fn test_proof_deviation_is_fractional() {
        // 35 - 0.8 * 3
        assert_eq!(
            score_proof(dec("115.2"), dec("116"), &DEFAULT_SCORING_CONFIG.proof),
            dec("32.6")
        );
    }

    #[test]
    fn test_grace_period_scales_penalty() {
        let rules = rules_with_grace("4");
        // 1 year into a 4 year band: 6 * 1 * 1/4
        assert_eq!(score_age(10, 11, &rules.age), dec("33.5"));
        // 2 years: 6 * 2 * 2/4
        assert_eq!(score_age(10, 12, &rules.age), dec("29"));
        // Band edge matches the flat formula
        assert_eq!(score_age(10, 14, &rules.age), dec("11"));
        // Beyond the band
        assert_eq!(score_age(10, 15, &rules.age), dec("5"));
    }

    #[test]
    fn test_zero_grace_period_means_flat_penalty() {
        let rules = rules_with_grace("0");
        assert_eq!(score_age(10, 12, &rules.age), dec("23"));
    }

    #[test]
    fn test_mashbill_is_case_insensitive() {
        let rule = &DEFAULT_SCORING_CONFIG.mashbill;
        assert_eq!(score_mashbill(MashbillType::Rye, "rye", rule), dec("20"));
        assert_eq!(score_mashbill(MashbillType::Rye, "  RYE ", rule), dec("20"));
        assert_eq!(score_mashbill(MashbillType::Rye, "Bourbon", rule), dec("0"));
    }

    #[test]
    fn test_unknown_mashbill_is_rejected() {
        let guess = Guess::new(10, dec("100"), "Tequila");
        let err = score_sample(&bourbon_10_100(), &guess, &DEFAULT_SCORING_CONFIG).unwrap_err();

        match err {
            ScoringError::InvalidInput { field, .. } => assert_eq!(field, "guess.mashbill"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_mashbill_is_rejected() {
        let guess = Guess::new(10, dec("100"), "   ");
        assert!(score_sample(&bourbon_10_100(), &guess, &DEFAULT_SCORING_CONFIG).is_err());
    }

    #[test]
    fn test_negative_and_out_of_range_guesses_are_rejected() {
        let sample = bourbon_10_100();
        let rules = &DEFAULT_SCORING_CONFIG;

        assert!(score_sample(&sample, &Guess::new(-1, dec("100"), "Bourbon"), rules).is_err());
        assert!(score_sample(&sample, &Guess::new(51, dec("100"), "Bourbon"), rules).is_err());
        assert!(score_sample(&sample, &Guess::new(10, dec("79"), "Bourbon"), rules).is_err());
        assert!(score_sample(&sample, &Guess::new(10, dec("-5"), "Bourbon"), rules).is_err());
    }

    #[test]
    fn test_negative_sample_proof_is_rejected() {
        let sample = WhiskeySample::new(SampleId::B, 10, dec("-1"), MashbillType::Rye);
        let guess = Guess::new(10, dec("100"), "Rye");
        let err = score_sample(&sample, &guess, &DEFAULT_SCORING_CONFIG).unwrap_err();
        assert_eq!(
            err,
            ScoringError::invalid_input("sample.B.proof", "must not be negative")
        );
    }

    #[test]
    fn test_clamped_guess_becomes_scorable() {
        let guess = Guess::new(75, dec("40"), "Rye");
        let clamped = guess.clamped(&DEFAULT_SCORING_CONFIG);

        assert_eq!(clamped.age, 50);
        assert_eq!(clamped.proof, dec("80"));
        assert!(score_sample(&bourbon_10_100(), &clamped, &DEFAULT_SCORING_CONFIG).is_ok());
    }

    #[test]
    fn test_score_guesses_skips_missing_and_rejects_unknown() {
        let samples = vec![
            bourbon_10_100(),
            WhiskeySample::new(SampleId::B, 6, dec("90"), MashbillType::Wheat),
        ];
        let mut guesses = BTreeMap::new();
        guesses.insert(SampleId::B, Guess::new(6, dec("90"), "wheat"));

        let scored = score_guesses(&samples, &guesses, &DEFAULT_SCORING_CONFIG).unwrap();
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[&SampleId::B].total, dec("130"));

        guesses.insert(SampleId::D, Guess::new(6, dec("90"), "wheat"));
        let err = score_guesses(&samples, &guesses, &DEFAULT_SCORING_CONFIG).unwrap_err();
        assert_eq!(
            err,
            ScoringError::invalid_input("guesses.D", "quarter has no sample with this label")
        );
    }

    #[test]
    fn test_score_guesses_names_the_offending_sample() {
        let samples = vec![bourbon_10_100()];
        let mut guesses = BTreeMap::new();
        guesses.insert(SampleId::A, Guess::new(10, dec("100"), "Gin"));

        match score_guesses(&samples, &guesses, &DEFAULT_SCORING_CONFIG).unwrap_err() {
            ScoringError::InvalidInput { field, .. } => assert_eq!(field, "guesses.A.mashbill"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unrepresentable_rules_are_rejected_not_panicking() {
        let mut rules = DEFAULT_SCORING_CONFIG;
        rules.age.max_points = Decimal::MAX;

        let guess = Guess::new(10, dec("100"), "Bourbon");
        let err = score_sample(&bourbon_10_100(), &guess, &rules).unwrap_err();
        assert_eq!(err, ScoringError::too_large("scoringRules"));

        // The attribute scorers themselves saturate instead of panicking
        assert_eq!(score_age(10, 10, &rules.age), Decimal::MAX);
        assert_eq!(score_age(10, 11, &rules.age), Decimal::MAX - dec("6"));

        rules.age.penalty_per_unit = Decimal::MAX;
        assert_eq!(score_age(10, 12, &rules.age), Decimal::ZERO);
    }
}
