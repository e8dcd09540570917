//! Validation of scoring rules and quarter content
//!
//! Unlike guess validation, which stops at the first problem, these checks
//! collect every violation so a quarter author can fix them in one pass.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::error::{FieldViolation, ScoringError, ScoringResult, POINTS_TOO_LARGE};
use crate::models::{NumericRule, ScoringRules, WhiskeySample};
use crate::types::SampleId;

/// Number of samples in every quarter
pub const SAMPLES_PER_QUARTER: usize = 4;

/// Validate a rule set, reporting every violated field
pub fn validate_scoring_rules(rules: &ScoringRules) -> ScoringResult<()> {
    into_result(scoring_rule_violations(rules))
}

/// Validate the samples and rules of a quarter together
pub fn validate_quarter_content(
    samples: &[WhiskeySample],
    rules: &ScoringRules,
) -> ScoringResult<()> {
    let mut violations = scoring_rule_violations(rules);
    violations.extend(sample_violations(samples, rules));
    into_result(violations)
}

/// Every violation in a rule set; empty when the rules are usable
pub fn scoring_rule_violations(rules: &ScoringRules) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    check_numeric_rule("age", &rules.age, &mut violations);
    check_numeric_rule("proof", &rules.proof, &mut violations);
    check_non_negative(
        "mashbill.exactMatchBonus",
        rules.mashbill.exact_match_bonus,
        &mut violations,
    );

    match rules.checked_max_possible_score() {
        None => violations.push(FieldViolation::new("scoringRules", POINTS_TOO_LARGE)),
        // Only meaningful once the individual fields are sane
        Some(ceiling) if violations.is_empty() && ceiling <= Decimal::ZERO => {
            violations.push(FieldViolation::new(
                "scoringRules",
                "rules must award at least one point",
            ));
        }
        Some(_) => {}
    }
    violations
}

fn check_numeric_rule(prefix: &str, rule: &NumericRule, violations: &mut Vec<FieldViolation>) {
    let field = |name: &str| format!("{}.{}", prefix, name);

    check_non_negative(&field("maxPoints"), rule.max_points, violations);
    check_non_negative(&field("penaltyPerUnit"), rule.penalty_per_unit, violations);
    check_non_negative(&field("exactMatchBonus"), rule.exact_match_bonus, violations);
    if let Some(grace) = rule.grace_period {
        check_non_negative(&field("gracePeriod"), grace, violations);
    }

    if rule.has_lower_limit {
        match rule.min_value {
            Some(min) => check_non_negative(&field("minValue"), min, violations),
            None => violations.push(FieldViolation::new(
                field("minValue"),
                "required when hasLowerLimit is set",
            )),
        }
    }
    if rule.has_upper_limit {
        match rule.max_value {
            Some(max) => check_non_negative(&field("maxValue"), max, violations),
            None => violations.push(FieldViolation::new(
                field("maxValue"),
                "required when hasUpperLimit is set",
            )),
        }
    }

    if let (Some(min), Some(max)) = (rule.lower_limit(), rule.upper_limit()) {
        if min > max {
            violations.push(FieldViolation::new(
                field("minValue"),
                format!("minValue {} is greater than maxValue {}", min, max),
            ));
        }
    }
}

fn check_non_negative(field: &str, value: Decimal, violations: &mut Vec<FieldViolation>) {
    if value < Decimal::ZERO {
        violations.push(FieldViolation::new(field, "must not be negative"));
    }
}

fn sample_violations(samples: &[WhiskeySample], rules: &ScoringRules) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if samples.len() != SAMPLES_PER_QUARTER {
        violations.push(FieldViolation::new(
            "samples",
            format!(
                "a quarter needs exactly {} samples, got {}",
                SAMPLES_PER_QUARTER,
                samples.len()
            ),
        ));
    }

    let mut seen = BTreeSet::new();
    for sample in samples {
        if !seen.insert(sample.id) {
            violations.push(FieldViolation::new(
                format!("samples.{}", sample.id),
                "duplicate sample label",
            ));
        }

        let proof_field = format!("samples.{}.proof", sample.id);
        if sample.proof < Decimal::ZERO {
            violations.push(FieldViolation::new(proof_field, "must not be negative"));
        } else if !rules.proof.admits(sample.proof) {
            violations.push(FieldViolation::new(
                proof_field,
                format!("{} is outside the guessable proof range", sample.proof),
            ));
        }

        if !rules.age.admits(Decimal::from(sample.age)) {
            violations.push(FieldViolation::new(
                format!("samples.{}.age", sample.id),
                format!("{} is outside the guessable age range", sample.age),
            ));
        }
    }

    if samples.len() == SAMPLES_PER_QUARTER {
        for id in SampleId::ALL {
            if !seen.contains(&id) {
                violations.push(FieldViolation::new(
                    format!("samples.{}", id),
                    "missing sample",
                ));
            }
        }
    }

    violations
}

fn into_result(violations: Vec<FieldViolation>) -> ScoringResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ScoringError::InvalidConfiguration(violations))
    }
}
