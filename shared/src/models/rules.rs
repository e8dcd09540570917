//! Scoring rule models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rule block for a numeric attribute (age or proof)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NumericRule {
    /// Points for a correct-but-not-exact estimate before any penalty
    pub max_points: Decimal,
    /// Points deducted per unit of deviation (per year, per proof point)
    #[serde(alias = "pointDeductionPerYear", alias = "pointDeductionPerProof")]
    pub penalty_per_unit: Decimal,
    /// Extra points for an exact match
    pub exact_match_bonus: Decimal,
    /// Deviation band in which the penalty is scaled down
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period: Option<Decimal>,
    #[serde(default)]
    pub has_lower_limit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Decimal>,
    #[serde(default)]
    pub has_upper_limit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Decimal>,
}

impl NumericRule {
    /// Highest score reachable for this attribute (exact match).
    ///
    /// Saturates at the `Decimal` bounds; validated rules never get there.
    pub fn ceiling(&self) -> Decimal {
        self.max_points.saturating_add(self.exact_match_bonus)
    }

    /// Exact-match score, or `None` when it cannot be represented
    pub fn checked_ceiling(&self) -> Option<Decimal> {
        self.max_points.checked_add(self.exact_match_bonus)
    }

    /// Lower input limit, if one is switched on
    pub fn lower_limit(&self) -> Option<Decimal> {
        if self.has_lower_limit {
            self.min_value
        } else {
            None
        }
    }

    /// Upper input limit, if one is switched on
    pub fn upper_limit(&self) -> Option<Decimal> {
        if self.has_upper_limit {
            self.max_value
        } else {
            None
        }
    }

    /// Whether `value` lies within the configured limits
    pub fn admits(&self, value: Decimal) -> bool {
        self.lower_limit().map_or(true, |min| value >= min)
            && self.upper_limit().map_or(true, |max| value <= max)
    }

    /// Clamp `value` into the configured limits
    pub fn clamp(&self, value: Decimal) -> Decimal {
        let mut value = value;
        if let Some(min) = self.lower_limit() {
            value = value.max(min);
        }
        if let Some(max) = self.upper_limit() {
            value = value.min(max);
        }
        value
    }
}

/// Rule block for the mashbill category: all or nothing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalRule {
    pub exact_match_bonus: Decimal,
}

/// Per-quarter scoring configuration shared by all four samples
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRules {
    pub age: NumericRule,
    pub proof: NumericRule,
    pub mashbill: CategoricalRule,
}

impl ScoringRules {
    /// Maximum achievable points for one sample under these rules.
    ///
    /// Saturating; use [`ScoringRules::checked_max_possible_score`] on
    /// rules that have not been validated.
    pub fn max_possible_score(&self) -> Decimal {
        self.age
            .ceiling()
            .saturating_add(self.proof.ceiling())
            .saturating_add(self.mashbill.exact_match_bonus)
    }

    /// Maximum achievable points, or `None` if any partial sum overflows
    pub fn checked_max_possible_score(&self) -> Option<Decimal> {
        self.age
            .checked_ceiling()?
            .checked_add(self.proof.checked_ceiling()?)?
            .checked_add(self.mashbill.exact_match_bonus)
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        DEFAULT_SCORING_CONFIG
    }
}

const fn points(value: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, 0)
}

/// Rules used when a quarter is created without its own configuration.
///
/// Ceiling per sample: (35 + 20) + (35 + 20) + 20 = 130.
pub const DEFAULT_SCORING_CONFIG: ScoringRules = ScoringRules {
    age: NumericRule {
        max_points: points(35),
        penalty_per_unit: points(6),
        exact_match_bonus: points(20),
        grace_period: None,
        has_lower_limit: true,
        min_value: Some(points(1)),
        has_upper_limit: true,
        max_value: Some(points(50)),
    },
    proof: NumericRule {
        max_points: points(35),
        penalty_per_unit: points(3),
        exact_match_bonus: points(20),
        grace_period: None,
        has_lower_limit: true,
        min_value: Some(points(80)),
        has_upper_limit: true,
        max_value: Some(points(160)),
    },
    mashbill: CategoricalRule {
        exact_match_bonus: points(20),
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_ceiling_is_130() {
        assert_eq!(DEFAULT_SCORING_CONFIG.max_possible_score(), dec("130"));
        assert_eq!(ScoringRules::default(), DEFAULT_SCORING_CONFIG);
    }

    #[test]
    fn test_checked_ceiling_detects_overflow() {
        let mut rules = DEFAULT_SCORING_CONFIG;
        assert_eq!(rules.checked_max_possible_score(), Some(dec("130")));

        rules.mashbill.exact_match_bonus = Decimal::MAX;
        assert_eq!(rules.checked_max_possible_score(), None);
        assert_eq!(rules.max_possible_score(), Decimal::MAX);

        rules.age.max_points = Decimal::MAX;
        assert_eq!(rules.age.checked_ceiling(), None);
        assert_eq!(rules.age.ceiling(), Decimal::MAX);
    }

    #[test]
    fn test_limits_ignored_when_flag_is_off() {
        let rule = NumericRule {
            has_lower_limit: false,
            min_value: Some(dec("10")),
            has_upper_limit: false,
            max_value: Some(dec("20")),
            ..DEFAULT_SCORING_CONFIG.age
        };

        assert_eq!(rule.lower_limit(), None);
        assert_eq!(rule.upper_limit(), None);
        assert!(rule.admits(dec("5")));
        assert_eq!(rule.clamp(dec("100")), dec("100"));
    }

    #[test]
    fn test_clamp_respects_limits() {
        let rule = &DEFAULT_SCORING_CONFIG.proof;
        assert_eq!(rule.clamp(dec("60")), dec("80"));
        assert_eq!(rule.clamp(dec("115.2")), dec("115.2"));
        assert_eq!(rule.clamp(dec("200")), dec("160"));
        assert!(!rule.admits(dec("79.9")));
        assert!(rule.admits(dec("160")));
    }

    #[test]
    fn test_deserializes_source_field_names() {
        let json = r#"{
            "age": {"maxPoints": 35, "pointDeductionPerYear": 6, "exactMatchBonus": 20,
                    "gracePeriod": 2, "hasLowerLimit": true, "minValue": 1},
            "proof": {"maxPoints": 35, "pointDeductionPerProof": 3, "exactMatchBonus": 20},
            "mashbill": {"exactMatchBonus": 20}
        }"#;

        let rules: ScoringRules = serde_json::from_str(json).unwrap();
        assert_eq!(rules.age.penalty_per_unit, dec("6"));
        assert_eq!(rules.age.grace_period, Some(dec("2")));
        assert_eq!(rules.age.lower_limit(), Some(dec("1")));
        assert_eq!(rules.age.upper_limit(), None);
        assert_eq!(rules.proof.penalty_per_unit, dec("3"));
        assert!(!rules.proof.has_lower_limit);
    }
}
