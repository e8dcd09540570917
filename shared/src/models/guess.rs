//! Player guess models

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ScoreResult, ScoringRules};

/// A player's estimate for one sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Guess {
    pub age: i32,
    pub proof: Decimal,
    /// Raw category label as entered by the player
    pub mashbill: String,
    /// Filled in by the scoring engine after submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreResult>,
}

impl Guess {
    pub fn new(age: i32, proof: Decimal, mashbill: impl Into<String>) -> Self {
        Self {
            age,
            proof,
            mashbill: mashbill.into(),
            score: None,
        }
    }

    /// Clamp the numeric estimates into the limits configured by `rules`.
    ///
    /// Negative values are raised to zero even when no lower limit is set.
    /// Age limits are rounded inwards so the clamped age stays a whole year.
    pub fn clamped(&self, rules: &ScoringRules) -> Guess {
        let mut age = Decimal::from(self.age.max(0));
        if let Some(min) = rules.age.lower_limit() {
            age = age.max(min.ceil());
        }
        if let Some(max) = rules.age.upper_limit() {
            age = age.min(max.floor());
        }
        let age = age.to_i32().unwrap_or(i32::MAX);
        let proof = rules.proof.clamp(self.proof.max(Decimal::ZERO));

        Guess {
            age,
            proof,
            mashbill: self.mashbill.clone(),
            score: None,
        }
    }
}
