//! Score result models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ScoringError, ScoringResult};
use crate::types::SampleId;

/// Per-sample score breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub age: Decimal,
    pub proof: Decimal,
    pub mashbill: Decimal,
    pub total: Decimal,
    /// Ceiling of the rules the sample was scored with
    pub max_possible: Decimal,
    /// `total / max_possible * 100`, zero when the ceiling is zero
    pub accuracy: Decimal,
}

impl ScoreResult {
    /// Sum the attribute scores and derive accuracy against `max_possible`.
    ///
    /// Fails instead of overflowing when the values cannot be represented.
    pub fn new(
        age: Decimal,
        proof: Decimal,
        mashbill: Decimal,
        max_possible: Decimal,
    ) -> ScoringResult<Self> {
        let total = age
            .checked_add(proof)
            .and_then(|sum| sum.checked_add(mashbill))
            .ok_or_else(|| ScoringError::too_large("total"))?;
        let accuracy = if max_possible.is_zero() {
            Decimal::ZERO
        } else {
            total
                .checked_div(max_possible)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or_else(|| ScoringError::too_large("accuracy"))?
        };

        Ok(Self {
            age,
            proof,
            mashbill,
            total,
            max_possible,
            accuracy,
        })
    }
}

/// Whether every sample of the quarter has been scored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Completeness {
    Complete,
    Incomplete { missing: Vec<SampleId> },
}

/// The sample a player came closest on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BestGuess {
    pub sample_id: SampleId,
    pub accuracy: Decimal,
    pub total: Decimal,
}

/// Quarter-level totals folded from per-sample results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuarterAggregate {
    pub total_score: Decimal,
    pub max_possible_score: Decimal,
    pub average_accuracy: Decimal,
    pub best_guess: Option<BestGuess>,
    pub scored_samples: usize,
    pub completeness: Completeness,
}

impl QuarterAggregate {
    /// Only complete aggregates may be presented as a final score
    pub fn is_complete(&self) -> bool {
        self.completeness == Completeness::Complete
    }
}
