//! Folds per-sample results into quarter totals

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{ScoringError, ScoringResult};
use crate::models::{BestGuess, Completeness, QuarterAggregate, ScoreResult};
use crate::types::SampleId;

/// Aggregate the scored samples of one play-through.
///
/// Only the samples present are counted. When any of A–D is missing the
/// aggregate is marked incomplete and must not be shown as a final score.
/// The best guess is the highest accuracy; ties go to the earlier label.
/// Fails if a sum leaves the representable range.
pub fn aggregate(results: &BTreeMap<SampleId, ScoreResult>) -> ScoringResult<QuarterAggregate> {
    let total_score = checked_sum("totalScore", results.values().map(|r| r.total))?;
    let max_possible_score =
        checked_sum("maxPossibleScore", results.values().map(|r| r.max_possible))?;

    let average_accuracy = if results.is_empty() {
        Decimal::ZERO
    } else {
        checked_sum("averageAccuracy", results.values().map(|r| r.accuracy))?
            / Decimal::from(results.len())
    };

    // BTreeMap iterates A..D, so a strict comparison keeps the earliest label on ties
    let mut best_guess: Option<BestGuess> = None;
    for (id, result) in results {
        let better = best_guess
            .as_ref()
            .map_or(true, |best| result.accuracy > best.accuracy);
        if better {
            best_guess = Some(BestGuess {
                sample_id: *id,
                accuracy: result.accuracy,
                total: result.total,
            });
        }
    }

    let missing: Vec<SampleId> = SampleId::ALL
        .into_iter()
        .filter(|id| !results.contains_key(id))
        .collect();
    let completeness = if missing.is_empty() {
        Completeness::Complete
    } else {
        Completeness::Incomplete { missing }
    };

    Ok(QuarterAggregate {
        total_score,
        max_possible_score,
        average_accuracy,
        best_guess,
        scored_samples: results.len(),
        completeness,
    })
}

fn checked_sum(field: &str, mut values: impl Iterator<Item = Decimal>) -> ScoringResult<Decimal> {
    values
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(value))
        .ok_or_else(|| ScoringError::too_large(field))
}
