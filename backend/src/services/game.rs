//! Game submission and result lookup
//!
//! Guesses are always rescored on the server against the quarter's stored
//! samples and rules; any score the client sends along is discarded.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    aggregate, score_guesses, Completeness, GameResult, Guess, ResultStatus, SampleId,
    WhiskeySample,
};
use uuid::Uuid;

use crate::analytics::{AnalyticsSink, GameEvent};
use crate::error::{AppError, AppResult};
use crate::middleware::Player;
use crate::store::GameStore;

/// Game service for scoring and storing submissions
#[derive(Clone)]
pub struct GameService {
    store: Arc<dyn GameStore>,
    analytics: Arc<dyn AnalyticsSink>,
}

/// A player's guesses for a quarter
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitGameInput {
    pub guesses: BTreeMap<SampleId, Guess>,
    /// Store the guesses as progress instead of a final result
    #[serde(default)]
    pub save_progress: bool,
}

/// A stored result, with the quarter's samples revealed once it is final
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    #[serde(flatten)]
    pub result: GameResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed_samples: Option<Vec<WhiskeySample>>,
}

impl GameService {
    pub fn new(store: Arc<dyn GameStore>, analytics: Arc<dyn AnalyticsSink>) -> Self {
        Self { store, analytics }
    }

    /// Score a submission and store it
    pub async fn submit(
        &self,
        player: &Player,
        quarter_id: Uuid,
        input: SubmitGameInput,
        now: DateTime<Utc>,
    ) -> AppResult<ResultView> {
        let quarter = self
            .store
            .fetch_quarter(quarter_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quarter".to_string()))?;

        if !quarter.is_open_at(now) {
            return Err(self.rejected(player, quarter_id, AppError::QuarterClosed(quarter_id)));
        }

        if let Some(existing) = self.store.fetch_result(&player.player_id, quarter_id).await? {
            if existing.is_final() {
                return Err(self.rejected(
                    player,
                    quarter_id,
                    AppError::Conflict("this quarter has already been submitted".to_string()),
                ));
            }
        }

        let scores = score_guesses(&quarter.samples, &input.guesses, &quarter.scoring_rules)
            .map_err(|err| self.rejected(player, quarter_id, err.into()))?;
        let aggregate =
            aggregate(&scores).map_err(|err| self.rejected(player, quarter_id, err.into()))?;

        let status = if input.save_progress {
            ResultStatus::InProgress
        } else if let Completeness::Incomplete { missing } = &aggregate.completeness {
            return Err(self.rejected(
                player,
                quarter_id,
                AppError::IncompleteSubmission {
                    missing: missing.clone(),
                },
            ));
        } else {
            ResultStatus::Final
        };

        let guesses = input
            .guesses
            .into_iter()
            .map(|(id, mut guess)| {
                guess.score = scores.get(&id).cloned();
                (id, guess)
            })
            .collect();

        let result = GameResult {
            id: Uuid::new_v4(),
            player_id: player.player_id.clone(),
            player_name: player.display_name.clone(),
            quarter_id,
            status,
            guesses,
            aggregate,
            completed_at: now,
        };

        let result = self
            .store
            .save_result(result, &quarter.scoring_rules)
            .await
            .map_err(|err| self.rejected(player, quarter_id, err.into()))?;

        tracing::info!(
            player_id = %result.player_id,
            %quarter_id,
            status = result.status.as_str(),
            total_score = %result.aggregate.total_score,
            "game result saved"
        );
        self.analytics.record(GameEvent::GameSubmitted {
            player_id: result.player_id.clone(),
            quarter_id,
            total_score: result.aggregate.total_score,
            average_accuracy: result.aggregate.average_accuracy,
            complete: result.aggregate.is_complete(),
        });

        Ok(ResultView {
            revealed_samples: result.is_final().then(|| quarter.samples.clone()),
            result,
        })
    }

    /// A player's result for a quarter
    pub async fn get_result(&self, player_id: &str, quarter_id: Uuid) -> AppResult<ResultView> {
        let result = self
            .store
            .fetch_result(player_id, quarter_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Result".to_string()))?;

        let revealed_samples = if result.is_final() {
            self.store
                .fetch_quarter(quarter_id)
                .await?
                .map(|quarter| quarter.samples)
        } else {
            None
        };

        Ok(ResultView {
            result,
            revealed_samples,
        })
    }

    /// Every result a player has, newest first
    pub async fn player_history(&self, player_id: &str) -> AppResult<Vec<GameResult>> {
        Ok(self.store.results_for_player(player_id).await?)
    }

    fn rejected(&self, player: &Player, quarter_id: Uuid, err: AppError) -> AppError {
        self.analytics.record(GameEvent::SubmissionRejected {
            player_id: player.player_id.clone(),
            quarter_id,
            reason: err.to_string(),
        });
        err
    }
}
