//! Game analytics events
//!
//! Services receive an [`AnalyticsSink`] through `AppState` rather than
//! reaching for a global instance, so tests can capture what was recorded.

use rust_decimal::Decimal;
use uuid::Uuid;

/// Something worth counting happened
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    QuarterCreated {
        quarter_id: Uuid,
        name: String,
    },
    RulesUpdated {
        quarter_id: Uuid,
    },
    GameSubmitted {
        player_id: String,
        quarter_id: Uuid,
        total_score: Decimal,
        average_accuracy: Decimal,
        complete: bool,
    },
    SubmissionRejected {
        player_id: String,
        quarter_id: Uuid,
        reason: String,
    },
}

/// Destination for analytics events
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, event: GameEvent);
}

/// Writes events as structured tracing records under the `analytics` target
#[derive(Debug, Default, Clone)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn record(&self, event: GameEvent) {
        match &event {
            GameEvent::QuarterCreated { quarter_id, name } => {
                tracing::info!(target: "analytics", %quarter_id, %name, "quarter_created");
            }
            GameEvent::RulesUpdated { quarter_id } => {
                tracing::info!(target: "analytics", %quarter_id, "rules_updated");
            }
            GameEvent::GameSubmitted {
                player_id,
                quarter_id,
                total_score,
                average_accuracy,
                complete,
            } => {
                tracing::info!(
                    target: "analytics",
                    %player_id,
                    %quarter_id,
                    %total_score,
                    %average_accuracy,
                    complete,
                    "game_submitted"
                );
            }
            GameEvent::SubmissionRejected {
                player_id,
                quarter_id,
                reason,
            } => {
                tracing::warn!(target: "analytics", %player_id, %quarter_id, %reason, "submission_rejected");
            }
        }
    }
}
