//! Game result and leaderboard models

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Guess, QuarterAggregate};
use crate::types::SampleId;

/// Lifecycle of a stored play-through
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// Saved progress; not ranked and may be replaced
    InProgress,
    /// Submitted; immutable and ranked
    Final,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::InProgress => "in_progress",
            ResultStatus::Final => "final",
        }
    }
}

impl std::str::FromStr for ResultStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ResultStatus::InProgress),
            "final" => Ok(ResultStatus::Final),
            other => Err(format!("unknown result status '{}'", other)),
        }
    }
}

/// One player's play-through of one quarter, keyed by `(player_id, quarter_id)`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub id: Uuid,
    pub player_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub quarter_id: Uuid,
    pub status: ResultStatus,
    /// Guesses with their scores filled in
    pub guesses: BTreeMap<SampleId, Guess>,
    pub aggregate: QuarterAggregate,
    pub completed_at: DateTime<Utc>,
}

impl GameResult {
    pub fn is_final(&self) -> bool {
        self.status == ResultStatus::Final
    }
}

/// Row of a quarter leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub total_score: Decimal,
    pub average_accuracy: Decimal,
    pub completed_at: DateTime<Utc>,
}

/// Row of the all-time leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlobalLeaderboardEntry {
    pub rank: u32,
    pub player_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub total_score: Decimal,
    pub quarters_played: u32,
    pub average_accuracy: Decimal,
}
