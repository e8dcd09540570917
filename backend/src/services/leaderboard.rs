//! Leaderboard service
//!
//! Rankings are computed from final results only. Players with the same
//! total and accuracy share a rank and the next rank is skipped (1, 1, 3).

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{GameResult, GlobalLeaderboardEntry, LeaderboardEntry};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::GameStore;

/// Leaderboard service
#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn GameStore>,
}

/// A page of a quarter leaderboard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterLeaderboard {
    pub quarter_id: Uuid,
    pub total_players: usize,
    pub entries: Vec<LeaderboardEntry>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    /// Top `limit` final results of a quarter
    pub async fn quarter_leaderboard(
        &self,
        quarter_id: Uuid,
        limit: usize,
    ) -> AppResult<QuarterLeaderboard> {
        let entries = self.ranked_quarter(quarter_id).await?;
        let total_players = entries.len();

        Ok(QuarterLeaderboard {
            quarter_id,
            total_players,
            entries: entries.into_iter().take(limit).collect(),
        })
    }

    /// A single player's standing in a quarter
    pub async fn player_rank(&self, quarter_id: Uuid, player_id: &str) -> AppResult<LeaderboardEntry> {
        self.ranked_quarter(quarter_id)
            .await?
            .into_iter()
            .find(|entry| entry.player_id == player_id)
            .ok_or_else(|| AppError::NotFound("Leaderboard entry".to_string()))
    }

    /// All-time standings summed over every quarter played
    pub async fn global_leaderboard(&self, limit: usize) -> AppResult<Vec<GlobalLeaderboardEntry>> {
        let results = self.store.all_final_results().await?;
        let mut entries = rank_players(&results);
        entries.truncate(limit);
        Ok(entries)
    }

    async fn ranked_quarter(&self, quarter_id: Uuid) -> AppResult<Vec<LeaderboardEntry>> {
        if self.store.fetch_quarter(quarter_id).await?.is_none() {
            return Err(AppError::NotFound("Quarter".to_string()));
        }
        let results = self.store.final_results_for_quarter(quarter_id).await?;
        Ok(rank_results(&results))
    }
}

/// Rank final results of one quarter.
///
/// Order is total score, then average accuracy, both descending; earlier
/// completion breaks what remains but does not split a shared rank.
pub fn rank_results(results: &[GameResult]) -> Vec<LeaderboardEntry> {
    let mut finals: Vec<&GameResult> = results.iter().filter(|r| r.is_final()).collect();
    finals.sort_by(|a, b| {
        compare_standing(
            (a.aggregate.total_score, a.aggregate.average_accuracy),
            (b.aggregate.total_score, b.aggregate.average_accuracy),
        )
        .then_with(|| a.completed_at.cmp(&b.completed_at))
        .then_with(|| a.player_id.cmp(&b.player_id))
    });

    let keys: Vec<_> = finals
        .iter()
        .map(|r| (r.aggregate.total_score, r.aggregate.average_accuracy))
        .collect();

    finals
        .into_iter()
        .zip(competition_ranks(&keys))
        .map(|(result, rank)| LeaderboardEntry {
            rank,
            player_id: result.player_id.clone(),
            player_name: result.player_name.clone(),
            total_score: result.aggregate.total_score,
            average_accuracy: result.aggregate.average_accuracy,
            completed_at: result.completed_at,
        })
        .collect()
}

/// Fold final results into per-player totals and rank them
pub fn rank_players(results: &[GameResult]) -> Vec<GlobalLeaderboardEntry> {
    struct Totals {
        player_name: Option<String>,
        latest: chrono::DateTime<chrono::Utc>,
        total_score: Decimal,
        accuracy_sum: Decimal,
        quarters_played: u32,
    }

    let mut by_player: HashMap<&str, Totals> = HashMap::new();
    for result in results.iter().filter(|r| r.is_final()) {
        let totals = by_player
            .entry(result.player_id.as_str())
            .or_insert_with(|| Totals {
                player_name: None,
                latest: result.completed_at,
                total_score: Decimal::ZERO,
                accuracy_sum: Decimal::ZERO,
                quarters_played: 0,
            });

        // Most recent display name wins
        if result.player_name.is_some()
            && (totals.player_name.is_none() || result.completed_at >= totals.latest)
        {
            totals.player_name = result.player_name.clone();
        }
        totals.latest = totals.latest.max(result.completed_at);
        totals.total_score = totals.total_score.saturating_add(result.aggregate.total_score);
        totals.accuracy_sum = totals
            .accuracy_sum
            .saturating_add(result.aggregate.average_accuracy);
        totals.quarters_played += 1;
    }

    let mut players: Vec<_> = by_player
        .into_iter()
        .map(|(player_id, totals)| {
            let average_accuracy = totals.accuracy_sum / Decimal::from(totals.quarters_played);
            (player_id, totals, average_accuracy)
        })
        .collect();

    players.sort_by(|(a_id, a, a_acc), (b_id, b, b_acc)| {
        compare_standing((a.total_score, *a_acc), (b.total_score, *b_acc))
            .then_with(|| a_id.cmp(b_id))
    });

    let keys: Vec<_> = players
        .iter()
        .map(|(_, totals, accuracy)| (totals.total_score, *accuracy))
        .collect();

    players
        .into_iter()
        .zip(competition_ranks(&keys))
        .map(|((player_id, totals, average_accuracy), rank)| GlobalLeaderboardEntry {
            rank,
            player_id: player_id.to_string(),
            player_name: totals.player_name,
            total_score: totals.total_score,
            quarters_played: totals.quarters_played,
            average_accuracy,
        })
        .collect()
}

/// Higher total first, then higher accuracy
fn compare_standing(a: (Decimal, Decimal), b: (Decimal, Decimal)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1))
}

/// Standard competition ranks for keys that are already sorted
fn competition_ranks(sorted_keys: &[(Decimal, Decimal)]) -> Vec<u32> {
    let mut ranks = Vec::with_capacity(sorted_keys.len());
    for (position, key) in sorted_keys.iter().enumerate() {
        let rank = match position {
            0 => 1,
            _ if sorted_keys[position - 1] == *key => ranks[position - 1],
            _ => position as u32 + 1,
        };
        ranks.push(rank);
    }
    ranks
}
