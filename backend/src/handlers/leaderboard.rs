//! HTTP handlers for leaderboards

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{GlobalLeaderboardEntry, LeaderboardEntry};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::CurrentPlayer,
    services::leaderboard::QuarterLeaderboard,
    services::LeaderboardService,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

/// Ranked final results of a quarter
pub async fn get_quarter_leaderboard(
    State(state): State<AppState>,
    _player: CurrentPlayer,
    Path(quarter_id): Path<Uuid>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<Json<QuarterLeaderboard>> {
    let limit = state.config.leaderboard.resolve_limit(query.limit);
    let board = LeaderboardService::new(state.store.clone())
        .quarter_leaderboard(quarter_id, limit)
        .await?;
    Ok(Json(board))
}

/// The caller's standing in a quarter
pub async fn get_my_rank(
    State(state): State<AppState>,
    CurrentPlayer(player): CurrentPlayer,
    Path(quarter_id): Path<Uuid>,
) -> AppResult<Json<LeaderboardEntry>> {
    let entry = LeaderboardService::new(state.store.clone())
        .player_rank(quarter_id, &player.player_id)
        .await?;
    Ok(Json(entry))
}

/// All-time standings
pub async fn get_global_leaderboard(
    State(state): State<AppState>,
    _player: CurrentPlayer,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<Json<Vec<GlobalLeaderboardEntry>>> {
    let limit = state.config.leaderboard.resolve_limit(query.limit);
    let entries = LeaderboardService::new(state.store.clone())
        .global_leaderboard(limit)
        .await?;
    Ok(Json(entries))
}
