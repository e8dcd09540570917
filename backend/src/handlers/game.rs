//! HTTP handlers for playing a quarter

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use shared::GameResult;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::CurrentPlayer,
    services::game::{ResultView, SubmitGameInput},
    services::GameService,
    AppState,
};

fn game_service(state: &AppState) -> GameService {
    GameService::new(state.store.clone(), state.analytics.clone())
}

/// Submit guesses for a quarter
pub async fn submit_game(
    State(state): State<AppState>,
    CurrentPlayer(player): CurrentPlayer,
    Path(quarter_id): Path<Uuid>,
    Json(input): Json<SubmitGameInput>,
) -> AppResult<(StatusCode, Json<ResultView>)> {
    let view = game_service(&state)
        .submit(&player, quarter_id, input, Utc::now())
        .await?;

    let status = if view.result.is_final() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(view)))
}

/// The caller's result for a quarter
pub async fn get_my_result(
    State(state): State<AppState>,
    CurrentPlayer(player): CurrentPlayer,
    Path(quarter_id): Path<Uuid>,
) -> AppResult<Json<ResultView>> {
    let view = game_service(&state)
        .get_result(&player.player_id, quarter_id)
        .await?;
    Ok(Json(view))
}

/// Every result of the caller
pub async fn get_my_history(
    State(state): State<AppState>,
    CurrentPlayer(player): CurrentPlayer,
) -> AppResult<Json<Vec<GameResult>>> {
    let history = game_service(&state).player_history(&player.player_id).await?;
    Ok(Json(history))
}
