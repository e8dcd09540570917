//! HTTP handlers for quarter management

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use shared::{Quarter, QuarterSummary, ScoringRules};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::{require_admin, CurrentPlayer},
    services::quarter::CreateQuarterInput,
    services::QuarterService,
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveInput {
    pub is_active: bool,
}

fn quarter_service(state: &AppState) -> QuarterService {
    QuarterService::new(state.store.clone(), state.analytics.clone())
}

/// The quarter currently open for play
pub async fn get_active_quarter(State(state): State<AppState>) -> AppResult<Json<QuarterSummary>> {
    let quarter = quarter_service(&state).active_quarter(Utc::now()).await?;
    Ok(Json(quarter.summary()))
}

/// List quarters without their answers
pub async fn list_quarters(
    State(state): State<AppState>,
    _player: CurrentPlayer,
) -> AppResult<Json<Vec<QuarterSummary>>> {
    let quarters = quarter_service(&state).list_quarters().await?;
    Ok(Json(quarters.iter().map(Quarter::summary).collect()))
}

/// Get a quarter without its answers
pub async fn get_quarter(
    State(state): State<AppState>,
    _player: CurrentPlayer,
    Path(quarter_id): Path<Uuid>,
) -> AppResult<Json<QuarterSummary>> {
    let quarter = quarter_service(&state).get_quarter(quarter_id).await?;
    Ok(Json(quarter.summary()))
}

/// Get a quarter including samples and rules (admin)
pub async fn get_quarter_full(
    State(state): State<AppState>,
    CurrentPlayer(player): CurrentPlayer,
    Path(quarter_id): Path<Uuid>,
) -> AppResult<Json<Quarter>> {
    require_admin(&player)?;
    let quarter = quarter_service(&state).get_quarter(quarter_id).await?;
    Ok(Json(quarter))
}

/// Create a quarter (admin)
pub async fn create_quarter(
    State(state): State<AppState>,
    CurrentPlayer(player): CurrentPlayer,
    Json(input): Json<CreateQuarterInput>,
) -> AppResult<Json<Quarter>> {
    require_admin(&player)?;
    let quarter = quarter_service(&state).create_quarter(input, Utc::now()).await?;
    Ok(Json(quarter))
}

/// Replace a quarter's scoring rules (admin)
pub async fn update_scoring_rules(
    State(state): State<AppState>,
    CurrentPlayer(player): CurrentPlayer,
    Path(quarter_id): Path<Uuid>,
    Json(rules): Json<ScoringRules>,
) -> AppResult<Json<Quarter>> {
    require_admin(&player)?;
    let quarter = quarter_service(&state)
        .update_rules(quarter_id, rules, Utc::now())
        .await?;
    Ok(Json(quarter))
}

/// Open or close a quarter (admin)
pub async fn set_quarter_active(
    State(state): State<AppState>,
    CurrentPlayer(player): CurrentPlayer,
    Path(quarter_id): Path<Uuid>,
    Json(input): Json<SetActiveInput>,
) -> AppResult<Json<QuarterSummary>> {
    require_admin(&player)?;
    let quarter = quarter_service(&state)
        .set_active(quarter_id, input.is_active, Utc::now())
        .await?;
    Ok(Json(quarter.summary()))
}
