//! Quarter authoring and lookup
//!
//! A quarter is only stored once its samples and scoring rules pass
//! validation, and its rules are locked as soon as anyone has played it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::{
    validate_quarter_content, Difficulty, Quarter, ScoringRules, WhiskeySample,
};
use uuid::Uuid;
use validator::Validate;

use crate::analytics::{AnalyticsSink, GameEvent};
use crate::error::{AppError, AppResult};
use crate::store::GameStore;

/// Quarter service for authoring and looking up quarters
#[derive(Clone)]
pub struct QuarterService {
    store: Arc<dyn GameStore>,
    analytics: Arc<dyn AnalyticsSink>,
}

/// Input for creating a quarter
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuarterInput {
    #[validate(length(min = 1, max = 120, message = "Quarter name must be 1 to 120 characters"))]
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub is_active: bool,
    pub samples: Vec<WhiskeySample>,
    /// Falls back to the default configuration
    #[serde(default)]
    pub scoring_rules: Option<ScoringRules>,
}

impl QuarterService {
    pub fn new(store: Arc<dyn GameStore>, analytics: Arc<dyn AnalyticsSink>) -> Self {
        Self { store, analytics }
    }

    /// Create a quarter after validating its content
    pub async fn create_quarter(
        &self,
        input: CreateQuarterInput,
        now: DateTime<Utc>,
    ) -> AppResult<Quarter> {
        input.validate()?;
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Quarter name is required".to_string(),
            });
        }
        if input.start_date >= input.end_date {
            return Err(AppError::Validation {
                field: "endDate".to_string(),
                message: "Quarter must end after it starts".to_string(),
            });
        }

        let scoring_rules = input.scoring_rules.unwrap_or_default();
        validate_quarter_content(&input.samples, &scoring_rules)?;

        let mut samples = input.samples;
        samples.sort_by_key(|sample| sample.id);

        let quarter = Quarter {
            id: Uuid::new_v4(),
            name,
            start_date: input.start_date,
            end_date: input.end_date,
            is_active: input.is_active,
            difficulty: input.difficulty,
            samples,
            scoring_rules,
            created_at: now,
            updated_at: now,
        };

        let quarter = self.store.insert_quarter(quarter).await?;
        tracing::info!(quarter_id = %quarter.id, name = %quarter.name, "quarter created");
        self.analytics.record(GameEvent::QuarterCreated {
            quarter_id: quarter.id,
            name: quarter.name.clone(),
        });

        Ok(quarter)
    }

    /// Get a quarter with its samples
    pub async fn get_quarter(&self, id: Uuid) -> AppResult<Quarter> {
        self.store
            .fetch_quarter(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quarter".to_string()))
    }

    /// List all quarters, newest first
    pub async fn list_quarters(&self) -> AppResult<Vec<Quarter>> {
        Ok(self.store.list_quarters().await?)
    }

    /// The quarter open for play at `now`; the latest start wins if several are
    pub async fn active_quarter(&self, now: DateTime<Utc>) -> AppResult<Quarter> {
        self.store
            .list_quarters()
            .await?
            .into_iter()
            .find(|quarter| quarter.is_open_at(now))
            .ok_or_else(|| AppError::NotFound("Active quarter".to_string()))
    }

    /// Replace the scoring rules of a quarter nobody has played yet
    pub async fn update_rules(
        &self,
        id: Uuid,
        scoring_rules: ScoringRules,
        now: DateTime<Utc>,
    ) -> AppResult<Quarter> {
        let mut quarter = self.get_quarter(id).await?;
        validate_quarter_content(&quarter.samples, &scoring_rules)?;

        if !self
            .store
            .update_rules_if_unplayed(id, &scoring_rules, now)
            .await?
        {
            return Err(AppError::Conflict(
                "scoring rules are locked once players have submitted results".to_string(),
            ));
        }

        quarter.scoring_rules = scoring_rules;
        quarter.updated_at = now;

        tracing::info!(quarter_id = %id, "scoring rules updated");
        self.analytics.record(GameEvent::RulesUpdated { quarter_id: id });
        Ok(quarter)
    }

    /// Open or close a quarter for play
    pub async fn set_active(
        &self,
        id: Uuid,
        is_active: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Quarter> {
        let quarter = self.get_quarter(id).await?;
        if quarter.is_active == is_active {
            return Ok(quarter);
        }

        let quarter = self.store.set_quarter_active(id, is_active, now).await?;
        tracing::info!(quarter_id = %id, is_active, "quarter activity changed");
        Ok(quarter)
    }
}
