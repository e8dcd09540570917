//! In-memory store used in development and tests

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{GameResult, Quarter, ScoringRules};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{GameStore, StoreError};

/// Store backed by process memory; contents are lost on restart
///
/// Methods needing both maps lock `quarters` before `results`.
#[derive(Default)]
pub struct MemoryStore {
    quarters: RwLock<HashMap<Uuid, Quarter>>,
    results: RwLock<HashMap<(String, Uuid), GameResult>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_quarter(&self, quarter: Quarter) -> Result<Quarter, StoreError> {
        let mut quarters = self.quarters.write().await;
        if quarters.contains_key(&quarter.id) {
            return Err(StoreError::Conflict(format!("quarter {}", quarter.id)));
        }
        quarters.insert(quarter.id, quarter.clone());
        Ok(quarter)
    }

    async fn set_quarter_active(
        &self,
        id: Uuid,
        is_active: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<Quarter, StoreError> {
        let mut quarters = self.quarters.write().await;
        let stored = quarters
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("quarter {id}")))?;
        stored.is_active = is_active;
        stored.updated_at = updated_at;
        Ok(stored.clone())
    }

    async fn update_rules_if_unplayed(
        &self,
        id: Uuid,
        rules: &ScoringRules,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut quarters = self.quarters.write().await;
        let stored = quarters
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("quarter {id}")))?;

        // Held until the rules are written so no result can land in between.
        let results = self.results.read().await;
        if results.values().any(|r| r.quarter_id == id) {
            return Ok(false);
        }

        stored.scoring_rules = rules.clone();
        stored.updated_at = updated_at;
        Ok(true)
    }

    async fn fetch_quarter(&self, id: Uuid) -> Result<Option<Quarter>, StoreError> {
        Ok(self.quarters.read().await.get(&id).cloned())
    }

    async fn list_quarters(&self) -> Result<Vec<Quarter>, StoreError> {
        let mut quarters: Vec<Quarter> = self.quarters.read().await.values().cloned().collect();
        quarters.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(a.id.cmp(&b.id)));
        Ok(quarters)
    }

    async fn save_result(
        &self,
        result: GameResult,
        scored_with: &ScoringRules,
    ) -> Result<GameResult, StoreError> {
        let quarters = self.quarters.read().await;
        let quarter = quarters
            .get(&result.quarter_id)
            .ok_or_else(|| StoreError::NotFound(format!("quarter {}", result.quarter_id)))?;
        if &quarter.scoring_rules != scored_with {
            return Err(StoreError::Conflict(format!(
                "scoring rules of quarter {} changed while the result was being scored",
                result.quarter_id
            )));
        }

        let key = (result.player_id.clone(), result.quarter_id);
        let mut results = self.results.write().await;
        if results.get(&key).is_some_and(GameResult::is_final) {
            return Err(StoreError::Conflict(format!(
                "result for player {} in quarter {}",
                key.0, key.1
            )));
        }
        results.insert(key, result.clone());
        Ok(result)
    }

    async fn fetch_result(
        &self,
        player_id: &str,
        quarter_id: Uuid,
    ) -> Result<Option<GameResult>, StoreError> {
        let key = (player_id.to_string(), quarter_id);
        Ok(self.results.read().await.get(&key).cloned())
    }

    async fn final_results_for_quarter(
        &self,
        quarter_id: Uuid,
    ) -> Result<Vec<GameResult>, StoreError> {
        Ok(self
            .results
            .read()
            .await
            .values()
            .filter(|r| r.quarter_id == quarter_id && r.is_final())
            .cloned()
            .collect())
    }

    async fn all_final_results(&self) -> Result<Vec<GameResult>, StoreError> {
        Ok(self
            .results
            .read()
            .await
            .values()
            .filter(|r| r.is_final())
            .cloned()
            .collect())
    }

    async fn results_for_player(&self, player_id: &str) -> Result<Vec<GameResult>, StoreError> {
        let mut results: Vec<GameResult> = self
            .results
            .read()
            .await
            .values()
            .filter(|r| r.player_id == player_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(results)
    }
}
