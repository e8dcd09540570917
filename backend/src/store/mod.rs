//! Persistence for quarters and game results
//!
//! Services talk to a [`GameStore`] so they run unchanged against Postgres in
//! production and the in-memory store in development and tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{GameResult, Quarter, ScoringRules};
use uuid::Uuid;

/// Storage abstraction for quarters and results
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Short name reported by the health check
    fn backend_name(&self) -> &'static str;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    async fn insert_quarter(&self, quarter: Quarter) -> Result<Quarter, StoreError>;

    /// Open or close a quarter. Fails with `NotFound` if it does not exist.
    async fn set_quarter_active(
        &self,
        id: Uuid,
        is_active: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<Quarter, StoreError>;

    /// Replace a quarter's scoring rules unless any result has been recorded.
    ///
    /// The check and the write are atomic with respect to `save_result`.
    /// Returns `false` and leaves the quarter untouched once it has been played.
    async fn update_rules_if_unplayed(
        &self,
        id: Uuid,
        rules: &ScoringRules,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    async fn fetch_quarter(&self, id: Uuid) -> Result<Option<Quarter>, StoreError>;

    /// All quarters, newest start date first
    async fn list_quarters(&self) -> Result<Vec<Quarter>, StoreError>;

    /// Save a play-through keyed by `(player_id, quarter_id)`.
    ///
    /// Replaces saved progress; fails with `Conflict` when a final result
    /// already exists for the key or when the quarter's rules are no longer
    /// `scored_with`.
    async fn save_result(
        &self,
        result: GameResult,
        scored_with: &ScoringRules,
    ) -> Result<GameResult, StoreError>;

    async fn fetch_result(
        &self,
        player_id: &str,
        quarter_id: Uuid,
    ) -> Result<Option<GameResult>, StoreError>;

    /// Final results for one quarter, in no particular order
    async fn final_results_for_quarter(&self, quarter_id: Uuid)
        -> Result<Vec<GameResult>, StoreError>;

    /// Final results across all quarters
    async fn all_final_results(&self) -> Result<Vec<GameResult>, StoreError>;

    /// Every result of one player, newest first
    async fn results_for_player(&self, player_id: &str) -> Result<Vec<GameResult>, StoreError>;
}

/// Error enumeration for store failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists: {0}")]
    Conflict(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("stored record is unreadable: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
