//! PostgreSQL store
//!
//! Samples, rules, guesses and aggregates are kept as JSONB; totals used for
//! ranking are duplicated into NUMERIC columns.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{
    Difficulty, GameResult, Guess, Quarter, QuarterAggregate, ResultStatus, SampleId,
    ScoringRules, WhiskeySample,
};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{GameStore, StoreError};

/// Store backed by a Postgres connection pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

/// Database row for a quarter
#[derive(Debug, sqlx::FromRow)]
struct QuarterRow {
    id: Uuid,
    name: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    is_active: bool,
    difficulty: String,
    samples: Json<Vec<WhiskeySample>>,
    scoring_rules: Json<ScoringRules>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Database row for a game result
#[derive(Debug, sqlx::FromRow)]
struct GameResultRow {
    id: Uuid,
    player_id: String,
    player_name: Option<String>,
    quarter_id: Uuid,
    status: String,
    guesses: Json<BTreeMap<SampleId, Guess>>,
    aggregate: Json<QuarterAggregate>,
    completed_at: DateTime<Utc>,
}

const QUARTER_COLUMNS: &str = "id, name, start_date, end_date, is_active, difficulty, \
     samples, scoring_rules, created_at, updated_at";

const RESULT_COLUMNS: &str =
    "id, player_id, player_name, quarter_id, status, guesses, aggregate, completed_at";

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply the embedded migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.db).await
    }

    fn row_to_quarter(row: QuarterRow) -> Result<Quarter, StoreError> {
        let difficulty = row
            .difficulty
            .parse::<Difficulty>()
            .map_err(StoreError::Corrupt)?;

        Ok(Quarter {
            id: row.id,
            name: row.name,
            start_date: row.start_date,
            end_date: row.end_date,
            is_active: row.is_active,
            difficulty,
            samples: row.samples.0,
            scoring_rules: row.scoring_rules.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn row_to_result(row: GameResultRow) -> Result<GameResult, StoreError> {
        let status = row.status.parse::<ResultStatus>().map_err(StoreError::Corrupt)?;

        Ok(GameResult {
            id: row.id,
            player_id: row.player_id,
            player_name: row.player_name,
            quarter_id: row.quarter_id,
            status,
            guesses: row.guesses.0,
            aggregate: row.aggregate.0,
            completed_at: row.completed_at,
        })
    }

    async fn query_results(
        &self,
        filter: &str,
        bind: Option<ResultFilter<'_>>,
    ) -> Result<Vec<GameResult>, StoreError> {
        let sql = format!("SELECT {} FROM game_results {}", RESULT_COLUMNS, filter);
        let query = sqlx::query_as::<_, GameResultRow>(&sql);
        let query = match bind {
            Some(ResultFilter::Quarter(id)) => query.bind(id),
            Some(ResultFilter::Player(player_id)) => query.bind(player_id),
            None => query,
        };

        query
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(Self::row_to_result)
            .collect()
    }
}

enum ResultFilter<'a> {
    Quarter(Uuid),
    Player(&'a str),
}

#[async_trait]
impl GameStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn insert_quarter(&self, quarter: Quarter) -> Result<Quarter, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO quarters ({QUARTER_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {QUARTER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, QuarterRow>(&sql)
            .bind(quarter.id)
            .bind(&quarter.name)
            .bind(quarter.start_date)
            .bind(quarter.end_date)
            .bind(quarter.is_active)
            .bind(quarter.difficulty.as_str())
            .bind(Json(&quarter.samples))
            .bind(Json(&quarter.scoring_rules))
            .bind(quarter.created_at)
            .bind(quarter.updated_at)
            .fetch_one(&self.db)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StoreError::Conflict(format!("quarter {}", quarter.id))
                }
                other => StoreError::Database(other),
            })?;

        Self::row_to_quarter(row)
    }

    async fn set_quarter_active(
        &self,
        id: Uuid,
        is_active: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<Quarter, StoreError> {
        let sql = format!(
            "UPDATE quarters SET is_active = $2, updated_at = $3 WHERE id = $1 \
             RETURNING {QUARTER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, QuarterRow>(&sql)
            .bind(id)
            .bind(is_active)
            .bind(updated_at)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("quarter {id}")))?;

        Self::row_to_quarter(row)
    }

    async fn update_rules_if_unplayed(
        &self,
        id: Uuid,
        rules: &ScoringRules,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut tx = self.db.begin().await?;

        // The row lock queues behind any save_result holding FOR SHARE, so the
        // results check below sees every result committed before it.
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM quarters WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("quarter {id}")))?;

        let updated = sqlx::query(
            r#"
            UPDATE quarters
            SET scoring_rules = $2, updated_at = $3
            WHERE id = $1
              AND NOT EXISTS (SELECT 1 FROM game_results WHERE quarter_id = $1)
            "#,
        )
        .bind(id)
        .bind(Json(rules))
        .bind(updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated.rows_affected() == 1)
    }

    async fn fetch_quarter(&self, id: Uuid) -> Result<Option<Quarter>, StoreError> {
        let sql = format!("SELECT {QUARTER_COLUMNS} FROM quarters WHERE id = $1");
        sqlx::query_as::<_, QuarterRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .map(Self::row_to_quarter)
            .transpose()
    }

    async fn list_quarters(&self) -> Result<Vec<Quarter>, StoreError> {
        let sql = format!("SELECT {QUARTER_COLUMNS} FROM quarters ORDER BY start_date DESC, id");
        sqlx::query_as::<_, QuarterRow>(&sql)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(Self::row_to_quarter)
            .collect()
    }

    async fn save_result(
        &self,
        result: GameResult,
        scored_with: &ScoringRules,
    ) -> Result<GameResult, StoreError> {
        let mut tx = self.db.begin().await?;

        let current = sqlx::query_scalar::<_, Json<ScoringRules>>(
            "SELECT scoring_rules FROM quarters WHERE id = $1 FOR SHARE",
        )
        .bind(result.quarter_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("quarter {}", result.quarter_id)))?;

        if &current.0 != scored_with {
            return Err(StoreError::Conflict(format!(
                "scoring rules of quarter {} changed while the result was being scored",
                result.quarter_id
            )));
        }

        // A final row is never overwritten; saved progress is.
        let sql = format!(
            r#"
            INSERT INTO game_results (
                id, player_id, player_name, quarter_id, status, guesses, aggregate,
                total_score, average_accuracy, completed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (player_id, quarter_id) DO UPDATE
            SET id = EXCLUDED.id,
                player_name = EXCLUDED.player_name,
                status = EXCLUDED.status,
                guesses = EXCLUDED.guesses,
                aggregate = EXCLUDED.aggregate,
                total_score = EXCLUDED.total_score,
                average_accuracy = EXCLUDED.average_accuracy,
                completed_at = EXCLUDED.completed_at
            WHERE game_results.status <> 'final'
            RETURNING {RESULT_COLUMNS}
            "#
        );

        let total_score: Decimal = result.aggregate.total_score;
        let average_accuracy: Decimal = result.aggregate.average_accuracy;

        let row = sqlx::query_as::<_, GameResultRow>(&sql)
            .bind(result.id)
            .bind(&result.player_id)
            .bind(&result.player_name)
            .bind(result.quarter_id)
            .bind(result.status.as_str())
            .bind(Json(&result.guesses))
            .bind(Json(&result.aggregate))
            .bind(total_score)
            .bind(average_accuracy)
            .bind(result.completed_at)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                StoreError::Conflict(format!(
                    "result for player {} in quarter {}",
                    result.player_id, result.quarter_id
                ))
            })?;

        tx.commit().await?;
        Self::row_to_result(row)
    }

    async fn fetch_result(
        &self,
        player_id: &str,
        quarter_id: Uuid,
    ) -> Result<Option<GameResult>, StoreError> {
        let sql = format!(
            "SELECT {RESULT_COLUMNS} FROM game_results WHERE player_id = $1 AND quarter_id = $2"
        );
        sqlx::query_as::<_, GameResultRow>(&sql)
            .bind(player_id)
            .bind(quarter_id)
            .fetch_optional(&self.db)
            .await?
            .map(Self::row_to_result)
            .transpose()
    }

    async fn final_results_for_quarter(
        &self,
        quarter_id: Uuid,
    ) -> Result<Vec<GameResult>, StoreError> {
        self.query_results(
            "WHERE quarter_id = $1 AND status = 'final' \
             ORDER BY total_score DESC, average_accuracy DESC, completed_at",
            Some(ResultFilter::Quarter(quarter_id)),
        )
        .await
    }

    async fn all_final_results(&self) -> Result<Vec<GameResult>, StoreError> {
        self.query_results("WHERE status = 'final'", None).await
    }

    async fn results_for_player(&self, player_id: &str) -> Result<Vec<GameResult>, StoreError> {
        self.query_results(
            "WHERE player_id = $1 ORDER BY completed_at DESC",
            Some(ResultFilter::Player(player_id)),
        )
        .await
    }
}
