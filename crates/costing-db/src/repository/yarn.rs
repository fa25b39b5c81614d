//! # Yarn Repository
//!
//! Yarn master list (count label → hank weight, unit price) and its
//! append-only price history.
//!
//! ## Price History
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  upsert("40s", 0.4, 250.0, "asha")                                     │
//! │       │                                                                 │
//! │       ▼  BEGIN                                                          │
//! │  SELECT unit_price FROM yarn_counts WHERE label = '40s'                │
//! │       │                                                                 │
//! │       ├── no row        → INSERT yarn + INSERT history (250.0)         │
//! │       ├── price differs → UPDATE yarn + INSERT history (new price)     │
//! │       └── same price    → UPDATE yarn (hank weight only), no history   │
//! │       │                                                                 │
//! │       ▼  COMMIT                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! History rows are never updated or deleted.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use costing_core::yarn::YarnCatalog;
use costing_core::{YarnCount, YarnPriceHistory};

#[derive(Debug, sqlx::FromRow)]
struct YarnRow {
    label: String,
    hank_weight: f64,
    unit_price: f64,
}

impl From<YarnRow> for YarnCount {
    fn from(row: YarnRow) -> Self {
        YarnCount::new(row.label, row.hank_weight, row.unit_price)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PriceHistoryRow {
    yarn_label: String,
    price: f64,
    updated_by: String,
    timestamp: DateTime<Utc>,
}

impl From<PriceHistoryRow> for YarnPriceHistory {
    fn from(row: PriceHistoryRow) -> Self {
        YarnPriceHistory {
            yarn_label: row.yarn_label,
            price: row.price,
            updated_by: row.updated_by,
            timestamp: row.timestamp,
        }
    }
}

/// Repository for the yarn master list.
///
/// ## Usage
/// ```rust,ignore
/// let repo = YarnRepository::new(pool);
///
/// repo.upsert("40s", 0.4, 250.0, "asha").await?;
/// let catalog = repo.catalog().await?;
/// ```
#[derive(Debug, Clone)]
pub struct YarnRepository {
    pool: SqlitePool,
}

impl YarnRepository {
    /// Creates a new YarnRepository.
    pub fn new(pool: SqlitePool) -> Self {
        YarnRepository { pool }
    }

    /// Lists all yarn counts, ordered by label.
    ///
    /// Dropdown ordering is a presentation concern; see
    /// [`costing_core::yarn::sort_count_labels`].
    pub async fn list(&self) -> DbResult<Vec<YarnCount>> {
        let yarns = sqlx::query_as::<_, YarnRow>(
            "SELECT label, hank_weight, unit_price FROM yarn_counts ORDER BY label",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = yarns.len(), "Listed yarn counts");
        Ok(yarns.into_iter().map(Into::into).collect())
    }

    /// Gets a yarn count by its exact label.
    pub async fn get_by_label(&self, label: &str) -> DbResult<Option<YarnCount>> {
        let yarn = sqlx::query_as::<_, YarnRow>(
            "SELECT label, hank_weight, unit_price FROM yarn_counts WHERE label = ?1",
        )
        .bind(label)
        .fetch_optional(&self.pool)
        .await?;

        Ok(yarn.map(Into::into))
    }

    /// Snapshot of the whole master list for the pure pipeline.
    pub async fn catalog(&self) -> DbResult<YarnCatalog> {
        Ok(self.list().await?.into_iter().collect())
    }

    /// Creates or updates a yarn count.
    ///
    /// A new yarn, or a changed price, appends one price history record
    /// in the same transaction.
    ///
    /// ## Returns
    /// The stored yarn and whether a history record was written.
    pub async fn upsert(
        &self,
        label: &str,
        hank_weight: f64,
        unit_price: f64,
        updated_by: &str,
    ) -> DbResult<(YarnCount, bool)> {
        debug!(label = %label, hank_weight, unit_price, "Upserting yarn count");

        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let existing: Option<f64> =
            sqlx::query_scalar("SELECT unit_price FROM yarn_counts WHERE label = ?1")
                .bind(label)
                .fetch_optional(&mut *tx)
                .await?;

        let price_changed = match existing {
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO yarn_counts (label, hank_weight, unit_price, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?4)
                    "#,
                )
                .bind(label)
                .bind(hank_weight)
                .bind(unit_price)
                .bind(now)
                .execute(&mut *tx)
                .await?;
                true
            }
            Some(previous) => {
                sqlx::query(
                    r#"
                    UPDATE yarn_counts
                    SET hank_weight = ?2, unit_price = ?3, updated_at = ?4
                    WHERE label = ?1
                    "#,
                )
                .bind(label)
                .bind(hank_weight)
                .bind(unit_price)
                .bind(now)
                .execute(&mut *tx)
                .await?;
                previous != unit_price
            }
        };

        if price_changed {
            sqlx::query(
                r#"
                INSERT INTO yarn_price_history (yarn_label, price, updated_by, timestamp)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(label)
            .bind(unit_price)
            .bind(updated_by)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(label = %label, price_changed, "Yarn count saved");
        Ok((YarnCount::new(label, hank_weight, unit_price), price_changed))
    }

    /// Price history of one yarn, oldest first.
    pub async fn price_history(&self, label: &str) -> DbResult<Vec<YarnPriceHistory>> {
        let rows = sqlx::query_as::<_, PriceHistoryRow>(
            r#"
            SELECT yarn_label, price, updated_by, timestamp
            FROM yarn_price_history
            WHERE yarn_label = ?1
            ORDER BY id
            "#,
        )
        .bind(label)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Counts yarns in the master list.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM yarn_counts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
