//! # Design Repository
//!
//! Database operations for finalized designs and their warp/weft lines.
//!
//! ## Design Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Design Lifecycle                                  │
//! │                                                                         │
//! │  1. SUBMIT                                                             │
//! │     └── insert() → designs row + design_lots rows (one transaction)    │
//! │     └── name taken? → DbError::UniqueViolation (conflict)              │
//! │                                                                         │
//! │  2. (OPTIONAL) COMPLETE                                                │
//! │     └── update_status(Completed) → only from Pending                   │
//! │                                                                         │
//! │  3. (OPTIONAL) DELETE                                                  │
//! │     └── delete() → design_lots removed by ON DELETE CASCADE            │
//! │                                                                         │
//! │  Costs are never updated. A wrong costing is deleted and resubmitted.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use costing_core::pattern::PatternReport;
use costing_core::{CoreError, DesignCosting, DesignLot, DesignStatus, Lot, LotKind, Money};

// =============================================================================
// Row Types
// =============================================================================

const DESIGN_COLUMNS: &str = r#"
    id, design_name, design_date, width,
    warp_cost, weft_cost, weaving_cost, washing_cost, mending_cost,
    twisting_cost, transport_cost, profit_percent, profit, subtotal, gst,
    final_total, status, warp_pattern, weft_pattern, created_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct DesignRow {
    id: String,
    design_name: String,
    design_date: NaiveDate,
    width: f64,
    warp_cost: i64,
    weft_cost: i64,
    weaving_cost: i64,
    washing_cost: i64,
    mending_cost: i64,
    twisting_cost: i64,
    transport_cost: i64,
    profit_percent: f64,
    profit: i64,
    subtotal: i64,
    gst: i64,
    final_total: i64,
    status: DesignStatus,
    warp_pattern: Option<String>,
    weft_pattern: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct LotRow {
    kind: LotKind,
    count_label: String,
    reed_or_pick: f64,
    cost_per_unit: f64,
    dyeing_cost_per_unit: f64,
    constant: f64,
    weight: f64,
}

impl From<LotRow> for DesignLot {
    fn from(row: LotRow) -> Self {
        DesignLot {
            lot: Lot::new(
                row.count_label,
                row.reed_or_pick,
                row.cost_per_unit,
                row.dyeing_cost_per_unit,
                row.constant,
            ),
            weight: row.weight,
        }
    }
}

/// One line of the design list.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct DesignSummary {
    pub id: String,
    pub design_name: String,
    pub design_date: NaiveDate,
    #[sqlx(try_from = "i64")]
    pub final_total: Money,
    pub status: DesignStatus,
    pub created_at: DateTime<Utc>,
}

fn encode_pattern(column: &str, pattern: &Option<PatternReport>) -> DbResult<Option<String>> {
    pattern
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| DbError::corrupt(column, e))
}

fn decode_pattern(column: &str, json: Option<String>) -> DbResult<Option<PatternReport>> {
    json.map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(|e| DbError::corrupt(column, e))
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for design database operations.
#[derive(Debug, Clone)]
pub struct DesignRepository {
    pool: SqlitePool,
}

impl DesignRepository {
    /// Creates a new DesignRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DesignRepository { pool }
    }

    /// Saves a finalized design with all its lot lines.
    ///
    /// ## Returns
    /// * `Ok(id)` - Design stored
    /// * `Err(DbError::UniqueViolation)` - `design_name` already exists
    pub async fn insert(&self, design: &DesignCosting) -> DbResult<String> {
        debug!(design_name = %design.design_name, id = %design.id, "Inserting design");

        let warp_pattern = encode_pattern("warp_pattern", &design.warp_pattern)?;
        let weft_pattern = encode_pattern("weft_pattern", &design.weft_pattern)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO designs (
                id, design_name, design_date, width,
                warp_cost, weft_cost, weaving_cost, washing_cost, mending_cost,
                twisting_cost, transport_cost, profit_percent, profit, subtotal, gst,
                final_total, status, warp_pattern, weft_pattern, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8, ?9,
                ?10, ?11, ?12, ?13, ?14, ?15,
                ?16, ?17, ?18, ?19, ?20, ?20
            )
            "#,
        )
        .bind(&design.id)
        .bind(&design.design_name)
        .bind(design.design_date)
        .bind(design.width)
        .bind(design.warp_cost.paise())
        .bind(design.weft_cost.paise())
        .bind(design.weaving_cost.paise())
        .bind(design.washing_cost.paise())
        .bind(design.mending_cost.paise())
        .bind(design.twisting_cost.paise())
        .bind(design.transport_cost.paise())
        .bind(design.profit_percent)
        .bind(design.profit.paise())
        .bind(design.subtotal.paise())
        .bind(design.gst.paise())
        .bind(design.final_total.paise())
        .bind(design.status)
        .bind(warp_pattern)
        .bind(weft_pattern)
        .bind(design.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.ends_with("design_name") => {
                DbError::duplicate("design_name", &design.design_name)
            }
            other => other,
        })?;

        for (kind, lots) in [(LotKind::Warp, &design.warps), (LotKind::Weft, &design.wefts)] {
            for (position, line) in lots.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO design_lots (
                        design_id, kind, position, count_label, reed_or_pick,
                        cost_per_unit, dyeing_cost_per_unit, constant, weight
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                )
                .bind(&design.id)
                .bind(kind)
                .bind(position as i64)
                .bind(&line.lot.count_label)
                .bind(line.lot.reed_or_pick)
                .bind(line.lot.cost_per_unit)
                .bind(line.lot.dyeing_cost_per_unit)
                .bind(line.lot.constant)
                .bind(line.weight)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            design_name = %design.design_name,
            final_total = %design.final_total,
            "Design saved"
        );
        Ok(design.id.clone())
    }

    /// Gets a design by ID, with its lots and pattern reports.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DesignCosting>> {
        let sql = format!("SELECT {DESIGN_COLUMNS} FROM designs WHERE id = ?1");
        let row = sqlx::query_as::<_, DesignRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    /// Gets a design by its unique name.
    pub async fn get_by_name(&self, design_name: &str) -> DbResult<Option<DesignCosting>> {
        let sql = format!("SELECT {DESIGN_COLUMNS} FROM designs WHERE design_name = ?1");
        let row = sqlx::query_as::<_, DesignRow>(&sql)
            .bind(design_name.trim())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    /// Loads the lot lines of a design row and builds the domain value.
    async fn assemble(&self, row: DesignRow) -> DbResult<DesignCosting> {
        let lots = sqlx::query_as::<_, LotRow>(
            r#"
            SELECT kind, count_label, reed_or_pick, cost_per_unit,
                   dyeing_cost_per_unit, constant, weight
            FROM design_lots
            WHERE design_id = ?1
            ORDER BY kind, position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let mut warps = Vec::new();
        let mut wefts = Vec::new();
        for lot in lots {
            match lot.kind {
                LotKind::Warp => warps.push(lot.into()),
                LotKind::Weft => wefts.push(lot.into()),
            }
        }

        Ok(DesignCosting {
            warp_pattern: decode_pattern("warp_pattern", row.warp_pattern)?,
            weft_pattern: decode_pattern("weft_pattern", row.weft_pattern)?,
            id: row.id,
            design_name: row.design_name,
            design_date: row.design_date,
            width: row.width,
            warps,
            wefts,
            warp_cost: Money::from_paise(row.warp_cost),
            weft_cost: Money::from_paise(row.weft_cost),
            weaving_cost: Money::from_paise(row.weaving_cost),
            washing_cost: Money::from_paise(row.washing_cost),
            mending_cost: Money::from_paise(row.mending_cost),
            twisting_cost: Money::from_paise(row.twisting_cost),
            transport_cost: Money::from_paise(row.transport_cost),
            profit_percent: row.profit_percent,
            profit: Money::from_paise(row.profit),
            subtotal: Money::from_paise(row.subtotal),
            gst: Money::from_paise(row.gst),
            final_total: Money::from_paise(row.final_total),
            status: row.status,
            created_at: row.created_at,
        })
    }

    /// Lists designs, newest first, optionally filtered by status.
    pub async fn list(&self, status: Option<DesignStatus>) -> DbResult<Vec<DesignSummary>> {
        let designs = sqlx::query_as::<_, DesignSummary>(
            r#"
            SELECT id, design_name, design_date, final_total, status, created_at
            FROM designs
            WHERE ?1 IS NULL OR status = ?1
            ORDER BY created_at DESC, design_name
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = designs.len(), "Listed designs");
        Ok(designs)
    }

    /// Moves a design to a new status.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no design with this ID
    /// * `DbError::Domain(InvalidStatusTransition)` - only `Pending → Completed` is allowed
    pub async fn update_status(&self, id: &str, next: DesignStatus) -> DbResult<()> {
        debug!(id = %id, status = next.as_str(), "Updating design status");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let current: Option<DesignStatus> =
            sqlx::query_scalar("SELECT status FROM designs WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let current = current.ok_or_else(|| DbError::not_found("Design", id))?;
        if !current.can_transition_to(next) {
            return Err(CoreError::InvalidStatusTransition {
                design_id: id.to_string(),
                from: current.as_str().to_string(),
                to: next.as_str().to_string(),
            }
            .into());
        }

        sqlx::query("UPDATE designs SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(next)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Deletes a design. Its lot lines go with it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting design");

        let result = sqlx::query("DELETE FROM designs WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Design", id));
        }

        Ok(())
    }

    /// Counts stored designs.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM designs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::TimeZone;
    use costing_core::pattern::{build_report, PatternRequest};
    use costing_core::pipeline::{compute_costing, finalize_design, CostingRequest, DesignMeta};
    use costing_core::yarn::YarnCatalog;
    use costing_core::{PatternSegment, Rate, YarnCount};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn design(id: &str, name: &str, hour: u32) -> DesignCosting {
        let catalog = YarnCatalog::from_iter([YarnCount::new("40s", 0.4, 250.0)]);
        let request = CostingRequest {
            width: 50.0,
            warps: vec![
                Lot::new("40s", 100.0, 100.0, 20.0, 1.35),
                Lot::new("40s", 60.0, 100.0, 0.0, 1.45),
            ],
            wefts: vec![Lot::new("40s", 80.0, 90.0, 15.0, 1.35)],
            weaving_cost: Money::from_paise(4575),
            washing_cost: Money::from_paise(1250),
            mending_cost: Money::from_paise(825),
            twisting_cost: Money::zero(),
            transport_cost: Money::from_paise(2500),
            profit_rate: Rate::from_bps(1500),
        };
        let result = compute_costing(&request, &catalog).unwrap();
        let meta = DesignMeta {
            id: id.to_string(),
            design_name: name.to_string(),
            design_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
        };
        finalize_design(meta, &request, &result)
    }

    async fn lot_rows(db: &Database, id: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM design_lots WHERE design_id = ?1")
            .bind(id)
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let db = db().await;
        let mut original = design("d-1", "Oxford Check", 9);
        original.warp_pattern = Some(
            build_report(&PatternRequest::for_fabric(
                50.0,
                100.0,
                vec![PatternSegment::new("Navy", 24), PatternSegment::new("White", 8)],
                6.0,
                1.0,
            ))
            .unwrap(),
        );

        let id = db.designs().insert(&original).await.unwrap();
        assert_eq!(id, "d-1");
        assert_eq!(lot_rows(&db, "d-1").await, 3);

        let stored = db.designs().get_by_id("d-1").await.unwrap().unwrap();
        assert_eq!(stored, original);

        let by_name = db.designs().get_by_name(" Oxford Check ").await.unwrap().unwrap();
        assert_eq!(by_name.id, "d-1");
        assert_eq!(by_name.warps[1].lot.reed_or_pick, 60.0);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let db = db().await;
        db.designs().insert(&design("d-1", "Oxford Check", 9)).await.unwrap();

        let err = db
            .designs()
            .insert(&design("d-2", "Oxford Check", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, ref value }
            if field == "design_name" && value == "Oxford Check"));

        // Nothing of the rejected design was written
        assert_eq!(db.designs().count().await.unwrap(), 1);
        assert_eq!(lot_rows(&db, "d-2").await, 0);
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let db = db().await;
        db.designs().insert(&design("d-1", "Oxford Check", 9)).await.unwrap();

        db.designs()
            .update_status("d-1", DesignStatus::Completed)
            .await
            .unwrap();
        let stored = db.designs().get_by_id("d-1").await.unwrap().unwrap();
        assert_eq!(stored.status, DesignStatus::Completed);

        let err = db
            .designs()
            .update_status("d-1", DesignStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidStatusTransition { .. })
        ));

        let err = db
            .designs()
            .update_status("missing", DesignStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_lots() {
        let db = db().await;
        db.designs().insert(&design("d-1", "Oxford Check", 9)).await.unwrap();
        assert_eq!(lot_rows(&db, "d-1").await, 3);

        db.designs().delete("d-1").await.unwrap();
        assert_eq!(lot_rows(&db, "d-1").await, 0);
        assert!(db.designs().get_by_id("d-1").await.unwrap().is_none());

        let err = db.designs().delete("d-1").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_newest_first_with_filter() {
        let db = db().await;
        let designs = db.designs();
        designs.insert(&design("d-1", "Early", 8)).await.unwrap();
        designs.insert(&design("d-2", "Late", 17)).await.unwrap();
        designs
            .update_status("d-1", DesignStatus::Completed)
            .await
            .unwrap();

        let all = designs.list(None).await.unwrap();
        let names: Vec<&str> = all.iter().map(|d| d.design_name.as_str()).collect();
        assert_eq!(names, vec!["Late", "Early"]);
        assert_eq!(all[0].final_total, design("x", "x", 0).final_total);

        let pending = designs.list(Some(DesignStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "d-2");
    }
}
