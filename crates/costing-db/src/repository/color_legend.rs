//! # Color Legend Repository
//!
//! Colors available to pattern sessions. Each color and each serial
//! number appears at most once.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use costing_core::ColorLegendEntry;

#[derive(Debug, sqlx::FromRow)]
struct LegendRow {
    color: String,
    label: String,
    serial_number: i64,
}

impl TryFrom<LegendRow> for ColorLegendEntry {
    type Error = DbError;

    fn try_from(row: LegendRow) -> Result<Self, Self::Error> {
        let serial_number = u32::try_from(row.serial_number)
            .map_err(|e| DbError::corrupt("serial_number", e))?;
        Ok(ColorLegendEntry {
            color: row.color,
            label: row.label,
            serial_number,
        })
    }
}

/// Repository for the color legend.
#[derive(Debug, Clone)]
pub struct ColorLegendRepository {
    pool: SqlitePool,
}

impl ColorLegendRepository {
    /// Creates a new ColorLegendRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ColorLegendRepository { pool }
    }

    /// Lists legend entries by serial number.
    pub async fn list(&self) -> DbResult<Vec<ColorLegendEntry>> {
        let rows = sqlx::query_as::<_, LegendRow>(
            "SELECT color, label, serial_number FROM color_legend ORDER BY serial_number",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Adds a legend entry.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - color or serial number already used
    pub async fn insert(&self, entry: &ColorLegendEntry) -> DbResult<()> {
        debug!(color = %entry.color, serial = entry.serial_number, "Adding legend entry");

        sqlx::query("INSERT INTO color_legend (color, label, serial_number) VALUES (?1, ?2, ?3)")
            .bind(&entry.color)
            .bind(&entry.label)
            .bind(entry.serial_number as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } if field.ends_with("serial_number") => {
                    DbError::duplicate("serial_number", entry.serial_number.to_string())
                }
                DbError::UniqueViolation { .. } => DbError::duplicate("color", &entry.color),
                other => other,
            })?;

        Ok(())
    }

    /// Removes every legend entry. Returns how many were removed.
    pub async fn clear(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM color_legend")
            .execute(&self.pool)
            .await?;

        debug!(removed = result.rows_affected(), "Cleared color legend");
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn entry(color: &str, label: &str, serial_number: u32) -> ColorLegendEntry {
        ColorLegendEntry {
            color: color.to_string(),
            label: label.to_string(),
            serial_number,
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_serial() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let legend = db.color_legend();
        legend.insert(&entry("#FFFFFF", "White", 2)).await.unwrap();
        legend.insert(&entry("#000080", "Navy", 1)).await.unwrap();

        let labels: Vec<String> = legend.list().await.unwrap().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Navy", "White"]);
    }

    #[tokio::test]
    async fn test_duplicates_are_conflicts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let legend = db.color_legend();
        legend.insert(&entry("#000080", "Navy", 1)).await.unwrap();

        let err = legend.insert(&entry("#000080", "Navy again", 2)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "color"));

        let err = legend.insert(&entry("#FF0000", "Red", 1)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "serial_number"));

        assert_eq!(legend.clear().await.unwrap(), 1);
        assert!(legend.list().await.unwrap().is_empty());
    }
}
