//! # Color Legend Commands

use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;
use costing_core::validation::validate_color_legend;
use costing_core::ColorLegendEntry;

/// Lists the legend by serial number.
pub async fn list_legend(state: &AppState) -> ApiResult<Vec<ColorLegendEntry>> {
    Ok(state.db().color_legend().list().await?)
}

/// Adds one color to the legend.
///
/// The legend with the new entry appended is validated first, so a
/// duplicate is reported with its `legend[i]` path instead of a storage
/// conflict.
pub async fn add_legend_entry(
    state: &AppState,
    color: &str,
    label: &str,
    serial_number: u32,
) -> ApiResult<Vec<ColorLegendEntry>> {
    let entry = ColorLegendEntry {
        color: color.trim().to_string(),
        label: label.trim().to_string(),
        serial_number,
    };

    let mut legend = state.db().color_legend().list().await?;
    legend.push(entry.clone());
    validate_color_legend(&legend)?;

    state.db().color_legend().insert(&entry).await?;
    info!(color = %entry.color, serial_number, "Legend entry added");

    list_legend(state).await
}

/// Result of `legend clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegendCleared {
    pub removed: u64,
}

/// Removes every legend entry.
pub async fn clear_legend(state: &AppState) -> ApiResult<LegendCleared> {
    let removed = state.db().color_legend().clear().await?;
    info!(removed, "Legend cleared");
    Ok(LegendCleared { removed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::AppConfig;
    use costing_db::{Database, DbConfig};

    async fn state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, AppConfig::default())
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let state = state().await;
        add_legend_entry(&state, "#FFFFFF", "White", 2).await.unwrap();
        let legend = add_legend_entry(&state, " #000080 ", "Navy", 1).await.unwrap();

        let colors: Vec<&str> = legend.iter().map(|e| e.color.as_str()).collect();
        assert_eq!(colors, vec!["#000080", "#FFFFFF"]);
        assert_eq!(list_legend(&state).await.unwrap(), legend);
    }

    #[tokio::test]
    async fn test_clear_then_reuse_serial() {
        let state = state().await;
        add_legend_entry(&state, "#FFFFFF", "White", 1).await.unwrap();
        add_legend_entry(&state, "#000080", "Navy", 2).await.unwrap();

        assert_eq!(clear_legend(&state).await.unwrap().removed, 2);
        assert!(list_legend(&state).await.unwrap().is_empty());

        let legend = add_legend_entry(&state, "#FF0000", "Red", 1).await.unwrap();
        assert_eq!(legend.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_serial_reports_field() {
        let state = state().await;
        add_legend_entry(&state, "#FFFFFF", "White", 1).await.unwrap();

        let err = add_legend_entry(&state, "#FF0000", "Red", 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("legend[1].serial_number"));

        let err = add_legend_entry(&state, "", "Nothing", 5).await.unwrap_err();
        assert_eq!(err.field.as_deref(), Some("legend[1].color"));
    }
}
