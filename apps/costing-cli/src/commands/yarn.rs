//! # Yarn Commands
//!
//! Yarn master list maintenance.
//!
//! ```text
//! costing yarn list                      → counts in dropdown order
//! costing yarn set 2/40s 0.2 310         → create or update, history on price change
//! costing yarn history 2/40s             → price changes, oldest first
//! ```

use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use costing_core::validation::validate_yarn_count;
use costing_core::{YarnCount, YarnPriceHistory};

/// Result of `yarn set`.
#[derive(Debug, Clone, Serialize)]
pub struct YarnSaved {
    pub yarn: YarnCount,
    /// Whether a price history record was written.
    pub price_changed: bool,
}

/// Lists yarn counts, plain counts first, plied counts after.
pub async fn list_yarns(state: &AppState) -> ApiResult<Vec<YarnCount>> {
    let catalog = state.db().yarns().catalog().await?;

    Ok(catalog
        .sorted_labels()
        .iter()
        .filter_map(|label| catalog.get(label).cloned())
        .collect())
}

/// Creates or updates a yarn count.
pub async fn set_yarn(
    state: &AppState,
    label: &str,
    hank_weight: f64,
    unit_price: f64,
) -> ApiResult<YarnSaved> {
    validate_yarn_count(label, hank_weight, unit_price)?;

    let (yarn, price_changed) = state
        .db()
        .yarns()
        .upsert(label.trim(), hank_weight, unit_price, &state.config().updated_by)
        .await?;

    info!(label = %yarn.label, unit_price, price_changed, "Yarn count saved");
    Ok(YarnSaved {
        yarn,
        price_changed,
    })
}

/// Price history of one yarn count.
pub async fn yarn_history(state: &AppState, label: &str) -> ApiResult<Vec<YarnPriceHistory>> {
    let label = label.trim();
    if state.db().yarns().get_by_label(label).await?.is_none() {
        return Err(ApiError::not_found("Yarn count", label));
    }

    Ok(state.db().yarns().price_history(label).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::AppConfig;
    use costing_db::{Database, DbConfig};

    async fn state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = AppConfig {
            updated_by: "asha".to_string(),
            ..AppConfig::default()
        };
        AppState::new(db, config)
    }

    #[tokio::test]
    async fn test_list_in_dropdown_order() {
        let state = state().await;
        for (label, hank, price) in [("2/40s", 0.4, 310.0), ("40s", 0.4, 250.0), ("20s", 0.8, 210.0)] {
            set_yarn(&state, label, hank, price).await.unwrap();
        }

        let labels: Vec<String> = list_yarns(&state)
            .await
            .unwrap()
            .into_iter()
            .map(|y| y.label)
            .collect();
        assert_eq!(labels, vec!["20s", "40s", "2/40s"]);
    }

    #[tokio::test]
    async fn test_set_records_updated_by() {
        let state = state().await;
        let saved = set_yarn(&state, " 40s ", 0.4, 250.0).await.unwrap();
        assert_eq!(saved.yarn.label, "40s");
        assert!(saved.price_changed);

        let saved = set_yarn(&state, "40s", 0.4, 250.0).await.unwrap();
        assert!(!saved.price_changed);

        let history = yarn_history(&state, "40s").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].updated_by, "asha");
    }

    #[tokio::test]
    async fn test_set_rejects_bad_input() {
        let state = state().await;
        let err = set_yarn(&state, "40s", 0.4, -1.0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("unit_price"));

        let err = set_yarn(&state, "  ", 0.4, 1.0).await.unwrap_err();
        assert_eq!(err.field.as_deref(), Some("label"));
    }

    #[tokio::test]
    async fn test_history_of_unknown_yarn() {
        let state = state().await;
        let err = yarn_history(&state, "80s").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
