use axum::{http::StatusCode, Json};
use contracts::dashboards::d500_sales_dashboard::dto::DatasetInfo;

use crate::shared::data::store::get_store;

/// GET /api/dataset
pub async fn get_dataset_info() -> Result<Json<DatasetInfo>, StatusCode> {
    let dataset = get_store().and_then(|store| store.dataset()).map_err(|e| {
        tracing::error!("Dataset: Failed to get dataset: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(dataset.info()))
}

/// POST /api/dataset/reload
///
/// Drops the cached dataset and parses the file again on the blocking pool.
pub async fn reload_dataset() -> Result<Json<DatasetInfo>, StatusCode> {
    let result = tokio::task::spawn_blocking(|| get_store().and_then(|store| store.reload())).await;

    match result {
        Ok(Ok(dataset)) => {
            tracing::info!("Dataset: Reloaded {} rows", dataset.len());
            Ok(Json(dataset.info()))
        }
        Ok(Err(e)) => {
            tracing::error!("Dataset: Reload failed: {:#}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(e) => {
            tracing::error!("Dataset: Reload task panicked: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
