use axum::{http::StatusCode, Json};
use contracts::shared::indicators::*;

use crate::dashboards::d500_sales_dashboard::service;
use crate::shared::indicators::{metadata, registry::IndicatorRegistry};

/// POST /api/indicators/compute
///
/// Batch-computes a set of indicator cards for the given filters.
pub async fn compute_indicators(
    Json(req): Json<ComputeIndicatorsRequest>,
) -> Result<Json<ComputeIndicatorsResponse>, StatusCode> {
    tracing::info!("Indicators: computing {} indicators", req.indicator_ids.len());

    let kpis = service::get_kpis(&req.filters).map_err(|e| {
        tracing::error!("Indicators: failed to compute KPIs: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let registry = IndicatorRegistry::new();
    let values = registry.compute(&req.indicator_ids, &kpis);

    tracing::info!("Indicators: returning {} values", values.len());
    Ok(Json(ComputeIndicatorsResponse { values }))
}

/// GET /api/indicators/meta
///
/// Returns the full catalogue of available indicators and sets.
pub async fn get_indicator_catalog() -> Json<IndicatorCatalogResponse> {
    Json(metadata::build_catalog())
}
