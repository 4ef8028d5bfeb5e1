use axum::{extract::Path, http::StatusCode, Json};
use contracts::dashboards::d500_sales_dashboard::dto::{
    DashboardRequest, DashboardResponse, DashboardTabInfo, FilterOptionsResponse,
};
use contracts::shared::filters::FilterSelection;
use contracts::shared::indicators::KpiSummary;

use crate::dashboards::d500_sales_dashboard::service;

/// GET /api/filters/options
pub async fn get_filter_options() -> Result<Json<FilterOptionsResponse>, StatusCode> {
    match service::get_filter_options() {
        Ok(options) => Ok(Json(options)),
        Err(e) => {
            tracing::error!("D500 Dashboard: Failed to get filter options: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/kpis
pub async fn get_kpis(
    Json(selection): Json<FilterSelection>,
) -> Result<Json<KpiSummary>, StatusCode> {
    match service::get_kpis(&selection) {
        Ok(kpis) => {
            tracing::info!(
                "D500 Dashboard: KPIs over {} orders, revenue {:.2}",
                kpis.total_orders,
                kpis.total_revenue
            );
            Ok(Json(kpis))
        }
        Err(e) => {
            tracing::error!("D500 Dashboard: Failed to compute KPIs: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/dashboards/:tab
pub async fn get_dashboard(
    Path(tab): Path<String>,
    Json(request): Json<DashboardRequest>,
) -> Result<Json<DashboardResponse>, StatusCode> {
    let tab = match service::parse_tab(&tab) {
        Ok(tab) => tab,
        Err(e) => {
            tracing::warn!("D500 Dashboard: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    tracing::info!("D500 Dashboard: Building tab {}", tab.code());

    match service::get_dashboard(tab, &request) {
        Ok(response) => {
            tracing::info!(
                "D500 Dashboard: Returning {} charts over {} rows",
                response.charts.len(),
                response.filtered_rows
            );
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!("D500 Dashboard: Failed to build tab {}: {}", tab.code(), e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/dashboards
pub async fn list_dashboards() -> Json<Vec<DashboardTabInfo>> {
    Json(service::catalogue())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_tab_is_bad_request() {
        let result = get_dashboard(
            Path("inventory".to_string()),
            Json(DashboardRequest::default()),
        )
        .await;
        assert_eq!(result.err(), Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_list_dashboards() {
        let Json(tabs) = list_dashboards().await;
        assert_eq!(tabs.len(), 7);
        assert!(tabs.iter().all(|t| !t.charts.is_empty()));
    }
}
