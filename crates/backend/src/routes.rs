use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // FILTERS & KPIS
        // ========================================
        .route(
            "/api/filters/options",
            get(handlers::d500_sales_dashboard::get_filter_options),
        )
        .route("/api/kpis", post(handlers::d500_sales_dashboard::get_kpis))
        // Indicator cards
        .route(
            "/api/indicators/meta",
            get(handlers::indicators::get_indicator_catalog),
        )
        .route(
            "/api/indicators/compute",
            post(handlers::indicators::compute_indicators),
        )
        // ========================================
        // D500 SALES DASHBOARD
        // ========================================
        .route(
            "/api/dashboards",
            get(handlers::d500_sales_dashboard::list_dashboards),
        )
        .route(
            "/api/dashboards/:tab",
            post(handlers::d500_sales_dashboard::get_dashboard),
        )
        // ========================================
        // DATASET
        // ========================================
        .route("/api/dataset", get(handlers::dataset::get_dataset_info))
        .route(
            "/api/dataset/reload",
            post(handlers::dataset::reload_dataset),
        )
}
