use anyhow::Result;
use contracts::dashboards::d500_sales_dashboard::dto::{
    ChartInfo, DashboardRequest, DashboardResponse, DashboardTab, DashboardTabInfo,
    FilterOptionsResponse,
};
use contracts::domain::order_record::OrderRecord;
use contracts::shared::charts::ChartSpec;
use contracts::shared::filters::{Dimension, EmptySelection, FilterSelection};
use contracts::shared::indicators::KpiSummary;
use std::sync::Arc;

use super::{customers, delivery, overview, products, profitability, sales, time_analysis};
use crate::shared::data::dataset::Dataset;
use crate::shared::data::store::get_store;
use crate::shared::filters::engine::FilterEngine;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("unknown dashboard tab `{0}`")]
    UnknownTab(String),
}

pub fn parse_tab(code: &str) -> Result<DashboardTab, DashboardError> {
    DashboardTab::from_code(code).ok_or_else(|| DashboardError::UnknownTab(code.to_string()))
}

/// All charts of one tab over the filtered view
pub fn build_tab(
    tab: DashboardTab,
    view: &[&OrderRecord],
    selected_products: Option<&[String]>,
) -> Vec<ChartSpec> {
    match tab {
        DashboardTab::Overview => overview::build(view),
        DashboardTab::Sales => sales::build(view),
        DashboardTab::Profitability => profitability::build(view),
        DashboardTab::Delivery => delivery::build(view),
        DashboardTab::Customers => customers::build(view),
        DashboardTab::Products => products::build(view, selected_products),
        DashboardTab::TimeAnalysis => time_analysis::build(view),
    }
}

/// Tabs with the ids and titles of their charts
pub fn catalogue() -> Vec<DashboardTabInfo> {
    DashboardTab::all()
        .into_iter()
        .map(|tab| DashboardTabInfo {
            tab,
            name: tab.display_name().to_string(),
            // генераторы не зависят от данных в заголовках, пустой вид достаточен
            charts: build_tab(tab, &[], None)
                .into_iter()
                .map(|chart| ChartInfo {
                    id: chart.id,
                    title: chart.title,
                })
                .collect(),
        })
        .collect()
}

/// Engine over `dataset` with the request's filters applied
pub fn filtered_engine(
    dataset: Arc<Dataset>,
    selection: &FilterSelection,
    policy: EmptySelection,
) -> FilterEngine {
    let mut engine = FilterEngine::new(dataset);
    engine.set_filters(selection.to_update(policy));
    engine
}

/// KPIs and charts of `tab` for the given dataset
pub fn render_dashboard(
    dataset: Arc<Dataset>,
    tab: DashboardTab,
    request: &DashboardRequest,
    policy: EmptySelection,
) -> DashboardResponse {
    let engine = filtered_engine(dataset, &request.filters, policy);
    let view = engine.filtered_view();
    let charts = build_tab(tab, &view, request.selected_products.as_deref());

    DashboardResponse {
        tab,
        kpis: engine.compute_kpis(),
        filtered_rows: view.len(),
        charts,
    }
}

pub fn options_for(dataset: Arc<Dataset>) -> FilterOptionsResponse {
    let engine = FilterEngine::new(dataset);
    let bounds = engine.date_bounds();
    FilterOptionsResponse {
        min_date: bounds.map(|(min, _)| min),
        max_date: bounds.map(|(_, max)| max),
        dimensions: Dimension::ALL
            .into_iter()
            .map(|d| (d, engine.unique_values(d)))
            .collect(),
        labels: Dimension::ALL
            .into_iter()
            .map(|d| (d, d.label().to_string()))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Store-backed entry points used by the HTTP handlers
// ---------------------------------------------------------------------------

pub fn get_dashboard(tab: DashboardTab, request: &DashboardRequest) -> Result<DashboardResponse> {
    let store = get_store()?;
    Ok(render_dashboard(
        store.dataset()?,
        tab,
        request,
        store.empty_selection(),
    ))
}

pub fn get_kpis(selection: &FilterSelection) -> Result<KpiSummary> {
    let store = get_store()?;
    let engine = filtered_engine(store.dataset()?, selection, store.empty_selection());
    Ok(engine.compute_kpis())
}

pub fn get_filter_options() -> Result<FilterOptionsResponse> {
    let store = get_store()?;
    Ok(options_for(store.dataset()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::testing::sample_dataset;

    #[test]
    fn test_unknown_tab_is_rejected() {
        assert_eq!(parse_tab("sales").ok(), Some(DashboardTab::Sales));
        let err = parse_tab("inventory").unwrap_err();
        assert_eq!(err.to_string(), "unknown dashboard tab `inventory`");
    }

    #[test]
    fn test_catalogue_lists_every_chart() {
        let tabs = catalogue();
        assert_eq!(tabs.len(), 7);

        let counts: Vec<usize> = tabs.iter().map(|t| t.charts.len()).collect();
        assert_eq!(counts, vec![4, 5, 5, 6, 6, 5, 6]);
        assert_eq!(tabs[0].charts[0].id, "revenue_trend");
        assert_eq!(tabs[6].charts[5].id, "trend_decomposition");

        let mut ids: Vec<&str> = tabs.iter().flat_map(|t| t.charts.iter().map(|c| c.id.as_str())).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_render_dashboard_applies_filters() {
        let request = DashboardRequest {
            filters: FilterSelection {
                customer_region: Some(vec!["West".to_string()]),
                ..Default::default()
            },
            selected_products: None,
        };
        let response = render_dashboard(
            sample_dataset(),
            DashboardTab::Overview,
            &request,
            EmptySelection::NoRestriction,
        );

        assert_eq!(response.filtered_rows, 3);
        assert_eq!(response.kpis.total_revenue, 650.0);
        assert_eq!(response.charts.len(), 4);
    }

    #[test]
    fn test_empty_list_policy() {
        let request = DashboardRequest {
            filters: FilterSelection {
                category_name: Some(vec![]),
                ..Default::default()
            },
            selected_products: None,
        };

        let all = render_dashboard(sample_dataset(), DashboardTab::Delivery, &request, EmptySelection::NoRestriction);
        assert_eq!(all.filtered_rows, 8);

        let none = render_dashboard(sample_dataset(), DashboardTab::Delivery, &request, EmptySelection::MatchNothing);
        assert_eq!(none.filtered_rows, 0);
        assert_eq!(none.kpis.profit_margin, 0.0);
        assert_eq!(none.charts.len(), 6);
    }

    #[test]
    fn test_every_tab_renders_on_sample() {
        for tab in DashboardTab::all() {
            let response = render_dashboard(
                sample_dataset(),
                tab,
                &DashboardRequest::default(),
                EmptySelection::NoRestriction,
            );
            assert!(!response.charts.is_empty(), "{:?}", tab);
            let json = serde_json::to_string(&response);
            assert!(json.is_ok(), "{:?}", tab);
        }
    }

    #[test]
    fn test_filter_options() {
        let options = options_for(sample_dataset());
        assert_eq!(options.min_date, Some(crate::shared::testing::date(2022, 1, 3)));
        assert_eq!(options.max_date, Some(crate::shared::testing::date(2022, 4, 4)));
        assert_eq!(options.dimensions[&Dimension::CustomerRegion], vec!["Central", "East", "West"]);
        assert_eq!(options.dimensions.len(), 5);
        assert_eq!(options.labels[&Dimension::CustomerSegment], "Customer Segment");
        assert_eq!(options.labels.len(), 5);
    }
}
