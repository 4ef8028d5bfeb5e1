use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::charts::ChartSpec;
use crate::shared::filters::{Dimension, FilterSelection};
use crate::shared::indicators::KpiSummary;

/// Tabs of the sales dashboard, each a fixed list of charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardTab {
    Overview,
    Sales,
    Profitability,
    Delivery,
    Customers,
    Products,
    TimeAnalysis,
}

impl DashboardTab {
    pub fn all() -> Vec<DashboardTab> {
        vec![
            DashboardTab::Overview,
            DashboardTab::Sales,
            DashboardTab::Profitability,
            DashboardTab::Delivery,
            DashboardTab::Customers,
            DashboardTab::Products,
            DashboardTab::TimeAnalysis,
        ]
    }

    /// URL path segment
    pub fn code(&self) -> &'static str {
        match self {
            DashboardTab::Overview => "overview",
            DashboardTab::Sales => "sales",
            DashboardTab::Profitability => "profitability",
            DashboardTab::Delivery => "delivery",
            DashboardTab::Customers => "customers",
            DashboardTab::Products => "products",
            DashboardTab::TimeAnalysis => "time_analysis",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DashboardTab::Overview => "Overview",
            DashboardTab::Sales => "Sales Analysis",
            DashboardTab::Profitability => "Profitability",
            DashboardTab::Delivery => "Delivery Performance",
            DashboardTab::Customers => "Customer Insights",
            DashboardTab::Products => "Product Analysis",
            DashboardTab::TimeAnalysis => "Time Analysis",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|t| t.code() == code)
    }
}

/// Request for one dashboard tab
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardRequest {
    pub filters: FilterSelection,
    /// Products for the product trend chart; top 5 by revenue when absent
    pub selected_products: Option<Vec<String>>,
}

/// KPIs plus every chart of the requested tab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub tab: DashboardTab,
    pub kpis: KpiSummary,
    /// Rows left after filtering
    pub filtered_rows: usize,
    pub charts: Vec<ChartSpec>,
}

/// Chart id and title as listed in the tab catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartInfo {
    pub id: String,
    pub title: String,
}

/// Catalogue entry describing a tab and its charts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardTabInfo {
    pub tab: DashboardTab,
    pub name: String,
    pub charts: Vec<ChartInfo>,
}

/// Options for the sidebar controls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptionsResponse {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    /// Sorted distinct values per dimension
    pub dimensions: BTreeMap<Dimension, Vec<String>>,
    /// Display names of the same dimensions
    pub labels: BTreeMap<Dimension, String>,
}

/// Description of the loaded dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub path: String,
    /// SHA-256 of the file content, hex
    pub content_hash: String,
    pub rows: usize,
    pub loaded_at: DateTime<Utc>,
}
