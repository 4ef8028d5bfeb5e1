use contracts::domain::order_record::OrderRecord;
use contracts::shared::charts::*;
use std::collections::BTreeMap;

use super::common::{palette, split_series};
use crate::shared::charts::aggregate::{group_by, month_end, ratio, sum_by, top_n, GroupStats};
use crate::shared::charts::stats::{median, quantile};
use crate::shared::format::{format_dollars, truncate_label};

/// Число продуктов в трендах по умолчанию
pub const DEFAULT_TREND_PRODUCTS: usize = 5;

pub fn build(view: &[&OrderRecord], selected_products: Option<&[String]>) -> Vec<ChartSpec> {
    vec![
        product_matrix(view),
        top_quantity_products(view),
        category_sunburst(view),
        product_trend(view, selected_products),
        low_performers(view),
    ]
}

fn product_stats<'a>(view: &[&'a OrderRecord]) -> Vec<((&'a str, &'a str), GroupStats)> {
    group_by(view, |r| (r.product_name.as_str(), r.category_name.as_str()))
        .into_iter()
        .collect()
}

/// Revenue/profit bubbles for the top 100 products, split into quadrants at
/// the medians
pub fn product_matrix(view: &[&OrderRecord]) -> ChartSpec {
    let top = top_n(product_stats(view), 100, |(_, s)| s.revenue);

    let mut chart = ChartSpec::new(
        "product_matrix",
        "Product Performance Matrix (Top 100 Products)",
        ChartKind::Scatter,
        600,
    )
    .with_axes("Total Revenue ($)", "Total Profit ($)")
    .legend();

    for (i, (category, rows)) in split_series(&top, |((_, c), _)| *c).into_iter().enumerate() {
        let mut trace = Trace::xy(
            ChartKind::Scatter,
            category,
            rows.iter().map(|(_, s)| s.revenue).collect(),
            rows.iter().map(|(_, s)| s.profit).collect(),
        )
        .with_color(palette(i % 3))
        .with_opacity(0.7)
        .with_text(rows.iter().map(|((p, _), _)| p.to_string()).collect())
        .with_hover("<b>%{text}</b><br>Revenue: $%{x:,.0f}<br>Profit: $%{y:,.0f}<br>Orders: %{marker.size:,}<extra></extra>");
        trace.size = rows.iter().map(|(_, s)| CellValue::from(s.orders)).collect();
        chart = chart.with_trace(trace);
    }

    let revenues: Vec<f64> = top.iter().map(|(_, s)| s.revenue).collect();
    let profits: Vec<f64> = top.iter().map(|(_, s)| s.profit).collect();
    let (Some(med_revenue), Some(med_profit)) = (median(&revenues), median(&profits)) else {
        return chart;
    };
    let max_revenue = revenues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max_profit = profits.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    chart = chart
        .with_reference_line(LineAxis::X, med_revenue, None)
        .with_reference_line(LineAxis::Y, med_profit, None);
    chart.layout.annotations = [
        (max_revenue * 0.85, max_profit * 0.9, "Stars"),
        (med_revenue * 0.3, max_profit * 0.9, "Profitable Niche"),
        (max_revenue * 0.85, med_profit * 0.3, "Volume Drivers"),
        (med_revenue * 0.3, med_profit * 0.3, "Low Performers"),
    ]
    .into_iter()
    .map(|(x, y, text)| Annotation {
        x,
        y,
        text: text.to_string(),
    })
    .collect();
    chart
}

/// Top 20 products by units sold
pub fn top_quantity_products(view: &[&OrderRecord]) -> ChartSpec {
    let mut top = top_n(product_stats(view), 20, |(_, s)| s.quantity as f64);
    top.reverse();

    let mut chart = ChartSpec::new(
        "top_quantity_products",
        "Top 20 Products by Units Sold",
        ChartKind::Bar,
        600,
    )
    .with_axes("Total Units Sold", "Product")
    .legend();

    for (i, (category, rows)) in split_series(&top, |((_, c), _)| *c).into_iter().enumerate() {
        chart = chart.with_trace(
            Trace::xy(
                ChartKind::Bar,
                category,
                rows.iter().map(|(_, s)| s.quantity).collect(),
                rows.iter().map(|((p, _), _)| truncate_label(p, 50)).collect(),
            )
            .horizontal()
            .with_color(palette(i % 3))
            .with_hover("%{y}<br>Units: %{x:,}<extra></extra>"),
        );
    }
    chart
}

/// Categories with their five best-selling products, coloured by margin
pub fn category_sunburst(view: &[&OrderRecord]) -> ChartSpec {
    let categories = group_by(view, |r| r.category_name.as_str());

    let mut per_category: BTreeMap<&str, Vec<(&str, GroupStats)>> = BTreeMap::new();
    for ((category, product), stats) in group_by(view, |r| (r.category_name.as_str(), r.product_name.as_str())) {
        per_category.entry(category).or_default().push((product, stats));
    }

    let mut trace = Trace::new(ChartKind::Sunburst)
        .with_color_scale("RdYlGn")
        .with_color_mid(0.0)
        .with_hover("<b>%{label}</b><br>Revenue: $%{value:,.0f}<extra></extra>");

    if !categories.is_empty() {
        let total: f64 = categories.values().map(|s| s.revenue).sum();
        let profit: f64 = categories.values().map(|s| s.profit).sum();
        push_node(&mut trace, "All Categories", "", total, profit);
    }
    for (category, stats) in &categories {
        push_node(&mut trace, category, "All Categories", stats.revenue, stats.profit);
    }
    for (category, products) in per_category {
        for (product, stats) in top_n(products, 5, |(_, s)| s.revenue) {
            push_node(&mut trace, product, category, stats.revenue, stats.profit);
        }
    }

    ChartSpec::new(
        "category_sunburst",
        "Product Category Deep Dive (Top 5 Products per Category)",
        ChartKind::Sunburst,
        600,
    )
    .with_trace(trace)
}

fn push_node(trace: &mut Trace, label: &str, parent: &str, revenue: f64, profit: f64) {
    trace.labels.push(label.to_string());
    trace.parents.push(parent.to_string());
    trace.values.push(revenue.into());
    trace
        .color_values
        .push(ratio(profit, revenue).map(|m| m * 100.0).into());
}

/// Monthly revenue of the selected products, or of the five best sellers
/// when nothing is selected
pub fn product_trend(view: &[&OrderRecord], selected: Option<&[String]>) -> ChartSpec {
    let products: Vec<String> = match selected {
        Some(list) => list.to_vec(),
        None => {
            let revenue: Vec<(&str, f64)> =
                sum_by(view, |r| r.product_name.as_str(), |r| r.sales_per_order)
                    .into_iter()
                    .collect();
            top_n(revenue, DEFAULT_TREND_PRODUCTS, |(_, v)| *v)
                .into_iter()
                .map(|(p, _)| p.to_string())
                .collect()
        }
    };

    let rows: Vec<&OrderRecord> = view
        .iter()
        .copied()
        .filter(|r| products.iter().any(|p| *p == r.product_name))
        .collect();
    let monthly: Vec<((chrono::NaiveDate, &str), f64)> = sum_by(
        &rows,
        |r| (month_end(r.order_date), r.product_name.as_str()),
        |r| r.sales_per_order,
    )
    .into_iter()
    .collect();

    let mut chart = ChartSpec::new(
        "product_trend",
        "Product Performance Over Time",
        ChartKind::Line,
        400,
    )
    .with_axes("Date", "Revenue ($)")
    .legend()
    .unified_hover();

    for (i, (product, points)) in split_series(&monthly, |((_, p), _)| *p).into_iter().enumerate() {
        chart = chart.with_trace(
            Trace::xy(
                ChartKind::Line,
                product,
                points.iter().map(|((d, _), _)| *d).collect(),
                points.iter().map(|(_, v)| *v).collect(),
            )
            .with_color(palette(i))
            .with_markers()
            .with_hover("%{y:$,.0f}"),
        );
    }
    chart
}

pub const LOW_PERFORMERS_HEADER: [&str; 6] =
    ["Product", "Category", "Orders", "Revenue", "Profit", "Margin %"];

/// Products with negative profit or revenue in the bottom decile, worst
/// profit first
pub fn low_performers(view: &[&OrderRecord]) -> ChartSpec {
    let products = product_stats(view);
    let revenues: Vec<f64> = products.iter().map(|(_, s)| s.revenue).collect();
    let threshold = quantile(&revenues, 0.1);

    let mut low: Vec<((&str, &str), GroupStats)> = products
        .into_iter()
        .filter(|(_, s)| s.profit < 0.0 || threshold.is_some_and(|t| s.revenue < t))
        .collect();
    low.sort_by(|a, b| a.1.profit.total_cmp(&b.1.profit));
    low.truncate(20);

    let mut table = TableData {
        header: LOW_PERFORMERS_HEADER.iter().map(|h| h.to_string()).collect(),
        rows: Vec::with_capacity(low.len()),
        highlighted: Vec::new(),
    };
    for (row, ((product, category), stats)) in low.iter().enumerate() {
        let margin = stats.margin();
        table.rows.push(vec![
            truncate_label(product, 40).into(),
            (*category).into(),
            stats.orders.into(),
            format_dollars(stats.revenue).into(),
            format_dollars(stats.profit).into(),
            margin.map_or(CellValue::Null, |m| format!("{m:.1}%").into()),
        ]);
        if stats.profit < 0.0 {
            table.highlighted.push((row, 4));
        }
        if margin.is_some_and(|m| m < 0.0) {
            table.highlighted.push((row, 5));
        }
    }

    let mut chart = ChartSpec::new(
        "low_performers",
        "Low Performing Products (Negative Profit or Bottom 10% Sales)",
        ChartKind::Table,
        500,
    );
    chart.table = Some(table);
    chart
}
