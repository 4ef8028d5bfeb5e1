use contracts::domain::order_record::OrderRecord;
use contracts::shared::charts::*;
use std::collections::BTreeMap;

use super::common::{palette_cycle, PROFIT_COLOR};
use crate::shared::charts::aggregate::{group_by, resample, sum_by, top_n, Frequency, GroupStats};
use crate::shared::charts::stats::median;
use crate::shared::format::format_money;

pub fn build(view: &[&OrderRecord]) -> Vec<ChartSpec> {
    vec![
        revenue_trend(view),
        sales_by_category(view),
        revenue_by_region(view),
        top_states_treemap(view),
    ]
}

/// Monthly revenue (area) and profit (secondary axis)
pub fn revenue_trend(view: &[&OrderRecord]) -> ChartSpec {
    let monthly = resample(view, Frequency::MonthEnd);
    let dates: Vec<_> = monthly.iter().map(|(d, _)| *d).collect();

    let mut chart = ChartSpec::new(
        "revenue_trend",
        "Revenue & Profit Trend Over Time",
        ChartKind::Combo,
        500,
    )
    .with_trace(
        Trace::xy(
            ChartKind::Area,
            "Revenue",
            dates.clone(),
            monthly.iter().map(|(_, s)| s.revenue).collect(),
        )
        .with_color(PRIMARY_COLOR)
        .with_hover("<b>Revenue</b><br>Date: %{x|%B %Y}<br>Amount: $%{y:,.0f}<extra></extra>"),
    )
    .with_trace(
        Trace::xy(
            ChartKind::Line,
            "Profit",
            dates,
            monthly.iter().map(|(_, s)| s.profit).collect(),
        )
        .with_color(PROFIT_COLOR)
        .with_hover("<b>Profit</b><br>Date: %{x|%B %Y}<br>Amount: $%{y:,.0f}<extra></extra>")
        .on_secondary_axis(),
    )
    .legend()
    .unified_hover();
    chart.layout.x_axis_title = Some("Date".into());
    chart
}

/// Donut of revenue per category
pub fn sales_by_category(view: &[&OrderRecord]) -> ChartSpec {
    let sums = sum_by(view, |r| r.category_name.as_str(), |r| r.sales_per_order);
    let labels: Vec<String> = sums.keys().map(|k| k.to_string()).collect();
    let colors = palette_cycle(3, labels.len());

    ChartSpec::new("sales_by_category", "Sales by Category", ChartKind::Pie, 400)
        .with_trace(
            Trace::labeled(ChartKind::Pie, labels, sums.values().copied().collect())
                .with_hole(0.4)
                .with_colors(colors)
                .with_hover(
                    "<b>%{label}</b><br>Revenue: $%{value:,.0f}<br>Percentage: %{percent}<extra></extra>",
                ),
        )
        .legend()
}

/// Horizontal bars, smallest region first
pub fn revenue_by_region(view: &[&OrderRecord]) -> ChartSpec {
    let mut regions: Vec<(&str, f64)> =
        sum_by(view, |r| r.customer_region.as_str(), |r| r.sales_per_order)
            .into_iter()
            .collect();
    regions.sort_by(|a, b| a.1.total_cmp(&b.1));

    let revenue: Vec<f64> = regions.iter().map(|(_, v)| *v).collect();
    let mut trace = Trace::xy(
        ChartKind::Bar,
        "Revenue",
        revenue.clone(),
        regions.iter().map(|(r, _)| *r).collect(),
    )
    .horizontal()
    .with_color_scale("Blues")
    .with_text(revenue.iter().map(|v| format_money(*v)).collect())
    .with_hover("<b>%{y}</b><br>Revenue: $%{x:,.0f}<extra></extra>");
    trace.color_values = revenue.into_iter().map(CellValue::from).collect();

    ChartSpec::new("revenue_by_region", "Revenue by Region", ChartKind::Bar, 400)
        .with_trace(trace)
        .with_axes("Revenue ($)", "Region")
}

/// Top 20 region/state pairs by revenue, coloured by profit margin
pub fn top_states_treemap(view: &[&OrderRecord]) -> ChartSpec {
    let states: Vec<((&str, &str), GroupStats)> =
        group_by(view, |r| (r.customer_region.as_str(), r.customer_state.as_str()))
            .into_iter()
            .collect();
    let top = top_n(states, 20, |(_, s)| s.revenue);

    let margins: Vec<f64> = top.iter().filter_map(|(_, s)| s.margin()).collect();
    let mid = median(&margins);

    let mut regions: BTreeMap<&str, GroupStats> = BTreeMap::new();
    let mut total = GroupStats::default();
    for ((region, _), stats) in &top {
        merge(regions.entry(*region).or_default(), stats);
        merge(&mut total, stats);
    }

    let mut trace = Trace::new(ChartKind::Treemap);
    push_node(&mut trace, "All", "", &total);
    for (region, stats) in &regions {
        push_node(&mut trace, region, "All", stats);
    }
    for ((region, state), stats) in &top {
        push_node(&mut trace, state, region, stats);
    }
    trace.color_scale = Some("RdYlGn".into());
    trace.color_mid = mid;
    trace.hover_template = Some(
        "<b>%{label}</b><br>Revenue: $%{value:,.0f}<br>Profit: $%{customdata[0]:,.0f}<br>Margin: %{customdata[1]:.1f}%<br>Orders: %{customdata[2]:,}<extra></extra>"
            .into(),
    );

    ChartSpec::new(
        "top_states_treemap",
        "Top 20 States by Revenue (Color = Profit Margin)",
        ChartKind::Treemap,
        450,
    )
    .with_trace(trace)
}

fn merge(into: &mut GroupStats, other: &GroupStats) {
    into.revenue += other.revenue;
    into.profit += other.profit;
    into.orders += other.orders;
}

fn push_node(trace: &mut Trace, label: &str, parent: &str, stats: &GroupStats) {
    trace.labels.push(label.to_string());
    trace.parents.push(parent.to_string());
    trace.values.push(stats.revenue.into());
    trace.color_values.push(stats.margin().into());
    trace.custom_data.push(vec![
        stats.profit.into(),
        stats.margin().into(),
        stats.orders.into(),
    ]);
}
