use contracts::domain::order_record::OrderRecord;
use contracts::shared::charts::*;

use super::common::{palette, palette_cycle, split_series, ACCENT_COLOR};
use crate::shared::charts::aggregate::{group_by, ratio, sum_by, top_n, GroupStats};
use crate::shared::charts::geo::state_code;

pub fn build(view: &[&OrderRecord]) -> Vec<ChartSpec> {
    vec![
        revenue_by_segment_funnel(view),
        regional_radar(view),
        top_cities(view),
        segment_category_preference(view),
        state_revenue_map(view),
        revenue_pareto(view),
    ]
}

/// Segments by revenue with order count and AOV in the hover
pub fn revenue_by_segment_funnel(view: &[&OrderRecord]) -> ChartSpec {
    let mut segments: Vec<(&str, GroupStats)> =
        group_by(view, |r| r.customer_segment.as_str()).into_iter().collect();
    segments.sort_by(|a, b| b.1.revenue.total_cmp(&a.1.revenue));

    let mut trace = Trace::labeled(
        ChartKind::Funnel,
        segments.iter().map(|(s, _)| s.to_string()).collect(),
        segments.iter().map(|(_, s)| s.revenue).collect(),
    )
    .with_colors(palette_cycle(3, segments.len()))
    .with_hover("<b>%{y}</b><br>Revenue: $%{x:,.0f}<br>Orders: %{customdata[0]:,}<br>AOV: $%{customdata[1]:.2f}<extra></extra>");
    trace.custom_data = segments
        .iter()
        .map(|(_, s)| vec![s.orders.into(), s.avg_order_value().into()])
        .collect();

    ChartSpec::new(
        "revenue_by_segment_funnel",
        "Revenue by Customer Segment",
        ChartKind::Funnel,
        400,
    )
    .with_trace(trace)
}

pub const RADAR_AXES: [&str; 5] = [
    "Revenue",
    "Profit",
    "Orders",
    "Avg Order Value",
    "On-Time Delivery",
];

/// Five regional metrics, each scaled so the best region scores 100
pub fn regional_radar(view: &[&OrderRecord]) -> ChartSpec {
    let regions: Vec<(&str, [Option<f64>; 5])> = group_by(view, |r| r.customer_region.as_str())
        .into_iter()
        .map(|(region, s)| {
            (
                region,
                [
                    Some(s.revenue),
                    Some(s.profit),
                    Some(s.orders as f64),
                    s.avg_order_value(),
                    s.on_time_rate(),
                ],
            )
        })
        .collect();

    let mut maxima = [None::<f64>; 5];
    for (_, metrics) in &regions {
        for (max, value) in maxima.iter_mut().zip(metrics) {
            if let Some(v) = value {
                *max = Some(max.map_or(*v, |m: f64| m.max(*v)));
            }
        }
    }

    let mut chart = ChartSpec::new(
        "regional_radar",
        "Regional Performance Comparison (Normalized Metrics)",
        ChartKind::Radar,
        500,
    )
    .legend();
    chart.layout.radial_range = Some((0.0, 100.0));

    for (i, (region, metrics)) in regions.iter().enumerate() {
        let normalized: Vec<CellValue> = metrics
            .iter()
            .zip(&maxima)
            .map(|(value, max)| match (value, max) {
                (Some(v), Some(m)) if *m > 0.0 => CellValue::number(v / m * 100.0),
                _ => CellValue::Null,
            })
            .collect();

        let mut trace = Trace::labeled(
            ChartKind::Radar,
            RADAR_AXES.iter().map(|a| a.to_string()).collect(),
            normalized,
        )
        .with_color(palette(i % 4));
        trace.name = Some(region.to_string());
        chart = chart.with_trace(trace);
    }
    chart
}

/// Top 20 cities by revenue, labelled "City, State"
pub fn top_cities(view: &[&OrderRecord]) -> ChartSpec {
    let cities: Vec<((&str, &str, &str), f64)> = sum_by(
        view,
        |r| {
            (
                r.customer_city.as_str(),
                r.customer_state.as_str(),
                r.customer_region.as_str(),
            )
        },
        |r| r.sales_per_order,
    )
    .into_iter()
    .collect();
    let mut top = top_n(cities, 20, |(_, v)| *v);
    top.reverse();

    let mut chart = ChartSpec::new("top_cities", "Top 20 Cities by Revenue", ChartKind::Bar, 600)
        .with_axes("Revenue ($)", "City, State")
        .legend();

    for (i, (region, rows)) in split_series(&top, |((_, _, region), _)| *region).into_iter().enumerate() {
        chart = chart.with_trace(
            Trace::xy(
                ChartKind::Bar,
                region,
                rows.iter().map(|(_, v)| *v).collect(),
                rows.iter()
                    .map(|((city, state, _), _)| format!("{city}, {state}"))
                    .collect(),
            )
            .horizontal()
            .with_color(palette(i % 4))
            .with_hover("%{y}<br>Revenue: $%{x:,.0f}<extra></extra>"),
        );
    }
    chart
}

/// Segment x category grouped bars
pub fn segment_category_preference(view: &[&OrderRecord]) -> ChartSpec {
    let rows: Vec<((&str, &str), f64)> = sum_by(
        view,
        |r| (r.customer_segment.as_str(), r.category_name.as_str()),
        |r| r.sales_per_order,
    )
    .into_iter()
    .collect();

    let mut by_category = split_series(&rows, |((_, category), _)| *category);
    by_category.sort_by(|a, b| a.0.cmp(b.0));

    let mut chart = ChartSpec::new(
        "segment_category_preference",
        "Category Preference by Customer Segment",
        ChartKind::Bar,
        400,
    )
    .with_axes("Customer Segment", "Revenue ($)")
    .legend();
    chart.layout.bar_mode = Some(BarMode::Group);

    for (i, (category, points)) in by_category.into_iter().enumerate() {
        chart = chart.with_trace(
            Trace::xy(
                ChartKind::Bar,
                category,
                points.iter().map(|((segment, _), _)| *segment).collect(),
                points.iter().map(|(_, v)| *v).collect(),
            )
            .with_color(palette(i))
            .with_hover("%{x}<br>%{data.name}<br>Revenue: $%{y:,.0f}<extra></extra>"),
        );
    }
    chart
}

/// Revenue per US state
pub fn state_revenue_map(view: &[&OrderRecord]) -> ChartSpec {
    let mut trace = Trace::new(ChartKind::Choropleth)
        .with_color_scale("Blues")
        .with_hover("<b>%{location}</b><br>Revenue: $%{z:,.0f}<br>Profit: $%{customdata[0]:,.0f}<br>Orders: %{customdata[1]:,}<extra></extra>");

    for (state, stats) in group_by(view, |r| r.customer_state.as_str()) {
        let Some(code) = state_code(state) else {
            tracing::debug!("D500 Dashboard: no map code for state {:?}", state);
            continue;
        };
        trace.labels.push(code.to_string());
        trace.values.push(stats.revenue.into());
        trace.custom_data.push(vec![stats.profit.into(), stats.orders.into()]);
    }

    let mut chart = ChartSpec::new(
        "state_revenue_map",
        "Revenue by State",
        ChartKind::Choropleth,
        500,
    )
    .with_trace(trace);
    chart.layout.geo_scope = Some("usa".into());
    chart
}

/// States by revenue with the cumulative share and an 80% guide
pub fn revenue_pareto(view: &[&OrderRecord]) -> ChartSpec {
    let mut states: Vec<(&str, f64)> =
        sum_by(view, |r| r.customer_state.as_str(), |r| r.sales_per_order)
            .into_iter()
            .collect();
    states.sort_by(|a, b| b.1.total_cmp(&a.1));

    let total: f64 = states.iter().map(|(_, v)| v).sum();
    let mut running = 0.0;
    let cumulative: Vec<Option<f64>> = states
        .iter()
        .map(|(_, v)| {
            running += v;
            ratio(running, total).map(|r| r * 100.0)
        })
        .collect();

    let names: Vec<&str> = states.iter().map(|(s, _)| *s).collect();
    let mut chart = ChartSpec::new(
        "revenue_pareto",
        "Revenue Pareto Chart (80/20 Analysis by State)",
        ChartKind::Combo,
        500,
    )
    .with_trace(
        Trace::xy(
            ChartKind::Bar,
            "Revenue",
            names.clone(),
            states.iter().map(|(_, v)| *v).collect(),
        )
        .with_color(PRIMARY_COLOR)
        .with_hover("%{x}<br>Revenue: $%{y:,.0f}<extra></extra>"),
    )
    .with_trace(
        Trace::xy(ChartKind::Line, "Cumulative %", names, cumulative)
            .with_color(ACCENT_COLOR)
            .on_secondary_axis()
            .with_hover("Cumulative: %{y:.1f}%<extra></extra>"),
    )
    .with_reference_line(LineAxis::Y2, 80.0, Some("80%".into()))
    .legend()
    .unified_hover();
    chart.layout.x_axis_title = Some("State".into());
    chart
}
