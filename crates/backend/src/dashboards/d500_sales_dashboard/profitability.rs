use contracts::domain::order_record::OrderRecord;
use contracts::shared::charts::*;

use super::common::{palette, split_series, ACCENT_COLOR, ALERT_COLOR, PROFIT_COLOR};
use crate::shared::charts::aggregate::{resample, sum_by, top_n, Frequency};
use crate::shared::charts::stats::{linear_fit, sample_indices, SAMPLE_SEED, SAMPLE_SIZE};
use crate::shared::format::{format_dollars, truncate_label};

/// Category series use the first three palette colours
fn category_color(index: usize) -> &'static str {
    palette(index % 3)
}

pub fn build(view: &[&OrderRecord]) -> Vec<ChartSpec> {
    vec![
        profit_vs_revenue(view),
        profit_margin_by_category(view),
        discount_impact(view),
        top_profitable_products(view),
        profit_margin_trend(view),
    ]
}

/// Revenue/profit scatter over a reproducible sample, bubble size = quantity
pub fn profit_vs_revenue(view: &[&OrderRecord]) -> ChartSpec {
    let sample: Vec<&OrderRecord> = sample_indices(view.len(), SAMPLE_SIZE, SAMPLE_SEED)
        .into_iter()
        .map(|i| view[i])
        .collect();

    let mut chart = ChartSpec::new(
        "profit_vs_revenue",
        "Profit vs Revenue Analysis",
        ChartKind::Scatter,
        500,
    )
    .with_axes("Revenue ($)", "Profit ($)")
    .legend();

    let mut by_category: Vec<(&str, Vec<&OrderRecord>)> = split_series(&sample, |r| r.category_name.as_str())
        .into_iter()
        .map(|(c, rows)| (c, rows.into_iter().copied().collect()))
        .collect();
    by_category.sort_by(|a, b| a.0.cmp(b.0));

    for (i, (category, rows)) in by_category.iter().enumerate() {
        let mut trace = Trace::xy(
            ChartKind::Scatter,
            category,
            rows.iter().map(|r| r.sales_per_order).collect(),
            rows.iter().map(|r| r.profit_per_order).collect(),
        )
        .with_color(category_color(i))
        .with_opacity(0.6);
        trace.size = rows.iter().map(|r| CellValue::from(r.order_quantity)).collect();
        chart = chart.with_trace(trace);
    }

    let max_value = sample
        .iter()
        .flat_map(|r| [r.sales_per_order, r.profit_per_order])
        .fold(f64::NEG_INFINITY, f64::max);
    if max_value.is_finite() {
        chart = chart.with_trace(
            Trace::xy(
                ChartKind::Line,
                "Break-even Line",
                vec![0.0, max_value],
                vec![0.0, max_value],
            )
            .with_color("red")
            .dashed("dash"),
        );
    }
    chart
}

/// Per-order margin boxes; margins outside [-100, 100] are left out
pub fn profit_margin_by_category(view: &[&OrderRecord]) -> ChartSpec {
    let margins = group_margins(view);

    let mut chart = ChartSpec::new(
        "profit_margin_by_category",
        "Profit Margin Distribution by Category",
        ChartKind::Box,
        400,
    )
    .with_axes("Category", "Profit Margin (%)");

    for (i, (category, values)) in margins.into_iter().enumerate() {
        chart = chart.with_trace(
            Trace::xy(
                ChartKind::Box,
                category,
                vec![category; values.len()],
                values,
            )
            .with_color(category_color(i)),
        );
    }
    chart
}

fn group_margins<'a>(view: &[&'a OrderRecord]) -> Vec<(&'a str, Vec<f64>)> {
    let mut groups: Vec<(&str, Vec<f64>)> = Vec::new();
    for &record in view {
        let Some(margin) = record.profit_margin() else {
            continue;
        };
        if !(-100.0..=100.0).contains(&margin) {
            continue;
        }
        let category = record.category_name.as_str();
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, values)) => values.push(margin),
            None => groups.push((category, vec![margin])),
        }
    }
    groups.sort_by(|a, b| a.0.cmp(b.0));
    groups
}

/// Discount vs profit per category with an OLS trendline each
pub fn discount_impact(view: &[&OrderRecord]) -> ChartSpec {
    let mut chart = ChartSpec::new(
        "discount_impact",
        "Discount Impact on Profitability",
        ChartKind::Scatter,
        400,
    )
    .with_axes("Discount (%)", "Profit ($)")
    .legend();

    let mut categories = split_series(view, |r| r.category_name.as_str());
    categories.sort_by(|a, b| a.0.cmp(b.0));

    for (i, (category, rows)) in categories.into_iter().enumerate() {
        let xs: Vec<f64> = rows.iter().map(|r| r.order_item_discount).collect();
        let ys: Vec<f64> = rows.iter().map(|r| r.profit_per_order).collect();

        chart = chart.with_trace(
            Trace::xy(ChartKind::Scatter, category, xs.clone(), ys.clone())
                .with_color(category_color(i))
                .with_opacity(0.5),
        );

        if let Some(fit) = linear_fit(&xs, &ys) {
            let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            chart = chart.with_trace(
                Trace::xy(
                    ChartKind::Line,
                    &format!("{category} trend"),
                    vec![lo, hi],
                    vec![fit.predict(lo), fit.predict(hi)],
                )
                .with_color(category_color(i)),
            );
        }
    }
    chart
}

/// Waterfall of the ten most profitable products
pub fn top_profitable_products(view: &[&OrderRecord]) -> ChartSpec {
    let products: Vec<(&str, f64)> =
        sum_by(view, |r| r.product_name.as_str(), |r| r.profit_per_order)
            .into_iter()
            .collect();
    let top = top_n(products, 10, |(_, v)| *v);

    let values: Vec<f64> = top.iter().map(|(_, v)| *v).collect();
    let mut trace = Trace::xy(
        ChartKind::Waterfall,
        "Profit",
        top.iter().map(|(p, _)| truncate_label(p, 40)).collect(),
        values.clone(),
    )
    .with_text(values.iter().map(|v| format_dollars(*v)).collect());
    trace.colors = values
        .iter()
        .map(|v| (if *v < 0.0 { ALERT_COLOR } else { PROFIT_COLOR }).to_string())
        .collect();

    ChartSpec::new(
        "top_profitable_products",
        "Top 10 Most Profitable Products",
        ChartKind::Waterfall,
        500,
    )
    .with_trace(trace)
    .with_axes("Product", "Profit ($)")
}

/// Monthly margin with the average discount on a secondary axis
pub fn profit_margin_trend(view: &[&OrderRecord]) -> ChartSpec {
    let monthly = resample(view, Frequency::MonthEnd);
    let dates: Vec<_> = monthly.iter().map(|(d, _)| *d).collect();

    let mut chart = ChartSpec::new(
        "profit_margin_trend",
        "Profit Margin & Discount Trends",
        ChartKind::Line,
        400,
    )
    .with_trace(
        Trace::xy(
            ChartKind::Line,
            "Profit Margin",
            dates.clone(),
            monthly.iter().map(|(_, s)| s.margin()).collect(),
        )
        .with_color(PROFIT_COLOR)
        .with_hover("Profit Margin: %{y:.2f}%<extra></extra>"),
    )
    .with_trace(
        Trace::xy(
            ChartKind::Line,
            "Avg Discount",
            dates,
            monthly.iter().map(|(_, s)| s.avg_discount()).collect(),
        )
        .with_color(ACCENT_COLOR)
        .dashed("dot")
        .on_secondary_axis()
        .with_hover("Avg Discount: %{y:.2f}%<extra></extra>"),
    )
    .legend()
    .unified_hover();
    chart.layout.x_axis_title = Some("Date".into());
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::testing::{date, order, sample_orders};

    fn view(orders: &[OrderRecord]) -> Vec<&OrderRecord> {
        orders.iter().collect()
    }

    #[test]
    fn test_scatter_has_break_even_line() {
        let orders = sample_orders();
        let chart = profit_vs_revenue(&view(&orders));

        let line = chart.traces.last().unwrap();
        assert_eq!(line.name.as_deref(), Some("Break-even Line"));
        assert_eq!(line.x, vec![CellValue::Number(0.0), CellValue::Number(400.0)]);

        let points: usize = chart.traces.iter().filter(|t| t.kind == ChartKind::Scatter).map(|t| t.x.len()).sum();
        assert_eq!(points, 8);
    }

    #[test]
    fn test_scatter_sample_is_capped() {
        let orders: Vec<OrderRecord> = (0..6000)
            .map(|i| order(&i.to_string(), date(2022, 1, 1), i as f64, 1.0))
            .collect();
        let chart = profit_vs_revenue(&view(&orders));
        let points: usize = chart.traces.iter().filter(|t| t.kind == ChartKind::Scatter).map(|t| t.x.len()).sum();
        assert_eq!(points, SAMPLE_SIZE);

        let again = profit_vs_revenue(&view(&orders));
        assert_eq!(chart, again);
    }

    #[test]
    fn test_margin_boxes_drop_outliers() {
        let mut orders = sample_orders();
        // margin -500% is outside the plotted range, zero sales has no margin
        orders.push(order("9", date(2022, 4, 5), 10.0, -50.0));
        orders.push(order("10", date(2022, 4, 6), 0.0, 0.0));
        let margins = group_margins(&view(&orders));

        let office = margins.iter().find(|(c, _)| *c == "Office Supplies").unwrap();
        assert_eq!(office.1, vec![20.0, 10.0, 10.0]);
    }

    #[test]
    fn test_category_colours_cycle_through_three() {
        let orders: Vec<OrderRecord> = ["A", "B", "C", "D"]
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let mut o = order(&i.to_string(), date(2022, 1, 1), 100.0, 10.0);
                o.category_name = category.to_string();
                o
            })
            .collect();
        let chart = profit_margin_by_category(&view(&orders));

        let colors: Vec<&str> = chart.traces.iter().filter_map(|t| t.color.as_deref()).collect();
        assert_eq!(colors, vec!["#13957b", "#ff7f0e", "#2ca02c", "#13957b"]);
    }

    #[test]
    fn test_discount_trendline() {
        let mut orders = Vec::new();
        for (i, discount) in [0.0, 0.1, 0.2, 0.3].iter().enumerate() {
            let mut o = order(&i.to_string(), date(2022, 1, 1), 100.0, 50.0 - 100.0 * discount);
            o.order_item_discount = *discount;
            orders.push(o);
        }
        let chart = discount_impact(&view(&orders));

        assert_eq!(chart.traces.len(), 2);
        let trend = &chart.traces[1];
        assert_eq!(trend.kind, ChartKind::Line);
        let start = trend.y[0].as_f64().unwrap();
        let end = trend.y[1].as_f64().unwrap();
        assert!((start - 50.0).abs() < 1e-9);
        assert!((end - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_waterfall_top_ten_descending() {
        let orders = sample_orders();
        let chart = top_profitable_products(&view(&orders));
        let trace = &chart.traces[0];

        // Laptop 60 first, Phone -35 last
        assert_eq!(trace.x[0], CellValue::from("Laptop"));
        assert_eq!(trace.y.last(), Some(&CellValue::Number(-35.0)));
        assert_eq!(trace.text[0], "$60");
    }

    #[test]
    fn test_margin_trend_nulls_empty_months() {
        let orders = vec![
            order("1", date(2022, 1, 5), 100.0, 10.0),
            order("2", date(2022, 3, 5), 100.0, 20.0),
        ];
        let chart = profit_margin_trend(&view(&orders));
        let margin = &chart.traces[0];

        assert_eq!(margin.y.len(), 3);
        assert_eq!(margin.y[1], CellValue::Null);
        assert_eq!(margin.y[2], CellValue::Number(20.0));
    }

    #[test]
    fn test_empty_view() {
        let charts = build(&[]);
        assert_eq!(charts.len(), 5);
        assert!(charts[0].traces.is_empty());
    }
}
