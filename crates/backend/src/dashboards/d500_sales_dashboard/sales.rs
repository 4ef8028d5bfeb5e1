use chrono::{Datelike, NaiveDate};
use contracts::domain::order_record::OrderRecord;
use contracts::shared::charts::*;
use std::collections::BTreeMap;

use super::common::{palette, palette_cycle, split_series};
use crate::shared::charts::aggregate::{sum_by, top_n, Frequency, MONTHS, WEEKDAYS};
use crate::shared::format::truncate_label;

pub fn build(view: &[&OrderRecord]) -> Vec<ChartSpec> {
    vec![
        sales_trend_by_category(view),
        top_products(view),
        sales_by_segment(view),
        quantity_distribution(view),
        monthly_sales_heatmap(view),
    ]
}

/// Weekly revenue, one line per category
pub fn sales_trend_by_category(view: &[&OrderRecord]) -> ChartSpec {
    let weekly = sum_by(
        view,
        |r| {
            (
                r.category_name.as_str(),
                Frequency::WeekEndingSunday.bucket(r.order_date),
            )
        },
        |r| r.sales_per_order,
    );

    let mut per_category: BTreeMap<&str, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for ((category, week), revenue) in weekly {
        per_category.entry(category).or_default().push((week, revenue));
    }

    let mut chart = ChartSpec::new(
        "sales_trend_by_category",
        "Sales Trend by Category",
        ChartKind::Line,
        400,
    )
    .with_axes("Date", "Revenue ($)")
    .legend()
    .unified_hover();
    chart.layout.range_selector = true;

    for (i, (category, points)) in per_category.into_iter().enumerate() {
        chart = chart.with_trace(
            Trace::xy(
                ChartKind::Line,
                category,
                points.iter().map(|(d, _)| *d).collect(),
                points.iter().map(|(_, v)| *v).collect(),
            )
            .with_color(palette(i))
            .with_hover("%{y:$,.0f}"),
        );
    }
    chart
}

/// Top 20 products by revenue, bars coloured by category
pub fn top_products(view: &[&OrderRecord]) -> ChartSpec {
    let products: Vec<((&str, &str), f64)> = sum_by(
        view,
        |r| (r.product_name.as_str(), r.category_name.as_str()),
        |r| r.sales_per_order,
    )
    .into_iter()
    .collect();
    let mut top = top_n(products, 20, |(_, v)| *v);
    top.reverse();

    let mut chart = ChartSpec::new(
        "top_products",
        "Top 20 Products by Revenue",
        ChartKind::Bar,
        600,
    )
    .with_axes("Revenue ($)", "Product")
    .legend();

    for (i, (category, rows)) in split_series(&top, |((_, c), _)| *c).into_iter().enumerate() {
        chart = chart.with_trace(
            Trace::xy(
                ChartKind::Bar,
                category,
                rows.iter().map(|(_, v)| *v).collect(),
                rows.iter().map(|((p, _), _)| truncate_label(p, 50)).collect(),
            )
            .horizontal()
            .with_color(palette(i))
            .with_hover("%{y}<br>Revenue: $%{x:,.0f}<extra></extra>"),
        );
    }
    chart
}

/// Category x segment grouped bars
pub fn sales_by_segment(view: &[&OrderRecord]) -> ChartSpec {
    let sums = sum_by(
        view,
        |r| (r.category_name.as_str(), r.customer_segment.as_str()),
        |r| r.sales_per_order,
    );
    let rows: Vec<((&str, &str), f64)> = sums.into_iter().collect();

    let mut chart = ChartSpec::new(
        "sales_by_segment",
        "Sales by Customer Segment & Category",
        ChartKind::Bar,
        400,
    )
    .with_axes("Category", "Revenue ($)")
    .legend();
    chart.layout.bar_mode = Some(BarMode::Group);

    for (i, (segment, points)) in split_series(&rows, |((_, s), _)| *s).into_iter().enumerate() {
        chart = chart.with_trace(
            Trace::xy(
                ChartKind::Bar,
                segment,
                points.iter().map(|((c, _), _)| *c).collect(),
                points.iter().map(|(_, v)| *v).collect(),
            )
            .with_color(palette(i))
            .with_hover("%{x}<br>%{data.name}<br>Revenue: $%{y:,.0f}<extra></extra>"),
        );
    }
    chart
}

/// Number of orders per quantity, labelled with their share
pub fn quantity_distribution(view: &[&OrderRecord]) -> ChartSpec {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for record in view {
        *counts.entry(record.order_quantity).or_insert(0) += 1;
    }
    let total = view.len() as f64;
    let text = counts
        .values()
        .map(|c| format!("{}%", round1(*c as f64 / total * 100.0)))
        .collect();

    let trace = Trace::xy(
        ChartKind::Bar,
        "Orders",
        counts.keys().copied().collect(),
        counts.values().copied().collect(),
    )
    .with_colors(palette_cycle(5, counts.len()))
    .with_text(text)
    .with_hover("Quantity: %{x}<br>Orders: %{y:,}<br>Percentage: %{text}<extra></extra>");

    ChartSpec::new(
        "quantity_distribution",
        "Order Quantity Distribution",
        ChartKind::Bar,
        400,
    )
    .with_trace(trace)
    .with_axes("Quantity per Order", "Number of Orders")
}

/// Revenue per weekday (rows, Monday first) and calendar month (columns)
pub fn monthly_sales_heatmap(view: &[&OrderRecord]) -> ChartSpec {
    let sums = sum_by(
        view,
        |r| {
            (
                r.order_date.weekday().num_days_from_monday() as usize,
                r.order_date.month0() as usize,
            )
        },
        |r| r.sales_per_order,
    );

    let mut months: Vec<usize> = sums.keys().map(|(_, m)| *m).collect();
    months.sort_unstable();
    months.dedup();

    let z = (0..WEEKDAYS.len())
        .map(|day| {
            months
                .iter()
                .map(|month| CellValue::maybe(sums.get(&(day, *month)).copied()))
                .collect()
        })
        .collect();

    let mut trace = Trace::xy(
        ChartKind::Heatmap,
        "Revenue",
        months.iter().map(|m| MONTHS[*m]).collect(),
        WEEKDAYS.to_vec(),
    )
    .with_color_scale("Blues")
    .with_hover("%{y}, %{x}<br>Revenue: $%{z:,.0f}<extra></extra>");
    trace.z = z;

    ChartSpec::new(
        "monthly_sales_heatmap",
        "Sales Heatmap: Day of Week vs Month",
        ChartKind::Heatmap,
        700,
    )
    .with_trace(trace)
    .with_axes("Month", "Day of Week")
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
