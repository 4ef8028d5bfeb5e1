use chrono::Datelike;
use contracts::domain::order_record::OrderRecord;
use contracts::shared::charts::*;

use super::common::{palette, split_series, ACCENT_COLOR, ALERT_COLOR, PROFIT_COLOR};
use crate::shared::charts::aggregate::{group_by, resample, sum_by, Frequency, WEEKDAYS};
use crate::shared::charts::stats::{centered_rolling_mean, rolling_mean};
use crate::shared::format::format_dollars;

pub fn build(view: &[&OrderRecord]) -> Vec<ChartSpec> {
    vec![
        daily_sales(view),
        monthly_revenue_profit(view),
        day_of_week(view),
        weekly_heatmap(view),
        quarterly_analysis(view),
        trend_decomposition(view),
    ]
}

/// Daily revenue with 7- and 30-day trailing averages
pub fn daily_sales(view: &[&OrderRecord]) -> ChartSpec {
    let daily = sum_by(view, |r| r.order_date, |r| r.sales_per_order);
    let dates: Vec<_> = daily.keys().copied().collect();
    let revenue: Vec<f64> = daily.values().copied().collect();

    let mut chart = ChartSpec::new(
        "daily_sales",
        "Daily Sales Pattern with Moving Averages",
        ChartKind::Line,
        400,
    )
    .with_axes("Date", "Revenue ($)")
    .legend()
    .unified_hover();
    chart.layout.range_selector = true;

    let series = [
        ("7-Day Moving Avg", rolling_mean(&revenue, 7), PRIMARY_COLOR, "7-Day MA"),
        ("30-Day Moving Avg", rolling_mean(&revenue, 30), ACCENT_COLOR, "30-Day MA"),
    ];

    chart = chart.with_trace(
        Trace::xy(ChartKind::Line, "Daily Sales", dates.clone(), revenue.clone())
            .with_color("lightblue")
            .with_hover("Daily: $%{y:,.0f}<extra></extra>"),
    );
    for (name, values, color, short) in series {
        chart = chart.with_trace(
            Trace::xy(ChartKind::Line, name, dates.clone(), values)
                .with_color(color)
                .with_hover(&format!("{short}: $%{{y:,.0f}}<extra></extra>")),
        );
    }
    chart
}

/// Monthly revenue and profit bars with the margin on a secondary axis
pub fn monthly_revenue_profit(view: &[&OrderRecord]) -> ChartSpec {
    let monthly = resample(view, Frequency::MonthEnd);
    let dates: Vec<_> = monthly.iter().map(|(d, _)| *d).collect();

    let mut chart = ChartSpec::new(
        "monthly_revenue_profit",
        "Monthly Revenue, Profit & Margin",
        ChartKind::Combo,
        400,
    )
    .with_trace(
        Trace::xy(
            ChartKind::Bar,
            "Revenue",
            dates.clone(),
            monthly.iter().map(|(_, s)| s.revenue).collect(),
        )
        .with_color(PRIMARY_COLOR)
        .with_hover("Revenue: $%{y:,.0f}<extra></extra>"),
    )
    .with_trace(
        Trace::xy(
            ChartKind::Bar,
            "Profit",
            dates.clone(),
            monthly.iter().map(|(_, s)| s.profit).collect(),
        )
        .with_color(PROFIT_COLOR)
        .with_hover("Profit: $%{y:,.0f}<extra></extra>"),
    )
    .with_trace(
        Trace::xy(
            ChartKind::Line,
            "Profit Margin",
            dates,
            monthly.iter().map(|(_, s)| s.margin()).collect(),
        )
        .with_color(ACCENT_COLOR)
        .on_secondary_axis()
        .with_hover("Margin: %{y:.2f}%<extra></extra>"),
    )
    .legend()
    .unified_hover();
    chart.layout.bar_mode = Some(BarMode::Group);
    chart.layout.x_axis_title = Some("Month".into());
    chart
}

/// Mean order revenue per weekday, Monday first; weekdays without orders
/// are left out
pub fn day_of_week(view: &[&OrderRecord]) -> ChartSpec {
    let days: Vec<(usize, f64)> = group_by(view, |r| r.order_date.weekday().num_days_from_monday() as usize)
        .into_iter()
        .filter_map(|(day, s)| s.avg_order_value().map(|v| (day, v)))
        .collect();

    let means: Vec<f64> = days.iter().map(|(_, v)| *v).collect();
    let mut trace = Trace::xy(
        ChartKind::Bar,
        "Avg Revenue",
        days.iter().map(|(d, _)| WEEKDAYS[*d]).collect(),
        means.clone(),
    )
    .with_color_scale("Blues")
    .with_text(means.iter().map(|v| format_dollars(*v)).collect())
    .with_hover("%{x}<br>Avg Revenue: $%{y:,.0f}<extra></extra>");
    trace.color_values = means.into_iter().map(CellValue::from).collect();

    ChartSpec::new(
        "day_of_week",
        "Average Revenue by Day of Week",
        ChartKind::Bar,
        400,
    )
    .with_trace(trace)
    .with_axes("Day of Week", "Average Revenue ($)")
}

/// Revenue per ISO week number (columns) and weekday (rows)
pub fn weekly_heatmap(view: &[&OrderRecord]) -> ChartSpec {
    let sums = sum_by(
        view,
        |r| {
            (
                r.order_date.weekday().num_days_from_monday() as usize,
                r.order_date.iso_week().week(),
            )
        },
        |r| r.sales_per_order,
    );

    let mut weeks: Vec<u32> = sums.keys().map(|(_, w)| *w).collect();
    weeks.sort_unstable();
    weeks.dedup();

    let z = (0..WEEKDAYS.len())
        .map(|day| {
            weeks
                .iter()
                .map(|week| CellValue::maybe(sums.get(&(day, *week)).copied()))
                .collect()
        })
        .collect();

    let mut trace = Trace::xy(
        ChartKind::Heatmap,
        "Revenue",
        weeks.iter().map(|w| *w as i64).collect(),
        WEEKDAYS.to_vec(),
    )
    .with_color_scale("Blues")
    .with_hover("Week %{x}, %{y}<br>Revenue: $%{z:,.0f}<extra></extra>");
    trace.z = z;

    ChartSpec::new(
        "weekly_heatmap",
        "Weekly Sales Heatmap: Week Number vs Day of Week",
        ChartKind::Heatmap,
        400,
    )
    .with_trace(trace)
    .with_axes("Week Number", "Day of Week")
}

/// Revenue per calendar month, one line per quarter
pub fn quarterly_analysis(view: &[&OrderRecord]) -> ChartSpec {
    let rows: Vec<((u32, u32), f64)> = sum_by(
        view,
        |r| (r.order_date.month0() / 3 + 1, r.order_date.month()),
        |r| r.sales_per_order,
    )
    .into_iter()
    .collect();

    let mut chart = ChartSpec::new(
        "quarterly_analysis",
        "Quarterly Revenue Comparison",
        ChartKind::Line,
        400,
    )
    .with_axes("Month", "Revenue ($)")
    .legend();

    for (i, (quarter, points)) in split_series(&rows, |((q, _), _)| *q).into_iter().enumerate() {
        chart = chart.with_trace(
            Trace::xy(
                ChartKind::Line,
                &format!("Q{quarter}"),
                points.iter().map(|((_, m), _)| *m as i64).collect(),
                points.iter().map(|(_, v)| *v).collect(),
            )
            .with_color(palette(i))
            .with_markers(),
        );
    }
    chart
}

pub const DECOMPOSITION_WINDOW: usize = 4;

/// Weekly revenue split into trend, seasonal and residual parts, one
/// subplot row each
pub fn trend_decomposition(view: &[&OrderRecord]) -> ChartSpec {
    let weekly = resample(view, Frequency::WeekEndingSunday);
    let dates: Vec<_> = weekly.iter().map(|(d, _)| *d).collect();
    let original: Vec<f64> = weekly.iter().map(|(_, s)| s.revenue).collect();
    let trend = centered_rolling_mean(&original, DECOMPOSITION_WINDOW);
    let seasonal: Vec<f64> = original.iter().zip(&trend).map(|(o, t)| o - t).collect();
    let residual: Vec<f64> = original
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .map(|((o, t), s)| o - t - s)
        .collect();

    let components = [
        ("Original", original, PRIMARY_COLOR),
        ("Trend", trend, ACCENT_COLOR),
        ("Seasonal", seasonal, PROFIT_COLOR),
        ("Residual", residual, ALERT_COLOR),
    ];

    let mut chart = ChartSpec::new(
        "trend_decomposition",
        "Sales Trend Decomposition (Weekly)",
        ChartKind::Line,
        800,
    );
    chart.layout.subplot_titles = components.iter().map(|(name, _, _)| name.to_string()).collect();

    for (row, (name, values, color)) in components.into_iter().enumerate() {
        chart = chart.with_trace(
            Trace::xy(ChartKind::Line, name, dates.clone(), values)
                .with_color(color)
                .in_row(row as u8 + 1),
        );
    }
    chart
}
