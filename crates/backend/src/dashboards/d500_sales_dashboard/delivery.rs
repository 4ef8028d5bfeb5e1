use contracts::domain::order_record::OrderRecord;
use contracts::enums::delivery_status::DeliveryStatus;
use contracts::shared::charts::*;
use std::collections::BTreeMap;

use super::common::{palette, palette_cycle, split_series, ALERT_COLOR, CANCELED_COLOR};
use crate::shared::charts::aggregate::{group_by, resample, Frequency};
use crate::shared::charts::geo::state_code;
use crate::shared::charts::stats::{mean, sample_std};

pub fn build(view: &[&OrderRecord]) -> Vec<ChartSpec> {
    vec![
        delivery_status(view),
        delivery_by_shipping_type(view),
        delivery_time_by_region(view),
        delivery_time_by_shipping(view),
        late_delivery_trend(view),
        state_delivery_map(view),
    ]
}

/// Status shares, most frequent first, late slice pulled out
pub fn delivery_status(view: &[&OrderRecord]) -> ChartSpec {
    let mut counts: Vec<(DeliveryStatus, usize)> = Vec::new();
    for record in view {
        match counts.iter_mut().find(|(s, _)| *s == record.delivery_status) {
            Some((_, n)) => *n += 1,
            None => counts.push((record.delivery_status, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let mut trace = Trace::labeled(
        ChartKind::Pie,
        counts.iter().map(|(s, _)| s.code().to_string()).collect(),
        counts.iter().map(|(_, n)| *n).collect(),
    )
    .with_colors(counts.iter().map(|(s, _)| s.color().to_string()).collect())
    .with_hover("<b>%{label}</b><br>Orders: %{value:,}<br>Percentage: %{percent}<extra></extra>");
    trace.pull = counts
        .iter()
        .map(|(s, _)| if *s == DeliveryStatus::LateDelivery { 0.1 } else { 0.0 })
        .collect();

    ChartSpec::new(
        "delivery_status",
        "Delivery Status Distribution",
        ChartKind::Pie,
        400,
    )
    .with_trace(trace)
    .legend()
}

/// Share of each status within a shipping type, stacked to 100%
pub fn delivery_by_shipping_type(view: &[&OrderRecord]) -> ChartSpec {
    let mut table: BTreeMap<&str, BTreeMap<DeliveryStatus, usize>> = BTreeMap::new();
    let mut statuses: Vec<DeliveryStatus> = Vec::new();
    for record in view {
        *table
            .entry(record.shipping_type.as_str())
            .or_default()
            .entry(record.delivery_status)
            .or_insert(0) += 1;
        if !statuses.contains(&record.delivery_status) {
            statuses.push(record.delivery_status);
        }
    }
    statuses.sort_by_key(|s| s.code());

    let mut chart = ChartSpec::new(
        "delivery_by_shipping_type",
        "Delivery Performance by Shipping Type",
        ChartKind::Bar,
        400,
    )
    .with_axes("Shipping Type", "Percentage (%)")
    .legend();
    chart.layout.bar_mode = Some(BarMode::Stack);

    for status in statuses {
        let shares: Vec<f64> = table
            .values()
            .map(|row| {
                let total: usize = row.values().sum();
                row.get(&status).copied().unwrap_or(0) as f64 / total as f64 * 100.0
            })
            .collect();
        chart = chart.with_trace(
            Trace::xy(
                ChartKind::Bar,
                status.code(),
                table.keys().copied().collect(),
                shares,
            )
            .with_color(status.color())
            .with_hover("%{x}<br>%{data.name}: %{y:.1f}%<extra></extra>"),
        );
    }
    chart
}

/// Mean delivery days per region with one standard deviation error bars
pub fn delivery_time_by_region(view: &[&OrderRecord]) -> ChartSpec {
    let mut days: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for record in view {
        days.entry(record.customer_region.as_str())
            .or_default()
            .push(record.days_for_shipment_real);
    }

    let mut regions: Vec<(&str, f64, Option<f64>)> = days
        .iter()
        .filter_map(|(region, values)| Some((*region, mean(values)?, sample_std(values))))
        .collect();
    regions.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut trace = Trace::xy(
        ChartKind::Bar,
        "Average Days",
        regions.iter().map(|(r, _, _)| *r).collect(),
        regions.iter().map(|(_, m, _)| *m).collect(),
    )
    .with_colors(palette_cycle(4, regions.len()))
    .with_text(regions.iter().map(|(_, m, _)| format!("{m:.1} days")).collect())
    .with_hover("%{x}<br>Avg Days: %{y:.2f}<br>Std Dev: %{error_y.array:.2f}<extra></extra>");
    trace.error_y = regions.iter().map(|(_, _, s)| CellValue::maybe(*s)).collect();

    let mut chart = ChartSpec::new(
        "delivery_time_by_region",
        "Average Delivery Time by Region (with Std Dev)",
        ChartKind::Bar,
        400,
    )
    .with_trace(trace)
    .with_axes("Region", "Average Days");

    let all_days: Vec<f64> = view.iter().map(|r| r.days_for_shipment_real).collect();
    if let Some(overall) = mean(&all_days) {
        chart = chart.with_reference_line(
            LineAxis::Y,
            overall,
            Some(format!("Overall Avg: {overall:.1} days")),
        );
    }
    chart
}

/// Delivery days distribution per shipping type
pub fn delivery_time_by_shipping(view: &[&OrderRecord]) -> ChartSpec {
    let mut chart = ChartSpec::new(
        "delivery_time_by_shipping",
        "Delivery Time Distribution by Shipping Type",
        ChartKind::Box,
        400,
    )
    .with_axes("Shipping Type", "Delivery Days");

    for (i, (shipping, rows)) in split_series(view, |r| r.shipping_type.as_str()).into_iter().enumerate() {
        chart = chart.with_trace(
            Trace::xy(
                ChartKind::Box,
                shipping,
                vec![shipping; rows.len()],
                rows.iter().map(|r| r.days_for_shipment_real).collect(),
            )
            .with_color(palette(i % 4)),
        );
    }
    chart
}

/// Weekly late and cancellation rates
pub fn late_delivery_trend(view: &[&OrderRecord]) -> ChartSpec {
    let weekly = resample(view, Frequency::WeekEndingSunday);
    let weeks: Vec<_> = weekly.iter().map(|(d, _)| *d).collect();

    ChartSpec::new(
        "late_delivery_trend",
        "Late Delivery & Cancellation Rate Trends (Weekly)",
        ChartKind::Line,
        400,
    )
    .with_trace(
        Trace::xy(
            ChartKind::Line,
            "Late Delivery Rate",
            weeks.clone(),
            weekly.iter().map(|(_, s)| s.late_rate()).collect(),
        )
        .with_color(ALERT_COLOR)
        .with_hover("Late Rate: %{y:.2f}%<extra></extra>"),
    )
    .with_trace(
        Trace::xy(
            ChartKind::Line,
            "Cancellation Rate",
            weeks,
            weekly.iter().map(|(_, s)| s.cancel_rate()).collect(),
        )
        .with_color(CANCELED_COLOR)
        .with_hover("Cancel Rate: %{y:.2f}%<extra></extra>"),
    )
    .with_axes("Date", "Rate (%)")
    .legend()
    .unified_hover()
}

/// On-time rate per US state
pub fn state_delivery_map(view: &[&OrderRecord]) -> ChartSpec {
    let mut trace = Trace::new(ChartKind::Choropleth)
        .with_color_scale("RdYlGn")
        .with_hover("<b>%{location}</b><br>On-Time Rate: %{z:.1f}%<br>Total Orders: %{customdata[0]:,}<br>On-Time: %{customdata[1]:,}<br>Late: %{customdata[2]:,}<extra></extra>");

    for (state, stats) in group_by(view, |r| r.customer_state.as_str()) {
        let Some(code) = state_code(state) else {
            tracing::debug!("D500 Dashboard: no map code for state {:?}", state);
            continue;
        };
        trace.labels.push(code.to_string());
        trace.values.push(stats.on_time_rate().into());
        trace.custom_data.push(vec![
            stats.orders.into(),
            stats.on_time.into(),
            stats.late.into(),
        ]);
    }

    let mut chart = ChartSpec::new(
        "state_delivery_map",
        "On-Time Delivery Rate by State",
        ChartKind::Choropleth,
        500,
    )
    .with_trace(trace);
    chart.layout.geo_scope = Some("usa".into());
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
    fn test_status_pie_pulls_late_slice() {
        let orders = sample_orders();
        let chart = delivery_status(&view(&orders));
        let trace = &chart.traces[0];

        assert_eq!(trace.labels[0], "Shipping on time");
        assert_eq!(trace.values[0], CellValue::Integer(4));
        let late = trace.labels.iter().position(|l| l == "Late delivery").unwrap();
        assert_eq!(trace.pull[late], 0.1);
        assert_eq!(trace.colors[late], "#d62728");
        assert_eq!(trace.pull.iter().filter(|p| **p > 0.0).count(), 1);
    }

    #[test]
    fn test_crosstab_rows_sum_to_hundred() {
        let orders = sample_orders();
        let chart = delivery_by_shipping_type(&view(&orders));

        let types = chart.traces[0].x.len();
        for col in 0..types {
            let total: f64 = chart.traces.iter().filter_map(|t| t.y[col].as_f64()).sum();
            assert!((total - 100.0).abs() < 1e-9);
        }
        // First Class: orders 2 and 6, both late
        let late = chart.traces.iter().find(|t| t.name.as_deref() == Some("Late delivery")).unwrap();
        let first_class = late.x.iter().position(|x| *x == CellValue::from("First Class")).unwrap();
        assert_eq!(late.y[first_class], CellValue::Number(100.0));
    }

    #[test]
    fn test_delivery_time_by_region() {
        let orders = sample_orders();
        let chart = delivery_time_by_region(&view(&orders));
        let trace = &chart.traces[0];

        // Central (2, 5) averages 3.5; East (6, 0, 4) and West (3, 4, 3) tie at 3.33
        assert_eq!(
            trace.x,
            vec![CellValue::from("Central"), CellValue::from("East"), CellValue::from("West")]
        );
        assert_eq!(trace.text[0], "3.5 days");
        assert_eq!(chart.layout.reference_lines.len(), 1);
        assert!((chart.layout.reference_lines[0].value - 27.0 / 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_order_region_has_no_std() {
        let orders = vec![order("1", date(2022, 1, 1), 10.0, 1.0)];
        let chart = delivery_time_by_region(&view(&orders));
        assert_eq!(chart.traces[0].error_y, vec![CellValue::Null]);
    }

    #[test]
    fn test_state_map_uses_postal_codes() {
        let mut orders = sample_orders();
        let mut unknown = order("9", date(2022, 4, 5), 10.0, 1.0);
        unknown.customer_state = "Atlantis".into();
        orders.push(unknown);

        let chart = state_delivery_map(&view(&orders));
        let trace = &chart.traces[0];
        assert_eq!(trace.labels, vec!["CA", "FL", "IL", "NY", "TX", "WA"]);
        // New York: one late, one canceled
        assert_eq!(trace.values[3], CellValue::Number(0.0));
        assert_eq!(chart.layout.geo_scope.as_deref(), Some("usa"));
    }

    #[test]
    fn test_weekly_rates_are_null_for_empty_weeks() {
        let orders = sample_orders();
        let chart = late_delivery_trend(&view(&orders));
        let late = &chart.traces[0];
        // week ending 2022-01-30 has no orders
        let idx = late.x.iter().position(|x| *x == CellValue::Date(date(2022, 1, 30))).unwrap();
        assert_eq!(late.y[idx], CellValue::Null);
    }

    #[test]
    fn test_empty_view() {
        let charts = build(&[]);
        assert_eq!(charts.len(), 6);
        assert!(charts[1].traces.is_empty());
        assert!(charts[2].layout.reference_lines.is_empty());
    }
}
