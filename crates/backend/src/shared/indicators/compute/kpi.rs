use contracts::domain::order_record::OrderRecord;
use contracts::shared::indicators::KpiSummary;

/// Headline KPIs of a filtered view.
///
/// Ratios never fail: an empty view or zero revenue yields `0.0`.
pub fn compute_kpis<'a, I>(view: I) -> KpiSummary
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let mut total_revenue = 0.0;
    let mut total_profit = 0.0;
    let mut total_orders = 0usize;
    let mut on_time = 0usize;
    let mut late_deliveries = 0usize;

    for record in view {
        total_revenue += record.sales_per_order;
        total_profit += record.profit_per_order;
        total_orders += 1;
        if record.is_on_time() {
            on_time += 1;
        }
        if record.is_late() {
            late_deliveries += 1;
        }
    }

    let profit_margin = if total_revenue > 0.0 {
        total_profit / total_revenue * 100.0
    } else {
        0.0
    };
    let (avg_order_value, on_time_rate) = if total_orders > 0 {
        (
            total_revenue / total_orders as f64,
            on_time as f64 / total_orders as f64 * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    KpiSummary {
        total_revenue,
        total_profit,
        total_orders,
        profit_margin,
        avg_order_value,
        on_time_rate,
        late_deliveries,
    }
}
