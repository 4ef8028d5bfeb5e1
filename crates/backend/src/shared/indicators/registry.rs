use contracts::shared::indicators::*;
use std::collections::HashMap;

use super::metadata::ids;
use crate::shared::format::{format_count, format_money};

type ComputeFn = fn(&KpiSummary) -> IndicatorValue;

/// Central registry: maps `IndicatorId` to the function deriving its card
/// from a KPI summary.
pub struct IndicatorRegistry {
    fns: HashMap<String, ComputeFn>,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        let mut fns: HashMap<String, ComputeFn> = HashMap::new();

        fns.insert(ids::total_revenue().0, |k| IndicatorValue {
            id: ids::total_revenue(),
            value: Some(k.total_revenue),
            status: IndicatorStatus::Neutral,
            subtitle: Some(format_money(k.total_revenue)),
        });
        fns.insert(ids::total_profit().0, |k| IndicatorValue {
            id: ids::total_profit(),
            value: Some(k.total_profit),
            status: sign_status(k.total_profit),
            subtitle: Some(format!("{:.1}% margin", k.profit_margin)),
        });
        fns.insert(ids::total_orders().0, |k| IndicatorValue {
            id: ids::total_orders(),
            value: Some(k.total_orders as f64),
            status: IndicatorStatus::Neutral,
            subtitle: Some(format!("${:.2} AOV", k.avg_order_value)),
        });
        fns.insert(ids::profit_margin().0, |k| IndicatorValue {
            id: ids::profit_margin(),
            value: Some(k.profit_margin),
            status: sign_status(k.profit_margin),
            subtitle: None,
        });
        fns.insert(ids::avg_order_value().0, |k| IndicatorValue {
            id: ids::avg_order_value(),
            value: Some(k.avg_order_value),
            status: IndicatorStatus::Neutral,
            subtitle: None,
        });
        fns.insert(ids::on_time_rate().0, |k| IndicatorValue {
            id: ids::on_time_rate(),
            value: Some(k.on_time_rate),
            status: on_time_status(k.on_time_rate),
            subtitle: Some(format!("{} late", format_count(k.late_deliveries))),
        });
        fns.insert(ids::late_deliveries().0, |k| IndicatorValue {
            id: ids::late_deliveries(),
            value: Some(k.late_deliveries as f64),
            status: if k.late_deliveries > 0 {
                IndicatorStatus::Warning
            } else {
                IndicatorStatus::Good
            },
            subtitle: None,
        });

        Self { fns }
    }

    /// Compute a batch of indicators from one KPI summary.
    pub fn compute(&self, ids: &[IndicatorId], kpis: &KpiSummary) -> Vec<IndicatorValue> {
        let mut results = Vec::with_capacity(ids.len());

        for id in ids {
            if let Some(compute_fn) = self.fns.get(&id.0) {
                results.push(compute_fn(kpis));
            } else {
                tracing::warn!("indicator {} not found in registry", id.0);
            }
        }

        results
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn sign_status(value: f64) -> IndicatorStatus {
    if value < 0.0 {
        IndicatorStatus::Bad
    } else {
        IndicatorStatus::Neutral
    }
}

/// Пороги как на карточке "On-Time Delivery": 95% и 90%
fn on_time_status(rate: f64) -> IndicatorStatus {
    if rate >= 95.0 {
        IndicatorStatus::Good
    } else if rate >= 90.0 {
        IndicatorStatus::Neutral
    } else {
        IndicatorStatus::Bad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::indicators::metadata::build_catalog;

    fn kpis() -> KpiSummary {
        KpiSummary {
            total_revenue: 1_250_000.0,
            total_profit: -500.0,
            total_orders: 2500,
            profit_margin: -0.04,
            avg_order_value: 500.0,
            on_time_rate: 92.5,
            late_deliveries: 1234,
        }
    }

    #[test]
    fn test_every_catalog_indicator_is_registered() {
        let registry = IndicatorRegistry::new();
        let ids: Vec<IndicatorId> = build_catalog().indicators.into_iter().map(|m| m.id).collect();

        let values = registry.compute(&ids, &kpis());
        assert_eq!(values.len(), ids.len());
    }

    #[test]
    fn test_unknown_indicator_is_skipped() {
        let registry = IndicatorRegistry::new();
        let values = registry.compute(
            &[IndicatorId::new("nope"), ids::on_time_rate()],
            &kpis(),
        );
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].status, IndicatorStatus::Neutral);
        assert_eq!(values[0].subtitle.as_deref(), Some("1,234 late"));
    }

    #[test]
    fn test_statuses() {
        let registry = IndicatorRegistry::new();
        let values = registry.compute(&[ids::total_profit(), ids::late_deliveries()], &kpis());
        assert_eq!(values[0].status, IndicatorStatus::Bad);
        assert_eq!(values[1].status, IndicatorStatus::Warning);
        assert_eq!(on_time_status(96.0), IndicatorStatus::Good);
        assert_eq!(on_time_status(80.0), IndicatorStatus::Bad);
    }
}
