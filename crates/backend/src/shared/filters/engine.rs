use chrono::NaiveDate;
use contracts::domain::order_record::OrderRecord;
use contracts::shared::filters::{Dimension, FilterSet, FilterUpdate};
use contracts::shared::indicators::KpiSummary;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::shared::data::dataset::Dataset;
use crate::shared::indicators::compute::kpi;

/// Filter state of one dashboard session over a shared dataset.
///
/// The filtered view is stored as row indices into the dataset and is
/// rebuilt from scratch on every filter change.
pub struct FilterEngine {
    dataset: Arc<Dataset>,
    filters: FilterSet,
    view: Vec<usize>,
}

impl FilterEngine {
    /// Engine with no active filters: the view is the whole dataset
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let view = (0..dataset.len()).collect();
        Self {
            dataset,
            filters: FilterSet::default(),
            view,
        }
    }

    /// Merge `update` into the current filters and recompute the view
    pub fn set_filters(&mut self, update: FilterUpdate) {
        self.filters.merge(update);
        self.apply_filters();
    }

    /// Rebuild the filtered view from the full dataset
    pub fn apply_filters(&mut self) {
        let filters = &self.filters;
        self.view = self
            .dataset
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| filters.matches(record))
            .map(|(index, _)| index)
            .collect();

        tracing::debug!(
            "Filters: {} of {} rows match",
            self.view.len(),
            self.dataset.len()
        );
    }

    /// Back to "no restriction" on every dimension
    pub fn reset_filters(&mut self) {
        self.filters = FilterSet::default();
        self.apply_filters();
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Row indices of the filtered view, ascending
    pub fn view_indices(&self) -> &[usize] {
        &self.view
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    /// Records of the filtered view in dataset order
    pub fn filtered_view(&self) -> Vec<&OrderRecord> {
        let records = self.dataset.records();
        self.view.iter().map(|&i| &records[i]).collect()
    }

    pub fn compute_kpis(&self) -> KpiSummary {
        let records = self.dataset.records();
        kpi::compute_kpis(self.view.iter().map(|&i| &records[i]))
    }

    /// Sorted distinct values of `dimension` over the full dataset
    pub fn unique_values(&self, dimension: Dimension) -> Vec<String> {
        self.dataset
            .records()
            .iter()
            .map(|r| dimension.value_of(r))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Earliest and latest order date over the full dataset
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let records = self.dataset.records();
        let min = records.iter().map(|r| r.order_date).min()?;
        let max = records.iter().map(|r| r.order_date).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::testing::{date, order, sample_dataset, sample_orders};
    use contracts::enums::delivery_status::DeliveryStatus;
    use contracts::shared::filters::{DateRange, DimensionFilter, EmptySelection, FilterSelection};

    fn update() -> FilterUpdate {
        FilterUpdate::default()
    }

    #[test]
    fn test_view_is_subset_of_dataset() {
        let mut engine = FilterEngine::new(sample_dataset());
        let updates = vec![
            update().with_dimension(Dimension::CustomerRegion, DimensionFilter::only(["West", "East"])),
            update().with_date_range(Some(DateRange::new(date(2022, 1, 5), date(2022, 3, 1)))),
            update().with_dimension(Dimension::ShippingType, DimensionFilter::only(["No Such Class"])),
        ];

        for u in updates {
            engine.set_filters(u);
            for record in engine.filtered_view() {
                assert!(engine.dataset().records().contains(record));
            }
            assert!(engine.view_len() <= engine.dataset().len());
        }
    }

    #[test]
    fn test_apply_filters_is_idempotent() {
        let mut engine = FilterEngine::new(sample_dataset());
        engine.set_filters(
            update()
                .with_dimension(Dimension::CategoryName, DimensionFilter::only(["Technology"]))
                .with_dimension(Dimension::CustomerSegment, DimensionFilter::only(["Consumer"])),
        );
        let first = engine.view_indices().to_vec();
        engine.apply_filters();
        assert_eq!(engine.view_indices(), first.as_slice());
        assert_eq!(first, vec![3, 7]);
    }

    #[test]
    fn test_unfiltered_kpis_equal_full_dataset_kpis() {
        let engine = FilterEngine::new(sample_dataset());
        assert_eq!(engine.compute_kpis(), kpi::compute_kpis(&sample_orders()));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let mut engine = FilterEngine::new(sample_dataset());
        engine.set_filters(update().with_dimension(Dimension::CustomerRegion, DimensionFilter::only(["West"])));
        assert_eq!(engine.view_len(), 3);

        engine.set_filters(update().with_dimension(
            Dimension::DeliveryStatus,
            DimensionFilter::only([DeliveryStatus::ShippingOnTime.code()]),
        ));
        // region filter from the previous call is still active
        assert_eq!(engine.view_len(), 3);

        engine.set_filters(update().with_date_range(Some(DateRange::new(date(2022, 2, 1), date(2022, 3, 21)))));
        let ids: Vec<&str> = engine.filtered_view().iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["4", "7"]);

        engine.reset_filters();
        assert_eq!(engine.view_len(), 8);
        assert!(engine.filters().is_unrestricted());
    }

    /// An empty multi-select and an untouched one both leave the dimension
    /// unfiltered under the default policy. This mirrors how the dashboard
    /// has always behaved, even though "nothing selected" reads like "show
    /// nothing" in the UI.
    #[test]
    fn test_empty_selection_equals_missing_selection() {
        let dataset = sample_dataset();

        let mut with_empty = FilterEngine::new(Arc::clone(&dataset));
        with_empty.set_filters(
            FilterSelection {
                customer_region: Some(vec![]),
                ..Default::default()
            }
            .to_update(EmptySelection::NoRestriction),
        );

        let mut with_none = FilterEngine::new(Arc::clone(&dataset));
        with_none.set_filters(FilterSelection::default().to_update(EmptySelection::NoRestriction));

        assert_eq!(with_empty.view_indices(), with_none.view_indices());
        assert_eq!(with_empty.view_len(), dataset.len());
    }

    #[test]
    fn test_explicit_empty_set_matches_nothing() {
        let mut engine = FilterEngine::new(sample_dataset());
        engine.set_filters(update().with_dimension(Dimension::CategoryName, DimensionFilter::only(Vec::<String>::new())));
        assert_eq!(engine.view_len(), 0);

        let kpis = engine.compute_kpis();
        assert_eq!(kpis.profit_margin, 0.0);
        assert_eq!(kpis.avg_order_value, 0.0);
        assert_eq!(kpis.on_time_rate, 0.0);

        let mut strict = FilterEngine::new(sample_dataset());
        strict.set_filters(
            FilterSelection {
                category_name: Some(vec![]),
                ..Default::default()
            }
            .to_update(EmptySelection::MatchNothing),
        );
        assert_eq!(strict.view_len(), 0);
    }

    #[test]
    fn test_three_record_scenario() {
        let mut late = order("2", date(2022, 5, 2), 200.0, -5.0);
        late.delivery_status = DeliveryStatus::LateDelivery;
        let mut zero = order("3", date(2022, 6, 15), 0.0, 0.0);
        zero.delivery_status = DeliveryStatus::ShippingCanceled;
        let records = vec![order("1", date(2022, 5, 1), 100.0, 10.0), late, zero];

        let mut engine = FilterEngine::new(Arc::new(Dataset::from_records("scenario", records)));
        engine.set_filters(update().with_date_range(Some(DateRange::new(date(2022, 5, 1), date(2022, 5, 31)))));

        let kpis = engine.compute_kpis();
        assert_eq!(kpis.total_revenue, 300.0);
        assert_eq!(kpis.total_profit, 5.0);
        assert_eq!(kpis.total_orders, 2);
        assert!((kpis.profit_margin - 1.6667).abs() < 1e-3);
        assert_eq!(kpis.avg_order_value, 150.0);
        assert_eq!(kpis.on_time_rate, 50.0);
        assert_eq!(kpis.late_deliveries, 1);

        // late count follows the view, not the dataset
        engine.set_filters(update().with_date_range(Some(DateRange::new(date(2022, 5, 1), date(2022, 5, 1)))));
        assert_eq!(engine.compute_kpis().late_deliveries, 0);
    }

    #[test]
    fn test_filter_options() {
        let engine = FilterEngine::new(sample_dataset());
        assert_eq!(
            engine.unique_values(Dimension::CustomerRegion),
            vec!["Central", "East", "West"]
        );
        assert_eq!(
            engine.unique_values(Dimension::DeliveryStatus),
            vec!["Advance shipping", "Late delivery", "Shipping canceled", "Shipping on time"]
        );
        assert_eq!(engine.date_bounds(), Some((date(2022, 1, 3), date(2022, 4, 4))));

        let empty = FilterEngine::new(Arc::new(Dataset::from_records("empty", vec![])));
        assert_eq!(empty.date_bounds(), None);
        assert!(empty.unique_values(Dimension::ShippingType).is_empty());
    }
}
