use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use crate::domain::order_record::OrderRecord;

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Categorical dimension that can be restricted by a multi-select filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    CustomerRegion,
    CategoryName,
    CustomerSegment,
    DeliveryStatus,
    ShippingType,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::CustomerRegion,
        Dimension::CategoryName,
        Dimension::CustomerSegment,
        Dimension::DeliveryStatus,
        Dimension::ShippingType,
    ];

    /// Display name for filter controls
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::CustomerRegion => "Region",
            Dimension::CategoryName => "Category",
            Dimension::CustomerSegment => "Customer Segment",
            Dimension::DeliveryStatus => "Delivery Status",
            Dimension::ShippingType => "Shipping Type",
        }
    }

    /// Value of this dimension on a record
    pub fn value_of<'a>(&self, record: &'a OrderRecord) -> &'a str {
        match self {
            Dimension::CustomerRegion => &record.customer_region,
            Dimension::CategoryName => &record.category_name,
            Dimension::CustomerSegment => &record.customer_segment,
            Dimension::DeliveryStatus => record.delivery_status.code(),
            Dimension::ShippingType => &record.shipping_type,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter values
// ---------------------------------------------------------------------------

/// Restriction on one categorical dimension.
///
/// `Any` places no restriction. `Only` keeps records whose value is in the
/// set, so `Only` with an empty set keeps nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum DimensionFilter {
    #[default]
    Any,
    Only(BTreeSet<String>),
}

/// How an empty multi-select list is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySelection {
    /// Empty list behaves like a missing list: no filtering on the dimension.
    #[default]
    NoRestriction,
    /// Empty list means "nothing selected": the view becomes empty.
    MatchNothing,
}

impl DimensionFilter {
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DimensionFilter::Only(values.into_iter().map(Into::into).collect())
    }

    /// Build a filter from a raw multi-select list
    pub fn from_selection(selection: Option<&[String]>, policy: EmptySelection) -> Self {
        match selection {
            None => DimensionFilter::Any,
            Some([]) => match policy {
                EmptySelection::NoRestriction => DimensionFilter::Any,
                EmptySelection::MatchNothing => DimensionFilter::Only(BTreeSet::new()),
            },
            Some(values) => DimensionFilter::only(values.iter().cloned()),
        }
    }

    pub fn is_restricted(&self) -> bool {
        matches!(self, DimensionFilter::Only(_))
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            DimensionFilter::Any => true,
            DimensionFilter::Only(allowed) => allowed.contains(value),
        }
    }
}

/// Inclusive date interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range from optional bounds; a missing bound is open-ended
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (None, None) => None,
            (start, end) => Some(Self {
                start: start.unwrap_or(NaiveDate::MIN),
                end: end.unwrap_or(NaiveDate::MAX),
            }),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ---------------------------------------------------------------------------
// Filter set & partial updates
// ---------------------------------------------------------------------------

/// Current filter state of a dashboard session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    pub date_range: Option<DateRange>,
    pub customer_region: DimensionFilter,
    pub category_name: DimensionFilter,
    pub customer_segment: DimensionFilter,
    pub delivery_status: DimensionFilter,
    pub shipping_type: DimensionFilter,
}

impl FilterSet {
    pub fn dimension(&self, dimension: Dimension) -> &DimensionFilter {
        match dimension {
            Dimension::CustomerRegion => &self.customer_region,
            Dimension::CategoryName => &self.category_name,
            Dimension::CustomerSegment => &self.customer_segment,
            Dimension::DeliveryStatus => &self.delivery_status,
            Dimension::ShippingType => &self.shipping_type,
        }
    }

    pub fn dimension_mut(&mut self, dimension: Dimension) -> &mut DimensionFilter {
        match dimension {
            Dimension::CustomerRegion => &mut self.customer_region,
            Dimension::CategoryName => &mut self.category_name,
            Dimension::CustomerSegment => &mut self.customer_segment,
            Dimension::DeliveryStatus => &mut self.delivery_status,
            Dimension::ShippingType => &mut self.shipping_type,
        }
    }

    /// Merge a partial update; keys absent from the update keep their value
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(date_range) = update.date_range {
            self.date_range = date_range;
        }
        for (dimension, filter) in update.dimensions() {
            *self.dimension_mut(dimension) = filter;
        }
    }

    /// Conjunction of all active predicates
    pub fn matches(&self, record: &OrderRecord) -> bool {
        if let Some(range) = &self.date_range {
            if !range.contains(record.order_date) {
                return false;
            }
        }
        Dimension::ALL
            .iter()
            .all(|d| self.dimension(*d).matches(d.value_of(record)))
    }

    pub fn is_unrestricted(&self) -> bool {
        self.date_range.is_none() && Dimension::ALL.iter().all(|d| !self.dimension(*d).is_restricted())
    }
}

/// Partial filter update. `None` fields are left untouched on merge;
/// `date_range: Some(None)` (JSON `null`) clears the date filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterUpdate {
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub date_range: Option<Option<DateRange>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_region: Option<DimensionFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<DimensionFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_segment: Option<DimensionFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<DimensionFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_type: Option<DimensionFilter>,
}

impl FilterUpdate {
    pub fn with_date_range(mut self, range: Option<DateRange>) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_dimension(mut self, dimension: Dimension, filter: DimensionFilter) -> Self {
        let slot = match dimension {
            Dimension::CustomerRegion => &mut self.customer_region,
            Dimension::CategoryName => &mut self.category_name,
            Dimension::CustomerSegment => &mut self.customer_segment,
            Dimension::DeliveryStatus => &mut self.delivery_status,
            Dimension::ShippingType => &mut self.shipping_type,
        };
        *slot = Some(filter);
        self
    }

    /// Provided dimension filters, in `Dimension::ALL` order
    pub fn dimensions(self) -> Vec<(Dimension, DimensionFilter)> {
        [
            (Dimension::CustomerRegion, self.customer_region),
            (Dimension::CategoryName, self.category_name),
            (Dimension::CustomerSegment, self.customer_segment),
            (Dimension::DeliveryStatus, self.delivery_status),
            (Dimension::ShippingType, self.shipping_type),
        ]
        .into_iter()
        .filter_map(|(d, f)| f.map(|f| (d, f)))
        .collect()
    }
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Wire format of the sidebar controls
// ---------------------------------------------------------------------------

/// Raw state of the dashboard controls: a date picker and five
/// multi-selects. Missing lists mean "not touched".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub customer_region: Option<Vec<String>>,
    pub category_name: Option<Vec<String>>,
    pub customer_segment: Option<Vec<String>>,
    pub delivery_status: Option<Vec<String>>,
    pub shipping_type: Option<Vec<String>>,
}

impl FilterSelection {
    fn list(&self, dimension: Dimension) -> Option<&[String]> {
        match dimension {
            Dimension::CustomerRegion => self.customer_region.as_deref(),
            Dimension::CategoryName => self.category_name.as_deref(),
            Dimension::CustomerSegment => self.customer_segment.as_deref(),
            Dimension::DeliveryStatus => self.delivery_status.as_deref(),
            Dimension::ShippingType => self.shipping_type.as_deref(),
        }
    }

    /// Full update replacing every key of the filter set
    pub fn to_update(&self, policy: EmptySelection) -> FilterUpdate {
        Dimension::ALL.into_iter().fold(
            FilterUpdate::default()
                .with_date_range(DateRange::from_bounds(self.date_from, self.date_to)),
            |update, d| update.with_dimension(d, DimensionFilter::from_selection(self.list(d), policy)),
        )
    }
}
