use chrono::{Datelike, Duration, NaiveDate};
use contracts::domain::order_record::OrderRecord;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Per-group accumulator
// ---------------------------------------------------------------------------

/// Running totals of one group of orders.
///
/// Ratios return `None` when the denominator is zero so charts can emit
/// `null` instead of NaN/inf.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupStats {
    pub revenue: f64,
    pub profit: f64,
    pub orders: usize,
    pub quantity: i64,
    pub discount_sum: f64,
    pub on_time: usize,
    pub late: usize,
    pub canceled: usize,
}

impl GroupStats {
    pub fn add(&mut self, record: &OrderRecord) {
        self.revenue += record.sales_per_order;
        self.profit += record.profit_per_order;
        self.orders += 1;
        self.quantity += record.order_quantity;
        self.discount_sum += record.order_item_discount;
        if record.is_on_time() {
            self.on_time += 1;
        }
        if record.is_late() {
            self.late += 1;
        }
        if record.is_canceled() {
            self.canceled += 1;
        }
    }

    /// Profit margin in percent
    pub fn margin(&self) -> Option<f64> {
        ratio(self.profit, self.revenue).map(|r| r * 100.0)
    }

    pub fn avg_order_value(&self) -> Option<f64> {
        ratio(self.revenue, self.orders as f64)
    }

    pub fn avg_discount(&self) -> Option<f64> {
        ratio(self.discount_sum, self.orders as f64)
    }

    pub fn on_time_rate(&self) -> Option<f64> {
        ratio(self.on_time as f64, self.orders as f64).map(|r| r * 100.0)
    }

    pub fn late_rate(&self) -> Option<f64> {
        ratio(self.late as f64, self.orders as f64).map(|r| r * 100.0)
    }

    pub fn cancel_rate(&self) -> Option<f64> {
        ratio(self.canceled as f64, self.orders as f64).map(|r| r * 100.0)
    }
}

pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Group the view by `key`; groups come out in key order
pub fn group_by<'a, K, F>(view: &[&'a OrderRecord], key: F) -> BTreeMap<K, GroupStats>
where
    K: Ord,
    F: Fn(&'a OrderRecord) -> K,
{
    let mut groups: BTreeMap<K, GroupStats> = BTreeMap::new();
    for &record in view {
        groups.entry(key(record)).or_default().add(record);
    }
    groups
}

/// Sum of `value` per `key`
pub fn sum_by<'a, K, F, V>(view: &[&'a OrderRecord], key: F, value: V) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&'a OrderRecord) -> K,
    V: Fn(&OrderRecord) -> f64,
{
    let mut sums: BTreeMap<K, f64> = BTreeMap::new();
    for &record in view {
        *sums.entry(key(record)).or_insert(0.0) += value(record);
    }
    sums
}

/// `n` largest entries by `value`, descending. Ties keep input order.
pub fn top_n<T, F>(mut items: Vec<T>, n: usize, value: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| value(b).total_cmp(&value(a)));
    items.truncate(n);
    items
}

// ---------------------------------------------------------------------------
// Time buckets
// ---------------------------------------------------------------------------

/// Resampling frequency. Buckets are labelled by their last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// Calendar month, labelled with the month end
    MonthEnd,
    /// Monday..Sunday, labelled with the Sunday
    WeekEndingSunday,
}

impl Frequency {
    pub fn bucket(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Frequency::MonthEnd => month_end(date),
            Frequency::WeekEndingSunday => {
                let to_sunday = 6 - date.weekday().num_days_from_monday() as i64;
                date + Duration::days(to_sunday)
            }
        }
    }

    fn next(&self, bucket: NaiveDate) -> NaiveDate {
        match self {
            Frequency::MonthEnd => month_end(bucket + Duration::days(1)),
            Frequency::WeekEndingSunday => bucket + Duration::days(7),
        }
    }
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Resample the view: one entry per bucket from the first to the last
/// observed bucket, empty buckets included.
pub fn resample(view: &[&OrderRecord], frequency: Frequency) -> Vec<(NaiveDate, GroupStats)> {
    let observed = group_by(view, |r| frequency.bucket(r.order_date));
    let (Some(first), Some(last)) = (
        observed.keys().next().copied(),
        observed.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    let mut series = Vec::new();
    let mut bucket = first;
    while bucket <= last {
        series.push((bucket, observed.get(&bucket).copied().unwrap_or_default()));
        bucket = frequency.next(bucket);
    }
    series
}

/// Weekday names, Monday first
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::testing::{date, sample_orders};

    #[test]
    fn test_group_by_region() {
        let orders = sample_orders();
        let view: Vec<&OrderRecord> = orders.iter().collect();
        let groups = group_by(&view, |r| r.customer_region.as_str());

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["Central", "East", "West"]);
        let west = groups["West"];
        assert_eq!(west.revenue, 650.0);
        assert_eq!(west.orders, 3);
        assert_eq!(west.on_time_rate(), Some(100.0));

        let east = groups["East"];
        assert_eq!(east.late, 1);
        assert_eq!(east.canceled, 1);
        assert_eq!(east.quantity, 7);
    }

    #[test]
    fn test_ratios_on_empty_group() {
        let empty = GroupStats::default();
        assert_eq!(empty.margin(), None);
        assert_eq!(empty.avg_order_value(), None);
        assert_eq!(empty.late_rate(), None);
    }

    #[test]
    fn test_top_n_keeps_order_of_ties() {
        let items = vec![("a", 1.0), ("b", 5.0), ("c", 5.0), ("d", 3.0)];
        let top = top_n(items, 3, |(_, v)| *v);
        assert_eq!(top, vec![("b", 5.0), ("c", 5.0), ("d", 3.0)]);
    }

    #[test]
    fn test_buckets() {
        assert_eq!(Frequency::MonthEnd.bucket(date(2022, 2, 10)), date(2022, 2, 28));
        assert_eq!(Frequency::MonthEnd.bucket(date(2024, 12, 1)), date(2024, 12, 31));
        // 2022-01-03 is a Monday, 2022-01-09 a Sunday
        assert_eq!(Frequency::WeekEndingSunday.bucket(date(2022, 1, 3)), date(2022, 1, 9));
        assert_eq!(Frequency::WeekEndingSunday.bucket(date(2022, 1, 9)), date(2022, 1, 9));
    }

    #[test]
    fn test_resample_fills_gaps() {
        let orders = sample_orders();
        let view: Vec<&OrderRecord> = orders.iter().collect();

        let monthly = resample(&view, Frequency::MonthEnd);
        let labels: Vec<NaiveDate> = monthly.iter().map(|(d, _)| *d).collect();
        assert_eq!(
            labels,
            vec![date(2022, 1, 31), date(2022, 2, 28), date(2022, 3, 31), date(2022, 4, 30)]
        );
        assert_eq!(monthly[0].1.revenue, 430.0);

        let weekly = resample(&view, Frequency::WeekEndingSunday);
        assert_eq!(weekly.first().map(|(d, _)| *d), Some(date(2022, 1, 9)));
        assert_eq!(weekly.last().map(|(d, _)| *d), Some(date(2022, 4, 10)));
        // 2022-01-24..30 has no orders
        let empty_week = weekly.iter().find(|(d, _)| *d == date(2022, 1, 30)).map(|(_, s)| *s);
        assert_eq!(empty_week, Some(GroupStats::default()));

        assert!(resample(&[], Frequency::MonthEnd).is_empty());
    }
}
