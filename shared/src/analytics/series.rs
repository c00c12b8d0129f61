//! Chart-ready trend series
//!
//! Converts the aggregator's sparse bucket maps into dense, zero-filled
//! point arrays suitable for direct chart rendering. Serialization of the
//! points is the presentation layer's concern.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::revenue::{AnalyticsWindow, RevenueAggregate, TrendBucket};

/// One point of a daily/monthly/yearly trend chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub sales: Decimal,
    pub orders: i64,
}

fn point(label: String, bucket: Option<&TrendBucket>) -> SeriesPoint {
    match bucket {
        Some(b) => SeriesPoint {
            label,
            sales: b.sales.round_dp(2),
            orders: b.orders,
        },
        None => SeriesPoint {
            label,
            sales: Decimal::ZERO,
            orders: 0,
        },
    }
}

/// One point per day of the 30-day window, oldest first, zero-filled
pub fn daily_series(agg: &RevenueAggregate, window: &AnalyticsWindow) -> Vec<SeriesPoint> {
    let start = window.since.date_naive();
    let end = window.now.date_naive();
    let mut points = Vec::new();
    let mut day = start;
    while day <= end {
        let label = day.format("%Y-%m-%d").to_string();
        points.push(point(label.clone(), agg.by_day.get(&label)));
        day += Duration::days(1);
    }
    points
}

/// One point per month of the 12-month window, oldest first, zero-filled
pub fn monthly_series(agg: &RevenueAggregate, window: &AnalyticsWindow) -> Vec<SeriesPoint> {
    let start = window.month_since.date_naive();
    let end = window.now.date_naive();
    let mut points = Vec::new();
    let mut cursor = start.year() * 12 + start.month0() as i32;
    let last = end.year() * 12 + end.month0() as i32;
    while cursor <= last {
        let (year, month0) = (cursor.div_euclid(12), cursor.rem_euclid(12));
        // Construction from a valid year/month pair cannot fail
        let first = NaiveDate::from_ymd_opt(year, month0 as u32 + 1, 1).unwrap();
        let label = first.format("%Y-%m").to_string();
        points.push(point(label.clone(), agg.by_month.get(&label)));
        cursor += 1;
    }
    points
}

/// Month buckets folded by year, oldest first. Only years with activity
/// appear; the 12-month fetch bounds how many that can be.
pub fn yearly_series(agg: &RevenueAggregate) -> Vec<SeriesPoint> {
    let mut by_year: BTreeMap<String, TrendBucket> = BTreeMap::new();
    for (label, bucket) in &agg.by_month {
        let year = by_year.entry(label[..4].to_string()).or_default();
        year.sales += bucket.sales;
        year.orders += bucket.orders;
    }
    by_year
        .iter()
        .map(|(label, bucket)| point(label.clone(), Some(bucket)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn window() -> AnalyticsWindow {
        AnalyticsWindow::trailing(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap())
    }

    #[test]
    fn daily_series_is_dense_and_ordered() {
        let agg = RevenueAggregate::default();
        let series = daily_series(&agg, &window());
        assert_eq!(series.len(), 31); // inclusive of both endpoints
        assert_eq!(series.first().unwrap().label, "2024-05-16");
        assert_eq!(series.last().unwrap().label, "2024-06-15");
        assert!(series.iter().all(|p| p.sales.is_zero() && p.orders == 0));
    }

    #[test]
    fn monthly_series_spans_thirteen_labels() {
        let mut agg = RevenueAggregate::default();
        agg.by_month.insert(
            "2024-01".to_string(),
            TrendBucket {
                sales: Decimal::from(50),
                orders: 2,
            },
        );
        let series = monthly_series(&agg, &window());
        assert_eq!(series.len(), 13);
        assert_eq!(series.first().unwrap().label, "2023-06");
        assert_eq!(series.last().unwrap().label, "2024-06");
        let january = series.iter().find(|p| p.label == "2024-01").unwrap();
        assert_eq!(january.orders, 2);
        assert_eq!(january.sales, Decimal::from(50));
    }

    #[test]
    fn yearly_series_folds_months() {
        let mut agg = RevenueAggregate::default();
        for (label, sales) in [("2023-11", 10), ("2023-12", 20), ("2024-01", 5)] {
            agg.by_month.insert(
                label.to_string(),
                TrendBucket {
                    sales: Decimal::from(sales),
                    orders: 1,
                },
            );
        }
        let series = yearly_series(&agg);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "2023");
        assert_eq!(series[0].sales, Decimal::from(30));
        assert_eq!(series[0].orders, 2);
        assert_eq!(series[1].label, "2024");
    }
}
