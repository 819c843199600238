use crate::models::DataPoint;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A date-indexed numeric series: timestamps strictly increasing, values
/// finite. An empty series is the uniform "no data" representation — the
/// provider returns it on failure and every calculator accepts it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TimeSeries(Vec<DataPoint>);

impl TimeSeries {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Build a series from raw points: non-finite values are dropped,
    /// points are sorted by timestamp, and duplicate timestamps collapse
    /// to the last value seen (end-of-day semantics, as the upstream
    /// sources report revisions).
    pub fn from_points(points: Vec<DataPoint>) -> Self {
        let mut map: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
        for dp in points {
            if dp.value.is_finite() {
                map.insert(dp.timestamp, dp.value);
            }
        }
        Self(map.into_iter().map(|(timestamp, value)| DataPoint { timestamp, value }).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.0
    }

    pub fn first(&self) -> Option<&DataPoint> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&DataPoint> {
        self.0.last()
    }

    /// Index of the observation nearest to `target`.
    /// Equal distances resolve to the earlier observation (lower index).
    pub fn nearest_index(&self, target: DateTime<Utc>) -> Option<usize> {
        if self.0.is_empty() {
            return None;
        }
        let idx = self.0.partition_point(|dp| dp.timestamp < target);
        if idx == 0 {
            return Some(0);
        }
        if idx == self.0.len() {
            return Some(self.0.len() - 1);
        }
        let before = target - self.0[idx - 1].timestamp;
        let after = self.0[idx].timestamp - target;
        if before <= after {
            Some(idx - 1)
        } else {
            Some(idx)
        }
    }

    pub fn value_at_nearest(&self, target: DateTime<Utc>) -> Option<f64> {
        self.nearest_index(target).map(|i| self.0[i].value)
    }

    /// Period-over-period fractional changes. A zero base value has no
    /// defined change; those pairs are omitted rather than emitted as
    /// infinity.
    pub fn pct_changes(&self) -> Vec<f64> {
        let mut changes = Vec::new();
        for w in self.0.windows(2) {
            if w[0].value != 0.0 {
                changes.push((w[1].value - w[0].value) / w[0].value);
            }
        }
        changes
    }

    /// Resample to a daily grid: last observation per calendar day, then
    /// forward fill every day between the series' first and last dates.
    /// This is the explicit step that lets monthly CPI/M2 line up against
    /// a daily crypto price.
    pub fn resample_daily_ffill(&self) -> BTreeMap<NaiveDate, f64> {
        let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for dp in &self.0 {
            by_day.insert(dp.timestamp.date_naive(), dp.value);
        }

        let (first, last) = match (by_day.keys().next(), by_day.keys().next_back()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return by_day,
        };

        let mut filled = BTreeMap::new();
        let mut day = first;
        let mut current = None;
        while day <= last {
            if let Some(v) = by_day.get(&day) {
                current = Some(*v);
            }
            if let Some(v) = current {
                filled.insert(day, v);
            }
            day = day + Duration::days(1);
        }
        filled
    }
}

/// One row of a multi-series daily alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub values: Vec<f64>,
}

/// Align several series to a common daily grid: resample each to daily,
/// forward fill within its own span, then inner-join on date — a row is
/// emitted only where EVERY series has a value. This must run before any
/// correlation or regression; joining on raw timestamps silently produces
/// wrong answers when frequencies differ.
pub fn align_daily(series_list: &[&TimeSeries]) -> Vec<AlignedRow> {
    if series_list.is_empty() {
        return Vec::new();
    }

    let grids: Vec<BTreeMap<NaiveDate, f64>> =
        series_list.iter().map(|s| s.resample_daily_ffill()).collect();

    if grids.iter().any(|g| g.is_empty()) {
        return Vec::new();
    }

    // After forward fill each grid is contiguous over its own span, so the
    // inner join is the overlap of the spans. Iterate the first grid and
    // probe the rest.
    let mut rows = Vec::new();
    'outer: for (date, first_val) in &grids[0] {
        let mut values = Vec::with_capacity(grids.len());
        values.push(*first_val);
        for grid in &grids[1..] {
            match grid.get(date) {
                Some(v) => values.push(*v),
                None => continue 'outer,
            }
        }
        rows.push(AlignedRow { date: *date, values });
    }
    rows
}
