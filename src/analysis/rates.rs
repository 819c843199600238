use crate::core::timeseries::TimeSeries;
use crate::models::{DataPoint, DataStatus, RateResult};

/// 12 periods = year-over-year on monthly data.
pub const DEFAULT_PERIODS: usize = 12;

/// Trailing percentage change of the latest observation over the one
/// `periods` earlier. One parametrized function serves CPI (inflation
/// rate) and M2 (growth rate) alike; the only difference is the series
/// passed in.
///
/// A series shorter than `periods + 1` degrades to the neutral zero
/// result instead of failing the caller; a zero base value is undefined
/// (never infinity) and degrades the same way. Both carry
/// `DataStatus::Insufficient` so a real 0% stays distinguishable.
pub fn trailing_rate(series: &TimeSeries, periods: usize) -> RateResult {
    let n = series.len();
    if periods == 0 || n < periods + 1 {
        return RateResult::neutral();
    }

    let points = series.points();
    let latest = points[n - 1].value;
    let base = points[n - 1 - periods].value;

    if base == 0.0 {
        return RateResult::neutral();
    }

    RateResult {
        rate_percent: (latest - base) / base * 100.0,
        status: DataStatus::Computed,
    }
}

/// Vectorized form: the full series of trailing rates.
/// `rate[t] = (v[t] - v[t-periods]) / v[t-periods] * 100`, defined only
/// where both endpoints of the lag exist, so the result has
/// `len - periods` points (zero-base points are omitted on top of that).
pub fn rate_series(series: &TimeSeries, periods: usize) -> TimeSeries {
    let n = series.len();
    if periods == 0 || n < periods + 1 {
        return TimeSeries::empty();
    }

    let points = series.points();
    let mut rates = Vec::with_capacity(n - periods);
    for t in periods..n {
        let base = points[t - periods].value;
        if base == 0.0 {
            continue;
        }
        rates.push(DataPoint {
            timestamp: points[t].timestamp,
            value: (points[t].value - base) / base * 100.0,
        });
    }
    TimeSeries::from_points(rates)
}
