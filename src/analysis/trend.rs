use crate::core::timeseries::TimeSeries;
use crate::models::{TrendDirection, TrendStatistics};

/// Mean recent change beyond +0.1% reads as Increasing, below -0.1% as
/// Decreasing.
const TREND_THRESHOLD_PERCENT: f64 = 0.1;

/// Annual growth, annualized volatility, and a coarse trend direction for
/// a monthly series.
///
/// The three sub-computations degrade independently: a series too short
/// for a trend call still gets its volatility, and vice versa. Nothing
/// here short-circuits the whole result.
pub fn trend_statistics(series: &TimeSeries) -> TrendStatistics {
    TrendStatistics {
        annual_growth_percent: annual_growth(series),
        annualized_volatility_percent: annualized_volatility(series),
        direction: trend_direction(series),
    }
}

fn annual_growth(series: &TimeSeries) -> f64 {
    let n = series.len();
    if n < 12 {
        return 0.0;
    }
    let points = series.points();
    let base = points[n - 12].value;
    if base == 0.0 {
        return 0.0;
    }
    (points[n - 1].value / base - 1.0) * 100.0
}

/// Sample standard deviation of period-over-period changes, annualized by
/// sqrt(12) for monthly data, as a percentage.
fn annualized_volatility(series: &TimeSeries) -> f64 {
    let changes = series.pct_changes();
    let n = changes.len();
    if n < 2 {
        return 0.0;
    }

    let mean = changes.iter().sum::<f64>() / n as f64;
    let variance = changes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt() * 12.0_f64.sqrt() * 100.0
}

fn trend_direction(series: &TimeSeries) -> TrendDirection {
    let n = series.len();
    if n < 3 {
        return TrendDirection::InsufficientData;
    }

    // Mean percentage change across the last 3 observations.
    let last3 = TimeSeries::from_points(series.points()[n - 3..].to_vec());
    let changes = last3.pct_changes();
    if changes.is_empty() {
        // Zero bases made every recent change undefined.
        return TrendDirection::Error;
    }

    let mean_change = changes.iter().sum::<f64>() / changes.len() as f64 * 100.0;
    if mean_change > TREND_THRESHOLD_PERCENT {
        TrendDirection::Increasing
    } else if mean_change < -TREND_THRESHOLD_PERCENT {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}
