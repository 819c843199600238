use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use crate::core::timeseries::{align_daily, AlignedRow, TimeSeries};
use crate::models::{
    CorrelationMatrix, CorrelationMetrics, DataPoint, DataStatus, Regression, SignificanceTest,
};

/// Default rolling window, in aligned daily observations.
pub const DEFAULT_ROLLING_WINDOW: usize = 90;

pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
    Kendall,
}

/// Full correlation picture for two series: static coefficient, rolling
/// correlation, and a two-tailed p-value.
///
/// Both series are first aligned to a common daily grid (resample, forward
/// fill, inner join) — correlating unaligned monthly and daily series
/// silently produces wrong answers. Fewer aligned rows than the rolling
/// window degrades to the neutral result.
pub fn correlation_metrics(
    series_a: &TimeSeries,
    series_b: &TimeSeries,
    method: CorrelationMethod,
    window: usize,
) -> CorrelationMetrics {
    let rows = align_daily(&[series_a, series_b]);
    let n = rows.len();
    if window < 2 || n < window {
        return CorrelationMetrics::neutral();
    }

    let x: Vec<f64> = rows.iter().map(|r| r.values[0]).collect();
    let y: Vec<f64> = rows.iter().map(|r| r.values[1]).collect();

    let correlation = static_correlation(&x, &y, method).unwrap_or(0.0);
    let rolling = rolling_from_rows(&rows, window);
    let p_value = significance(correlation, n).p_value;

    CorrelationMetrics {
        correlation,
        rolling: rolling.points().to_vec(),
        p_value,
        observations: n,
        status: DataStatus::Computed,
    }
}

/// Static correlation of two equally-long samples.
/// Returns None below 2 points; zero-variance input yields 0.0.
pub fn static_correlation(x: &[f64], y: &[f64], method: CorrelationMethod) -> Option<f64> {
    match method {
        CorrelationMethod::Pearson => pearson(x, y),
        CorrelationMethod::Spearman => pearson(&ranks(x), &ranks(y)),
        CorrelationMethod::Kendall => kendall_tau_b(x, y),
    }
}

/// Rolling Pearson correlation over a window of aligned daily
/// observations. Rolling always uses Pearson, whichever static method the
/// caller picked. Only full windows are emitted; each point is stamped
/// with the window's end date.
pub fn rolling_correlation(
    series_a: &TimeSeries,
    series_b: &TimeSeries,
    window: usize,
) -> TimeSeries {
    rolling_from_rows(&align_daily(&[series_a, series_b]), window)
}

fn rolling_from_rows(rows: &[AlignedRow], window: usize) -> TimeSeries {
    if window < 2 || rows.len() < window {
        return TimeSeries::empty();
    }

    let mut points = Vec::with_capacity(rows.len() - window + 1);
    for slice in rows.windows(window) {
        let x: Vec<f64> = slice.iter().map(|r| r.values[0]).collect();
        let y: Vec<f64> = slice.iter().map(|r| r.values[1]).collect();
        // Zero-variance windows report 0.0 rather than dropping out.
        let corr = pearson(&x, &y).unwrap_or(0.0);

        if let Some(end) = slice.last() {
            if let Some(midnight) = end.date.and_hms_opt(0, 0, 0) {
                points.push(DataPoint { timestamp: midnight.and_utc(), value: corr });
            }
        }
    }
    TimeSeries::from_points(points)
}

/// Two-tailed significance of a correlation coefficient at sample size
/// `n`: `t = r * sqrt((n-2) / (1-r^2))`, p from the Student-t CDF with
/// `n-2` degrees of freedom. Significant iff p < 0.05.
pub fn significance(r: f64, n: usize) -> SignificanceTest {
    if n < 3 {
        return SignificanceTest { t_statistic: 0.0, p_value: 1.0, significant: false };
    }

    let denom = 1.0 - r * r;
    let t_statistic = if denom <= 0.0 {
        // |r| == 1: the statistic diverges.
        f64::INFINITY * r.signum()
    } else {
        r * ((n - 2) as f64 / denom).sqrt()
    };

    let p_value = two_tailed_p(t_statistic, (n - 2) as f64);
    SignificanceTest { t_statistic, p_value, significant: p_value < SIGNIFICANCE_LEVEL }
}

/// Simple linear regression of y on x: slope, intercept, r, two-tailed
/// p-value of the slope, and the slope's standard error. None below 3
/// points or when x has no variance.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Option<Regression> {
    let n = x.len();
    if n < 3 || n != y.len() {
        return None;
    }

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r = pearson(x, y).unwrap_or(0.0);

    // Residual sum of squares; floating error can push it slightly negative
    // on perfect fits.
    let rss = (syy - slope * sxy).max(0.0);
    let std_err = (rss / (nf - 2.0) / sxx).sqrt();

    let t = if std_err == 0.0 {
        if slope == 0.0 { 0.0 } else { f64::INFINITY * slope.signum() }
    } else {
        slope / std_err
    };
    let p_value = two_tailed_p(t, nf - 2.0);

    Some(Regression { slope, intercept, r, p_value, std_err, observations: n })
}

/// Regression of `series_b` on `series_a` after daily alignment.
pub fn regression_between(series_a: &TimeSeries, series_b: &TimeSeries) -> Option<Regression> {
    let rows = align_daily(&[series_a, series_b]);
    let x: Vec<f64> = rows.iter().map(|r| r.values[0]).collect();
    let y: Vec<f64> = rows.iter().map(|r| r.values[1]).collect();
    linear_regression(&x, &y)
}

/// Pairwise static correlations of several named series over their common
/// aligned window. Symmetric, unit diagonal; undefined pairs report 0.0.
pub fn correlation_matrix(
    named_series: &[(&str, &TimeSeries)],
    method: CorrelationMethod,
) -> CorrelationMatrix {
    let labels: Vec<String> = named_series.iter().map(|(name, _)| name.to_string()).collect();
    let series: Vec<&TimeSeries> = named_series.iter().map(|(_, s)| *s).collect();
    let n = series.len();

    let rows = align_daily(&series);
    let mut matrix = vec![vec![0.0; n]; n];

    let columns: Vec<Vec<f64>> = (0..n)
        .map(|i| rows.iter().map(|r| r.values[i]).collect())
        .collect();

    for i in 0..n {
        for j in 0..n {
            if i == j {
                matrix[i][j] = 1.0;
                continue;
            }
            if j < i {
                matrix[i][j] = matrix[j][i];
                continue;
            }
            let val = static_correlation(&columns[i], &columns[j], method).unwrap_or(0.0);
            matrix[i][j] = val;
            matrix[j][i] = val;
        }
    }

    CorrelationMatrix { labels, matrix, observations: rows.len() }
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut numer = 0.0;
    let mut denom_x = 0.0;
    let mut denom_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        numer += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }

    if denom_x == 0.0 || denom_y == 0.0 {
        return Some(0.0);
    }

    // Clamp to [-1, 1] to absorb floating point error.
    Some((numer / (denom_x.sqrt() * denom_y.sqrt())).clamp(-1.0, 1.0))
}

/// Ranks with ties averaged, 1-based (the Spearman convention).
fn ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = avg_rank;
        }
        i = j + 1;
    }
    ranks
}

/// Kendall's tau-b (tie-corrected).
fn kendall_tau_b(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }

    let mut concordant = 0i64;
    let mut discordant = 0i64;
    let mut ties_x = 0i64;
    let mut ties_y = 0i64;

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 && dy == 0.0 {
                continue; // tied in both, counts in neither denominator term
            } else if dx == 0.0 {
                ties_x += 1;
            } else if dy == 0.0 {
                ties_y += 1;
            } else if dx * dy > 0.0 {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }

    let n0 = (n * (n - 1) / 2) as i64;
    let denom = (((n0 - ties_x) as f64) * ((n0 - ties_y) as f64)).sqrt();
    if denom == 0.0 {
        return Some(0.0);
    }
    Some(((concordant - discordant) as f64 / denom).clamp(-1.0, 1.0))
}

fn two_tailed_p(t: f64, df: f64) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}
