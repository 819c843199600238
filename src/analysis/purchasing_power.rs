use chrono::{DateTime, Utc};
use crate::core::timeseries::TimeSeries;
use crate::models::{DataStatus, PurchasingPower};

/// What `amount` at `from` is worth at `to`, against a CPI series.
///
/// Each date resolves to the nearest available observation (ties go to the
/// earlier one). If either date cannot be resolved the result is neutral:
/// the amount passes through with zero rates and an `Insufficient` status.
/// Chronological ordering of `from` and `to` is the caller's
/// responsibility; the dates are not reordered here.
pub fn purchasing_power(
    series: &TimeSeries,
    amount: f64,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> PurchasingPower {
    let (from_cpi, to_cpi) = match (series.value_at_nearest(from), series.value_at_nearest(to)) {
        (Some(f), Some(t)) => (f, t),
        _ => return PurchasingPower::neutral(amount),
    };

    if from_cpi == 0.0 {
        return PurchasingPower::neutral(amount);
    }

    let equivalent_value = amount * (to_cpi / from_cpi);
    let inflation_rate_percent = (to_cpi - from_cpi) / from_cpi * 100.0;
    let purchasing_power_change_percent = if amount != 0.0 {
        (equivalent_value - amount) / amount * 100.0
    } else {
        0.0
    };

    PurchasingPower {
        equivalent_value,
        inflation_rate_percent,
        purchasing_power_change_percent,
        status: DataStatus::Computed,
    }
}
