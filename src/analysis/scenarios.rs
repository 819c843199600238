use crate::core::timeseries::TimeSeries;
use crate::models::{FutureValueProjection, InflationScenarios, Scenario, ScenarioComparison};

/// Fallback annual inflation assumption when CPI history is too short.
pub const DEFAULT_INFLATION_PERCENT: f64 = 3.0;

/// Window for the historical average, in years of monthly observations.
pub const DEFAULT_AVERAGE_YEARS: usize = 10;

/// Average annual inflation implied by up to `years` of the most recent
/// monthly CPI changes: mean monthly change, annualized as
/// `((1 + mean)^12 - 1) * 100`. Falls back to 3% when fewer than 12
/// observations exist.
pub fn average_inflation(cpi: &TimeSeries, years: usize) -> f64 {
    if cpi.len() < 12 {
        return DEFAULT_INFLATION_PERCENT;
    }

    let changes = cpi.pct_changes();
    if changes.is_empty() {
        return DEFAULT_INFLATION_PERCENT;
    }

    let periods = (years * 12).min(changes.len());
    let recent = &changes[changes.len() - periods..];
    let mean_monthly = recent.iter().sum::<f64>() / recent.len() as f64;

    ((1.0 + mean_monthly).powi(12) - 1.0) * 100.0
}

/// Yearly erosion curve of a fixed principal: `amount * (1 - rate/100)^t`.
///
/// This is intentionally NOT a standard deflator (which would divide by
/// `(1 + rate)^t`): the model says purchasing power shrinks geometrically
/// at the inflation rate. A known modeling simplification, preserved on
/// purpose.
fn erosion_trajectory(amount: f64, rate_percent: f64, years: u32) -> Vec<f64> {
    (0..=years)
        .map(|year| amount * (1.0 - rate_percent / 100.0).powi(year as i32))
        .collect()
}

/// Eroded value of a fixed principal under an expected rate and a
/// historical average rate (see [`average_inflation`]).
pub fn inflation_scenarios(
    initial_amount: f64,
    years: u32,
    expected_inflation_percent: f64,
    historical_inflation_percent: f64,
) -> InflationScenarios {
    let expected_trajectory = erosion_trajectory(initial_amount, expected_inflation_percent, years);
    let historical_trajectory =
        erosion_trajectory(initial_amount, historical_inflation_percent, years);

    InflationScenarios {
        expected_value: *expected_trajectory.last().unwrap_or(&initial_amount),
        historical_value: *historical_trajectory.last().unwrap_or(&initial_amount),
        expected_inflation_percent,
        historical_inflation_percent,
        expected_trajectory,
        historical_trajectory,
    }
}

/// Monthly contribute-then-grow simulation over `years * 12` months.
///
/// Order matters: the contribution lands before the month's growth is
/// applied, so each contribution earns from its first month. Snapshots are
/// taken at every 12-month boundary; trajectories have `years + 1` entries
/// with index 0 holding the initial principal.
pub fn future_value(
    principal: f64,
    monthly_contribution: f64,
    annual_return_percent: f64,
    annual_inflation_percent: f64,
    years: u32,
) -> FutureValueProjection {
    let monthly_return = annual_return_percent / 100.0 / 12.0;
    let monthly_inflation = annual_inflation_percent / 100.0 / 12.0;
    let months = years * 12;

    let mut nominal_value = principal;
    let mut total_contributions = principal;

    let mut nominal_trajectory = vec![principal];
    let mut real_trajectory = vec![principal];
    let mut contributions_trajectory = vec![principal];

    for month in 1..=months {
        nominal_value += monthly_contribution;
        total_contributions += monthly_contribution;
        nominal_value *= 1.0 + monthly_return;

        if month % 12 == 0 {
            let real_value = nominal_value / (1.0 + monthly_inflation).powi(month as i32);
            nominal_trajectory.push(nominal_value);
            real_trajectory.push(real_value);
            contributions_trajectory.push(total_contributions);
        }
    }

    let real_value = nominal_value / (1.0 + monthly_inflation).powi(months as i32);

    FutureValueProjection {
        nominal_value,
        real_value,
        total_contributions,
        investment_gains: nominal_value - total_contributions,
        nominal_trajectory,
        real_trajectory,
        contributions_trajectory,
    }
}

/// Compare holding cash, an investment, and an alternative asset over
/// `years`, all starting from `base_amount` and all eroded by their own
/// inflation rate via the `(1 - rate)^t` model:
///
///   cash:        base * (1 - cash_inflation)^t
///   investment:  base * (1 + return)^t * (1 - inflation)^t
///   alternative: base * (1 + alt_return)^t * (1 - alt_inflation)^t
///
/// The best scenario is the greatest terminal value; ties resolve in the
/// order cash, investment, alternative.
#[allow(clippy::too_many_arguments)]
pub fn compare_scenarios(
    base_amount: f64,
    years: u32,
    cash_inflation_percent: f64,
    investment_return_percent: f64,
    investment_inflation_percent: f64,
    alt_return_percent: f64,
    alt_inflation_percent: f64,
) -> ScenarioComparison {
    let growth_erosion = |return_pct: f64, inflation_pct: f64, year: u32| {
        base_amount
            * (1.0 + return_pct / 100.0).powi(year as i32)
            * (1.0 - inflation_pct / 100.0).powi(year as i32)
    };

    let cash_trajectory = erosion_trajectory(base_amount, cash_inflation_percent, years);
    let investment_trajectory: Vec<f64> = (0..=years)
        .map(|y| growth_erosion(investment_return_percent, investment_inflation_percent, y))
        .collect();
    let alternative_trajectory: Vec<f64> = (0..=years)
        .map(|y| growth_erosion(alt_return_percent, alt_inflation_percent, y))
        .collect();

    let cash_real = *cash_trajectory.last().unwrap_or(&base_amount);
    let investment_real = *investment_trajectory.last().unwrap_or(&base_amount);
    let alternative_real = *alternative_trajectory.last().unwrap_or(&base_amount);

    // Strict comparison keeps the earlier scenario on ties.
    let mut best = Scenario::Cash;
    let mut best_value = cash_real;
    if investment_real > best_value {
        best = Scenario::Investment;
        best_value = investment_real;
    }
    if alternative_real > best_value {
        best = Scenario::Alternative;
    }

    ScenarioComparison {
        cash_real,
        investment_real,
        alternative_real,
        cash_trajectory,
        investment_trajectory,
        alternative_trajectory,
        best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataPoint;
    use chrono::NaiveDate;

    fn monthly_series(values: &[f64]) -> TimeSeries {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &value)| DataPoint {
                timestamp: NaiveDate::from_ymd_opt(2015, 1, 1)
                    .unwrap()
                    .checked_add_months(chrono::Months::new(i as u32))
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    .and_utc(),
                value,
            })
            .collect();
        TimeSeries::from_points(points)
    }

    #[test]
    fn test_average_inflation_short_history_defaults() {
        let series = monthly_series(&[100.0; 11]);
        assert_eq!(average_inflation(&series, DEFAULT_AVERAGE_YEARS), 3.0);
        assert_eq!(average_inflation(&TimeSeries::empty(), DEFAULT_AVERAGE_YEARS), 3.0);
    }

    #[test]
    fn test_average_inflation_constant_monthly_growth() {
        // 0.2% per month compounds to ((1.002)^12 - 1) * 100 annually.
        let values: Vec<f64> = (0..24).map(|i| 100.0 * 1.002f64.powi(i)).collect();
        let series = monthly_series(&values);
        let expected = (1.002f64.powi(12) - 1.0) * 100.0;
        assert!((average_inflation(&series, DEFAULT_AVERAGE_YEARS) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_average_inflation_window_uses_recent_changes() {
        // Old flat decade, recent 1% months: a 1-year window sees only the 1%.
        let mut values = vec![100.0; 121];
        let mut last = 100.0;
        for _ in 0..12 {
            last *= 1.01;
            values.push(last);
        }
        let series = monthly_series(&values);
        let expected = (1.01f64.powi(12) - 1.0) * 100.0;
        assert!((average_inflation(&series, 1) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_inflation_scenarios_erosion_model() {
        let result = inflation_scenarios(10000.0, 10, 2.0, 4.0);
        assert_eq!(result.expected_trajectory.len(), 11);
        assert_eq!(result.expected_trajectory[0], 10000.0);
        assert!((result.expected_value - 10000.0 * 0.98f64.powi(10)).abs() < 1e-9);
        assert!((result.historical_value - 10000.0 * 0.96f64.powi(10)).abs() < 1e-9);
    }

    #[test]
    fn test_future_value_trajectory_shape() {
        let result = future_value(10000.0, 500.0, 7.0, 3.0, 5);
        assert_eq!(result.nominal_trajectory.len(), 6);
        assert_eq!(result.real_trajectory.len(), 6);
        assert_eq!(result.contributions_trajectory.len(), 6);
        assert_eq!(result.nominal_trajectory[0], 10000.0);
        assert_eq!(result.contributions_trajectory[5], 10000.0 + 500.0 * 60.0);
    }

    #[test]
    fn test_future_value_one_year_recomputed() {
        // Recompute the 12-step contribute-then-grow loop directly.
        let monthly_return = 7.0 / 100.0 / 12.0;
        let mut expected = 10000.0;
        for _ in 0..12 {
            expected = (expected + 500.0) * (1.0 + monthly_return);
        }

        let result = future_value(10000.0, 500.0, 7.0, 3.0, 1);
        assert!((result.nominal_value - expected).abs() < 1e-9);
        assert_eq!(result.nominal_trajectory.len(), 2);
        assert!((result.nominal_trajectory[1] - expected).abs() < 1e-9);

        let monthly_inflation: f64 = 3.0 / 100.0 / 12.0;
        let expected_real = expected / (1.0 + monthly_inflation).powi(12);
        assert!((result.real_value - expected_real).abs() < 1e-9);

        assert!((result.total_contributions - 16000.0).abs() < 1e-9);
        assert!((result.investment_gains - (expected - 16000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_contribute_then_grow_order_matters() {
        // Zero principal, 1% per month: contribute-then-grow is the
        // annuity-due closed form, where every contribution compounds at
        // least once. Grow-then-contribute would leave the last payment
        // uncompounded.
        let result = future_value(0.0, 1000.0, 12.0, 0.0, 1);
        let annuity_due = 1000.0 * 1.01 * (1.01f64.powi(12) - 1.0) / 0.01;
        let ordinary_annuity = 1000.0 * (1.01f64.powi(12) - 1.0) / 0.01;
        assert!((result.nominal_value - annuity_due).abs() < 1e-6);
        assert!(result.nominal_value > ordinary_annuity);
    }

    #[test]
    fn test_zero_years_future_value() {
        let result = future_value(5000.0, 500.0, 7.0, 3.0, 0);
        assert_eq!(result.nominal_value, 5000.0);
        assert_eq!(result.real_value, 5000.0);
        assert_eq!(result.nominal_trajectory, vec![5000.0]);
        assert_eq!(result.investment_gains, 0.0);
    }

    #[test]
    fn test_compare_scenarios_equal_rates_zero_returns() {
        // With equal inflation everywhere and no returns, all three
        // terminals collapse to base * (1 - rate)^years and cash wins ties.
        let result = compare_scenarios(10000.0, 10, 3.0, 0.0, 3.0, 0.0, 3.0);
        let expected = 10000.0 * 0.97f64.powi(10);
        assert!((result.cash_real - expected).abs() < 1e-9);
        assert!((result.investment_real - expected).abs() < 1e-9);
        assert!((result.alternative_real - expected).abs() < 1e-9);
        assert_eq!(result.best, Scenario::Cash);
    }

    #[test]
    fn test_compare_scenarios_picks_highest_terminal() {
        let result = compare_scenarios(10000.0, 10, 3.0, 7.0, 3.0, 2.0, 3.0);
        assert_eq!(result.best, Scenario::Investment);
        assert_eq!(result.investment_trajectory.len(), 11);
        assert_eq!(result.investment_trajectory[0], 10000.0);
        assert!(result.investment_real > result.alternative_real);
        assert!(result.alternative_real > result.cash_real);
    }
}
