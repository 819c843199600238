use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Whether a metric was computed from real data or degraded to a neutral
/// placeholder because the input was too short / unresolvable.
/// Callers must treat `Insufficient` distinctly from a legitimate zero.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum DataStatus {
    Computed,
    Insufficient,
}

/// Scalar trailing rate of change (YoY inflation, M2 growth, ...).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RateResult {
    pub rate_percent: f64,
    pub status: DataStatus,
}

impl RateResult {
    pub fn neutral() -> Self {
        Self { rate_percent: 0.0, status: DataStatus::Insufficient }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PurchasingPower {
    pub equivalent_value: f64,
    pub inflation_rate_percent: f64,
    pub purchasing_power_change_percent: f64,
    pub status: DataStatus,
}

impl PurchasingPower {
    /// Neutral result: the amount passes through unchanged.
    pub fn neutral(amount: f64) -> Self {
        Self {
            equivalent_value: amount,
            inflation_rate_percent: 0.0,
            purchasing_power_change_percent: 0.0,
            status: DataStatus::Insufficient,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
    Error,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct TrendStatistics {
    pub annual_growth_percent: f64,
    pub annualized_volatility_percent: f64,
    pub direction: TrendDirection,
}

/// Result of the monthly contribute-then-grow simulation.
/// Trajectories hold one value per elapsed year; index 0 is the principal.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FutureValueProjection {
    pub nominal_value: f64,
    pub real_value: f64,
    pub total_contributions: f64,
    pub investment_gains: f64,
    pub nominal_trajectory: Vec<f64>,
    pub real_trajectory: Vec<f64>,
    pub contributions_trajectory: Vec<f64>,
}

/// Erosion of a fixed principal under an expected and a historical
/// average inflation rate.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InflationScenarios {
    pub expected_value: f64,
    pub historical_value: f64,
    pub expected_inflation_percent: f64,
    pub historical_inflation_percent: f64,
    pub expected_trajectory: Vec<f64>,
    pub historical_trajectory: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Cash,
    Investment,
    Alternative,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScenarioComparison {
    pub cash_real: f64,
    pub investment_real: f64,
    pub alternative_real: f64,
    pub cash_trajectory: Vec<f64>,
    pub investment_trajectory: Vec<f64>,
    pub alternative_trajectory: Vec<f64>,
    pub best: Scenario,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CorrelationMetrics {
    pub correlation: f64,
    pub rolling: Vec<DataPoint>,
    pub p_value: f64,
    pub observations: usize,
    pub status: DataStatus,
}

impl CorrelationMetrics {
    pub fn neutral() -> Self {
        Self {
            correlation: 0.0,
            rolling: Vec::new(),
            p_value: 1.0,
            observations: 0,
            status: DataStatus::Insufficient,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
    pub p_value: f64,
    pub std_err: f64,
    pub observations: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SignificanceTest {
    pub t_statistic: f64,
    pub p_value: f64,
    pub significant: bool,
}

/// Pairwise static correlations for a set of named series.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub matrix: Vec<Vec<f64>>, // 0.0 stands in for undefined pairs to simplify JSON
    pub observations: usize,
}
