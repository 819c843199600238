use async_trait::async_trait;
use anyhow::Result;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use crate::core::timeseries::TimeSeries;

pub mod fred;
pub mod coingecko;
pub mod provider;

/// Shared HTTP client for all fetchers (connection pooling).
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("macrolens/0.1")
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// The indicators the dashboard knows about.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Cpi,
    M2,
    FedFunds,
    Bitcoin,
}

impl Indicator {
    pub fn slug(&self) -> &'static str {
        match self {
            Indicator::Cpi => "cpi",
            Indicator::M2 => "m2",
            Indicator::FedFunds => "fed_funds",
            Indicator::Bitcoin => "bitcoin",
        }
    }

    /// FRED series id, for the indicators FRED serves.
    pub fn fred_series_id(&self) -> Option<&'static str> {
        match self {
            Indicator::Cpi => Some("CPIAUCSL"),
            Indicator::M2 => Some("M2SL"),
            Indicator::FedFunds => Some("FEDFUNDS"),
            Indicator::Bitcoin => None,
        }
    }
}

/// A raw upstream source. Errors propagate here; the provider boundary
/// (`provider::DashboardProvider`) is what maps them to empty series.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;

    /// `lookback_days = None` means full available history.
    async fn fetch(&self, indicator: Indicator, lookback_days: Option<i64>) -> Result<TimeSeries>;
}

/// The boundary consumed by the presentation layer: infallible by
/// contract. Any upstream failure surfaces as an empty series so the
/// calculators' degrade-gracefully policies activate uniformly.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    async fn fetch_series(&self, indicator: Indicator, lookback_days: Option<i64>) -> TimeSeries;
}
