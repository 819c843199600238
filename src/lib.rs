//! Core of a macro-indicator dashboard: fetches CPI, M2, Fed Funds and
//! Bitcoin series and derives the statistics the UI renders (YoY rates,
//! purchasing power, future-value projections, correlations, regressions).
//!
//! Two halves:
//! - `fetcher`: async series providers. Upstream failures never escape —
//!   the boundary returns an empty series and the calculators degrade.
//! - `analysis`: pure, synchronous calculators over already-fetched
//!   series. No I/O, no shared state, safe to call concurrently.

pub mod config;
pub mod models;
pub mod core;
pub mod fetcher;
pub mod analysis;

pub use crate::config::Settings;
pub use crate::core::timeseries::TimeSeries;
pub use crate::fetcher::{Indicator, SeriesProvider};
pub use crate::fetcher::provider::DashboardProvider;
