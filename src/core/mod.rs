pub mod cache;
pub mod timeseries;
