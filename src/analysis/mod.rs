pub mod rates;
pub mod purchasing_power;
pub mod trend;
pub mod scenarios;
pub mod correlation;
