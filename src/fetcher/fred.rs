use async_trait::async_trait;
use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::Value;
use crate::core::timeseries::TimeSeries;
use crate::models::DataPoint;
use super::{DataSource, Indicator, HTTP_CLIENT};

/// FRED has data back to the middle of the last century; this is the
/// observation_start used when no lookback is requested.
const FULL_HISTORY_START: &str = "1950-01-01";

pub struct FredFetcher {
    api_key: String,
    client: Client,
    base_url: String,
}

impl FredFetcher {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: HTTP_CLIENT.clone(),
            base_url: "https://api.stlouisfed.org".to_string(),
        }
    }

    /// Point the fetcher at a different host (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn observations_url(&self, series_id: &str, lookback_days: Option<i64>) -> String {
        let start = match lookback_days {
            Some(days) => (Utc::now() - Duration::days(days)).format("%Y-%m-%d").to_string(),
            None => FULL_HISTORY_START.to_string(),
        };
        // FRED keys are 32 lowercase hex chars; trim and lowercase to
        // survive copy-paste artifacts.
        format!(
            "{}/fred/series/observations?series_id={}&api_key={}&file_type=json&observation_start={}",
            self.base_url,
            series_id,
            self.api_key.trim().to_lowercase(),
            start
        )
    }

    fn parse_observations(json: &Value) -> Result<TimeSeries> {
        let observations = json["observations"]
            .as_array()
            .ok_or_else(|| anyhow!("No observations found in FRED response"))?;

        let mut data_points = Vec::new();

        for obs in observations {
            // "date": "2023-01-01", "value": "123.45"
            if let (Some(date_str), Some(value_str)) = (obs["date"].as_str(), obs["value"].as_str()) {
                // FRED marks missing observations with "."
                if value_str == "." {
                    continue;
                }

                if let Ok(value) = value_str.parse::<f64>() {
                    let naive_date = chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")?;
                    let timestamp = naive_date
                        .and_hms_opt(0, 0, 0)
                        .ok_or_else(|| anyhow!("Invalid observation date: {}", date_str))?
                        .and_utc();

                    data_points.push(DataPoint { timestamp, value });
                }
            }
        }

        Ok(TimeSeries::from_points(data_points))
    }
}

#[async_trait]
impl DataSource for FredFetcher {
    fn name(&self) -> &str {
        "fred"
    }

    async fn fetch(&self, indicator: Indicator, lookback_days: Option<i64>) -> Result<TimeSeries> {
        let series_id = indicator
            .fred_series_id()
            .ok_or_else(|| anyhow!("{} is not served by FRED", indicator.slug()))?;

        let sanitized_key = self.api_key.trim().to_lowercase();
        if sanitized_key.is_empty() {
            return Err(anyhow!("FRED API key is empty or missing"));
        }
        // Never log the key itself.
        tracing::debug!(series_id, key_len = sanitized_key.len(), "fetching FRED observations");

        let url = self.observations_url(series_id, lookback_days);
        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("FRED API error: {} - Body: {}", status, error_text));
        }

        let json: Value = resp.json().await?;
        Self::parse_observations(&json)
    }
}
