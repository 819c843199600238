use async_trait::async_trait;
use anyhow::{Result, anyhow};
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use crate::core::timeseries::TimeSeries;
use crate::models::DataPoint;
use super::{DataSource, Indicator, HTTP_CLIENT};

pub struct CoinGeckoFetcher {
    client: Client,
    base_url: String,
}

impl CoinGeckoFetcher {
    pub fn new() -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            base_url: "https://api.coingecko.com/api/v3".to_string(),
        }
    }

    /// Point the fetcher at a different host (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_market_chart(&self, coin_id: &str, lookback_days: Option<i64>) -> Result<TimeSeries> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, coin_id);
        let days = match lookback_days {
            Some(d) => d.to_string(),
            None => "max".to_string(),
        };
        let params = [
            ("vs_currency", "usd"),
            ("days", days.as_str()),
            ("interval", "daily"),
        ];

        let resp = self.client.get(&url).query(&params).send().await?;

        if !resp.status().is_success() {
            return Err(anyhow!("CoinGecko error: {}", resp.status()));
        }

        #[derive(Deserialize)]
        struct MarketChart {
            // Each entry is [timestamp_ms, price]
            prices: Vec<(f64, f64)>,
        }

        let json: MarketChart = resp.json().await?;
        Self::to_series(json.prices)
    }

    fn to_series(prices: Vec<(f64, f64)>) -> Result<TimeSeries> {
        let mut data_points = Vec::new();
        for (ts_ms, price) in prices {
            let datetime = Utc
                .timestamp_millis_opt(ts_ms as i64)
                .single()
                .ok_or_else(|| anyhow!("Invalid timestamp in CoinGecko response"))?;
            data_points.push(DataPoint { timestamp: datetime, value: price });
        }
        Ok(TimeSeries::from_points(data_points))
    }
}

impl Default for CoinGeckoFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for CoinGeckoFetcher {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch(&self, indicator: Indicator, lookback_days: Option<i64>) -> Result<TimeSeries> {
        match indicator {
            Indicator::Bitcoin => self.fetch_market_chart("bitcoin", lookback_days).await,
            other => Err(anyhow!("{} is not served by CoinGecko", other.slug())),
        }
    }
}
