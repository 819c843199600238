use async_trait::async_trait;
use std::time::Duration;
use crate::config::Settings;
use crate::core::cache::SeriesCache;
use crate::core::timeseries::TimeSeries;
use super::coingecko::CoinGeckoFetcher;
use super::fred::FredFetcher;
use super::{DataSource, Indicator, SeriesProvider};

/// The concrete provider behind the dashboard: routes each indicator to
/// its source (FRED for the macro series, CoinGecko for Bitcoin), caches
/// results per (indicator, window), and maps every upstream failure to an
/// empty series. Construct one at process start and pass it by reference
/// into request handlers.
pub struct DashboardProvider {
    fred: FredFetcher,
    coingecko: CoinGeckoFetcher,
    cache: SeriesCache<(Indicator, Option<i64>)>,
}

impl DashboardProvider {
    pub fn new(settings: &Settings) -> Self {
        Self::with_sources(
            FredFetcher::new(settings.fred_api_key.clone()),
            CoinGeckoFetcher::new(),
            settings.cache_ttl,
        )
    }

    pub fn with_sources(fred: FredFetcher, coingecko: CoinGeckoFetcher, cache_ttl: Duration) -> Self {
        Self {
            fred,
            coingecko,
            cache: SeriesCache::new(cache_ttl),
        }
    }

    fn source_for(&self, indicator: Indicator) -> &dyn DataSource {
        match indicator {
            Indicator::Bitcoin => &self.coingecko,
            _ => &self.fred,
        }
    }
}

#[async_trait]
impl SeriesProvider for DashboardProvider {
    async fn fetch_series(&self, indicator: Indicator, lookback_days: Option<i64>) -> TimeSeries {
        self.cache
            .get_or_fetch((indicator, lookback_days), || async {
                let source = self.source_for(indicator);
                match source.fetch(indicator, lookback_days).await {
                    Ok(series) => {
                        if series.is_empty() {
                            tracing::warn!(
                                source = source.name(),
                                indicator = indicator.slug(),
                                "no data available for the requested window"
                            );
                        }
                        series
                    }
                    Err(e) => {
                        tracing::warn!(
                            source = source.name(),
                            indicator = indicator.slug(),
                            error = %e,
                            "upstream fetch failed, returning empty series"
                        );
                        TimeSeries::empty()
                    }
                }
            })
            .await
    }
}
