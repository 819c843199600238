use std::time::Duration;
use crate::core::cache::DEFAULT_TTL;

/// Process-level settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub fred_api_key: String,
    pub cache_ttl: Duration,
}

impl Settings {
    /// Load from the environment, honoring a `.env` file if present.
    /// A missing FRED key is not an error here: the fetcher reports it at
    /// request time and the provider degrades to an empty series.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let fred_api_key = std::env::var("FRED_API_KEY").unwrap_or_default();
        let cache_ttl = std::env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL);

        Self { fred_api_key, cache_ttl }
    }
}
