use std::sync::Arc;
use std::time::Duration;

use macrolens::fetcher::coingecko::CoinGeckoFetcher;
use macrolens::fetcher::fred::FredFetcher;
use macrolens::fetcher::provider::DashboardProvider;
use macrolens::fetcher::{Indicator, SeriesProvider};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer, ttl: Duration) -> DashboardProvider {
    DashboardProvider::with_sources(
        FredFetcher::new("test-key".into()).with_base_url(server.uri()),
        CoinGeckoFetcher::new().with_base_url(format!("{}/api/v3", server.uri())),
        ttl,
    )
}

#[test_log::test(tokio::test)]
async fn fred_observations_parse_into_a_series() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fred/series/observations"))
        .and(query_param("series_id", "CPIAUCSL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "observations": [
                { "date": "2023-01-01", "value": "299.17" },
                { "date": "2023-02-01", "value": "." },
                { "date": "2023-03-01", "value": "301.84" }
            ]
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(300));
    let series = provider.fetch_series(Indicator::Cpi, Some(365)).await;

    // The "." placeholder is dropped, the rest parse.
    assert_eq!(series.len(), 2);
    assert_eq!(series.points()[0].value, 299.17);
    assert_eq!(series.last().unwrap().value, 301.84);
}

#[test_log::test(tokio::test)]
async fn upstream_failure_yields_empty_series_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fred/series/observations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(300));
    let series = provider.fetch_series(Indicator::M2, None).await;
    assert!(series.is_empty());
}

#[test_log::test(tokio::test)]
async fn bitcoin_routes_to_coingecko() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/coins/bitcoin/market_chart"))
        .and(query_param("vs_currency", "usd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "prices": [
                [1672531200000i64, 16500.0],
                [1672617600000i64, 16625.0]
            ]
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(300));
    let series = provider.fetch_series(Indicator::Bitcoin, Some(365)).await;
    assert_eq!(series.len(), 2);
    assert_eq!(series.points()[0].value, 16500.0);
}

#[test_log::test(tokio::test)]
async fn second_request_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fred/series/observations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "observations": [ { "date": "2023-01-01", "value": "4.33" } ]
        })))
        .expect(1) // a second upstream hit fails the test
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(300));
    let first = provider.fetch_series(Indicator::FedFunds, Some(30)).await;
    let second = provider.fetch_series(Indicator::FedFunds, Some(30)).await;
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}

#[test_log::test(tokio::test)]
async fn concurrent_requests_collapse_to_one_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fred/series/observations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(50))
                .set_body_json(json!({
                    "observations": [ { "date": "2023-01-01", "value": "21207.6" } ]
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(provider_for(&server, Duration::from_secs(300)));
    let mut handles = Vec::new();
    for _ in 0..6 {
        let provider = provider.clone();
        handles.push(tokio::spawn(async move {
            provider.fetch_series(Indicator::M2, Some(90)).await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().len(), 1);
    }
}

#[test_log::test(tokio::test)]
async fn distinct_windows_are_distinct_cache_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fred/series/observations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "observations": [ { "date": "2023-01-01", "value": "299.17" } ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(300));
    provider.fetch_series(Indicator::Cpi, Some(30)).await;
    provider.fetch_series(Indicator::Cpi, Some(365)).await;
}
