use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::cache::LastGood;
use crate::error::FetchError;
use crate::price_provider::{ReadingSource, SpotPriceProvider, SpotPriceReading};
use crate::providers::http_client;

// GoldPriceOrgProvider implementation for SpotPriceProvider
pub struct GoldPriceOrgProvider {
    base_url: String,
    last_good: LastGood<GoldRatesResponse>,
}

impl GoldPriceOrgProvider {
    pub fn new(base_url: &str) -> Self {
        GoldPriceOrgProvider {
            base_url: base_url.to_string(),
            last_good: LastGood::new(),
        }
    }

    async fn fetch_live(&self) -> Result<(GoldRatesResponse, SpotPriceReading), FetchError> {
        let url = format!("{}/dbXRates/USD", self.base_url);
        debug!("Requesting gold price from {}", url);

        let client = http_client()?;
        let response = client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        let text = response.text().await?;
        let data: GoldRatesResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::Validation(format!("failed to parse gold price response: {e}"))
        })?;

        let reading = reading_from(&data, ReadingSource::Live)?;
        Ok((data, reading))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct GoldRatesResponse {
    #[serde(default)]
    items: Vec<GoldRateItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct GoldRateItem {
    #[serde(alias = "xauPrice")]
    xau_price: Option<f64>,
    #[serde(alias = "chgXau")]
    chg_xau: Option<f64>,
}

fn reading_from(
    data: &GoldRatesResponse,
    source: ReadingSource,
) -> Result<SpotPriceReading, FetchError> {
    let usd_per_ounce = data
        .items
        .first()
        .and_then(|item| item.xau_price)
        .filter(|price| price.is_finite())
        .ok_or_else(|| {
            FetchError::Validation("response has no numeric xauPrice in items[0]".to_string())
        })?;

    Ok(SpotPriceReading {
        usd_per_ounce,
        reported_change_percent: data.items.first().and_then(|item| item.chg_xau),
        fetched_at: Utc::now(),
        source,
    })
}

#[async_trait]
impl SpotPriceProvider for GoldPriceOrgProvider {
    #[instrument(name = "GoldPriceFetch", skip(self))]
    async fn fetch_spot_price(&self) -> Result<SpotPriceReading, FetchError> {
        match self.fetch_live().await {
            Ok((data, reading)) => {
                // Cache the full validated response only after a confirmed
                // successful fetch.
                self.last_good.set(data).await;
                Ok(reading)
            }
            Err(err) => {
                warn!(error = %err, "Gold price fetch failed, falling back to cached data");
                let Some(cached) = self.last_good.get().await else {
                    return Err(FetchError::NoDataAvailable);
                };
                reading_from(&cached, ReadingSource::Cached)
                    .map_err(|_| FetchError::NoDataAvailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GOLD_PATH: &str = "/dbXRates/USD";

    async fn create_mock_server(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GOLD_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let mock_response = r#"{
            "items": [{
                "curr": "USD",
                "xauPrice": 2000.5,
                "chgXau": 0.42
            }]
        }"#;
        let mock_server = create_mock_server(mock_response).await;

        let provider = GoldPriceOrgProvider::new(&mock_server.uri());
        let reading = provider.fetch_spot_price().await.unwrap();

        assert_eq!(reading.usd_per_ounce, 2000.5);
        assert_eq!(reading.reported_change_percent, Some(0.42));
        assert_eq!(reading.source, ReadingSource::Live);
    }

    #[tokio::test]
    async fn test_missing_change_percent_is_ok() {
        let mock_response = r#"{"items": [{"xauPrice": 1999.0}]}"#;
        let mock_server = create_mock_server(mock_response).await;

        let provider = GoldPriceOrgProvider::new(&mock_server.uri());
        let reading = provider.fetch_spot_price().await.unwrap();

        assert_eq!(reading.usd_per_ounce, 1999.0);
        assert_eq!(reading.reported_change_percent, None);
    }

    #[tokio::test]
    async fn test_empty_items_fails_with_no_data() {
        let mock_server = create_mock_server(r#"{"items": []}"#).await;

        let provider = GoldPriceOrgProvider::new(&mock_server.uri());
        let result = provider.fetch_spot_price().await;

        assert!(matches!(result, Err(FetchError::NoDataAvailable)));
    }

    #[tokio::test]
    async fn test_non_numeric_price_fails_with_no_data() {
        let mock_server = create_mock_server(r#"{"items": [{"xauPrice": "2000"}]}"#).await;

        let provider = GoldPriceOrgProvider::new(&mock_server.uri());
        let result = provider.fetch_spot_price().await;

        assert!(matches!(result, Err(FetchError::NoDataAvailable)));
    }

    #[tokio::test]
    async fn test_http_error_without_cache_fails_with_no_data() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GOLD_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = GoldPriceOrgProvider::new(&mock_server.uri());
        let result = provider.fetch_spot_price().await;

        assert!(matches!(result, Err(FetchError::NoDataAvailable)));
    }

    #[tokio::test]
    async fn test_failure_after_success_serves_cached_reading() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(GOLD_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"items": [{"xauPrice": 2000.0, "chgXau": 0.5}]}"#),
            )
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(GOLD_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let provider = GoldPriceOrgProvider::new(&mock_server.uri());

        let fresh = provider.fetch_spot_price().await.unwrap();
        assert_eq!(fresh.source, ReadingSource::Live);

        let stale = provider.fetch_spot_price().await.unwrap();
        assert_eq!(stale.usd_per_ounce, 2000.0);
        assert_eq!(stale.reported_change_percent, Some(0.5));
        assert_eq!(stale.source, ReadingSource::Cached);
        assert!(stale.is_stale());
    }
}
