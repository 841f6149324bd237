use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::cache::LastGood;
use crate::error::FetchError;
use crate::providers::http_client;
use crate::rate_provider::{ExchangeRate, RateProvider, RateSource};

/// USD to CNY rate used when every fallback tier is exhausted.
pub const DEFAULT_USD_CNY_RATE: f64 = 7.2;

/// Rate provider backed by two exchangerate-API style sources.
///
/// Degrades through an ordered chain of tiers: primary source, backup source,
/// last cached rate, hardcoded default. The final tier is total, so
/// `fetch_rate` can never fail.
pub struct ExchangeRateApiProvider {
    primary_url: String,
    backup_url: String,
    currency: String,
    default_rate: f64,
    last_good: LastGood<f64>,
}

impl ExchangeRateApiProvider {
    pub fn new(primary_url: &str, backup_url: &str, currency: &str) -> Self {
        ExchangeRateApiProvider {
            primary_url: primary_url.to_string(),
            backup_url: backup_url.to_string(),
            currency: currency.to_string(),
            default_rate: DEFAULT_USD_CNY_RATE,
            last_good: LastGood::new(),
        }
    }

    async fn fetch_from(&self, url: &str) -> Result<f64, FetchError> {
        debug!("Requesting exchange rate from {}", url);

        let client = http_client()?;
        let response = client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        let text = response.text().await?;
        let data: RatesResponse = serde_json::from_str(&text)
            .map_err(|e| FetchError::Validation(format!("failed to parse rate response: {e}")))?;

        data.rates
            .get(&self.currency)
            .copied()
            .filter(|rate| rate.is_finite())
            .ok_or_else(|| {
                FetchError::Validation(format!("no numeric rate for {} in response", self.currency))
            })
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "RateFetch", skip(self))]
    async fn fetch_rate(&self) -> ExchangeRate {
        let tiers = [
            (RateSource::Primary, &self.primary_url),
            (RateSource::Backup, &self.backup_url),
        ];

        for (source, url) in tiers {
            match self.fetch_from(url).await {
                Ok(value) => {
                    self.last_good.set(value).await;
                    return ExchangeRate { value, source };
                }
                Err(err) => {
                    warn!(error = %err, ?source, "Rate source failed, falling through");
                }
            }
        }

        match self.last_good.get().await {
            Some(value) => ExchangeRate {
                value,
                source: RateSource::Cached,
            },
            None => ExchangeRate {
                value: self.default_rate,
                source: RateSource::Default,
            },
        }
    }
}
