//! Gold spot price abstractions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::FetchError;

/// Freshness marker for a reading, so downstream status is derived from the
/// data itself rather than from which code path produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingSource {
    Live,
    /// Served from the last successful response after a failed fetch.
    Cached,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotPriceReading {
    /// Spot price in USD per troy ounce.
    pub usd_per_ounce: f64,
    /// Percent change as reported by the price source, if it sent one.
    pub reported_change_percent: Option<f64>,
    pub fetched_at: DateTime<Utc>,
    pub source: ReadingSource,
}

impl SpotPriceReading {
    pub fn is_stale(&self) -> bool {
        self.source == ReadingSource::Cached
    }
}

#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    /// Fails with [`FetchError::NoDataAvailable`] only when the source errors
    /// AND no cached reading exists.
    async fn fetch_spot_price(&self) -> Result<SpotPriceReading, FetchError>;
}
