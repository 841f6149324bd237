//! Provides the USD to local-currency conversion rate for the application.

use async_trait::async_trait;

/// Which fallback tier produced the rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Primary,
    Backup,
    /// Last successfully fetched rate, reused because both sources failed.
    Cached,
    /// Hardcoded default; nothing was ever fetched successfully.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRate {
    /// Local-currency units per 1 USD.
    pub value: f64,
    pub source: RateSource,
}

/// Total operation: implementations degrade through their fallback tiers and
/// always return a usable rate, tagging its provenance.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self) -> ExchangeRate;
}
