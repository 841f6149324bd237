pub mod cache;
pub mod config;
pub mod convert;
pub mod cycle;
pub mod error;
pub mod log;
pub mod price_provider;
pub mod providers;
pub mod rate_provider;
pub mod ui;

use anyhow::Result;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::cycle::UpdateCycle;
use crate::providers::exchange_rate::ExchangeRateApiProvider;
use crate::providers::goldprice::GoldPriceOrgProvider;
use crate::ui::ConsoleSink;

pub async fn run(config_path: Option<&str>, once: bool) -> Result<()> {
    info!("Gold price watch starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let price_provider = GoldPriceOrgProvider::new(&config.sources.gold.base_url);
    let rate_provider = ExchangeRateApiProvider::new(
        &config.sources.rates.primary_url,
        &config.sources.rates.backup_url,
        &config.currency,
    );
    let sink = ConsoleSink::new(&config.currency);

    let mut cycle = UpdateCycle::new(rate_provider, price_provider, sink);

    let mut ticker = time::interval(Duration::from_secs(config.refresh_secs));
    // A tick that fires while a cycle is still awaiting network I/O must run
    // strictly after it, never concurrently.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // First tick completes immediately, so the startup cycle runs at once.
        ticker.tick().await;
        let outcome = cycle.run_once().await;
        debug!(?outcome, "Cycle finished");

        if once {
            return Ok(());
        }
    }
}
