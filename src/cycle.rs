//! One refresh cycle: rate, then spot price, then conversion and publish.

use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::convert::{self, ChangeDirection};
use crate::price_provider::SpotPriceProvider;
use crate::rate_provider::RateProvider;

pub const MSG_UPDATED: &str = "Data updated";
pub const MSG_STALE: &str = "Update failed, showing previously fetched data";
pub const MSG_CANNOT_CONNECT: &str = "Cannot connect to the server, please try again later";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Ok,
    Stale,
    Error,
}

/// Snapshot derived each cycle. Published as a fresh `Arc` replacement, never
/// mutated in place, so an observer can never see it half-updated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayState {
    pub price_per_gram: f64,
    pub change_percent: f64,
    pub updated_at: DateTime<Local>,
    pub status: DisplayStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Succeeded,
    Degraded,
    Failed,
}

/// Receives the rendered values for one cycle. Rendering itself lives outside
/// this crate's core; only the formatted strings are produced here.
pub trait DisplaySink: Send + Sync {
    fn show_price(
        &self,
        price: &str,
        change: &str,
        direction: ChangeDirection,
        updated_at: &str,
        message: &str,
    );

    fn show_error(&self, message: &str);
}

pub struct UpdateCycle<R, P, S>
where
    R: RateProvider,
    P: SpotPriceProvider,
    S: DisplaySink,
{
    rates: R,
    prices: P,
    sink: S,
    previous_spot_usd: Option<f64>,
    first_cycle: bool,
    latest: Option<Arc<DisplayState>>,
}

impl<R, P, S> UpdateCycle<R, P, S>
where
    R: RateProvider,
    P: SpotPriceProvider,
    S: DisplaySink,
{
    pub fn new(rates: R, prices: P, sink: S) -> Self {
        UpdateCycle {
            rates,
            prices,
            sink,
            previous_spot_usd: None,
            first_cycle: true,
            latest: None,
        }
    }

    /// The most recently published snapshot, if any cycle has produced one.
    pub fn latest(&self) -> Option<Arc<DisplayState>> {
        self.latest.clone()
    }

    /// Runs one full refresh. Cannot overlap with itself: the exclusive
    /// borrow makes a second in-flight invocation unrepresentable.
    #[instrument(name = "UpdateCycle", skip(self))]
    pub async fn run_once(&mut self) -> CycleOutcome {
        let rate = self.rates.fetch_rate().await;
        debug!(?rate, "Fetched exchange rate");

        let outcome = match self.prices.fetch_spot_price().await {
            Ok(reading) => {
                debug!(?reading, "Fetched spot price");
                let conversion = convert::convert(&reading, &rate, self.previous_spot_usd);

                let status = if reading.is_stale() {
                    DisplayStatus::Stale
                } else {
                    DisplayStatus::Ok
                };
                self.previous_spot_usd = Some(reading.usd_per_ounce);
                self.publish(Arc::new(DisplayState {
                    price_per_gram: conversion.price_per_gram,
                    change_percent: conversion.change_percent,
                    updated_at: Local::now(),
                    status,
                }));

                if status == DisplayStatus::Stale {
                    CycleOutcome::Degraded
                } else {
                    CycleOutcome::Succeeded
                }
            }
            Err(err) => {
                warn!(error = %err, "Spot price unavailable");

                let prior = self.latest.as_deref().copied();
                match prior {
                    // Keep the prior numbers, refresh only the timestamp to
                    // mark that a retry was attempted.
                    Some(prior) if !self.first_cycle => {
                        self.publish(Arc::new(DisplayState {
                            updated_at: Local::now(),
                            status: DisplayStatus::Stale,
                            ..prior
                        }));
                        CycleOutcome::Degraded
                    }
                    // Nothing to show at all.
                    _ => {
                        self.sink.show_error(MSG_CANNOT_CONNECT);
                        CycleOutcome::Failed
                    }
                }
            }
        };

        self.first_cycle = false;
        outcome
    }

    fn publish(&mut self, state: Arc<DisplayState>) {
        let price = convert::format_price(state.price_per_gram);
        let change = convert::format_change(state.change_percent);
        let direction = ChangeDirection::of(state.change_percent);
        let updated_at = state.updated_at.format(TIMESTAMP_FORMAT).to_string();
        let message = match state.status {
            DisplayStatus::Ok => MSG_UPDATED,
            DisplayStatus::Stale => MSG_STALE,
            DisplayStatus::Error => MSG_CANNOT_CONNECT,
        };

        self.sink
            .show_price(&price, &change, direction, &updated_at, message);
        self.latest = Some(state);
    }
}
