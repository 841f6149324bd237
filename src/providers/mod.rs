pub mod exchange_rate;
pub mod goldprice;

use std::time::Duration;

pub(crate) const USER_AGENT: &str = "goldwatch/0.1";

// The upstream APIs impose no SLA; without an explicit timeout a hung
// connection would stall the refresh loop indefinitely. Expiry surfaces as a
// network error.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}
