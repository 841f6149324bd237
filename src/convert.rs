//! Pure conversion from (spot price, exchange rate) to display values.

use crate::price_provider::SpotPriceReading;
use crate::rate_provider::ExchangeRate;

/// Grams per troy ounce, the standard commodity quoting unit.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    /// Local-currency price per gram, unrounded.
    pub price_per_gram: f64,
    pub change_percent: f64,
}

/// Sign class for rendering the change, `Up` for non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
}

impl ChangeDirection {
    pub fn of(change_percent: f64) -> Self {
        if change_percent >= 0.0 {
            ChangeDirection::Up
        } else {
            ChangeDirection::Down
        }
    }
}

/// Derives the per-gram price and period-over-period change.
///
/// The change prefers the locally observed delta against the previous cycle's
/// spot price; the source-reported percentage is used only when no previous
/// cycle exists. A local delta reflects the same normalization the display
/// uses, so it wins over the externally reported one.
pub fn convert(
    spot: &SpotPriceReading,
    rate: &ExchangeRate,
    previous_spot_usd: Option<f64>,
) -> Conversion {
    let price_per_gram = spot.usd_per_ounce * rate.value / GRAMS_PER_TROY_OUNCE;

    let change_percent = match previous_spot_usd {
        Some(prev) if prev > 0.0 => ((spot.usd_per_ounce - prev) / prev) * 100.0,
        _ => spot.reported_change_percent.unwrap_or(0.0),
    };

    Conversion {
        price_per_gram,
        change_percent,
    }
}

/// Formats a price with grouped thousands separators and 2 fraction digits.
pub fn format_price(price: f64) -> String {
    let fixed = format!("{price:.2}");
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some(parts) => parts,
        None => (fixed.as_str(), "00"),
    };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}

/// Formats a change percentage with 2 fraction digits and an explicit leading
/// sign for non-negative values.
pub fn format_change(change_percent: f64) -> String {
    let prefix = if change_percent >= 0.0 { "+" } else { "" };
    format!("{prefix}{change_percent:.2}%")
}
