//! Terminal presentation sink.

use console::style;

use crate::convert::ChangeDirection;
use crate::cycle::DisplaySink;

pub struct ConsoleSink {
    currency: String,
}

impl ConsoleSink {
    pub fn new(currency: &str) -> Self {
        ConsoleSink {
            currency: currency.to_string(),
        }
    }
}

impl DisplaySink for ConsoleSink {
    fn show_price(
        &self,
        price: &str,
        change: &str,
        direction: ChangeDirection,
        updated_at: &str,
        message: &str,
    ) {
        let styled_change = match direction {
            ChangeDirection::Up => style(change).green(),
            ChangeDirection::Down => style(change).red(),
        };

        println!(
            "{} {}/g  {}  {}",
            style(price).bold(),
            self.currency,
            styled_change,
            style(updated_at).dim()
        );
        println!("{}", style(message).dim());
    }

    fn show_error(&self, message: &str) {
        eprintln!("{}", style(message).red());
    }
}
