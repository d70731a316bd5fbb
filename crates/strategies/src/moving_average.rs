// In crates/strategies/src/moving_average.rs

use core_types::Quote;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a price to cents, halves away from zero.
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Populates `moving_average` with the simple moving average of closes over `period` days.
///
/// The quotes are sorted by trade date first. Day `i` gets the mean of the `period`
/// closes ending on it once `i >= period - 1`; earlier days are left without an average.
/// With fewer than `period` quotes the input comes back untouched.
pub fn with_moving_average(mut quotes: Vec<Quote>, period: usize) -> Vec<Quote> {
    if period == 0 || quotes.len() < period {
        return quotes;
    }

    quotes.sort_by_key(|q| q.trade_date);
    let divisor = Decimal::from(period as u64);

    let mut window_sum: Decimal = quotes[..period - 1].iter().map(|q| q.close).sum();
    for quote in &mut quotes[..period - 1] {
        quote.moving_average = None;
    }

    for i in period - 1..quotes.len() {
        window_sum += quotes[i].close;
        quotes[i].moving_average = Some(round_price(window_sum / divisor));
        window_sum -= quotes[i + 1 - period].close;
    }

    quotes
}
