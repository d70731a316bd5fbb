use chrono::NaiveDate;
use core_types::{Quote, Symbol};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, n).unwrap()
}

pub fn quote(n: u32, close: &str, volume: u64) -> Quote {
    let close = Decimal::from_str(close).unwrap();
    Quote {
        symbol: Symbol("600549.SH".into()),
        name: "Xiamen Tungsten".into(),
        trade_date: day(n),
        open: close,
        high: close,
        low: close,
        close,
        volume,
        moving_average: None,
    }
}

/// Builds consecutive days starting on the 1st with the given closes and volumes.
pub fn series(closes: &[&str], volumes: &[u64]) -> Vec<Quote> {
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (close, volume))| quote(i as u32 + 1, close, *volume))
        .collect()
}

/// Days 1-14 climb by 0.10, day 15 dips under its average, day 16 closes back above.
pub const GOLDEN_CROSS: [&str; 16] = [
    "10.00", "10.10", "10.20", "10.30", "10.40", "10.50", "10.60", "10.70", "10.80", "10.90",
    "11.00", "11.10", "11.20", "11.30", "10.80", "11.60",
];

/// Days 1-14 fall by 0.10, day 15 pops over its average, day 16 breaks back below.
pub const DEATH_CROSS: [&str; 16] = [
    "12.00", "11.90", "11.80", "11.70", "11.60", "11.50", "11.40", "11.30", "11.20", "11.10",
    "11.00", "10.90", "10.80", "10.70", "11.20", "10.40",
];

pub fn volumes(latest: u64) -> Vec<u64> {
    let mut v = vec![1000; 15];
    v.push(latest);
    v
}
