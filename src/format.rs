//! Display formatting for amounts, quantities and timestamps.
//!
//! Amounts are always shown with exactly two decimals and the configured
//! currency symbol; no locale grouping is applied.

use chrono::{DateTime, Local};

/// `12.5` → `$12.50`, `-3` → `-$3.00`
pub fn money(amount: f64, symbol: &str) -> String {
    let rounded = crate::units::round2(amount);
    if rounded < 0.0 {
        format!("-{symbol}{:.2}", -rounded)
    } else {
        format!("{symbol}{:.2}", rounded.abs())
    }
}

/// A deduction, shown with a leading minus unless it is zero
pub fn deduction(amount: f64, symbol: &str) -> String {
    let rounded = crate::units::round2(amount.abs());
    if rounded == 0.0 {
        money(0.0, symbol)
    } else {
        format!("-{}", money(rounded, symbol))
    }
}

/// Whole quantities print without decimals, fractional ones with two
pub fn quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

/// `15` → `15%`, `7.5` → `7.5%`
pub fn percentage(value: f64) -> String {
    let rounded = crate::units::round2(value);
    if rounded.fract() == 0.0 {
        format!("{}%", rounded as i64)
    } else {
        let text = format!("{rounded:.2}");
        format!("{}%", text.trim_end_matches('0'))
    }
}

/// Footer timestamp
pub fn timestamp(at: &DateTime<Local>) -> String {
    at.format("%d %b %Y %H:%M").to_string()
}

/// Date printed in the header when the model carries none
pub fn date(at: &DateTime<Local>) -> String {
    at.format("%d/%m/%Y").to_string()
}
