//! Currency presentation.
//!
//! Totals are shown in crore (10,000,000 rupees) with one decimal place, e.g.
//! `₹10.0Cr` for 100,000,000.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rupees per crore. Every crore conversion goes through this constant.
pub const CRORE: i64 = 10_000_000;

/// Converts an amount in rupees to crore, rounded to one decimal place.
pub fn to_crore(amount: Decimal) -> Decimal {
    (amount / Decimal::from(CRORE)).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount in rupees as `₹<crore>Cr`.
pub fn format_crore(amount: Decimal) -> String {
    format!("₹{:.1}Cr", to_crore(amount))
}
