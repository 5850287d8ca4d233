//! Local checks run before any store call.

use rust_decimal::Decimal;
use url::Url;

use crate::error::{AtlasError, Result};

pub const MIN_FOUNDED_YEAR: i32 = 1990;
pub const MAX_FOUNDED_YEAR: i32 = 2025;

/// Ids are caller-supplied and must be positive.
pub fn require_id(label: &str, id: i64) -> Result<()> {
    if id <= 0 {
        return Err(AtlasError::validation(format!(
            "{label} ID must be a positive integer (got {id})"
        )));
    }
    Ok(())
}

pub fn require_name(label: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AtlasError::validation(format!("{label} is required")));
    }
    Ok(())
}

/// A foreign key given as a display name must be named.
pub fn require_reference(label: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AtlasError::validation(format!("{label} is not set")));
    }
    Ok(())
}

pub fn founded_year(year: Option<i32>) -> Result<()> {
    match year {
        None => Err(AtlasError::validation("Founded Year is required")),
        Some(y) if !(MIN_FOUNDED_YEAR..=MAX_FOUNDED_YEAR).contains(&y) => {
            Err(AtlasError::validation(format!(
                "Founded Year must be between {MIN_FOUNDED_YEAR} and {MAX_FOUNDED_YEAR} (got {y})"
            )))
        }
        Some(_) => Ok(()),
    }
}

pub fn non_negative_amount(amount: &Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AtlasError::validation(format!(
            "Amount must not be negative (got {amount})"
        )));
    }
    Ok(())
}

/// An empty URL is allowed; anything else must be an absolute http(s) URL.
pub fn linkedin_url(value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => Ok(()),
        _ => Err(AtlasError::validation(format!(
            "LinkedIn URL '{value}' is not a valid http(s) URL"
        ))),
    }
}

/// A startup cannot acquire itself.
pub fn distinct_parties(acquirer: &str, target: &str) -> Result<()> {
    if acquirer.trim() == target.trim() {
        return Err(AtlasError::validation(format!(
            "Cannot acquire itself: acquirer and target are both '{}'",
            acquirer.trim()
        )));
    }
    Ok(())
}
