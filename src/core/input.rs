//! Coercion and validation of console input.
//!
//! Everything typed at the till arrives as text. These helpers turn it into
//! typed values or a [`Error::Validation`]; nothing falls back to a default.

use crate::errors::{Error, Result};

/// Parses a member identity key. Keys are positive integers.
pub fn parse_member_id(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    let id: i64 = trimmed
        .parse()
        .map_err(|_| Error::validation(format!("'{trimmed}' is not a member number")))?;
    validate_member_id(id)
}

/// Parses a unit cost.
pub fn parse_cost(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let cost: f64 = trimmed
        .parse()
        .map_err(|_| Error::validation(format!("'{trimmed}' is not a cost")))?;
    validate_cost(cost)
}

/// Parses a stock count.
pub fn parse_stock(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    let stock: i64 = trimmed
        .parse()
        .map_err(|_| Error::validation(format!("'{trimmed}' is not a stock count")))?;
    validate_stock(stock)
}

/// Parses a yes/no answer; `1` and `0` are accepted as well.
pub fn parse_admin_flag(input: &str) -> Result<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "true" => Ok(true),
        "0" | "n" | "no" | "false" => Ok(false),
        other => Err(Error::validation(format!(
            "'{other}' is not a yes/no answer (1 for yes, 0 for no)"
        ))),
    }
}

/// Accepts positive member numbers; 0 is the "No Member" sentinel.
pub fn validate_member_id(id: i64) -> Result<i64> {
    if id <= 0 {
        return Err(Error::validation(format!(
            "member number must be positive, got {id}"
        )));
    }
    Ok(id)
}

/// Accepts finite, non-negative costs.
pub fn validate_cost(cost: f64) -> Result<f64> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(Error::validation(format!(
            "cost must be a non-negative number, got {cost}"
        )));
    }
    Ok(cost)
}

/// Accepts stock counts of zero or more.
pub fn validate_stock(stock: i64) -> Result<i64> {
    if stock < 0 {
        return Err(Error::validation(format!(
            "stock cannot be negative, got {stock}"
        )));
    }
    Ok(stock)
}

/// Trims `text` and rejects it if nothing is left. `what` names the field in
/// the error message.
pub fn validate_text(text: &str, what: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{what} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
