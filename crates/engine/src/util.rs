//! Internal helpers for validation and date arithmetic.
//!
//! These utilities are **not** part of the public API. They centralize the
//! checks the reconciliation operations share.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Salary rows are keyed by month in `YYYY-MM` form.
pub(crate) fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Returns `[start, end)` bounds of the month containing `anchor`.
pub(crate) fn month_bounds(anchor: NaiveDate) -> ResultEngine<(NaiveDate, NaiveDate)> {
    use chrono::Datelike;

    let (year, month) = (anchor.year(), anchor.month());
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::Validation(format!("invalid month: {year}-{month:02}")))?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| EngineError::Validation(format!("invalid month: {year}-{month:02}")))?;
    Ok((start, end))
}

pub(crate) fn days_in_month(anchor: NaiveDate) -> ResultEngine<i64> {
    let (start, end) = month_bounds(anchor)?;
    Ok((end - start).num_days())
}

/// Quantities and monetary amounts entering the ledger must be positive.
pub(crate) fn ensure_positive(value: Decimal, label: &str) -> ResultEngine<()> {
    if value <= Decimal::ZERO {
        return Err(EngineError::Validation(format!("{label} must be > 0")));
    }
    Ok(())
}

pub(crate) fn ensure_not_negative(value: Decimal, label: &str) -> ResultEngine<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::Validation(format!("{label} must be >= 0")));
    }
    Ok(())
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::Validation(format!("invalid {label} id")))
}
