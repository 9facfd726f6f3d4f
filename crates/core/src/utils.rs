use crate::error::PipelineError;
use crate::ports::Result;
use chrono::{Datelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Derives the year-month period (YYYY-MM) of an invoice timestamp
/// Supports formats like: "2009-01-01 00:00:00", "2009-01-01T00:00:00Z", etc.
/// Timestamps without a zone are read as UTC so the month never shifts.
pub fn year_month(timestamp: &str) -> Result<String> {
    let parsed = dateparser::parse_with_timezone(timestamp.trim(), &Utc).map_err(|e| {
        PipelineError::InvalidDate {
            value: timestamp.to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok(format!("{:04}-{:02}", parsed.year(), parsed.month()))
}

/// Formats a quarter key, e.g. `2010Q3`
pub fn quarter_label(year: &str, quarter: u32) -> String {
    format!("{}Q{}", year, quarter)
}

/// Exact decimal value of `unit_price * quantity` as SQLite computes it
pub fn line_amount(unit_price: f64, quantity: i64) -> Decimal {
    Decimal::from_f64_retain(unit_price * quantity as f64).unwrap_or_default()
}

/// Rounds a monetary sum to two decimal places, halves away from zero,
/// matching SQLite's `ROUND(x, 2)`
pub fn round_money(total: Decimal) -> f64 {
    total
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}
