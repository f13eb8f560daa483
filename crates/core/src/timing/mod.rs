//! Preparation time estimation and formatting.

use thiserror::Error;

use crate::order::Order;
use crate::station::Station;

/// Errors from the duration estimator.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// The summed minutes do not fit the estimate type.
    #[error("estimated minutes overflow for order {0}")]
    Overflow(String),
}

/// Estimated total preparation minutes for an order.
///
/// Pure sum of per-item prep time times quantity. The station argument is
/// accepted for station-aware strategies but the baseline sum ignores it.
/// Callers treat a failure as non-fatal: the order's estimate stays unset and
/// processing continues.
pub fn estimate_minutes(order: &Order, _station: Option<&Station>) -> Result<u32, EstimateError> {
    let mut total: u32 = 0;
    for item in order.items() {
        let line = item
            .prep_time_minutes
            .checked_mul(item.quantity)
            .ok_or_else(|| EstimateError::Overflow(order.id().to_string()))?;
        total = total
            .checked_add(line)
            .ok_or_else(|| EstimateError::Overflow(order.id().to_string()))?;
    }
    Ok(total)
}

/// Human-readable rendering of a minute count.
///
/// `25` -> `"25 min"`, `60` -> `"1h"`, `65` -> `"1h 5min"`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours == 0 {
        format!("{} min", mins)
    } else if mins == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}min", hours, mins)
    }
}
