//! Time-window resolution for command listing queries
//!
//! Turns the user's window selection (explicit bounds or a relative
//! duration expression) into the filter list understood by the command
//! service. Explicit bounds are passed through verbatim; relative deltas
//! are anchored to the current UTC instant with seconds zeroed and a
//! literal `Z` suffix.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::data::{CommandFilter, FilterKey};

/// Errors from parsing a relative duration expression
#[derive(Debug, Error)]
pub enum TimeWindowError {
    /// The expression is not `<number><d|h|m>`
    #[error("invalid relative duration '{0}': expected <number><d|h|m>, e.g. 90m or 2h")]
    InvalidDelta(String),
}

/// Resolves a time window into command-service filters.
///
/// When either explicit bound is supplied, the supplied values are used
/// exactly as given and `delta` is ignored. Otherwise `delta` is parsed as
/// an integer magnitude plus a unit character (`d`ays, `h`ours, `m`inutes)
/// and a single `InvokedAfter` lower bound is computed from the current
/// instant. A malformed `delta` is an error, never a silent default.
pub fn resolve(
    after: Option<&str>,
    before: Option<&str>,
    delta: &str,
) -> Result<Vec<CommandFilter>, TimeWindowError> {
    if after.is_some() || before.is_some() {
        let mut filters = Vec::new();
        if let Some(after) = after {
            filters.push(CommandFilter::new(FilterKey::InvokedAfter, after));
        }
        if let Some(before) = before {
            filters.push(CommandFilter::new(FilterKey::InvokedBefore, before));
        }
        return Ok(filters);
    }

    let lower = lower_bound(delta, Utc::now())?;
    Ok(vec![CommandFilter::new(FilterKey::InvokedAfter, lower)])
}

/// Computes the serialized lower bound `now - delta`.
///
/// Seconds and sub-second fields are zeroed in the serialized form, which
/// always carries a literal `Z` suffix rather than a numeric offset.
fn lower_bound(delta: &str, now: DateTime<Utc>) -> Result<String, TimeWindowError> {
    let invalid = || TimeWindowError::InvalidDelta(delta.to_string());

    let unit = delta.chars().last().ok_or_else(invalid)?;
    let magnitude_str = &delta[..delta.len() - unit.len_utf8()];
    let magnitude: i64 = magnitude_str.parse().map_err(|_| invalid())?;
    if magnitude < 0 {
        return Err(invalid());
    }

    let span = match unit {
        'd' => Duration::try_days(magnitude),
        'h' => Duration::try_hours(magnitude),
        'm' => Duration::try_minutes(magnitude),
        _ => return Err(invalid()),
    }
    .ok_or_else(invalid)?;

    let anchor = now.checked_sub_signed(span).ok_or_else(invalid)?;
    Ok(anchor.format("%Y-%m-%dT%H:%M:00Z").to_string())
}
