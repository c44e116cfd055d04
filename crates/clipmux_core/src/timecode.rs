//! Human time strings to seconds.
//!
//! Accepts bare seconds (`"12.5"`) or colon-delimited clock strings
//! (`"1:02:03.250"`). The rightmost field is seconds and every field to
//! its left is worth sixty of the one after it, so `D:HH:MM:SS` inputs
//! parse too. Downstream tools truncate hours beyond two digits; that is
//! not corrected here.

use thiserror::Error;

/// Errors produced while parsing a time string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeError {
    /// A field was empty or not a finite number.
    #[error("Invalid time format '{input}': {reason}")]
    InvalidTimeFormat { input: String, reason: String },

    /// The value parsed but is below zero.
    #[error("Time must not be negative: '{0}'")]
    Negative(String),

    /// The value is larger than [`MAX_SECONDS`].
    #[error("Time is out of range: '{0}'")]
    OutOfRange(String),
}

/// Largest accepted start or duration (about 285 years). Millisecond
/// values below it are exact in an `f64` and fit an `i64`.
pub const MAX_SECONDS: f64 = 9_007_199_254.0;

impl TimeError {
    fn invalid(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTimeFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for time parsing.
pub type TimeResult<T> = Result<T, TimeError>;

/// Parse a time string into seconds.
///
/// # Examples
///
/// ```
/// use clipmux_core::timecode::parse_time;
///
/// assert_eq!(parse_time("90").unwrap(), 90.0);
/// assert_eq!(parse_time("1:30").unwrap(), 90.0);
/// assert_eq!(parse_time("01:00:05.5").unwrap(), 3605.5);
/// ```
pub fn parse_time(text: &str) -> TimeResult<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TimeError::invalid(text, "empty value"));
    }

    let fields: Vec<&str> = trimmed.split(':').collect();
    let last = fields.len() - 1;
    let mut total = 0.0;

    for (index, field) in fields.iter().enumerate() {
        // Only the leftmost field may carry a sign
        if index > 0 && field.starts_with(['+', '-']) {
            return Err(TimeError::invalid(text, format!("unexpected sign in '{}'", field)));
        }
        let value = parse_field(text, field)?;
        let position = (last - index) as i32;
        total += value * 60f64.powi(position);
    }

    Ok(total)
}

/// Parse a time string and reject negative results.
pub fn parse_non_negative(text: &str) -> TimeResult<f64> {
    let seconds = parse_time(text)?;
    if seconds < 0.0 || text.trim().starts_with('-') {
        return Err(TimeError::Negative(text.to_string()));
    }
    Ok(seconds)
}

fn parse_field(input: &str, field: &str) -> TimeResult<f64> {
    if field.is_empty() {
        return Err(TimeError::invalid(input, "empty field"));
    }
    let value: f64 = field
        .parse()
        .map_err(|_| TimeError::invalid(input, format!("'{}' is not a number", field)))?;
    if !value.is_finite() {
        return Err(TimeError::invalid(input, format!("'{}' is not finite", field)));
    }
    Ok(value)
}

/// Convert seconds to whole milliseconds.
///
/// Integer seconds and the sub-second remainder are converted separately
/// so large offsets do not pick up float drift. Values outside the `i64`
/// millisecond range saturate.
pub fn seconds_to_millis(seconds: f64) -> i64 {
    let whole = seconds.trunc();
    let remainder_ms = ((seconds - whole) * 1000.0).round() as i64;
    (whole as i64)
        .saturating_mul(1000)
        .saturating_add(remainder_ms)
}

/// Render seconds the way ffmpeg accepts them (`5`, `5.25`, `0.001`).
pub fn format_seconds(seconds: f64) -> String {
    let rendered = format!("{:.3}", seconds);
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    if rendered.is_empty() || rendered == "-" {
        "0".to_string()
    } else {
        rendered.to_string()
    }
}
