//! Requested clip window.

use serde::{Deserialize, Serialize};

use crate::timecode::{parse_non_negative, seconds_to_millis, TimeError, TimeResult, MAX_SECONDS};

/// Start offset and optional duration of the requested clip, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start offset (0 when unspecified).
    pub start: f64,
    /// Duration (`None` = to the end of the source).
    pub duration: Option<f64>,
}

impl TimeWindow {
    /// Build a window from already-parsed values.
    ///
    /// Values above [`MAX_SECONDS`] are rejected as [`TimeError::OutOfRange`].
    pub fn new(start: Option<f64>, duration: Option<f64>) -> TimeResult<Self> {
        let start = start.unwrap_or(0.0);
        check_seconds(start)?;
        if let Some(d) = duration {
            check_seconds(d)?;
        }
        Ok(Self { start, duration })
    }

    /// Build a window from user-supplied time strings.
    pub fn parse(start: Option<&str>, duration: Option<&str>) -> TimeResult<Self> {
        let start = start.map(parse_non_negative).transpose()?;
        let duration = duration.map(parse_non_negative).transpose()?;
        Self::new(start, duration)
    }

    /// The whole source, untouched.
    pub fn full() -> Self {
        Self::default()
    }

    /// True when neither a start offset nor a duration was requested.
    pub fn is_trivial(&self) -> bool {
        self.start <= 0.0 && self.duration.is_none()
    }

    /// True when a duration bound was requested.
    pub fn is_bounded(&self) -> bool {
        self.duration.is_some()
    }

    /// Start offset in whole milliseconds.
    pub fn start_ms(&self) -> i64 {
        seconds_to_millis(self.start)
    }

    /// Duration in whole milliseconds.
    pub fn duration_ms(&self) -> Option<i64> {
        self.duration.map(seconds_to_millis)
    }
}

fn check_seconds(value: f64) -> TimeResult<()> {
    if value < 0.0 || value.is_nan() {
        return Err(TimeError::Negative(value.to_string()));
    }
    if value > MAX_SECONDS {
        return Err(TimeError::OutOfRange(value.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_formats() {
        let window = TimeWindow::parse(Some("0:05"), Some("10")).unwrap();
        assert_eq!(window.start, 5.0);
        assert_eq!(window.duration, Some(10.0));
        assert_eq!(window.start_ms(), 5000);
        assert_eq!(window.duration_ms(), Some(10_000));
    }

    #[test]
    fn defaults_start_to_zero() {
        let window = TimeWindow::parse(None, Some("00:00:30")).unwrap();
        assert_eq!(window.start, 0.0);
        assert!(window.is_bounded());
        assert!(!window.is_trivial());
    }

    #[test]
    fn full_window_is_trivial() {
        assert!(TimeWindow::full().is_trivial());
        assert!(!TimeWindow::full().is_bounded());
    }

    #[test]
    fn negative_values_are_usage_errors() {
        assert!(matches!(
            TimeWindow::parse(Some("-3"), None),
            Err(TimeError::Negative(_))
        ));
        assert!(matches!(
            TimeWindow::new(None, Some(-1.0)),
            Err(TimeError::Negative(_))
        ));
    }

    #[test]
    fn unparsable_values_are_rejected() {
        assert!(matches!(
            TimeWindow::parse(Some("five"), None),
            Err(TimeError::InvalidTimeFormat { .. })
        ));
    }

    #[test]
    fn huge_values_are_out_of_range() {
        assert!(matches!(
            TimeWindow::parse(Some("1e300"), None),
            Err(TimeError::OutOfRange(_))
        ));
        assert!(matches!(
            TimeWindow::parse(None, Some("1e20")),
            Err(TimeError::OutOfRange(_))
        ));
        assert!(matches!(
            TimeWindow::new(Some(f64::INFINITY), None),
            Err(TimeError::OutOfRange(_))
        ));

        let longest = TimeWindow::new(Some(MAX_SECONDS), Some(MAX_SECONDS)).unwrap();
        assert_eq!(longest.start_ms(), 9_007_199_254_000);
    }
}
