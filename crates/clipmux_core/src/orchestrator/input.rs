//! Values supplied at run time when the options leave them open.

/// Kind of value a step can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A source video URL.
    Url,
    /// A stream identifier from the listed streams.
    StreamId,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Url => write!(f, "URL"),
            ValueKind::StreamId => write!(f, "stream id"),
        }
    }
}

/// Supplier of missing values, typically an interactive prompt.
///
/// Returns `None` when no value can be obtained (input closed).
pub trait InputSource: Send + Sync {
    fn obtain(&self, kind: ValueKind, default: Option<&str>) -> Option<String>;
}

/// Input source that never supplies anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn obtain(&self, _kind: ValueKind, default: Option<&str>) -> Option<String> {
        default.map(str::to_string)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedInput;
    use super::*;

    #[test]
    fn no_input_falls_back_to_default() {
        assert_eq!(NoInput.obtain(ValueKind::StreamId, None), None);
        assert_eq!(
            NoInput.obtain(ValueKind::StreamId, Some("22")),
            Some("22".to_string())
        );
    }

    #[test]
    fn scripted_input_answers_in_order() {
        let input = ScriptedInput::new(&["https://example.com/v", "137"]);
        assert_eq!(
            input.obtain(ValueKind::Url, None).as_deref(),
            Some("https://example.com/v")
        );
        assert_eq!(input.obtain(ValueKind::StreamId, None).as_deref(), Some("137"));
        assert_eq!(input.obtain(ValueKind::StreamId, None), None);
        assert_eq!(
            *input.asked.lock(),
            vec![ValueKind::Url, ValueKind::StreamId, ValueKind::StreamId]
        );
    }
}
