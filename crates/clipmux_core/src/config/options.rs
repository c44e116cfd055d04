//! Per-invocation options.

use std::path::PathBuf;

use crate::models::TimeWindow;

use super::settings::Settings;

/// Immutable options for every URL of one invocation.
///
/// Built once from the command line and the loaded settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Stream to fetch; `None` means ask through the input source.
    pub stream_id: Option<String>,
    /// Caption language matched by substring against caption labels.
    pub language: String,
    /// Print the stream table and stop before downloading.
    pub list_only: bool,
    /// Requested clip window.
    pub window: TimeWindow,
    /// Directory intermediate and final files are written to.
    pub output_dir: PathBuf,
}

impl RunOptions {
    /// Options taking every default from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            stream_id: None,
            language: settings.captions.language.clone(),
            list_only: false,
            window: TimeWindow::full(),
            output_dir: PathBuf::from(&settings.output.directory),
        }
    }

    pub fn with_stream_id(mut self, id: Option<String>) -> Self {
        self.stream_id = id;
        self
    }

    /// Override the caption language; `None` keeps the configured one.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        if let Some(language) = language {
            self.language = language;
        }
        self
    }

    pub fn with_list_only(mut self, list_only: bool) -> Self {
        self.list_only = list_only;
        self
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_settings() {
        let mut settings = Settings::default();
        settings.captions.language = "Français".to_string();
        settings.output.directory = "downloads".to_string();

        let options = RunOptions::from_settings(&settings);
        assert_eq!(options.language, "Français");
        assert_eq!(options.output_dir, PathBuf::from("downloads"));
        assert!(options.window.is_trivial());
        assert!(options.stream_id.is_none());
    }

    #[test]
    fn flags_override_settings() {
        let options = RunOptions::from_settings(&Settings::default())
            .with_language(Some("Spanish".to_string()))
            .with_stream_id(Some("251".to_string()))
            .with_list_only(true);

        assert_eq!(options.language, "Spanish");
        assert_eq!(options.stream_id.as_deref(), Some("251"));
        assert!(options.list_only);

        let kept = RunOptions::from_settings(&Settings::default()).with_language(None);
        assert_eq!(kept.language, "English");
    }
}
