//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Every field has a default, so an empty file is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logging::{LogConfig, LogLevel};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// External tool names and lookup path.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Fetcher tuning.
    #[serde(default)]
    pub fetch: FetchSettings,

    /// Output location and container.
    #[serde(default)]
    pub output: OutputSettings,

    /// Audio-only re-encode policy.
    #[serde(default)]
    pub transcode: TranscodeSettings,

    /// Caption selection.
    #[serde(default)]
    pub captions: CaptionSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Logger configuration for a run at `level`.
    pub fn log_config(&self, level: LogLevel) -> LogConfig {
        LogConfig {
            level,
            error_tail: self.logging.error_tail as usize,
            show_timestamps: self.logging.timestamps,
        }
    }
}

/// External tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Resumable multi-connection downloader.
    #[serde(default = "default_fetcher")]
    pub fetcher: String,

    /// Media tool used for slicing, muxing and re-encoding.
    #[serde(default = "default_transcoder")]
    pub transcoder: String,

    /// Stream catalog resolver.
    #[serde(default = "default_catalog")]
    pub catalog: String,

    /// Directories searched instead of `PATH`, separated like `PATH`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_path: Option<String>,
}

fn default_fetcher() -> String {
    "aria2c".to_string()
}

fn default_transcoder() -> String {
    "ffmpeg".to_string()
}

fn default_catalog() -> String {
    "yt-dlp".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            fetcher: default_fetcher(),
            transcoder: default_transcoder(),
            catalog: default_catalog(),
            search_path: None,
        }
    }
}

/// Fetcher configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Parallel connections per download.
    #[serde(default = "default_connections")]
    pub connections: u32,

    /// Minimum segment size (aria2c size syntax such as `1M`).
    #[serde(default = "default_min_split_size")]
    pub min_split_size: String,

    /// Continue partially downloaded files.
    #[serde(default = "default_true")]
    pub resume: bool,
}

fn default_connections() -> u32 {
    5
}

fn default_min_split_size() -> String {
    "1M".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connections: default_connections(),
            min_split_size: default_min_split_size(),
            resume: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory intermediate and final files are written to.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Container extension for stream-copy outputs.
    #[serde(default = "default_container")]
    pub container: String,

    /// Codec used for embedded captions.
    #[serde(default = "default_subtitle_codec")]
    pub subtitle_codec: String,
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_container() -> String {
    "mkv".to_string()
}

fn default_subtitle_codec() -> String {
    "srt".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            container: default_container(),
            subtitle_codec: default_subtitle_codec(),
        }
    }
}

/// Audio-only re-encode configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodeSettings {
    /// Allow re-encoding audio-only runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Audio codec prefixes that need re-encoding.
    #[serde(default = "default_codecs")]
    pub codecs: Vec<String>,

    /// ffmpeg audio encoder.
    #[serde(default = "default_encoder")]
    pub encoder: String,

    /// Value passed to `-q:a` (0 is the highest VBR quality).
    #[serde(default = "default_quality")]
    pub quality: String,

    /// Output extension of re-encoded audio.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_codecs() -> Vec<String> {
    vec!["opus".to_string(), "vorbis".to_string()]
}

fn default_encoder() -> String {
    "libmp3lame".to_string()
}

fn default_quality() -> String {
    "0".to_string()
}

fn default_extension() -> String {
    "mp3".to_string()
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            codecs: default_codecs(),
            encoder: default_encoder(),
            quality: default_quality(),
            extension: default_extension(),
        }
    }
}

impl TranscodeSettings {
    /// Whether an audio stream with `codec` should be re-encoded.
    pub fn wants_transcode(&self, codec: Option<&str>) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(codec) = codec else {
            return false;
        };
        let codec = codec.to_ascii_lowercase();
        self.codecs
            .iter()
            .any(|prefix| codec.starts_with(&prefix.to_ascii_lowercase()))
    }
}

/// Caption configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSettings {
    /// Substring matched against caption labels when `--lang` is absent.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "English".to_string()
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Prefix each line with a wall-clock time.
    #[serde(default)]
    pub timestamps: bool,

    /// Number of tool output lines replayed on failure.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Write one log file per URL run into this directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            timestamps: false,
            error_tail: default_error_tail(),
            log_dir: None,
        }
    }
}

/// Configuration sections for the generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Tools,
    Fetch,
    Output,
    Transcode,
    Captions,
    Logging,
}

impl ConfigSection {
    /// All sections in file order.
    pub const ALL: [ConfigSection; 6] = [
        ConfigSection::Tools,
        ConfigSection::Fetch,
        ConfigSection::Output,
        ConfigSection::Transcode,
        ConfigSection::Captions,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Tools => "tools",
            ConfigSection::Fetch => "fetch",
            ConfigSection::Output => "output",
            ConfigSection::Transcode => "transcode",
            ConfigSection::Captions => "captions",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Tools => "External tools",
            ConfigSection::Fetch => "Downloader tuning",
            ConfigSection::Output => "Output location and container",
            ConfigSection::Transcode => "Audio-only re-encoding",
            ConfigSection::Captions => "Caption language",
            ConfigSection::Logging => "Logging",
        }
    }
}
