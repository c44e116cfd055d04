//! Config manager for loading and saving settings.
//!
//! Writes are atomic (write to temp file, then rename).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::settings::{ConfigSection, Settings};

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Manages application configuration.
pub struct ConfigManager {
    /// Path to the config file, if one was given.
    config_path: Option<PathBuf>,
    /// Current settings loaded in memory.
    settings: Settings,
}

impl ConfigManager {
    /// Create a manager for the given config file.
    ///
    /// Does not load the config - call `load()` or `load_or_create()` after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(config_path.into()),
            settings: Settings::default(),
        }
    }

    /// Manager holding built-in defaults and no backing file.
    pub fn defaults() -> Self {
        Self {
            config_path: None,
            settings: Settings::default(),
        }
    }

    /// Load `path` when given, otherwise use defaults.
    pub fn from_optional_path(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => {
                let mut manager = Self::new(path);
                manager.load()?;
                Ok(manager)
            }
            None => Ok(Self::defaults()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Changes made here are only in memory until `save()` is called.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    /// Load config from file.
    ///
    /// Returns error if file doesn't exist.
    pub fn load(&mut self) -> ConfigResult<()> {
        let path = self.require_path()?;
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        tracing::debug!("Loading config from {}", path.display());
        self.settings = toml::from_str(&content)?;
        Ok(())
    }

    /// Load config from file, creating it with defaults if it doesn't exist.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        let path = self.require_path()?;
        if path.exists() {
            self.load()
        } else {
            self.settings = Settings::default();
            self.save()
        }
    }

    /// Save the entire config atomically.
    pub fn save(&self) -> ConfigResult<()> {
        let content = self.generate_config_with_comments()?;
        let path = self.require_path()?;
        self.atomic_write(path, &content)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    fn require_path(&self) -> ConfigResult<&Path> {
        self.config_path
            .as_deref()
            .ok_or_else(|| ConfigError::NotFound(PathBuf::new()))
    }

    fn section_toml(&self, section: ConfigSection) -> ConfigResult<String> {
        let s = &self.settings;
        Ok(match section {
            ConfigSection::Tools => toml::to_string_pretty(&s.tools)?,
            ConfigSection::Fetch => toml::to_string_pretty(&s.fetch)?,
            ConfigSection::Output => toml::to_string_pretty(&s.output)?,
            ConfigSection::Transcode => toml::to_string_pretty(&s.transcode)?,
            ConfigSection::Captions => toml::to_string_pretty(&s.captions)?,
            ConfigSection::Logging => toml::to_string_pretty(&s.logging)?,
        })
    }

    /// Generate config content with a comment above each section.
    fn generate_config_with_comments(&self) -> ConfigResult<String> {
        let mut output = String::new();

        output.push_str("# clipmux configuration\n");
        output.push_str("# Every key is optional; missing keys take their defaults.\n");

        for section in ConfigSection::ALL {
            output.push('\n');
            output.push_str(&format!("# {}\n", section.comment()));
            output.push_str(&format!("[{}]\n", section.table_name()));
            for line in self.section_toml(section)?.lines() {
                output.push_str(line);
                output.push('\n');
            }
        }

        Ok(output)
    }

    /// Write to a temp file in the same directory, then rename over `path`.
    fn atomic_write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = path.with_extension("toml.tmp");

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, path)?;

        Ok(())
    }
}
