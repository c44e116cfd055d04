//! Locating required executables before any work starts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::ToolSettings;
use crate::logging::JobLogger;

use super::{Tool, ToolError, ToolResult};

/// Absolute paths of the resolved tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolPaths {
    paths: BTreeMap<Tool, PathBuf>,
}

impl ToolPaths {
    /// Build from explicit entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (Tool, PathBuf)>) -> Self {
        Self {
            paths: entries.into_iter().collect(),
        }
    }

    /// Path of `tool`, if it was resolved.
    pub fn get(&self, tool: Tool) -> Option<&Path> {
        self.paths.get(&tool).map(PathBuf::as_path)
    }

    /// Path of `tool`, or its bare name when it was not part of the check.
    pub fn program(&self, tool: Tool, settings: &ToolSettings) -> PathBuf {
        self.get(tool)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(tool.configured_name(settings)))
    }
}

/// Resolve every tool in `required`, failing on the first one missing.
///
/// `settings.search_path` replaces `PATH` when set.
pub fn resolve_requirements(
    required: &[Tool],
    settings: &ToolSettings,
    logger: &JobLogger,
) -> ToolResult<ToolPaths> {
    let mut paths = BTreeMap::new();

    for &tool in required {
        if paths.contains_key(&tool) {
            continue;
        }
        let name = tool.configured_name(settings);
        let resolved = match &settings.search_path {
            Some(search_path) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(name, Some(search_path), cwd)
            }
            None => which::which(name),
        };

        let path = resolved.map_err(|_| ToolError::NotFound {
            tool,
            name: name.to_string(),
        })?;
        logger.debug(&format!("Found {} '{}' at {}", tool, name, path.display()));
        paths.insert(tool, path);
    }

    Ok(ToolPaths { paths })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[cfg(unix)]
    fn stub(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn settings_for(dir: &Path) -> ToolSettings {
        ToolSettings {
            search_path: Some(dir.to_string_lossy().to_string()),
            ..ToolSettings::default()
        }
    }

    #[cfg(unix)]
    #[test]
    fn resolves_tools_in_search_path() {
        let dir = tempdir().unwrap();
        let aria = stub(dir.path(), "aria2c");
        let ffmpeg = stub(dir.path(), "ffmpeg");

        let paths = resolve_requirements(
            &[Tool::Fetcher, Tool::Transcoder],
            &settings_for(dir.path()),
            &JobLogger::silent("requirements"),
        )
        .unwrap();

        assert_eq!(paths.get(Tool::Fetcher), Some(aria.as_path()));
        assert_eq!(paths.get(Tool::Transcoder), Some(ffmpeg.as_path()));
        assert_eq!(paths.get(Tool::Catalog), None);
    }

    #[cfg(unix)]
    #[test]
    fn missing_tool_is_named() {
        let dir = tempdir().unwrap();
        stub(dir.path(), "ffmpeg");

        let err = resolve_requirements(
            &[Tool::Transcoder, Tool::Fetcher],
            &settings_for(dir.path()),
            &JobLogger::silent("requirements"),
        )
        .unwrap_err();

        match err {
            ToolError::NotFound { tool, name } => {
                assert_eq!(tool, Tool::Fetcher);
                assert_eq!(name, "aria2c");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn program_falls_back_to_configured_name() {
        let paths = ToolPaths::default();
        assert_eq!(
            paths.program(Tool::Fetcher, &ToolSettings::default()),
            PathBuf::from("aria2c")
        );
    }
}
