//! Loading INI documents from disk

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::document::ConfigDocument;

/// Environment variable naming the default INI file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Fallback when neither `CONFIG_PATH` nor `[settings].default_path` is set.
pub const DEFAULT_CONFIG_PATH: &str = "configs/config_perfect.ini";

const INI_EXTENSION: &str = "ini";

/// Environment-level failures. Data problems inside the file are never
/// reported here; they end up as diagnostics on the document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid file format: {}. Expected '.ini' file", .path.display())]
    InvalidFormat { path: PathBuf },

    #[error("config not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where to load from when no path is given explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub default_path: PathBuf,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }
}

impl LoaderConfig {
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: default_path.into(),
        }
    }

    /// Load `path`, or the configured default when `path` is `None`.
    pub fn load(&self, path: Option<&Path>) -> Result<ConfigDocument, LoadError> {
        load_document(path.unwrap_or(self.default_path.as_path()))
    }
}

/// Read `CONFIG_PATH` once. Unset or empty means no override.
pub fn config_path_from_env() -> Option<PathBuf> {
    non_empty_path(std::env::var_os(CONFIG_PATH_ENV))
}

fn non_empty_path(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Check preconditions, read the whole file and parse it.
///
/// The extension is checked before touching the filesystem.
pub fn load_document(path: &Path) -> Result<ConfigDocument, LoadError> {
    if !has_ini_extension(path) {
        return Err(LoadError::InvalidFormat {
            path: path.to_path_buf(),
        });
    }

    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let document = ConfigDocument::parse(path, &content);
    debug!(
        path = %path.display(),
        sections = document.sections().len(),
        duplicates = document.duplicates().len(),
        invalid_lines = document.invalid_lines().len(),
        "loaded config"
    );

    Ok(document)
}

/// True if the path ends in `.ini`.
pub fn has_ini_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == INI_EXTENSION)
}
