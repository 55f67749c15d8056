//! Config file discovery and loading

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::toml_schema::InicheckToml;
use crate::schema::{Schema, SchemaError};

/// File name searched for by [`find_config_file`].
pub const CONFIG_FILE_NAME: &str = "inicheck.toml";

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to compile schema: {0}")]
    Schema(#[from] SchemaError),
}

/// Search upward from `start_dir` for a file with the given name.
///
/// If `stop_at_git_root` is true, stops searching when a `.git` directory is found.
pub fn find_file_upward(
    start_dir: &Path,
    filename: &str,
    stop_at_git_root: bool,
) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let file_path = current.join(filename);
        if file_path.is_file() {
            return Some(file_path);
        }

        if stop_at_git_root && current.join(".git").exists() {
            return None;
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Find inicheck.toml by searching upward from the given directory.
///
/// Stops at the first `inicheck.toml` found, or at the git repository root
/// (directory containing `.git`), whichever comes first.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    find_file_upward(start_dir, CONFIG_FILE_NAME, true)
}

/// Load and parse inicheck.toml from the given path.
pub fn load_config(path: &Path) -> Result<InicheckToml, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: InicheckToml = toml::from_str(&content)?;
    Ok(config)
}

impl InicheckToml {
    /// Compile the `[schema.*]` tables. `None` when no section is declared.
    pub fn compile_schema(&self) -> Result<Option<Schema>, ConfigError> {
        if self.schema.is_empty() {
            return Ok(None);
        }
        Ok(Some(Schema::compile(&self.schema)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PredicateSpec;
    use crate::schema::DiagnosticPolicy;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_current_dir() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[settings]\n").unwrap();

        let found = find_config_file(dir.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let parent = TempDir::new().unwrap();
        let config_path = parent.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[settings]\n").unwrap();

        let child = parent.path().join("subdir");
        fs::create_dir(&child).unwrap();

        let found = find_config_file(&child);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_stops_at_git_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let subdir = dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        let found = find_config_file(&subdir);
        assert_eq!(found, None);
    }

    #[test]
    fn test_find_config_prefers_closer() {
        let parent = TempDir::new().unwrap();
        fs::write(parent.path().join(CONFIG_FILE_NAME), "").unwrap();

        let child = parent.path().join("subdir");
        fs::create_dir(&child).unwrap();
        let child_config = child.join(CONFIG_FILE_NAME);
        fs::write(&child_config, "").unwrap();

        let found = find_config_file(&child);
        assert_eq!(found, Some(child_config));
    }

    #[test]
    fn test_load_config_full() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            r#"
[settings]
default_path = "configs/app.ini"
diagnostics = "warn"

[schema.General]
PingInterval = { type = "int_range", min = 100, max = 10000 }
CoreDumps = { type = "bool_word" }

[schema.Watchdog]
MaxMemory = { type = "sentinel_or_numeric_range", sentinels = ["auto", "off"], min = 0, max = 100, exclusive_min = true }
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(
            config.settings.default_path,
            Some(PathBuf::from("configs/app.ini"))
        );
        assert_eq!(config.settings.diagnostics, Some(DiagnosticPolicy::Warn));
        assert_eq!(
            config.schema["General"]["PingInterval"],
            PredicateSpec::IntRange {
                min: 100,
                max: 10000
            }
        );
        assert_eq!(config.schema["General"]["CoreDumps"], PredicateSpec::BoolWord);

        let schema = config.compile_schema().unwrap().unwrap();
        let watchdog = schema.section("Watchdog").unwrap();
        assert!(watchdog["MaxMemory"].check("auto"));
        assert!(watchdog["MaxMemory"].check("42.5"));
        assert!(!watchdog["MaxMemory"].check("0"));
    }

    #[test]
    fn test_load_config_empty() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "").unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.settings.default_path, None);
        assert_eq!(config.settings.diagnostics, None);
        assert!(config.compile_schema().unwrap().is_none());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "invalid toml {{{\n").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_unknown_predicate_type() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            "[schema.General]\nPingInterval = { type = \"telepathy\" }\n",
        )
        .unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_compile_schema_reports_bad_pattern() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            "[schema.General]\nLocale = { type = \"regex_match\", pattern = \"[\" }\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert!(matches!(
            config.compile_schema(),
            Err(ConfigError::Schema(_))
        ));
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_config(&dir.path().join(CONFIG_FILE_NAME));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
