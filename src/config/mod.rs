//! Configuration file support for inicheck.
//!
//! This module provides:
//! - Loading configuration from `inicheck.toml`
//! - Config file discovery (search upward from current directory)
//! - Merging CLI args, environment, config file, and defaults
//! - Template generation with `--init`

mod file;
mod init;
mod merge;
mod toml_schema;

pub use file::{find_config_file, find_file_upward, load_config, ConfigError, CONFIG_FILE_NAME};
pub use init::{generate_init_file, generate_init_file_in, INICHECK_TOML_TEMPLATE};
pub use merge::{merge_loader_config, merge_run_settings, CliRunOptions, RunSettings};
pub use toml_schema::{InicheckToml, PredicateSpec, SectionSpec, SettingsSection};
