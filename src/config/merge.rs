//! Configuration merging logic
//!
//! Priority: CLI args > environment > inicheck.toml > defaults

use std::path::PathBuf;

use crate::loader::LoaderConfig;
use crate::schema::DiagnosticPolicy;

use super::toml_schema::SettingsSection;

/// CLI options that can override config file settings.
///
/// Uses `Option<T>` to distinguish "not specified" from "explicitly set".
#[derive(Debug, Default)]
pub struct CliRunOptions {
    /// Files or directories given on the command line
    pub paths: Vec<PathBuf>,
    /// If Some(true), structural diagnostics only warn
    pub warn_diagnostics: Option<bool>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Explicit targets; empty means "load the default path"
    pub paths: Vec<PathBuf>,
    pub loader: LoaderConfig,
    pub policy: DiagnosticPolicy,
}

/// Resolve the default INI path.
///
/// Priority: `CONFIG_PATH` value > `[settings].default_path` > built-in
pub fn merge_loader_config(
    env_path: Option<PathBuf>,
    toml: Option<&SettingsSection>,
) -> LoaderConfig {
    env_path
        .or_else(|| toml.and_then(|t| t.default_path.clone()))
        .map_or_else(LoaderConfig::default, LoaderConfig::new)
}

/// Merge CLI options, the `CONFIG_PATH` value and the `[settings]` table.
pub fn merge_run_settings(
    cli: &CliRunOptions,
    env_path: Option<PathBuf>,
    toml: Option<&SettingsSection>,
) -> RunSettings {
    let policy = cli
        .warn_diagnostics
        .map(|warn| {
            if warn {
                DiagnosticPolicy::Warn
            } else {
                DiagnosticPolicy::Error
            }
        })
        .or_else(|| toml.and_then(|t| t.diagnostics))
        .unwrap_or_default();

    RunSettings {
        paths: cli.paths.clone(),
        loader: merge_loader_config(env_path, toml),
        policy,
    }
}
