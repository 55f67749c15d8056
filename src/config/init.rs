//! Template generation for `--init` command

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::file::CONFIG_FILE_NAME;

/// Template inicheck.toml with documentation
pub const INICHECK_TOML_TEMPLATE: &str = r#"# inicheck.toml - Configuration for the inicheck INI validator
#
# inicheck always reports structural problems in INI files:
# - duplicate sections and duplicate keys (the first occurrence wins)
# - keys that appear before any [section] header
# - empty keys and lines that are not comments, headers or key=value pairs
#
# The [schema.*] tables below describe the sections and parameters an INI
# file must contain. Every declared section is required, undeclared sections
# and parameters are reported, and each value must satisfy its rule.

[settings]
# INI file checked when no path is given on the command line.
# The CONFIG_PATH environment variable takes precedence.
# default_path = "configs/config_perfect.ini"

# "error" fails the run on duplicates and invalid lines, "warn" only reports them.
# diagnostics = "error"

# Rule types:
#   int_range                  { min, max }            digits only, inclusive
#   enum_ci                    { values }              case-insensitive
#   bool_word                                          true/false/yes/no
#   regex_match                { pattern, case_insensitive }
#   uuid                                               8-4-4-4-12 hex
#   posix_locale                                       en, en_US, en_US.UTF-8
#   suffixed_int_range         { suffix, min, max }    e.g. 30m
#   sentinel_or_numeric_range  { sentinels, min, max, exclusive_min }
#   absolute_dir_exists                                existing absolute directory

[schema.General]
ScanMemoryLimit = { type = "int_range", min = 1024, max = 8192 }
PackageType = { type = "enum_ci", values = ["rpm", "deb"] }
ExecArgMax = { type = "int_range", min = 10, max = 100 }
AdditionalDNSLookup = { type = "bool_word" }
CoreDumps = { type = "bool_word" }
RevealSensitiveInfoInTraces = { type = "bool_word" }
ExecEnvMax = { type = "int_range", min = 10, max = 100 }
MaxInotifyWatches = { type = "int_range", min = 1000, max = 1000000 }
CoreDumpsPath = { type = "absolute_dir_exists" }
UseFanotify = { type = "bool_word" }
KsvlaMode = { type = "bool_word" }
MachineId = { type = "uuid" }
StartupTraces = { type = "bool_word" }
MaxInotifyInstances = { type = "int_range", min = 1024, max = 8192 }
Locale = { type = "posix_locale" }

[schema.Watchdog]
ConnectTimeout = { type = "suffixed_int_range", suffix = "m", min = 1, max = 120 }
MaxVirtualMemory = { type = "sentinel_or_numeric_range", sentinels = ["auto", "off"], min = 0, max = 100, exclusive_min = true }
MaxMemory = { type = "sentinel_or_numeric_range", sentinels = ["auto", "off"], min = 0, max = 100, exclusive_min = true }
PingInterval = { type = "int_range", min = 100, max = 10000 }
"#;

/// Generate inicheck.toml in the specified directory (or current directory if None).
///
/// Returns an error if inicheck.toml already exists.
pub fn generate_init_file_in(dir: Option<&Path>) -> io::Result<PathBuf> {
    let path = dir.map_or_else(
        || PathBuf::from(CONFIG_FILE_NAME),
        |d| d.join(CONFIG_FILE_NAME),
    );

    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{CONFIG_FILE_NAME} already exists"),
        ));
    }

    fs::write(&path, INICHECK_TOML_TEMPLATE)?;
    Ok(path)
}

/// Generate inicheck.toml in the current directory.
pub fn generate_init_file() -> io::Result<PathBuf> {
    generate_init_file_in(None)
}
