//! TOML schema definitions for inicheck.toml

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::DiagnosticPolicy;

/// Parameter rules of one INI section, keyed by parameter name.
pub type SectionSpec = IndexMap<String, PredicateSpec>;

/// Root structure for inicheck.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InicheckToml {
    /// Tool settings
    #[serde(default)]
    pub settings: SettingsSection,

    /// Expected INI sections, each with its parameter rules
    #[serde(default)]
    pub schema: IndexMap<String, SectionSpec>,
}

/// `[settings]` section in inicheck.toml
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SettingsSection {
    /// INI file checked when no path is given and `CONFIG_PATH` is unset
    pub default_path: Option<PathBuf>,

    /// Whether duplicates and invalid lines fail the run (default: error)
    pub diagnostics: Option<DiagnosticPolicy>,
}

/// One parameter rule, written as an inline table with a `type` tag.
///
/// ```toml
/// PingInterval = { type = "int_range", min = 100, max = 10000 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PredicateSpec {
    IntRange {
        min: u64,
        max: u64,
    },
    EnumCi {
        values: Vec<String>,
    },
    /// Shorthand for `enum_ci` over true/false/yes/no
    BoolWord,
    RegexMatch {
        pattern: String,
        #[serde(default)]
        case_insensitive: bool,
    },
    Uuid,
    PosixLocale,
    SuffixedIntRange {
        suffix: String,
        min: u64,
        max: u64,
    },
    SentinelOrNumericRange {
        sentinels: Vec<String>,
        min: f64,
        max: f64,
        #[serde(default)]
        exclusive_min: bool,
    },
    AbsoluteDirExists,
}
