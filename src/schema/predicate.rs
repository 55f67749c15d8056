//! Value predicates for schema parameters

use std::path::Path;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::config::PredicateSpec;

/// Lowercase UUID form, matched case-insensitively.
pub const UUID_PATTERN: &str = r"[0-9a-f]{8}-(?:[0-9a-f]{4}-){3}[0-9a-f]{12}";

/// POSIX locale name such as `en`, `en_US` or `en_US.UTF-8`.
pub const POSIX_LOCALE_PATTERN: &str = r"[a-zA-Z]{2,3}(?:_[a-zA-Z]{2})?(?:\.[a-zA-Z0-9-]+)?";

/// Words accepted by the `bool_word` preset.
pub const BOOL_WORDS: [&str; 4] = ["true", "false", "yes", "no"];

/// A compiled check over a raw string value.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Unsigned decimal digits within `min..=max`.
    IntRange { min: u64, max: u64 },
    /// Case-insensitive membership in `values`.
    EnumCi { values: Vec<String> },
    /// Whole-value regex match.
    RegexMatch { regex: Regex },
    /// `suffix` preceded by unsigned digits within `min..=max`, e.g. `30m`.
    SuffixedIntRange { suffix: String, min: u64, max: u64 },
    /// A case-insensitive sentinel such as `auto`, or a number within range.
    SentinelOrNumericRange {
        sentinels: Vec<String>,
        min: f64,
        max: f64,
        exclusive_min: bool,
    },
    /// Absolute path of an existing directory.
    AbsoluteDirExists,
}

/// Why a rule could not be compiled.
#[derive(Debug, Error)]
pub enum PredicateError {
    #[error("invalid pattern: {0}")]
    Pattern(#[source] regex::Error),
    #[error("min is greater than max")]
    Range,
}

impl Predicate {
    pub fn int_range(min: u64, max: u64) -> Self {
        Predicate::IntRange { min, max }
    }

    pub fn enum_ci<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::EnumCi {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn bool_word() -> Self {
        Self::enum_ci(BOOL_WORDS)
    }

    /// Anchor `pattern` so it must match the whole value.
    pub fn regex(pattern: &str, case_insensitive: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(Predicate::RegexMatch { regex })
    }

    /// Evaluate the predicate against a raw value.
    pub fn check(&self, value: &str) -> bool {
        match self {
            Predicate::IntRange { min, max } => {
                parse_digits(value).is_some_and(|n| (*min..=*max).contains(&n))
            }
            Predicate::EnumCi { values } => {
                let lowered = value.to_lowercase();
                values.iter().any(|v| v.to_lowercase() == lowered)
            }
            Predicate::RegexMatch { regex } => regex.is_match(value),
            Predicate::SuffixedIntRange { suffix, min, max } => value
                .strip_suffix(suffix.as_str())
                .and_then(parse_digits)
                .is_some_and(|n| (*min..=*max).contains(&n)),
            Predicate::SentinelOrNumericRange {
                sentinels,
                min,
                max,
                exclusive_min,
            } => {
                let lowered = value.to_lowercase();
                if sentinels.iter().any(|s| s.to_lowercase() == lowered) {
                    return true;
                }
                match value.parse::<f64>() {
                    Ok(n) if n.is_finite() => {
                        let above_min = if *exclusive_min { n > *min } else { n >= *min };
                        above_min && n <= *max
                    }
                    _ => false,
                }
            }
            Predicate::AbsoluteDirExists => {
                let path = Path::new(value);
                path.is_absolute() && path.is_dir()
            }
        }
    }
}

impl TryFrom<&PredicateSpec> for Predicate {
    type Error = PredicateError;

    fn try_from(spec: &PredicateSpec) -> Result<Self, Self::Error> {
        let predicate = match spec {
            PredicateSpec::IntRange { min, max } => {
                ensure_ordered(min, max)?;
                Predicate::int_range(*min, *max)
            }
            PredicateSpec::EnumCi { values } => Predicate::enum_ci(values.iter().cloned()),
            PredicateSpec::BoolWord => Predicate::bool_word(),
            PredicateSpec::RegexMatch {
                pattern,
                case_insensitive,
            } => Predicate::regex(pattern, *case_insensitive).map_err(PredicateError::Pattern)?,
            PredicateSpec::Uuid => {
                Predicate::regex(UUID_PATTERN, true).map_err(PredicateError::Pattern)?
            }
            PredicateSpec::PosixLocale => {
                Predicate::regex(POSIX_LOCALE_PATTERN, false).map_err(PredicateError::Pattern)?
            }
            PredicateSpec::SuffixedIntRange { suffix, min, max } => {
                ensure_ordered(min, max)?;
                Predicate::SuffixedIntRange {
                    suffix: suffix.clone(),
                    min: *min,
                    max: *max,
                }
            }
            PredicateSpec::SentinelOrNumericRange {
                sentinels,
                min,
                max,
                exclusive_min,
            } => {
                ensure_ordered(min, max)?;
                Predicate::SentinelOrNumericRange {
                    sentinels: sentinels.clone(),
                    min: *min,
                    max: *max,
                    exclusive_min: *exclusive_min,
                }
            }
            PredicateSpec::AbsoluteDirExists => Predicate::AbsoluteDirExists,
        };
        Ok(predicate)
    }
}

fn ensure_ordered<T: PartialOrd>(min: T, max: T) -> Result<(), PredicateError> {
    if min <= max {
        Ok(())
    } else {
        Err(PredicateError::Range)
    }
}

/// Parse a non-empty run of ASCII digits. Signs, spaces and overflow yield `None`.
fn parse_digits(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
