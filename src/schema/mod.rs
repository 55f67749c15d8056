//! Expected-structure checks for parsed INI documents.
//!
//! A [`Schema`] names the sections a document must contain and, for each
//! section, the parameters it may contain along with a [`Predicate`] the
//! value must satisfy. [`evaluate`] compares a document against a schema and
//! collects every [`Violation`] into a [`Report`].

mod evaluate;
mod predicate;

pub use evaluate::{check_structure, evaluate, Check, DiagnosticPolicy, Report, Violation};
pub use predicate::{
    Predicate, PredicateError, BOOL_WORDS, POSIX_LOCALE_PATTERN, UUID_PATTERN,
};

use indexmap::IndexMap;
use thiserror::Error;

use crate::config::SectionSpec;

/// Parameter predicates of one section, in declaration order.
pub type ParamRules = IndexMap<String, Predicate>;

#[derive(Debug, Error)]
#[error("invalid rule for [{section}]/{param}: {source}")]
pub struct SchemaError {
    pub section: String,
    pub param: String,
    #[source]
    pub source: PredicateError,
}

/// Compiled set of section and parameter rules.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    sections: IndexMap<String, ParamRules>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile the `[schema.*]` tables of inicheck.toml.
    pub fn compile(tables: &IndexMap<String, SectionSpec>) -> Result<Self, SchemaError> {
        let mut schema = Self::new();
        for (section, params) in tables {
            let rules = schema.sections.entry(section.clone()).or_default();
            for (param, spec) in params {
                let predicate = Predicate::try_from(spec).map_err(|source| SchemaError {
                    section: section.clone(),
                    param: param.clone(),
                    source,
                })?;
                rules.insert(param.clone(), predicate);
            }
        }
        Ok(schema)
    }

    /// Require `section` without adding any parameter rules.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.sections.entry(section.into()).or_default();
        self
    }

    pub fn with_param(
        mut self,
        section: impl Into<String>,
        param: impl Into<String>,
        predicate: Predicate,
    ) -> Self {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(param.into(), predicate);
        self
    }

    pub fn sections(&self) -> &IndexMap<String, ParamRules> {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&ParamRules> {
        self.sections.get(name)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PredicateSpec;

    #[test]
    fn test_compile_tables() {
        let mut general = SectionSpec::new();
        general.insert(
            "PingInterval".to_string(),
            PredicateSpec::IntRange {
                min: 100,
                max: 10000,
            },
        );
        general.insert("CoreDumps".to_string(), PredicateSpec::BoolWord);
        let mut tables = IndexMap::new();
        tables.insert("General".to_string(), general);
        tables.insert("Empty".to_string(), SectionSpec::new());

        let schema = Schema::compile(&tables).unwrap();

        assert!(schema.contains_section("Empty"));
        let rules = schema.section("General").unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules["PingInterval"].check("500"));
        assert!(rules["CoreDumps"].check("Yes"));
    }

    #[test]
    fn test_compile_error_names_parameter() {
        let mut section = SectionSpec::new();
        section.insert(
            "Locale".to_string(),
            PredicateSpec::RegexMatch {
                pattern: "(".to_string(),
                case_insensitive: false,
            },
        );
        let mut tables = IndexMap::new();
        tables.insert("General".to_string(), section);

        let err = Schema::compile(&tables).unwrap_err();
        assert_eq!(err.section, "General");
        assert_eq!(err.param, "Locale");
        assert!(matches!(err.source, PredicateError::Pattern(_)));
        assert!(err.to_string().starts_with("invalid rule for [General]/Locale"));
    }

    #[test]
    fn test_compile_error_reports_inverted_range() {
        let mut section = SectionSpec::new();
        section.insert(
            "ConnectTimeout".to_string(),
            PredicateSpec::SuffixedIntRange {
                suffix: "m".to_string(),
                min: 120,
                max: 1,
            },
        );
        let mut tables = IndexMap::new();
        tables.insert("Watchdog".to_string(), section);

        let err = Schema::compile(&tables).unwrap_err();
        assert_eq!(err.param, "ConnectTimeout");
        assert!(matches!(err.source, PredicateError::Range));
        assert_eq!(
            err.to_string(),
            "invalid rule for [Watchdog]/ConnectTimeout: min is greater than max"
        );
    }

    #[test]
    fn test_builder() {
        let schema = Schema::new()
            .with_section("Watchdog")
            .with_param("General", "ExecArgMax", Predicate::int_range(10, 100));

        assert_eq!(schema.sections().len(), 2);
        assert!(schema.section("Watchdog").unwrap().is_empty());
        assert!(!schema.is_empty());
    }
}
