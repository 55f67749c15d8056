use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{ConfigDocument, Diagnostic, DiagnosticKind};

use super::Schema;

/// The independent checks a [`Report`] is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Check {
    RequiredSections,
    NoUnknownSections,
    NoExtraParameters,
    ParameterValues,
    NoDuplicateSections,
    NoDuplicateKeys,
    NoInvalidLines,
}

impl Check {
    pub const ALL: [Check; 7] = [
        Check::RequiredSections,
        Check::NoUnknownSections,
        Check::NoExtraParameters,
        Check::ParameterValues,
        Check::NoDuplicateSections,
        Check::NoDuplicateKeys,
        Check::NoInvalidLines,
    ];

    pub const STRUCTURAL: [Check; 3] = [
        Check::NoDuplicateSections,
        Check::NoDuplicateKeys,
        Check::NoInvalidLines,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Check::RequiredSections => "required-sections",
            Check::NoUnknownSections => "no-unknown-sections",
            Check::NoExtraParameters => "no-extra-parameters",
            Check::ParameterValues => "parameter-values",
            Check::NoDuplicateSections => "no-duplicate-sections",
            Check::NoDuplicateKeys => "no-duplicate-keys",
            Check::NoInvalidLines => "no-invalid-lines",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether structural diagnostics fail a run or are only reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticPolicy {
    #[default]
    Error,
    Warn,
}

/// One failed item of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingSection {
        section: String,
    },
    UnknownSection {
        section: String,
    },
    ExtraParameter {
        section: String,
        param: String,
    },
    MissingParameter {
        section: String,
        param: String,
    },
    InvalidValue {
        section: String,
        param: String,
        value: String,
    },
    Structural(Diagnostic),
}

impl Violation {
    pub fn check(&self) -> Check {
        match self {
            Violation::MissingSection { .. } => Check::RequiredSections,
            Violation::UnknownSection { .. } => Check::NoUnknownSections,
            Violation::ExtraParameter { .. } => Check::NoExtraParameters,
            Violation::MissingParameter { .. } | Violation::InvalidValue { .. } => {
                Check::ParameterValues
            }
            Violation::Structural(diagnostic) => match diagnostic.kind {
                DiagnosticKind::DuplicateSection { .. } => Check::NoDuplicateSections,
                DiagnosticKind::DuplicateKey { .. } => Check::NoDuplicateKeys,
                DiagnosticKind::KeyOutsideSection { .. }
                | DiagnosticKind::EmptyKey { .. }
                | DiagnosticKind::InvalidFormat { .. } => Check::NoInvalidLines,
            },
        }
    }

    /// True if this violation fails the run under `policy`.
    pub fn is_fatal(&self, policy: DiagnosticPolicy) -> bool {
        match self {
            Violation::Structural(_) => policy == DiagnosticPolicy::Error,
            _ => true,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingSection { section } => {
                write!(f, "Missing required section [{section}]")
            }
            Violation::UnknownSection { section } => write!(f, "Unknown section [{section}]"),
            Violation::ExtraParameter { section, param } => {
                write!(f, "Invalid parameter in section [{section}]: {param}")
            }
            Violation::MissingParameter { section, param } => {
                write!(f, "Parameter {param} missing in section [{section}]")
            }
            Violation::InvalidValue {
                section,
                param,
                value,
            } => write!(f, "Invalid value for [{section}]/{param}: {value}"),
            Violation::Structural(diagnostic) => fmt::Display::fmt(diagnostic, f),
        }
    }
}

/// All violations found in one document, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    checks: Vec<Check>,
    violations: Vec<Violation>,
}

impl Report {
    /// Checks that were run, whether or not they failed.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Checks with at least one violation, in check order.
    pub fn failed_checks(&self) -> Vec<Check> {
        self.checks
            .iter()
            .copied()
            .filter(|check| self.violations.iter().any(|v| v.check() == *check))
            .collect()
    }

    pub fn violations_for(&self, check: Check) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.check() == check)
    }

    /// True if no violation is fatal under `policy`.
    pub fn is_pass(&self, policy: DiagnosticPolicy) -> bool {
        !self.violations.iter().any(|v| v.is_fatal(policy))
    }

    fn run(&mut self, check: Check, found: impl IntoIterator<Item = Violation>) {
        self.checks.push(check);
        self.violations.extend(found);
    }
}

/// Compare `document` against `schema`, running every check.
///
/// Checks never short-circuit each other; each reports everything it finds.
pub fn evaluate(document: &ConfigDocument, schema: &Schema) -> Report {
    let mut report = Report::default();

    report.run(Check::RequiredSections, missing_sections(document, schema));
    report.run(Check::NoUnknownSections, unknown_sections(document, schema));
    report.run(Check::NoExtraParameters, extra_parameters(document, schema));
    report.run(Check::ParameterValues, parameter_values(document, schema));
    run_structural(&mut report, document);

    report
}

/// Run only the diagnostic checks; used when no schema is configured.
pub fn check_structure(document: &ConfigDocument) -> Report {
    let mut report = Report::default();
    run_structural(&mut report, document);
    report
}

fn run_structural(report: &mut Report, document: &ConfigDocument) {
    report.run(
        Check::NoDuplicateSections,
        structural(document.duplicates(), |k| {
            matches!(k, DiagnosticKind::DuplicateSection { .. })
        }),
    );
    report.run(
        Check::NoDuplicateKeys,
        structural(document.duplicates(), |k| {
            matches!(k, DiagnosticKind::DuplicateKey { .. })
        }),
    );
    report.run(
        Check::NoInvalidLines,
        structural(document.invalid_lines(), |_| true),
    );
}

fn structural(
    diagnostics: &[Diagnostic],
    keep: impl Fn(&DiagnosticKind) -> bool,
) -> Vec<Violation> {
    diagnostics
        .iter()
        .filter(|d| keep(&d.kind))
        .cloned()
        .map(Violation::Structural)
        .collect()
}

fn missing_sections(document: &ConfigDocument, schema: &Schema) -> Vec<Violation> {
    schema
        .sections()
        .keys()
        .filter(|name| !document.has_section(name))
        .map(|name| Violation::MissingSection {
            section: name.clone(),
        })
        .collect()
}

fn unknown_sections(document: &ConfigDocument, schema: &Schema) -> Vec<Violation> {
    document
        .sections()
        .keys()
        .filter(|name| !schema.contains_section(name))
        .map(|name| Violation::UnknownSection {
            section: name.clone(),
        })
        .collect()
}

fn extra_parameters(document: &ConfigDocument, schema: &Schema) -> Vec<Violation> {
    let mut found = Vec::new();
    for (section, rules) in schema.sections() {
        let Some(params) = document.sections().get(section) else {
            continue;
        };
        for param in params.keys().filter(|p| !rules.contains_key(*p)) {
            found.push(Violation::ExtraParameter {
                section: section.clone(),
                param: param.clone(),
            });
        }
    }
    found
}

fn parameter_values(document: &ConfigDocument, schema: &Schema) -> Vec<Violation> {
    let mut found = Vec::new();
    for (section, rules) in schema.sections() {
        // Absent sections are reported by RequiredSections
        if !document.has_section(section) {
            continue;
        }
        for (param, predicate) in rules {
            match document.get(section, param) {
                None => found.push(Violation::MissingParameter {
                    section: section.clone(),
                    param: param.clone(),
                }),
                Some(value) if !predicate.check(value) => found.push(Violation::InvalidValue {
                    section: section.clone(),
                    param: param.clone(),
                    value: value.to_string(),
                }),
                Some(_) => {}
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Predicate;

    fn doc(text: &str) -> ConfigDocument {
        ConfigDocument::parse("test.ini", text)
    }

    fn ping_schema() -> Schema {
        Schema::new().with_param("General", "PingInterval", Predicate::int_range(100, 10000))
    }

    #[test]
    fn test_single_invalid_value() {
        let report = evaluate(&doc("[General]\nPingInterval=50\n"), &ping_schema());

        assert_eq!(
            report.violations(),
            &[Violation::InvalidValue {
                section: "General".to_string(),
                param: "PingInterval".to_string(),
                value: "50".to_string(),
            }]
        );
        assert_eq!(report.failed_checks(), vec![Check::ParameterValues]);
        assert_eq!(report.checks(), &Check::ALL);
    }

    #[test]
    fn test_conforming_document_passes() {
        let report = evaluate(&doc("[General]\nPingInterval=500\n"), &ping_schema());
        assert!(report.is_empty());
        assert!(report.is_pass(DiagnosticPolicy::Error));
    }

    #[test]
    fn test_missing_section_skips_parameter_check() {
        let report = evaluate(&doc("[Other]\n"), &ping_schema());

        assert_eq!(
            report.violations(),
            &[
                Violation::MissingSection {
                    section: "General".to_string()
                },
                Violation::UnknownSection {
                    section: "Other".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_missing_and_extra_parameters() {
        let schema = ping_schema().with_param("General", "Locale", Predicate::enum_ci(["en"]));
        let report = evaluate(&doc("[General]\nLocale=en\nBogus=1\nAlsoBogus=2\n"), &schema);

        let extras: Vec<String> = report
            .violations_for(Check::NoExtraParameters)
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            extras,
            vec![
                "Invalid parameter in section [General]: Bogus",
                "Invalid parameter in section [General]: AlsoBogus",
            ]
        );
        assert_eq!(
            report.violations_for(Check::ParameterValues).next(),
            Some(&Violation::MissingParameter {
                section: "General".to_string(),
                param: "PingInterval".to_string(),
            })
        );
    }

    #[test]
    fn test_checks_do_not_short_circuit() {
        let text = "orphan=1\n[General]\nPingInterval=5\nPingInterval=6\nExtra=1\n\
                    [General]\n[Unknown]\n";
        let schema = ping_schema().with_section("Watchdog");
        let report = evaluate(&doc(text), &schema);

        assert_eq!(report.failed_checks(), Check::ALL.to_vec());
        assert_eq!(report.violations().len(), 7);
    }

    #[test]
    fn test_structural_violations_split_by_kind() {
        let report = check_structure(&doc("[A]\nk=1\nk=2\n[A]\nbad\n=x\n"));

        assert_eq!(report.checks(), &Check::STRUCTURAL);
        assert_eq!(report.violations_for(Check::NoDuplicateSections).count(), 1);
        assert_eq!(report.violations_for(Check::NoDuplicateKeys).count(), 1);
        assert_eq!(report.violations_for(Check::NoInvalidLines).count(), 2);
    }

    #[test]
    fn test_warn_policy_ignores_structural() {
        let report = evaluate(
            &doc("[General]\nPingInterval=500\nPingInterval=1\n"),
            &ping_schema(),
        );

        assert!(!report.is_empty());
        assert!(!report.is_pass(DiagnosticPolicy::Error));
        assert!(report.is_pass(DiagnosticPolicy::Warn));
    }

    #[test]
    fn test_warn_policy_still_fails_schema_violations() {
        let report = evaluate(&doc("[General]\nPingInterval=1\n"), &ping_schema());
        assert!(!report.is_pass(DiagnosticPolicy::Warn));
    }

    #[test]
    fn test_violation_messages() {
        let v = Violation::MissingParameter {
            section: "Watchdog".to_string(),
            param: "MaxMemory".to_string(),
        };
        assert_eq!(v.to_string(), "Parameter MaxMemory missing in section [Watchdog]");

        let v = Violation::MissingSection {
            section: "General".to_string(),
        };
        assert_eq!(v.to_string(), "Missing required section [General]");
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: DiagnosticPolicy,
        }
        let w: Wrapper = toml::from_str("policy = \"warn\"").unwrap();
        assert_eq!(w.policy, DiagnosticPolicy::Warn);
    }
}
