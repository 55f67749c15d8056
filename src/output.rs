use std::fmt::Write as _;
use std::path::Path;

use crate::colors::Colors;
use crate::loader::LoadError;
use crate::schema::{DiagnosticPolicy, Report};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Normal,
    Quiet,
}

pub struct OutputContext {
    pub mode: OutputMode,
    pub colors: Colors,
    pub verbose: bool,
    pub show_progress: bool,
}

impl OutputContext {
    pub fn new(mode: OutputMode, use_colors: bool, verbose: bool, show_progress: bool) -> Self {
        Self {
            mode,
            colors: Colors::new(use_colors),
            verbose,
            show_progress,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub files_checked: usize,
    pub files_failed: usize,
    pub load_errors: usize,
    pub violations: usize,
    pub warnings: usize,
}

impl RunResult {
    pub fn has_problems(&self) -> bool {
        self.files_failed > 0
    }

    /// Fold one evaluated file into the totals.
    pub(crate) fn record(&mut self, report: &Report, policy: DiagnosticPolicy) {
        self.files_checked += 1;
        let fatal = report
            .violations()
            .iter()
            .filter(|v| v.is_fatal(policy))
            .count();
        self.violations += fatal;
        self.warnings += report.violations().len() - fatal;
        if fatal > 0 {
            self.files_failed += 1;
        }
    }

    pub(crate) fn record_load_error(&mut self) {
        self.files_checked += 1;
        self.files_failed += 1;
        self.load_errors += 1;
    }
}

/// Render the report for one file. `None` when there is nothing to show.
pub fn format_report(
    path: &Path,
    report: &Report,
    policy: DiagnosticPolicy,
    ctx: &OutputContext,
) -> Option<String> {
    let passed = report.is_pass(policy);
    let colors = &ctx.colors;

    if ctx.mode == OutputMode::Quiet {
        return (!passed).then(|| path.display().to_string());
    }

    let header = if !passed {
        colors.paint(colors.fail, "FAIL")
    } else if !report.is_empty() {
        colors.paint(colors.warning, "WARN")
    } else if ctx.verbose {
        colors.paint(colors.pass, "PASS")
    } else {
        return None;
    };

    let mut out = format!("{header} {}", path.display());
    for check in report.failed_checks() {
        for violation in report.violations_for(check) {
            let label = if violation.is_fatal(policy) {
                colors.paint(colors.check, check.name())
            } else {
                colors.paint(colors.warning, &format!("{} (warning)", check.name()))
            };
            let _ = write!(out, "\n  {label}: {violation}");
        }
    }
    Some(out)
}

/// The `Error:` line written to stderr for a file that could not be loaded.
pub fn format_load_error(err: &LoadError, ctx: &OutputContext) -> String {
    format!("{}Error:{} {err}", ctx.colors.fail, ctx.colors.reset())
}

pub fn format_summary(result: &RunResult, ctx: &OutputContext) -> Option<String> {
    if ctx.mode == OutputMode::Quiet {
        return None;
    }

    let colors = &ctx.colors;
    let mut parts = vec![format!("{} files checked", result.files_checked)];
    if result.files_failed > 0 {
        parts.push(colors.paint(colors.fail, &format!("{} failed", result.files_failed)));
    }
    if result.warnings > 0 {
        parts.push(colors.paint(colors.warning, &format!("{} warnings", result.warnings)));
    }
    Some(parts.join(", "))
}
