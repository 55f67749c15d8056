pub mod colors;
pub mod config;
pub mod document;
pub mod loader;
pub mod logging;
mod output;
pub mod progress;
pub mod schema;
pub mod walker;

pub use colors::{should_use_colors, Colors};
pub use config::{
    find_config_file, generate_init_file, load_config, merge_run_settings, CliRunOptions,
    ConfigError, InicheckToml, RunSettings, INICHECK_TOML_TEMPLATE,
};
pub use document::{ConfigDocument, Diagnostic, DiagnosticKind, Section, Sections};
pub use loader::{
    config_path_from_env, load_document, LoadError, LoaderConfig, CONFIG_PATH_ENV,
    DEFAULT_CONFIG_PATH,
};
pub use output::{OutputContext, OutputMode, RunResult};
pub use progress::ProgressReporter;
pub use schema::{check_structure, evaluate, Check, DiagnosticPolicy, Predicate, Report, Schema};
pub use walker::walk_paths;

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Main entry point: load and check every target.
///
/// With no explicit paths the loader's default path is checked. Load
/// failures are reported per file and never stop the run.
pub fn run(
    settings: &RunSettings,
    schema: Option<&Schema>,
    ctx: &OutputContext,
) -> io::Result<RunResult> {
    let mut result = RunResult::default();

    let targets: Vec<PathBuf> = if settings.paths.is_empty() {
        info!(
            path = %settings.loader.default_path.display(),
            "no paths given, using default"
        );
        vec![settings.loader.default_path.clone()]
    } else {
        walk_paths(&settings.paths).collect::<io::Result<_>>()?
    };

    let progress = ProgressReporter::new(targets.len() as u64, ctx.show_progress);

    for path in &targets {
        let loaded = if settings.paths.is_empty() {
            settings.loader.load(None)
        } else {
            load_document(path)
        };

        match loaded {
            Ok(document) => check_document(
                &document,
                schema,
                settings.policy,
                &mut result,
                ctx,
                &progress,
            ),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "load failed");
                result.record_load_error();
                match ctx.mode {
                    OutputMode::Quiet => progress.println(&path.display().to_string()),
                    OutputMode::Normal => {
                        progress.eprintln(&output::format_load_error(&err, ctx))
                    }
                }
            }
        }

        progress.advance(&file_label(path));
    }

    progress.finish();

    if let Some(summary) = output::format_summary(&result, ctx) {
        println!("{summary}");
    }

    Ok(result)
}

fn check_document(
    document: &ConfigDocument,
    schema: Option<&Schema>,
    policy: DiagnosticPolicy,
    result: &mut RunResult,
    ctx: &OutputContext,
    progress: &ProgressReporter,
) {
    let report = match schema {
        Some(schema) => evaluate(document, schema),
        None => check_structure(document),
    };
    debug!(
        path = %document.source_path().display(),
        violations = report.violations().len(),
        "evaluated"
    );

    result.record(&report, policy);
    if let Some(text) = output::format_report(document.source_path(), &report, policy, ctx) {
        progress.println(&text);
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
