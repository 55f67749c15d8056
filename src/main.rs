use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use inicheck::logging::{init_logging, LogLevel};
use inicheck::{
    config_path_from_env, find_config_file, generate_init_file, load_config, merge_run_settings,
    run, should_use_colors, CliRunOptions, InicheckToml, OutputContext, OutputMode, Schema,
};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "inicheck")]
#[command(
    version,
    about = "Check INI configuration files for structural problems and schema conformance"
)]
struct Cli {
    /// INI files or directories to check (default: $CONFIG_PATH or [settings].default_path)
    paths: Vec<PathBuf>,

    /// Specify config file path (overrides auto-discovery)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Only run structural checks, ignoring any [schema.*] tables
    #[arg(long)]
    no_schema: bool,

    /// Report duplicates and invalid lines without failing
    #[arg(long)]
    warn_diagnostics: bool,

    /// Output only the paths of failing files
    #[arg(short, long)]
    quiet: bool,

    /// Also list files that pass
    #[arg(short, long)]
    verbose: bool,

    /// Force colored output
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log level for diagnostics on stderr
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Generate a template inicheck.toml configuration file
    #[arg(long)]
    init: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    if cli.init {
        return handle_init();
    }

    let toml_config = match load_configuration(cli.config.as_ref(), cli.quiet) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("Error: {message}");
            return ExitCode::from(1);
        }
    };

    let schema = if cli.no_schema {
        None
    } else {
        match compile_schema(toml_config.as_ref()) {
            Ok(schema) => schema,
            Err(message) => {
                eprintln!("Error: {message}");
                return ExitCode::from(1);
            }
        }
    };

    // The environment is read once here and handed down explicitly
    let env_path = config_path_from_env();
    let cli_options = CliRunOptions {
        paths: cli.paths.clone(),
        warn_diagnostics: cli.warn_diagnostics.then_some(true),
    };
    let settings = merge_run_settings(
        &cli_options,
        env_path,
        toml_config.as_ref().map(|c| &c.settings),
    );

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let ctx = OutputContext::new(
        output_mode,
        should_use_colors(cli.color, cli.no_color),
        cli.verbose,
        !cli.quiet,
    );

    match run(&settings, schema.as_ref(), &ctx) {
        Ok(result) => {
            if result.has_problems() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn handle_init() -> ExitCode {
    match generate_init_file() {
        Ok(path) => {
            println!("Created {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// An explicit `--config` that fails to load is fatal; a discovered one
/// only produces a warning.
fn load_configuration(
    explicit_path: Option<&PathBuf>,
    quiet: bool,
) -> Result<Option<InicheckToml>, String> {
    if let Some(path) = explicit_path {
        return load_config(path)
            .map(Some)
            .map_err(|e| format!("failed to load {}: {e}", path.display()));
    }

    let discovered = std::env::current_dir()
        .ok()
        .and_then(|d| find_config_file(&d));

    Ok(discovered.and_then(|p| match load_config(&p) {
        Ok(config) => {
            if !quiet {
                eprintln!("Using config: {}", p.display());
            }
            info!(path = %p.display(), "loaded config file");
            Some(config)
        }
        Err(e) => {
            debug!(path = %p.display(), error = %e, "ignoring config file");
            eprintln!("Warning: Failed to load {}: {}", p.display(), e);
            None
        }
    }))
}

fn compile_schema(config: Option<&InicheckToml>) -> Result<Option<Schema>, String> {
    match config {
        Some(config) => config.compile_schema().map_err(|e| e.to_string()),
        None => Ok(None),
    }
}
