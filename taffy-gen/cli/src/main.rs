//! Command line front-end for the Taffy TypeScript client generator.
//!
//! ```text
//! taffy-gen <SRC_DIR> <OUT_DIR> [SERVICE_NAME] [--exclude NAME]... [--config FILE]
//! ```

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use owo_colors::{OwoColorize, Style};
use taffy_gen_lib::config::GeneratorConfig;
use taffy_gen_lib::error::{ConfigError, GeneratorError};
use taffy_gen_lib::output::{Artifacts, generate_and_write};
use taffy_gen_lib::pipeline::GenerationReport;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Generate a TypeScript client from Taffy resource components
#[derive(Parser, Debug)]
#[command(name = "taffy-gen", version, about)]
struct Cli {
    /// Directory containing the resource components (*.cfc)
    src_dir: PathBuf,

    /// Directory the TypeScript files are written to
    out_dir: PathBuf,

    /// Name of the generated service class (required unless set in --config)
    service_name: Option<String>,

    /// Endpoint to register without a type declaration (repeatable)
    #[arg(short, long, value_name = "ENDPOINT", value_delimiter = ',')]
    exclude: Vec<String>,

    /// TOML file with generator settings; command line values win
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the generated files instead of writing them
    #[arg(long)]
    dry_run: bool,

    /// Exit with a non-zero status when any component fails
    #[arg(long)]
    strict: bool,

    /// Emit logs and the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write to the terminal: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize the run summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Initialize tracing subscriber based on verbosity level and output format.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,taffy_gen_lib=info".to_string(),
            2 => "info,taffy_gen_lib=debug".to_string(),
            _ => "debug,taffy_gen_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(verbose >= 2)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

/// Loads the config file, if any, and applies command line overrides.
fn build_config(cli: &Cli) -> Result<GeneratorConfig, ConfigError> {
    let config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };

    Ok(config
        .with_service_name(cli.service_name.clone())
        .with_excluded(cli.exclude.iter().cloned()))
}

fn print_artifacts(config: &GeneratorConfig, artifacts: &Artifacts) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "// ==> {} <==", config.interfaces_file)?;
    write!(stdout, "{}", artifacts.interfaces)?;
    writeln!(stdout)?;
    writeln!(stdout, "// ==> {} <==", config.client_file)?;
    write!(stdout, "{}", artifacts.client)?;
    stdout.flush()
}

fn print_summary(report: &GenerationReport, dry_run: bool) -> std::io::Result<()> {
    let use_colors = std::env::var("NO_COLOR").is_err() && std::io::stderr().is_terminal();
    let paint = |text: &str, style: Style| {
        if use_colors {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    };

    let mut stderr = std::io::stderr().lock();

    writeln!(
        stderr,
        "{} {} endpoint(s) for {}",
        paint("generated", Style::new().green().bold()),
        report.endpoints.len(),
        paint(report.service_name.as_str(), Style::new().bold()),
    )?;

    if !report.untyped.is_empty() {
        writeln!(stderr, "  untyped: {}", report.untyped.join(", "))?;
    }
    if !report.unroutable.is_empty() {
        writeln!(
            stderr,
            "  {} {}",
            paint("no URI:", Style::new().dimmed()),
            report.unroutable.join(", ")
        )?;
    }

    for failure in &report.failures {
        writeln!(
            stderr,
            "{} {}: {}",
            paint("failed", Style::new().red().bold()),
            failure.endpoint,
            failure.error
        )?;
    }

    for path in &report.written {
        writeln!(stderr, "  wrote {}", path.display())?;
    }
    for failure in &report.write_failures {
        writeln!(
            stderr,
            "{} {}: {}",
            paint("not written", Style::new().red().bold()),
            failure.path.display(),
            failure.error
        )?;
    }

    if dry_run {
        writeln!(stderr, "  {}", paint("dry run, nothing written", Style::new().yellow()))?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    let config = build_config(&cli)?;
    debug!(?config, "resolved configuration");

    let output = generate_and_write(&config, &cli.src_dir, &cli.out_dir, cli.dry_run).await?;

    if cli.dry_run {
        print_artifacts(&config, &output.artifacts)?;
    }

    if cli.json {
        eprintln!("{}", serde_json::to_string(&output.report)?);
    } else {
        print_summary(&output.report, cli.dry_run)?;
    }

    if cli.strict && output.report.has_failures() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
