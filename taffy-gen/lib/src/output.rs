//! Artifact assembly and file output.
//!
//! This module turns the per-endpoint text from [`crate::pipeline`] into
//! the two TypeScript artifacts and writes them to disk.
//!
//! ## Generated Files
//!
//! - **interfaces file** - transport and resource declarations followed by
//!   one interface per typed endpoint
//! - **client file** - the service class with one field and one
//!   registration per endpoint, followed by the shared runtime
//!
//! ## Features
//!
//! - **Stable order**: endpoints appear in source listing order
//! - **Atomic writes**: temp file + rename, so readers never see half a file
//! - **Non-fatal write errors**: a failed artifact is logged and recorded;
//!   the other artifact is still written
//! - **Dry run**: artifacts are returned without touching the filesystem

use std::fs;
use std::path::Path;

use tracing::{error, info};

use crate::codegen::{render_resource_types, render_runtime, render_transport_declaration, string_literal};
use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::pipeline::{EndpointOutput, GenerationReport, WriteFailure, run};

/// First line of every generated file.
pub const GENERATED_HEADER: &str =
    "// This code was automatically generated by taffy-gen. Do not edit manually.";

/// The two generated TypeScript sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub interfaces: String,
    pub client: String,
}

/// Artifacts and report of a full run.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub artifacts: Artifacts,
    pub report: GenerationReport,
}

/// Assembles the interfaces file.
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::output::assemble_interfaces;
///
/// let ts = assemble_interfaces(&[]);
/// assert!(ts.starts_with("// This code was automatically generated"));
/// assert!(ts.contains("export interface TaffyHttpClientProvider<TResult> {"));
/// ```
pub fn assemble_interfaces(outputs: &[EndpointOutput]) -> String {
    let mut sections = vec![
        GENERATED_HEADER.to_string(),
        render_transport_declaration(),
        render_resource_types(),
    ];

    sections.extend(
        outputs
            .iter()
            .filter(|output| !output.declaration.is_empty())
            .map(|output| output.declaration.clone()),
    );

    let mut out = sections.join("\n");
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Assembles the client file: the service class plus the runtime.
///
/// `interfaces_module` is the specifier used to import the interfaces file.
pub fn assemble_client(
    service_name: &str,
    interfaces_module: &str,
    outputs: &[EndpointOutput],
) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n");
    out.push_str(&format!(
        "import * as Interfaces from {};\n\n",
        string_literal(interfaces_module)
    ));

    out.push_str(&format!("export class {service_name}<TResult> {{\n"));

    let routable: Vec<&EndpointOutput> = outputs.iter().filter(|o| !o.is_empty()).collect();
    for output in &routable {
        out.push_str(&format!("    {}\n", output.field));
    }
    if !routable.is_empty() {
        out.push('\n');
    }

    out.push_str(
        "    constructor(protected readonly transport: Interfaces.TaffyHttpClientProvider<TResult>) {\n",
    );
    for output in &routable {
        out.push_str(&format!("        {}\n", output.registration));
    }
    out.push_str("    }\n");
    out.push_str("}\n\n");

    out.push_str(&render_runtime());
    out
}

/// Assembles both artifacts for a finished pipeline run.
pub fn assemble(config: &GeneratorConfig, service_name: &str, outputs: &[EndpointOutput]) -> Artifacts {
    Artifacts {
        interfaces: assemble_interfaces(outputs),
        client: assemble_client(service_name, &config.interfaces_module(), outputs),
    }
}

/// Writes content to a file atomically using temp file + rename.
///
/// Creates parent directories if they don't exist; an existing directory
/// is fine.
///
/// ## Errors
///
/// Returns [`GeneratorError::WriteError`] if a directory cannot be
/// created, the temp file cannot be written, or the rename fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        GeneratorError::WriteError {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    Ok(())
}

/// Writes both artifacts into `out_dir`, recording results in `report`.
///
/// The directory is created once up front. A failed write is logged and
/// recorded; the remaining artifact is still attempted.
pub fn write_artifacts(
    out_dir: &Path,
    config: &GeneratorConfig,
    artifacts: &Artifacts,
    report: &mut GenerationReport,
) {
    let targets = [
        (out_dir.join(&config.interfaces_file), &artifacts.interfaces),
        (out_dir.join(&config.client_file), &artifacts.client),
    ];

    if let Err(e) = fs::create_dir_all(out_dir) {
        error!(dir = %out_dir.display(), error = %e, "failed to create output directory");
        for (path, _) in targets {
            report.write_failures.push(WriteFailure {
                path,
                error: e.to_string(),
            });
        }
        return;
    }

    for (path, content) in targets {
        match write_atomic(&path, content) {
            Ok(()) => {
                info!(path = %path.display(), bytes = content.len(), "wrote artifact");
                report.written.push(path);
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to write artifact");
                report.write_failures.push(WriteFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Generates the client for `src_dir` and writes it to `out_dir`.
///
/// With `dry_run`, nothing is written and the artifacts are only returned.
///
/// ## Errors
///
/// Only run-level failures (invalid configuration, unreadable source
/// directory) are errors; see [`crate::pipeline::run`].
pub async fn generate_and_write(
    config: &GeneratorConfig,
    src_dir: &Path,
    out_dir: &Path,
    dry_run: bool,
) -> Result<GenerationOutput, GeneratorError> {
    let generation = run(config, src_dir).await?;
    let mut report = generation.report;
    let artifacts = assemble(config, &report.service_name, &generation.outputs);

    if !dry_run {
        write_artifacts(out_dir, config, &artifacts, &mut report);
    }

    Ok(GenerationOutput { artifacts, report })
}
