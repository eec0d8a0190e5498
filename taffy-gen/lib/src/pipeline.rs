//! Per-file generation and the fan-out across a source directory.
//!
//! Each source file goes through the same four stages on its own task:
//!
//! 1. **Filter** - keep only declaration lines ([`filter_declarations`])
//! 2. **Parse** - build the element tree ([`parse_markup`])
//! 3. **Extract** - derive the [`Endpoint`] ([`extract_endpoint`])
//! 4. **Emit** - render the declaration, field, and registration text
//!
//! A failure in any stage is recorded against that file and never stops
//! its siblings. Results are gathered in sorted listing order so that the
//! assembled artifacts are reproducible.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::codegen::{EmitOptions, render_declaration, render_field, render_registration};
use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use crate::extract::extract_endpoint;
use crate::model::Endpoint;
use crate::naming::endpoint_name;
use crate::prefilter::filter_declarations;
use crate::tree::parse_markup;

/// A source file scheduled for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Endpoint name derived from the file stem.
    pub name: String,
    pub path: PathBuf,
}

/// Text contributed by one source file.
///
/// All three strings are empty for a component without a URI template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointOutput {
    pub name: String,
    pub endpoint: Option<Endpoint>,
    /// Interface declaration; also empty for excluded endpoints.
    pub declaration: String,
    /// Field declaration on the service class.
    pub field: String,
    /// Constructor line binding the endpoint to its URI template.
    pub registration: String,
}

impl EndpointOutput {
    fn unroutable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Whether the component contributed nothing to the client.
    pub fn is_empty(&self) -> bool {
        self.registration.is_empty()
    }
}

/// A source file that could not be turned into an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub endpoint: String,
    pub path: PathBuf,
    pub error: String,
}

/// An artifact that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Summary of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub service_name: String,
    /// Endpoints registered on the client, in output order.
    pub endpoints: Vec<String>,
    /// Endpoints registered without a type declaration.
    pub untyped: Vec<String>,
    /// Components skipped because they declare no URI template.
    pub unroutable: Vec<String>,
    pub failures: Vec<FileFailure>,
    pub written: Vec<PathBuf>,
    pub write_failures: Vec<WriteFailure>,
}

impl GenerationReport {
    /// Whether any file or artifact failed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty() || !self.write_failures.is_empty()
    }
}

/// Everything produced by [`run`]: per-endpoint text plus the report.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    pub outputs: Vec<EndpointOutput>,
    pub report: GenerationReport,
}

/// Runs the four stages on one component's source text.
///
/// `typed` controls whether a declaration is rendered; excluded endpoints
/// still get a field and a registration.
///
/// ## Errors
///
/// - [`GeneratorError::Parse`] when the filtered markup is malformed
/// - [`GeneratorError::Extract`] for a missing component or an unknown argument type
///
/// ## Examples
///
/// ```
/// use taffy_gen_lib::codegen::EmitOptions;
/// use taffy_gen_lib::pipeline::generate_unit;
///
/// let source = r#"<cfcomponent extends="taffy.core.resource" taffy_uri="/admin/sd/stats">
///     <cffunction name="get" access="public" output="false">
///         <cfset var stats = getStats() />
///         <cfreturn representationOf(stats) />
///     </cffunction>
/// </cfcomponent>"#;
///
/// let output = generate_unit(source, "stats", true, EmitOptions::default()).unwrap();
/// assert_eq!(
///     output.registration,
///     r#"this.stats = create<TResult>(transport, "/admin/sd/stats");"#
/// );
/// assert!(output.declaration.contains("doGet: (data?: {}, options?: any) => TResult;"));
/// ```
#[instrument(skip_all, fields(endpoint = %name))]
pub fn generate_unit(
    source: &str,
    name: &str,
    typed: bool,
    options: EmitOptions,
) -> Result<EndpointOutput, GeneratorError> {
    let filtered = filter_declarations(source);
    let document = parse_markup(&filtered)?;

    let Some(endpoint) = extract_endpoint(&document, name)? else {
        debug!("component declares no URI template, skipping");
        return Ok(EndpointOutput::unroutable(name));
    };

    let declaration = if typed {
        render_declaration(&endpoint, options)
    } else {
        String::new()
    };

    info!(
        uri = %endpoint.uri_template,
        operations = endpoint.operations.len(),
        typed,
        "generated endpoint"
    );

    Ok(EndpointOutput {
        name: name.to_string(),
        field: render_field(&endpoint, typed),
        registration: render_registration(&endpoint),
        declaration,
        endpoint: Some(endpoint),
    })
}

/// Lists the source files directly inside `src_dir`.
///
/// Hidden files, directories, and files without one of the configured
/// extensions are skipped. The listing is sorted by file name.
///
/// ## Errors
///
/// Returns [`GeneratorError::ListError`] when the directory cannot be read.
pub fn list_sources(src_dir: &Path, config: &GeneratorConfig) -> Result<Vec<SourceFile>, GeneratorError> {
    let mut sources = Vec::new();

    for entry in WalkDir::new(src_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| GeneratorError::ListError {
            path: src_dir.to_path_buf(),
            source: e,
        })?;

        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !entry.file_type().is_file() || !config.accepts(entry.path()) {
            continue;
        }

        sources.push(SourceFile {
            name: endpoint_name(entry.path()),
            path: entry.into_path(),
        });
    }

    Ok(sources)
}

/// Generates every component in `src_dir`.
///
/// One task per source file; results come back in listing order.
///
/// ## Errors
///
/// Only run-level problems are errors: an invalid configuration or an
/// unreadable source directory. Per-file problems land in
/// [`GenerationReport::failures`].
pub async fn run(config: &GeneratorConfig, src_dir: &Path) -> Result<Generation, GeneratorError> {
    let service_name = config.validate()?.to_string();
    let sources = list_sources(src_dir, config)?;
    let options = config.emit_options();

    info!(
        src = %src_dir.display(),
        files = sources.len(),
        "generating endpoints"
    );

    let mut report = GenerationReport {
        service_name,
        ..GenerationReport::default()
    };

    let (sources, duplicates) = partition_duplicates(sources);
    for failure in duplicates {
        warn!(error = %failure.error, "skipping source file");
        report.failures.push(failure);
    }

    let tasks = sources.iter().map(|source| {
        let name = source.name.clone();
        let path = source.path.clone();
        let typed = !config.is_excluded(&name);

        tokio::spawn(async move {
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| GeneratorError::ReadError {
                    path: path.clone(),
                    source: e,
                })?;
            generate_unit(&content, &name, typed, options)
        })
    });

    let results = join_all(tasks).await;

    let mut outputs = Vec::new();
    for (source, result) in sources.into_iter().zip(results) {
        let result = result.unwrap_or_else(|e| {
            Err(GeneratorError::TaskFailed {
                endpoint: source.name.clone(),
                reason: e.to_string(),
            })
        });

        match result {
            Ok(output) if output.is_empty() => report.unroutable.push(output.name),
            Ok(output) => {
                report.endpoints.push(output.name.clone());
                if output.declaration.is_empty() {
                    report.untyped.push(output.name.clone());
                }
                outputs.push(output);
            }
            Err(e) => {
                warn!(
                    endpoint = %source.name,
                    path = %source.path.display(),
                    error = %e,
                    "failed to generate endpoint"
                );
                report.failures.push(FileFailure {
                    endpoint: source.name,
                    path: source.path,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(Generation { outputs, report })
}

/// Keeps the first file for each endpoint name and reports the rest.
fn partition_duplicates(sources: Vec<SourceFile>) -> (Vec<SourceFile>, Vec<FileFailure>) {
    let mut first_seen: HashMap<String, PathBuf> = HashMap::new();
    let mut kept = Vec::new();
    let mut duplicates = Vec::new();

    for source in sources {
        if let Some(first) = first_seen.get(&source.name) {
            let error = GeneratorError::DuplicateEndpoint {
                endpoint: source.name.clone(),
                path: source.path.clone(),
                first: first.clone(),
            };
            duplicates.push(FileFailure {
                endpoint: source.name,
                path: source.path,
                error: error.to_string(),
            });
        } else {
            first_seen.insert(source.name.clone(), source.path.clone());
            kept.push(source);
        }
    }

    (kept, duplicates)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::error::{ExtractError, ParseError};

    const COMMENTS: &str = r#"<cfcomponent extends="taffy.core.resource" taffy_uri="/app/{companyId}/sd/tickets/{ticketId}/comments">
    <cffunction name="get" access="public" output="false">
        <cfargument name="companyId" type="numeric" required="true" />
        <cfargument name="ticketId" type="numeric" required="true" />
        <cfargument name="page" type="numeric" required="false" />
        <cfreturn representationOf(getComments(arguments.ticketId)) />
    </cffunction>
    <cffunction name="post" access="public" output="false">
        <cfargument name="companyId" type="numeric" required="true" />
        <cfargument name="ticketId" type="numeric" required="true" />
        <cfargument name="body" type="string" required="true" />
    </cffunction>
</cfcomponent>"#;

    fn named_config(name: &str) -> GeneratorConfig {
        GeneratorConfig::default().with_service_name(Some(name.to_string()))
    }

    #[test]
    fn unit_emits_all_three_pieces() {
        let output = generate_unit(COMMENTS, "comments", true, EmitOptions::default()).unwrap();

        assert_eq!(output.field, "readonly comments: Interfaces.comments<TResult>;");
        assert!(output.declaration.contains(
            "(companyId: string | number, ticketId: string | number): {"
        ));
        assert!(output.declaration.contains(
            "doGet: (data?: { page?: number }, options?: any) => TResult;"
        ));
        assert!(output.declaration.contains(
            "doPost: (data?: { body: string }, options?: any) => TResult;"
        ));
    }

    #[test]
    fn excluded_unit_has_no_declaration() {
        let output = generate_unit(COMMENTS, "comments", false, EmitOptions::default()).unwrap();
        assert!(output.declaration.is_empty());
        assert!(!output.registration.is_empty());
        assert_eq!(
            output.field,
            "readonly comments: Interfaces.TaffyResourceFactory<TResult>;"
        );
    }

    #[test]
    fn unroutable_unit_is_empty() {
        let source = r#"<cfcomponent output="false">
<cffunction name="helper" access="public"></cffunction>
</cfcomponent>"#;
        let output = generate_unit(source, "helpers", true, EmitOptions::default()).unwrap();
        assert!(output.is_empty());
        assert!(output.declaration.is_empty());
        assert!(output.field.is_empty());
        assert!(output.endpoint.is_none());
    }

    #[test]
    fn unit_reports_parse_errors() {
        let source = "<cfcomponent taffy_uri=\"/x\">\n<cffunction name=\"get\" access=\"public\">\n</cfcomponent>";
        let err = generate_unit(source, "broken", true, EmitOptions::default()).unwrap_err();
        assert!(matches!(err, GeneratorError::Parse(ParseError::MismatchedTag { .. })));
    }

    #[test]
    fn unit_reports_unknown_types() {
        let source = r#"<cfcomponent taffy_uri="/x">
<cffunction name="get" access="public">
<cfargument name="q" type="query" />
</cffunction>
</cfcomponent>"#;
        let err = generate_unit(source, "odd", true, EmitOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::Extract(ExtractError::UnknownArgumentType { .. })
        ));
    }

    #[test]
    fn listing_is_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("zeta.cfc"), "").unwrap();
        fs::write(dir.path().join("alpha.cfc"), "").unwrap();
        fs::write(dir.path().join("Mid.CFC"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden.cfc"), "").unwrap();
        fs::create_dir(dir.path().join("nested.cfc")).unwrap();

        let names: Vec<_> = list_sources(dir.path(), &GeneratorConfig::default())
            .unwrap()
            .into_iter()
            .map(|source| source.name)
            .collect();

        assert_eq!(names, vec!["Mid", "alpha", "zeta"]);
    }

    #[test]
    fn listing_a_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = list_sources(&dir.path().join("absent"), &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, GeneratorError::ListError { .. }));
    }

    #[test]
    fn duplicate_names_keep_the_first_file() {
        let sources = vec![
            SourceFile { name: "a_b".into(), path: "a-b.cfc".into() },
            SourceFile { name: "a_b".into(), path: "a_b.cfc".into() },
            SourceFile { name: "c".into(), path: "c.cfc".into() },
        ];

        let (kept, duplicates) = partition_duplicates(sources);
        assert_eq!(kept.len(), 2);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].path, PathBuf::from("a_b.cfc"));
        assert!(duplicates[0].error.contains("a-b.cfc"));
    }

    #[tokio::test]
    async fn run_isolates_failures() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("comments.cfc"), COMMENTS).unwrap();
        fs::write(dir.path().join("broken.cfc"), "<cfcomponent taffy_uri=\"/b\">\n<cffunction name=\"get\" access=\"public\">").unwrap();
        fs::write(dir.path().join("plain.cfc"), "<cfcomponent></cfcomponent>").unwrap();

        let generation = run(&named_config("Api"), dir.path()).await.unwrap();
        let report = &generation.report;

        assert_eq!(report.service_name, "Api");
        assert_eq!(report.endpoints, vec!["comments"]);
        assert_eq!(report.unroutable, vec!["plain"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].endpoint, "broken");
        assert!(report.has_failures());
        assert_eq!(generation.outputs.len(), 1);
    }

    #[tokio::test]
    async fn run_marks_excluded_endpoints_untyped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("comments.cfc"), COMMENTS).unwrap();

        let config = named_config("Api").with_excluded(["comments"]);
        let generation = run(&config, dir.path()).await.unwrap();

        assert_eq!(generation.report.untyped, vec!["comments"]);
        assert!(generation.outputs[0].declaration.is_empty());
    }

    #[tokio::test]
    async fn run_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let err = run(&GeneratorConfig::default(), dir.path()).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Config(_)));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn failures_are_logged_with_file_identity() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.cfc"), "<cfcomponent taffy_uri=\"/b\">\n<cffunction access=\"public\">").unwrap();

        run(&named_config("Api"), dir.path()).await.unwrap();

        assert!(logs_contain("failed to generate endpoint"));
        assert!(logs_contain("broken"));
    }
}
