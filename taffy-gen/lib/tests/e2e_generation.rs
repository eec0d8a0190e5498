//! End-to-end tests: generate the client for the fixture resources and
//! inspect the written artifacts.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use taffy_gen_lib::config::GeneratorConfig;
use taffy_gen_lib::output::generate_and_write;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config() -> GeneratorConfig {
    GeneratorConfig::default().with_service_name(Some("HelpdeskApi".to_string()))
}

#[tokio::test]
async fn fixture_directory_report() {
    let out = TempDir::new().expect("Failed to create temp directory");

    let output = generate_and_write(&config(), &fixtures(), out.path(), false)
        .await
        .expect("generation should succeed");
    let report = output.report;

    assert_eq!(report.endpoints, vec!["comments", "presences", "stats"]);
    assert_eq!(report.unroutable, vec!["baseResource"]);

    let failed: Vec<_> = report.failures.iter().map(|f| f.endpoint.as_str()).collect();
    assert_eq!(failed, vec!["broken", "reports"]);
    assert!(report.failures[1].error.contains("query"));

    assert!(report.write_failures.is_empty());
    assert_eq!(report.written.len(), 2);
}

#[tokio::test]
async fn one_registration_per_routable_endpoint() {
    let out = TempDir::new().expect("Failed to create temp directory");
    generate_and_write(&config(), &fixtures(), out.path(), false)
        .await
        .expect("generation should succeed");

    let client = fs::read_to_string(out.path().join("taffy-typescript-client.ts")).unwrap();

    assert!(client.contains(r#"this.stats = create<TResult>(transport, "/admin/sd/stats");"#));
    assert!(client.contains(
        r#"this.comments = create<TResult>(transport, "/app/{companyId}/sd/tickets/{ticketId}/comments");"#
    ));
    assert!(client.contains(
        r#"this.presences = create<TResult>(transport, "/app/{companyId}/em/users/{userId}/presences/{date}");"#
    ));
    assert_eq!(client.matches("= create<TResult>(transport,").count(), 3);
    assert!(!client.contains("baseResource"));
    assert!(!client.contains("broken"));
    assert!(client.contains("import * as Interfaces from \"./taffy-typescript-client-interfaces\";"));
    assert!(client.contains("export class HelpdeskApi<TResult> {"));
}

#[tokio::test]
async fn declarations_follow_argument_metadata() {
    let out = TempDir::new().expect("Failed to create temp directory");
    generate_and_write(&config(), &fixtures(), out.path(), false)
        .await
        .expect("generation should succeed");

    let interfaces =
        fs::read_to_string(out.path().join("taffy-typescript-client-interfaces.ts")).unwrap();

    let expected_presences = "\
export interface presences<TResult> {
    (companyId: string | number, userId: string | number, date: string | number): {
        doGet: (data?: {}, options?: any) => TResult;
        doPut: (data?: { status: string; note?: string }, options?: any) => TResult;
        doPatch: (data?: { status?: string; meta?: Object }, options?: any) => TResult;
        doDelete: (data?: {}, options?: any) => TResult;
        url: string;
    };
}
";
    assert!(interfaces.contains(expected_presences), "{interfaces}");

    assert!(interfaces.contains(
        "doGet: (data?: { page?: number; since?: string }, options?: any) => TResult;"
    ));
    assert!(interfaces.contains(
        "doPost: (data?: { body: string; internal?: boolean; attachments?: any[] }, options?: any) => TResult;"
    ));
    assert!(!interfaces.contains("doValidateBody"));

    assert!(interfaces.contains("export interface stats<TResult> {\n    (): {"));
    assert!(interfaces.contains("export interface TaffyHttpClientProvider<TResult> {"));
}

#[tokio::test]
async fn excluded_endpoint_is_callable_but_untyped() {
    let out = TempDir::new().expect("Failed to create temp directory");
    let config = config().with_excluded(["stats"]);

    let output = generate_and_write(&config, &fixtures(), out.path(), false)
        .await
        .expect("generation should succeed");

    assert_eq!(output.report.untyped, vec!["stats"]);
    assert!(!output.artifacts.interfaces.contains("export interface stats<TResult>"));
    assert!(output.artifacts.client.contains("readonly stats: Interfaces.TaffyResourceFactory<TResult>;"));
    assert!(output.artifacts.client.contains("this.stats = create<TResult>"));
}

#[tokio::test]
async fn output_is_reproducible() {
    let first = generate_and_write(&config(), &fixtures(), Path::new("unused"), true)
        .await
        .unwrap();
    let second = generate_and_write(&config(), &fixtures(), Path::new("unused"), true)
        .await
        .unwrap();

    assert_eq!(first.artifacts, second.artifacts);
}

#[tokio::test]
async fn custom_output_file_names() {
    let out = TempDir::new().expect("Failed to create temp directory");
    let config = GeneratorConfig {
        interfaces_file: "helpdesk.d.ts".to_string(),
        client_file: "helpdesk.ts".to_string(),
        ..config()
    };

    generate_and_write(&config, &fixtures(), out.path(), false)
        .await
        .expect("generation should succeed");

    let client = fs::read_to_string(out.path().join("helpdesk.ts")).unwrap();
    assert!(client.contains("import * as Interfaces from \"./helpdesk\";"));
    assert!(out.path().join("helpdesk.d.ts").exists());
}

/// Type-checks the generated files with the TypeScript compiler.
#[tokio::test]
#[ignore = "slow: requires tsc on PATH"]
async fn generated_client_type_checks() {
    let out = TempDir::new().expect("Failed to create temp directory");
    generate_and_write(&config(), &fixtures(), out.path(), false)
        .await
        .expect("generation should succeed");

    let output = Command::new("tsc")
        .args(["--noEmit", "--strict", "--target", "es2017"])
        .arg(out.path().join("taffy-typescript-client.ts"))
        .output()
        .expect("Failed to run tsc");

    if !output.status.success() {
        panic!(
            "Generated client failed to type-check:\n\n{}",
            String::from_utf8_lossy(&output.stdout)
        );
    }
}
