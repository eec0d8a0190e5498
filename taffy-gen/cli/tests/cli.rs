use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn taffy_gen_cmd() -> Command {
    let mut cmd = Command::cargo_bin("taffy-gen").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// A source directory holding one routable component and one broken one.
fn source_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("tickets.cfc"),
        r#"<cfcomponent extends="taffy.core.resource" taffy_uri="/app/{companyId}/sd/tickets">
    <cffunction name="get" access="public" output="false">
        <cfargument name="companyId" type="numeric" required="true" />
        <cfargument name="status" type="string" required="false" />
    </cffunction>
</cfcomponent>"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("broken.cfc"),
        "<cfcomponent taffy_uri=\"/broken\">\n<cffunction name=\"get\" access=\"public\">\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_help_flag() {
    taffy_gen_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("TypeScript client"))
        .stdout(predicate::str::contains("--exclude"));
}

#[test]
fn test_version_flag() {
    taffy_gen_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("taffy-gen"));
}

#[test]
fn test_missing_arguments() {
    taffy_gen_cmd().assert().failure();
}

#[test]
fn test_missing_service_name() {
    let src = source_dir();
    let out = TempDir::new().unwrap();

    taffy_gen_cmd()
        .arg(src.path())
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("MissingServiceName"));
}

#[test]
fn test_writes_both_files() {
    let src = source_dir();
    let out = TempDir::new().unwrap();
    let out_dir = out.path().join("generated");

    taffy_gen_cmd()
        .arg(src.path())
        .arg(&out_dir)
        .arg("HelpdeskApi")
        .assert()
        .success()
        .stderr(predicate::str::contains("generated 1 endpoint(s) for HelpdeskApi"))
        .stderr(predicate::str::contains("failed broken"));

    let client = fs::read_to_string(out_dir.join("taffy-typescript-client.ts")).unwrap();
    assert!(client.contains(r#"this.tickets = create<TResult>(transport, "/app/{companyId}/sd/tickets");"#));

    let interfaces =
        fs::read_to_string(out_dir.join("taffy-typescript-client-interfaces.ts")).unwrap();
    assert!(interfaces.contains("doGet: (data?: { status?: string }, options?: any) => TResult;"));
}

#[test]
fn test_strict_fails_on_broken_component() {
    let src = source_dir();
    let out = TempDir::new().unwrap();

    taffy_gen_cmd()
        .arg(src.path())
        .arg(out.path())
        .arg("HelpdeskApi")
        .arg("--strict")
        .assert()
        .failure();

    // Artifacts are still written for the components that succeeded.
    assert!(out.path().join("taffy-typescript-client.ts").exists());
}

#[test]
fn test_dry_run_prints_instead_of_writing() {
    let src = source_dir();
    let out = TempDir::new().unwrap();
    let out_dir = out.path().join("generated");

    taffy_gen_cmd()
        .arg(src.path())
        .arg(&out_dir)
        .arg("HelpdeskApi")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("// ==> taffy-typescript-client.ts <=="))
        .stdout(predicate::str::contains("export class HelpdeskApi<TResult> {"));

    assert!(!out_dir.exists());
}

#[test]
fn test_exclude_flag() {
    let src = source_dir();
    let out = TempDir::new().unwrap();

    taffy_gen_cmd()
        .arg(src.path())
        .arg(out.path())
        .arg("HelpdeskApi")
        .args(["--exclude", "tickets", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "readonly tickets: Interfaces.TaffyResourceFactory<TResult>;",
        ))
        .stdout(predicate::str::contains("export interface tickets<TResult>").not());
}

#[test]
fn test_config_file_supplies_service_name() {
    let src = source_dir();
    let out = TempDir::new().unwrap();
    let config: PathBuf = out.path().join("taffy-gen.toml");
    fs::write(
        &config,
        "service_name = \"FromConfig\"\nclient_file = \"api.ts\"\n",
    )
    .unwrap();

    taffy_gen_cmd()
        .arg(src.path())
        .arg(out.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let client = fs::read_to_string(out.path().join("api.ts")).unwrap();
    assert!(client.contains("export class FromConfig<TResult> {"));
}

#[test]
fn test_json_summary() {
    let src = source_dir();
    let out = TempDir::new().unwrap();

    taffy_gen_cmd()
        .arg(src.path())
        .arg(out.path())
        .arg("HelpdeskApi")
        .arg("--json")
        .assert()
        .success()
        .stderr(predicate::str::contains(r#""service_name":"HelpdeskApi""#))
        .stderr(predicate::str::contains(r#""endpoints":["tickets"]"#));
}

#[test]
fn test_missing_source_directory() {
    let out = TempDir::new().unwrap();

    taffy_gen_cmd()
        .arg(out.path().join("absent"))
        .arg(out.path())
        .arg("HelpdeskApi")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ListError"));
}
