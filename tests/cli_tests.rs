#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{write_file, SHOP_MANIFEST};
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(dir: &TempDir, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_postman-gen");
    Command::new(exe)
        .current_dir(dir.path())
        .env_remove("APP_ENV")
        .env_remove("POSTMAN_GENERATOR_TOKEN")
        .env_remove("POSTMAN_GENERATOR_BASE_URL")
        .env("PGEN_LOG_LEVEL", "warn")
        .args(args)
        .output()
        .expect("run cli")
}

#[test]
fn test_cli_generate_writes_collection() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "routes.yaml", SHOP_MANIFEST);

    let output = run(
        &dir,
        &["generate", "--manifest", "routes.yaml", "--output", "out/nested/collection.json"],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let written = fs::read_to_string(dir.path().join("out/nested/collection.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(doc["info"]["name"], "Laravel API");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("successfully generated at: out/nested/collection.json"));
    assert!(stdout.contains("| Total Routes Scanned         | 8     |"));
    assert!(stdout.contains("| Endpoints with Body Examples | 4     |"));
    assert!(stdout.contains("| Endpoints without Body       | 4     |"));
}

#[test]
fn test_cli_default_output_path_and_detected_config() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "app/routes.yaml", SHOP_MANIFEST);
    write_file(
        dir.path(),
        "app/postman-generator.toml",
        "collection_name = \"Shop API\"\nexclude_routes = [\"api/internal/*\"]\n",
    );

    let output = run(&dir, &["generate", "--manifest", "app/routes.yaml"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let written = fs::read_to_string(dir.path().join("storage/postman/collection.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(doc["info"]["name"], "Shop API");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("| Total Routes Scanned         | 7     |"));
}

#[test]
fn test_cli_zero_routes_writes_nothing() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "routes.yaml", SHOP_MANIFEST);
    write_file(dir.path(), "gen.toml", "route_groups = \"admin\"\n");

    let output = run(
        &dir,
        &["generate", "-m", "routes.yaml", "-c", "gen.toml", "-o", "collection.json"],
    );
    assert!(output.status.success());
    assert!(!dir.path().join("collection.json").exists());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No API routes found"));
}

#[test]
fn test_cli_json_manifest() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "routes.json",
        r#"{ "routes": [{ "methods": ["GET"], "uri": "api/ping", "middleware": ["api"] }] }"#,
    );
    let output = run(&dir, &["generate", "-m", "routes.json", "-o", "c.json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("c.json")).unwrap()).unwrap();
    assert_eq!(doc["item"][0]["name"], "Pings");
    assert_eq!(doc["item"][0]["item"][0]["name"], "GET Ping");
}

#[test]
fn test_cli_missing_manifest_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["generate", "--manifest", "nope.yaml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read route manifest"));
}

#[test]
fn test_cli_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "routes.yaml", SHOP_MANIFEST);
    write_file(dir.path(), "postman-generator.toml", "auto_examples = \"maybe\"\n");
    let output = run(&dir, &["generate", "--manifest", "routes.yaml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to parse generator config"));
}
