#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

const POINT: &str = "X: Singleton\nY: Singleton\nPoint: Record X Y\n";

fn schema_file(tag: &str, text: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "tagwire-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    let path = dir.join("types.tw");
    std::fs::write(&path, text).expect("schema should be writable");
    path
}

fn tagwire(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tagwire"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("tagwire should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn check_reports_valid_schema() {
    let schema = schema_file("check", POINT);
    let output = tagwire(&["--format", "json", "check", schema.to_str().unwrap()]);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["valid"], serde_json::json!(true));
    assert_eq!(report["types"], serde_json::json!(3));
}

#[test]
fn check_rejects_undefined_reference_with_60() {
    let schema = schema_file("undefined", "Bad: Record Ghost\n");
    let output = tagwire(&["check", schema.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Ghost"));
}

#[test]
fn check_missing_file_is_not_found() {
    let output = tagwire(&["check", "/nonexistent/tagwire/types.tw"]);
    assert_eq!(output.status.code(), Some(51));
}

#[test]
fn ids_lists_sorted_identifiers() {
    let schema = schema_file("ids", POINT);
    let output = tagwire(&["--format", "json", "ids", schema.to_str().unwrap()]);

    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let listed: Vec<(String, u64)> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            (
                row["name"].as_str().unwrap().to_string(),
                row["identifier"].as_u64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        listed,
        vec![
            ("Point".to_string(), 6),
            ("X".to_string(), 7),
            ("Y".to_string(), 8)
        ]
    );
}

#[test]
fn fmt_prints_canonical_form() {
    let schema = schema_file("fmt", "\nY:   Singleton\nX: Singleton\n\nPoint: Record X Y");
    let output = tagwire(&["fmt", schema.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Point: Record X Y\nX: Singleton\nY: Singleton\n");

    let check = tagwire(&["fmt", "--check", schema.to_str().unwrap()]);
    assert_eq!(check.status.code(), Some(1));
}

#[test]
fn encode_point_as_hex() {
    let schema = schema_file("encode", POINT);
    let output = tagwire(&[
        "--format",
        "pretty",
        "encode",
        schema.to_str().unwrap(),
        "--type",
        "Point",
        "--value",
        "[null, null]",
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "01060102010701020108");
}

#[test]
fn encode_framed_prefixes_metacount_and_count() {
    let schema = schema_file("framed", POINT);
    let output = tagwire(&[
        "--format",
        "json",
        "encode",
        schema.to_str().unwrap(),
        "-t",
        "Point",
        "--value",
        "[null, null]",
        "--framed",
    ]);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["hex"], serde_json::json!("010a01060102010701020108"));
    assert_eq!(report["identifier"], serde_json::json!(6));
    assert_eq!(report["size"], serde_json::json!(12));
}

#[test]
fn decode_point_to_json() {
    let schema = schema_file("decode", POINT);
    let output = tagwire(&[
        "--format",
        "json",
        "decode",
        schema.to_str().unwrap(),
        "--type",
        "Point",
        "01060102010701020108",
    ]);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["type"], serde_json::json!("Point"));
    assert_eq!(report["value"], serde_json::json!([null, null]));
}

#[test]
fn decode_framed_enum_case() {
    let schema = schema_file("decode-enum", "X: Singleton\nY: Singleton\nChoice: Enum X Y\n");
    let output = tagwire(&[
        "--format",
        "raw",
        "decode",
        schema.to_str().unwrap(),
        "-t",
        "Choice",
        "--framed",
        "0102 0108",
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), r#"{"Y":null}"#);
}

#[test]
fn decode_wrong_identifier_is_data_invalid() {
    let schema = schema_file("decode-bad", POINT);
    let output = tagwire(&[
        "decode",
        schema.to_str().unwrap(),
        "--type",
        "X",
        "0108",
    ]);

    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn unknown_type_is_usage_error() {
    let schema = schema_file("unknown", POINT);
    let output = tagwire(&[
        "encode",
        schema.to_str().unwrap(),
        "--type",
        "Ghost",
        "--value",
        "null",
    ]);

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_reports_package_version() {
    let output = tagwire(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        format!("tagwire {}", env!("CARGO_PKG_VERSION"))
    );
}
