mod common;

use std::fs;
use std::process::{Command, Output};

use serde_json::Value;

fn run_cli(args: &[&str]) -> (Output, Value) {
    let output = Command::new(env!("CARGO_BIN_EXE_solicitud-pdf"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("spawn solicitud-pdf");
    let json = serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON ({err}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    });
    (output, json)
}

fn error_message(json: &Value) -> &str {
    json["error"].as_str().expect("error message")
}

#[test]
fn missing_argument_exits_non_zero_with_json_error() {
    let (output, json) = run_cli(&[]);

    assert!(!output.status.success());
    assert_eq!(json["success"], Value::Bool(false));
    assert!(json.get("data").is_none());
    assert!(error_message(&json).contains("argumento JSON"));
}

#[test]
fn malformed_json_exits_non_zero() {
    let (output, json) = run_cli(&["{solicitud_id: 1"]);

    assert!(!output.status.success());
    assert_eq!(json["success"], Value::Bool(false));
    assert!(error_message(&json).starts_with("Error en JSON"));
}

#[test]
fn missing_identifier_names_the_parameter() {
    let (output, json) = run_cli(&[r#"{"incluir_convenio": false}"#]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["success"], Value::Bool(false));
    assert!(error_message(&json).contains("solicitud_id"));
}

#[test]
fn extra_arguments_are_rejected() {
    let (output, json) = run_cli(&[r#"{"solicitud_id": "a"}"#, "extra"]);

    assert!(!output.status.success());
    assert_eq!(json["success"], Value::Bool(false));
}

#[test]
fn unreachable_database_reports_failure_but_exits_zero() {
    let output_dir = tempfile::tempdir().unwrap();
    let params = serde_json::json!({
        "solicitud_id": "SOL-1",
        "db_host": "127.0.0.1",
        "db_port": common::unused_local_port(),
        "db_timeout_ms": 500,
        "output_dir": output_dir.path(),
    })
    .to_string();

    let (output, json) = run_cli(&[params.as_str()]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json["success"], Value::Bool(false));
    assert!(json.get("data").is_none());
    assert!(error_message(&json).starts_with("No se pudo conectar a la base de datos"));
    assert_eq!(fs::read_dir(output_dir.path()).unwrap().count(), 0);
}
