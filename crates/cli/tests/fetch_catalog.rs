// Integration tests for `certsync catalog`.
// Run with: cargo test -p certsync-cli --test fetch_catalog

use std::process::Command;

use httpmock::prelude::*;

#[test]
fn prints_active_exams_to_stdout() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/catalog/")
            .query_param("type", "exams")
            .query_param("locale", "en-us");
        then.status(200).json_body(serde_json::json!({
            "exams": [
                {"display_name": "AZ-104", "title": "Microsoft Azure Administrator", "levels": ["intermediate"]},
                {"display_name": "AZ-103", "title": "Microsoft Azure Administrator (retired)", "levels": []},
                {"display_name": "MO-200", "title": "Microsoft Excel (Excel and Excel 2019)", "levels": []},
                {"display_name": "GH-300", "title": "GitHub Copilot", "levels": ["beginner", "intermediate"]}
            ]
        }));
    });
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_certsync"))
        .current_dir(dir.path())
        .env("CERTSYNC_LEARN_URL", server.base_url())
        .env_remove("LOCALE")
        .args(["catalog", "-q"])
        .output()
        .expect("failed to run certsync");

    mock.assert();
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Exam Code,Title,Levels\n\
         AZ-104,Microsoft Azure Administrator,intermediate\n\
         GH-300,GitHub Copilot,\"beginner, intermediate\"\n"
    );
}

#[test]
fn missing_exams_array_exits_52() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/catalog/");
        then.status(200).json_body(serde_json::json!({"modules": []}));
    });
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_certsync"))
        .current_dir(dir.path())
        .env("CERTSYNC_LEARN_URL", server.base_url())
        .args(["catalog", "-q"])
        .output()
        .expect("failed to run certsync");

    assert_eq!(output.status.code(), Some(52));
    assert!(output.stdout.is_empty());
}
