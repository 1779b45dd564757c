//! Integration tests: run the fold fixture vectors.
//!
//! Each fixture in tests/fixtures/ has:
//! - case.json: a shape and the input rows
//! - expect.json: the grouped records, or `{"error": "<message>"}`

use serde_json::Value;
use std::path::PathBuf;
use wlm_fold::Shape;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_json(path: &PathBuf) -> Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()))
}

fn run_fixture(name: &str) {
    let dir = fixtures_dir().join(name);
    let case = read_json(&dir.join("case.json"));
    let expected = read_json(&dir.join("expect.json"));

    let shape: Shape = serde_json::from_value(case["shape"].clone())
        .unwrap_or_else(|e| panic!("fixture {name}: bad shape: {e}"));
    let rows = case["rows"]
        .as_array()
        .cloned()
        .unwrap_or_else(|| panic!("fixture {name}: missing rows"));

    let actual = match shape.grouper() {
        Ok(grouper) => match grouper.group(rows) {
            Ok(records) => Value::Array(records),
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        },
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    };

    assert_eq!(
        actual,
        expected,
        "\n\nFixture: {name}\n\nGot:\n{}\n\nExpected:\n{}\n",
        serde_json::to_string_pretty(&actual).unwrap(),
        serde_json::to_string_pretty(&expected).unwrap(),
    );
}

#[test]
fn vector_theaters_with_movies() {
    run_fixture("theaters_with_movies");
}

#[test]
fn vector_two_arrays_per_row() {
    run_fixture("two_arrays_per_row");
}

#[test]
fn vector_fixed_and_indexed_paths() {
    run_fixture("fixed_and_indexed_paths");
}

#[test]
fn vector_leading_placeholder() {
    run_fixture("leading_placeholder");
}
