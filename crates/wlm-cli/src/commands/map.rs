use crate::support::{exit_with_error, load_shape_or_exit, print_values, read_rows_or_exit};
use serde_json::Value;
use tracing::info;

pub fn run(shape_path: String, rows_path: String, json_output: bool) {
    let shape = load_shape_or_exit(&shape_path);
    let mapper = shape
        .mapper()
        .unwrap_or_else(|e| exit_with_error(format!("invalid shape {shape_path}: {e}")));

    let rows = read_rows_or_exit(&rows_path, "rows");
    let mapped: Vec<Value> = rows
        .iter()
        .map(|row| mapper.map_row(row).into_value())
        .collect();

    info!(rows = mapped.len(), "mapped");
    print_values(&mapped, json_output);
}
