use crate::support::{
    exit_with_error, load_shape_or_exit, print_values, read_rows_or_exit, rows_to_values,
};
use tracing::info;

pub fn run(shape_path: String, input_path: String, json_output: bool) {
    let shape = load_shape_or_exit(&shape_path);
    let grouper = shape
        .grouper()
        .unwrap_or_else(|e| exit_with_error(format!("invalid shape {shape_path}: {e}")));

    let records = rows_to_values(read_rows_or_exit(&input_path, "records"));
    let rows = grouper
        .flatten(&records)
        .unwrap_or_else(|e| exit_with_error(format!("failed to flatten {input_path}: {e}")));

    info!(records = records.len(), rows = rows.len(), "flattened");
    print_values(&rows_to_values(rows), json_output);
}
