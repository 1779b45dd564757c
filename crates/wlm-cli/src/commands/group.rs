use crate::support::{exit_with_error, load_shape_or_exit, print_values, read_rows_or_exit};
use tracing::info;

pub fn run(shape_path: String, rows_path: String, key: Option<String>, json_output: bool) {
    let mut shape = load_shape_or_exit(&shape_path);
    if let Some(key) = key {
        shape = shape.with_group_key(key);
    }
    let grouper = shape
        .grouper()
        .unwrap_or_else(|e| exit_with_error(format!("invalid shape {shape_path}: {e}")));

    let rows = read_rows_or_exit(&rows_path, "rows");
    let row_count = rows.len();
    let grouped = grouper.fold(rows);

    info!(
        group_key = grouper.group_key(),
        rows = row_count,
        groups = grouped.len(),
        "grouped"
    );
    print_values(&grouped, json_output);
}
