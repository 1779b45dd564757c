use crate::cli::CatalogView;
use crate::support::{print_values, read_rows_or_exit, render_json_or_exit};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use wlm_catalog::{CatalogError, Envelope, list_theaters, movie_reviews, read_review};

pub fn run(view: CatalogView, rows_path: String, json_output: bool) {
    let rows = read_rows_or_exit(&rows_path, "rows");
    info!(view = ?view, rows = rows.len(), "catalog");

    match view {
        CatalogView::Theaters => emit(list_theaters(rows), json_output),
        CatalogView::Review => emit(read_review(rows), json_output),
        CatalogView::MovieReviews => emit(movie_reviews(rows), json_output),
    }
}

/// Print the `{ "data": ... }` body with `--json`, otherwise JSONL records.
fn emit<T: Serialize>(result: Result<T, CatalogError>, json_output: bool) {
    let data = match result {
        Ok(data) => data,
        Err(err) => {
            if json_output {
                println!(
                    "{}",
                    render_json_or_exit(&Envelope::<Value>::error(err.to_string()))
                );
            } else {
                eprintln!("error: {err}");
            }
            std::process::exit(1);
        }
    };

    if json_output {
        println!("{}", render_json_or_exit(&Envelope::data(data)));
        return;
    }

    let value = serde_json::to_value(&data).unwrap_or_else(|err| {
        eprintln!("error: failed to render records: {err}");
        std::process::exit(2);
    });
    match value {
        Value::Array(items) => print_values(&items, false),
        Value::Null => {}
        other => print_values(&[other], false),
    }
}
