use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;
use wlm_fold::{Row, Shape, read_rows_from_slice, write_rows};

/// Log to stderr, filtered by `RUST_LOG` (default `warn`), so stdout stays
/// machine-readable.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

pub fn exit_with_error(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

pub fn load_shape_or_exit(path: &str) -> Shape {
    Shape::load(path).unwrap_or_else(|e| exit_with_error(format!("failed to load shape {path}: {e}")))
}

/// Read rows from a file, or from stdin when `source` is `-`.
pub fn read_rows_or_exit(source: &str, label: &str) -> Vec<Row> {
    let bytes = if source == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .unwrap_or_else(|e| exit_with_error(format!("failed to read {label} from stdin: {e}")));
        buffer
    } else {
        fs::read(source)
            .unwrap_or_else(|e| exit_with_error(format!("failed to read {label} at {source}: {e}")))
    };

    read_rows_from_slice(&bytes)
        .unwrap_or_else(|e| exit_with_error(format!("failed to parse {label} at {source}: {e}")))
}

pub fn render_json_or_exit<T: Serialize>(payload: &T) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|err| {
        eprintln!("error: failed to render JSON payload: {err}");
        std::process::exit(2);
    })
}

/// Print records as one pretty JSON array, or as JSONL.
pub fn print_values(values: &[Value], json_output: bool) {
    if json_output {
        println!("{}", render_json_or_exit(&values));
        return;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = write_rows(&mut out, values).and_then(|()| {
        out.flush()
            .map_err(|e| wlm_fold::RowsError::Io(0, e.to_string()))
    }) {
        eprintln!("error: failed to write output: {err}");
        std::process::exit(2);
    }
}

pub fn rows_to_values(rows: Vec<Row>) -> Vec<Value> {
    rows.into_iter().map(Value::Object).collect()
}
