//! # wlm-fold
//!
//! Folds flat join rows into nested records.
//!
//! A SQL join across a one-to-many relationship repeats the "one" side on
//! every row. This crate turns those rows back into one record per key, with
//! the "many" side collected into ordered arrays.
//!
//! ## Architecture
//!
//! ```text
//! FieldPath            ← Key / Index / Next (placeholder) segments
//!     │
//! Placement            ← field → path, validated once
//!     │
//! FieldMapper          ← one row → PartialRecord (sparse deep-set)
//!     │
//! RowGrouper           ← rows → one merged record per group key
//!     │
//! flatten              ← grouped records → rows again
//! ```
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use wlm_fold::{Placement, RowGrouper};
//!
//! let placement = Placement::new()
//!     .with("movie_id", "movies.[].movie_id")
//!     .with("title", "movies.[].title");
//! let grouper = RowGrouper::new("theater_id", placement).unwrap();
//!
//! let grouped = grouper
//!     .group(vec![
//!         json!({"theater_id": 1, "movie_id": 10, "title": "X"}),
//!         json!({"theater_id": 1, "movie_id": 11, "title": "Y"}),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(
//!     grouped,
//!     vec![json!({
//!         "theater_id": 1,
//!         "movies": [
//!             {"movie_id": 10, "title": "X"},
//!             {"movie_id": 11, "title": "Y"}
//!         ]
//!     })]
//! );
//! ```

pub mod error;
pub mod flatten;
pub mod grouper;
pub mod mapper;
pub mod partial;
pub mod path;
pub mod placement;
pub mod rows;
pub mod shape;

pub use error::{ConfigError, FoldError};
pub use grouper::{GroupKey, RowGrouper, group_rows};
pub use mapper::{FieldMapper, map_properties};
pub use partial::{Node, PartialRecord};
pub use path::{FieldPath, MAX_INDEX, PLACEHOLDER_TOKEN, Segment};
pub use placement::Placement;
pub use rows::{RowsError, read_rows, read_rows_from_path, read_rows_from_slice, write_rows};
pub use shape::{Shape, ShapeError};

/// One flat record, as produced by a join.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Name of a JSON value's kind, used in diagnostics.
pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
