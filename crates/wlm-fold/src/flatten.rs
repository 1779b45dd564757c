//! Flattening grouped records back into rows.

use crate::Row;
use crate::error::FoldError;
use crate::grouper::RowGrouper;
use crate::path::array_len_at;
use crate::value_kind;
use serde_json::Value;
use tracing::debug;

impl RowGrouper {
    /// Expand grouped records into one row per nested element.
    ///
    /// Each row carries the record's unconfigured top-level fields plus
    /// every configured field read back from its path, with the placeholder
    /// bound to the element's position. Fields missing from an element are
    /// left out. Without placeholder paths every record yields one row; a
    /// record whose arrays are all empty yields none.
    pub fn flatten(&self, records: &[Value]) -> Result<Vec<Row>, FoldError> {
        let prefixes = self.placement().placeholder_prefixes();
        let mut rows = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let Value::Object(fields) = record else {
                return Err(FoldError::MalformedRow {
                    index,
                    found: value_kind(record),
                });
            };

            let shared: Row = fields
                .iter()
                .filter(|(key, _)| !self.is_configured_root(key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();

            let width = if prefixes.is_empty() {
                1
            } else {
                prefixes
                    .iter()
                    .map(|prefix| array_len_at(record, prefix))
                    .max()
                    .unwrap_or(0)
            };

            for position in 0..width {
                let mut row = shared.clone();
                for (field, path) in self.placement().iter() {
                    if let Some(value) = path.bind(position).lookup(record) {
                        row.insert(field.to_string(), value.clone());
                    }
                }
                rows.push(row);
            }
        }

        debug!(records = records.len(), rows = rows.len(), "flattened records");
        Ok(rows)
    }
}
