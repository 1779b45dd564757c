//! Grouping flat rows into one nested record per key.

use crate::Row;
use crate::error::{ConfigError, FoldError};
use crate::placement::Placement;
use crate::value_kind;
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, trace};

/// Identity of a group, derived from a row's group-key field.
///
/// Present values are compared by their text: strings as-is, numbers and
/// booleans as rendered, `null` as `null`, arrays and objects as compact
/// JSON. An integral float renders without its fraction (`1.0` as `1`, `-0.0`
/// as `0`), so `1`, `1.0` and `"1"` land in the same group. A row without
/// the field forms the separate [`GroupKey::Absent`] group, which never
/// collides with a present value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Absent,
    Present(String),
}

impl GroupKey {
    pub fn of(row: &Row, field: &str) -> Self {
        match row.get(field) {
            None => Self::Absent,
            Some(Value::String(text)) => Self::Present(text.clone()),
            Some(Value::Number(number)) => Self::Present(number_text(number)),
            Some(other) => Self::Present(other.to_string()),
        }
    }
}

/// Integral floats below 1e21 print as integers; everything else as JSON.
fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e21 => {
            if float == 0.0 {
                "0".to_string()
            } else {
                format!("{float:.0}")
            }
        }
        _ => number.to_string(),
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("<absent>"),
            Self::Present(text) => f.write_str(text),
        }
    }
}

/// Folds rows sharing a group key into one record each.
///
/// Built once from a group key and a [`Placement`], then applied to any
/// number of row sets. Each call owns its accumulator, so a grouper can be
/// shared freely between threads.
#[derive(Debug, Clone)]
pub struct RowGrouper {
    group_key: String,
    placement: Placement,
    roots: HashSet<String>,
}

impl RowGrouper {
    /// Validate the placement and build the grouper.
    pub fn new(group_key: impl Into<String>, placement: Placement) -> Result<Self, ConfigError> {
        let group_key = group_key.into();
        if group_key.is_empty() {
            return Err(ConfigError::EmptyGroupKey);
        }
        placement.validate()?;
        let roots = placement.roots().into_iter().map(str::to_string).collect();
        Ok(Self {
            group_key,
            placement,
            roots,
        })
    }

    pub fn group_key(&self) -> &str {
        &self.group_key
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Whether a top-level output key is written by a configured path.
    pub(crate) fn is_configured_root(&self, key: &str) -> bool {
        self.roots.contains(key)
    }

    /// Group JSON values. Every value must be an object.
    pub fn group<I>(&self, rows: I) -> Result<Vec<Value>, FoldError>
    where
        I: IntoIterator<Item = Value>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(row) => Ok(row),
                other => Err(FoldError::MalformedRow {
                    index,
                    found: value_kind(&other),
                }),
            })
            .collect::<Result<Vec<Row>, FoldError>>()?;
        Ok(self.fold(rows))
    }

    /// Group rows, in input order.
    ///
    /// For each row the placement is resolved against the group's current
    /// state, the row is mapped through it, and the result is merged back.
    /// Unconfigured top-level fields keep the value from the group's first
    /// row.
    pub fn fold<I>(&self, rows: I) -> Vec<Value>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut groups: IndexMap<GroupKey, Value> = IndexMap::new();
        let mut row_count = 0usize;

        for row in rows {
            let key = GroupKey::of(&row, &self.group_key);
            trace!(row = row_count, key = %key, "merging row");
            row_count += 1;

            let entry = groups
                .entry(key)
                .or_insert_with(|| Value::Object(Map::new()));
            let mapper = self.placement.resolve_against(entry);
            mapper
                .map_row(&row)
                .merge_into(entry, |root| !self.is_configured_root(root));
        }

        debug!(
            group_key = %self.group_key,
            rows = row_count,
            groups = groups.len(),
            "grouped rows"
        );
        groups.into_values().collect()
    }
}

/// Configure a reusable grouping function.
///
/// Configuration errors surface here, before any row is seen.
pub fn group_rows(
    group_key: impl Into<String>,
    placement: Placement,
) -> Result<impl Fn(Vec<Value>) -> Result<Vec<Value>, FoldError>, ConfigError> {
    let grouper = RowGrouper::new(group_key, placement)?;
    Ok(move |rows: Vec<Value>| grouper.group(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Segment;
    use serde_json::json;

    fn theater_grouper() -> RowGrouper {
        RowGrouper::new(
            "theater_id",
            Placement::new()
                .with("movie_id", "movies.[].movie_id")
                .with("title", "movies.[].title"),
        )
        .expect("grouper builds")
    }

    fn theater_rows() -> Vec<Value> {
        vec![
            json!({"theater_id": 1, "name": "A", "movie_id": 10, "title": "X"}),
            json!({"theater_id": 1, "name": "A", "movie_id": 11, "title": "Y"}),
            json!({"theater_id": 2, "name": "B", "movie_id": 12, "title": "Z"}),
        ]
    }

    #[test]
    fn groups_theater_rows_into_nested_movies() {
        let grouped = theater_grouper()
            .group(theater_rows())
            .expect("rows group");
        assert_eq!(
            grouped,
            vec![
                json!({
                    "theater_id": 1,
                    "name": "A",
                    "movies": [
                        {"movie_id": 10, "title": "X"},
                        {"movie_id": 11, "title": "Y"}
                    ]
                }),
                json!({
                    "theater_id": 2,
                    "name": "B",
                    "movies": [{"movie_id": 12, "title": "Z"}]
                }),
            ]
        );
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(theater_grouper().group(Vec::new()), Ok(Vec::new()));
    }

    #[test]
    fn single_row_group_still_gets_an_array() {
        let grouped = theater_grouper()
            .group(vec![json!({"theater_id": 9, "movie_id": 1, "title": "Solo"})])
            .expect("rows group");
        assert_eq!(grouped[0]["movies"], json!([{"movie_id": 1, "title": "Solo"}]));
    }

    #[test]
    fn groups_follow_first_occurrence_order() {
        let grouped = theater_grouper()
            .group(vec![
                json!({"theater_id": 3, "movie_id": 1}),
                json!({"theater_id": 1, "movie_id": 2}),
                json!({"theater_id": 3, "movie_id": 3}),
                json!({"theater_id": 2, "movie_id": 4}),
            ])
            .expect("rows group");
        let ids: Vec<&Value> = grouped.iter().map(|g| &g["theater_id"]).collect();
        assert_eq!(ids, vec![&json!(3), &json!(1), &json!(2)]);
        assert_eq!(
            grouped[0]["movies"],
            json!([{"movie_id": 1}, {"movie_id": 3}])
        );
    }

    #[test]
    fn unconfigured_fields_come_from_first_row() {
        let grouped = theater_grouper()
            .group(vec![
                json!({"theater_id": 1, "name": "First", "movie_id": 1}),
                json!({"theater_id": 1, "name": "Second", "movie_id": 2}),
            ])
            .expect("rows group");
        assert_eq!(grouped[0]["name"], json!("First"));
    }

    #[test]
    fn missing_group_key_forms_its_own_group() {
        let grouped = theater_grouper()
            .group(vec![
                json!({"movie_id": 1}),
                json!({"theater_id": null, "movie_id": 2}),
                json!({"movie_id": 3}),
            ])
            .expect("rows group");
        assert_eq!(grouped.len(), 2);
        assert_eq!(
            grouped[0]["movies"],
            json!([{"movie_id": 1}, {"movie_id": 3}])
        );
        assert_eq!(grouped[1]["theater_id"], Value::Null);
    }

    #[test]
    fn group_key_coercion_is_textual() {
        let mut row = Row::new();
        row.insert("id".to_string(), json!(1));
        let numeric = GroupKey::of(&row, "id");
        row.insert("id".to_string(), json!("1"));
        assert_eq!(GroupKey::of(&row, "id"), numeric);
        row.insert("id".to_string(), json!({"a": 1}));
        assert_eq!(
            GroupKey::of(&row, "id"),
            GroupKey::Present(r#"{"a":1}"#.to_string())
        );
        assert_eq!(GroupKey::of(&row, "other"), GroupKey::Absent);
    }

    #[test]
    fn integral_floats_share_a_group_with_integers() {
        let mut row = Row::new();
        row.insert("id".to_string(), json!(1));
        let integer = GroupKey::of(&row, "id");
        row.insert("id".to_string(), json!(1.0));
        assert_eq!(GroupKey::of(&row, "id"), integer);
        row.insert("id".to_string(), json!(-0.0));
        assert_eq!(GroupKey::of(&row, "id"), GroupKey::Present("0".to_string()));
        row.insert("id".to_string(), json!(1.5));
        assert_eq!(GroupKey::of(&row, "id"), GroupKey::Present("1.5".to_string()));

        let grouped = theater_grouper()
            .group(vec![
                json!({"theater_id": 1, "movie_id": 10}),
                json!({"theater_id": 1.0, "movie_id": 11}),
            ])
            .expect("rows group");
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0]["movies"], json!([{"movie_id": 10}, {"movie_id": 11}]));
    }

    #[test]
    fn unconfigured_dotted_keys_nest_and_keep_first_row() {
        let grouped = theater_grouper()
            .group(vec![
                json!({"theater_id": 1, "address.city": "Portland", "movie_id": 10}),
                json!({"theater_id": 1, "address.city": "Salem", "movie_id": 11}),
            ])
            .expect("rows group");
        assert_eq!(grouped[0]["address"], json!({"city": "Portland"}));
        assert!(grouped[0].get("address.city").is_none());
    }

    #[test]
    fn oversized_index_fails_before_rows() {
        let placement = Placement::new().with("title", "movies.18446744073709551615.title");
        assert!(matches!(
            group_rows("theater_id", placement),
            Err(ConfigError::IndexTooLarge { ref field, index: usize::MAX }) if field == "title"
        ));
    }

    #[test]
    fn leading_placeholder_fails_before_rows() {
        let placement = Placement::new().with("title", vec![Segment::Next, Segment::key("title")]);
        let result = group_rows("theater_id", placement);
        assert!(matches!(
            result,
            Err(ConfigError::PlaceholderFirst { ref field }) if field == "title"
        ));
    }

    #[test]
    fn empty_group_key_is_rejected() {
        assert!(matches!(
            RowGrouper::new("", Placement::new()),
            Err(ConfigError::EmptyGroupKey)
        ));
    }

    #[test]
    fn non_object_row_is_malformed() {
        let result = theater_grouper().group(vec![json!({"theater_id": 1}), json!("oops")]);
        assert_eq!(
            result,
            Err(FoldError::MalformedRow {
                index: 1,
                found: "string"
            })
        );
    }

    #[test]
    fn grouping_closure_is_reusable() {
        let group = group_rows(
            "theater_id",
            Placement::new().with("movie_id", "movies.[].movie_id"),
        )
        .expect("grouper builds");
        let first = group(theater_rows()).expect("rows group");
        let second = group(theater_rows()).expect("rows group");
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
