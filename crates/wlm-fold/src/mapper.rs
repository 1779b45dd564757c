//! Mapping one flat row onto nested destination paths.

use crate::Row;
use crate::error::{ConfigError, FoldError};
use crate::partial::PartialRecord;
use crate::path::FieldPath;
use crate::placement::Placement;
use crate::value_kind;
use indexmap::IndexMap;
use serde_json::Value;

/// Moves the fields of a row to configured destination paths.
///
/// Every destination is fully resolved: no placeholders. A field without a
/// destination is deep-set at its own name read as a path, so a join alias
/// such as `critic.surname` nests too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapper {
    paths: IndexMap<String, FieldPath>,
}

impl FieldMapper {
    pub fn new<I, K, P>(config: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<FieldPath>,
    {
        let paths: IndexMap<String, FieldPath> = config
            .into_iter()
            .map(|(field, path)| (field.into(), path.into()))
            .collect();

        for (field, path) in &paths {
            if path.is_empty() {
                return Err(ConfigError::EmptyPath {
                    field: field.clone(),
                });
            }
            if path.placeholder_position().is_some() {
                return Err(ConfigError::UnresolvedPlaceholder {
                    field: field.clone(),
                });
            }
            path.check_indices(field)?;
        }

        Ok(Self { paths })
    }

    pub fn from_placement(placement: &Placement) -> Result<Self, ConfigError> {
        Self::new(placement.iter().map(|(field, path)| (field, path.clone())))
    }

    /// Built from paths already resolved against a row's group state.
    pub(crate) fn from_resolved(paths: IndexMap<String, FieldPath>) -> Self {
        Self { paths }
    }

    pub fn destination(&self, field: &str) -> Option<&FieldPath> {
        self.paths.get(field)
    }

    /// Map one row, visiting its fields in row order.
    pub fn map_row(&self, row: &Row) -> PartialRecord {
        let mut record = PartialRecord::new();
        for (field, value) in row {
            match self.paths.get(field) {
                Some(path) => record.set(path.segments(), value.clone()),
                None => record.set(FieldPath::from_row_key(field).segments(), value.clone()),
            }
        }
        record
    }

    /// Map a JSON value. `null` passes through unchanged.
    pub fn map_value(&self, value: Value) -> Result<Value, FoldError> {
        self.map_indexed(0, value)
    }

    /// Map each value in turn; errors name the offending position.
    pub fn map_values<I>(&self, values: I) -> Result<Vec<Value>, FoldError>
    where
        I: IntoIterator<Item = Value>,
    {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| self.map_indexed(index, value))
            .collect()
    }

    fn map_indexed(&self, index: usize, value: Value) -> Result<Value, FoldError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Object(row) => Ok(self.map_row(&row).into_value()),
            other => Err(FoldError::MalformedRow {
                index,
                found: value_kind(&other),
            }),
        }
    }
}

/// Configure a reusable row mapper.
pub fn map_properties<I, K, P>(
    config: I,
) -> Result<impl Fn(Value) -> Result<Value, FoldError>, ConfigError>
where
    I: IntoIterator<Item = (K, P)>,
    K: Into<String>,
    P: Into<FieldPath>,
{
    let mapper = FieldMapper::new(config)?;
    Ok(move |value| mapper.map_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn critic_mapper() -> FieldMapper {
        FieldMapper::new([
            ("preferred_name", "critic.preferred_name"),
            ("surname", "critic.surname"),
            ("critic:critic_id", "critic.critic_id"),
        ])
        .expect("mapper builds")
    }

    #[test]
    fn moves_configured_fields_and_keeps_the_rest() {
        let mapped = critic_mapper()
            .map_value(json!({
                "review_id": 1,
                "preferred_name": "Chana",
                "surname": "Gibson",
                "critic:critic_id": 4,
            }))
            .expect("row maps");

        assert_eq!(
            mapped,
            json!({
                "review_id": 1,
                "critic": {"preferred_name": "Chana", "surname": "Gibson", "critic_id": 4},
            })
        );
    }

    #[test]
    fn null_passes_through() {
        assert_eq!(critic_mapper().map_value(Value::Null), Ok(Value::Null));
    }

    #[test]
    fn non_object_is_malformed() {
        let result = critic_mapper().map_values(vec![json!({"a": 1}), json!([1, 2])]);
        assert_eq!(
            result,
            Err(FoldError::MalformedRow {
                index: 1,
                found: "array"
            })
        );
    }

    #[test]
    fn numeric_segments_become_array_positions() {
        let mapper = FieldMapper::new([("title", "movies.1.title")]).expect("mapper builds");
        let mapped = mapper.map_value(json!({"title": "Y"})).expect("row maps");
        assert_eq!(mapped, json!({"movies": [null, {"title": "Y"}]}));
    }

    #[test]
    fn unconfigured_dotted_keys_are_deep_set() {
        let map = map_properties(Vec::<(&str, &str)>::new()).expect("mapper builds");
        assert_eq!(
            map(json!({"critic.surname": "Gibson", "critic.critic_id": 4, "score": 3})),
            Ok(json!({"critic": {"surname": "Gibson", "critic_id": 4}, "score": 3}))
        );
        assert_eq!(
            map(json!({"scores.1": 5})),
            Ok(json!({"scores": [null, 5]}))
        );
    }

    #[test]
    fn rejects_indices_above_the_limit() {
        assert_eq!(
            FieldMapper::new([("t", "movies.18446744073709551615.t")]),
            Err(ConfigError::IndexTooLarge {
                field: "t".to_string(),
                index: usize::MAX,
            })
        );
    }

    #[test]
    fn input_row_is_untouched() {
        let row = json!({"surname": "Gibson"});
        let Value::Object(fields) = row.clone() else {
            panic!("fixture is an object");
        };
        let _ = critic_mapper().map_row(&fields);
        assert_eq!(Value::Object(fields), row);
    }

    #[test]
    fn rejects_placeholders_and_empty_paths() {
        assert_eq!(
            FieldMapper::new([("title", "movies.[].title")]),
            Err(ConfigError::UnresolvedPlaceholder {
                field: "title".to_string()
            })
        );
        assert_eq!(
            FieldMapper::new([("title", "")]),
            Err(ConfigError::EmptyPath {
                field: "title".to_string()
            })
        );
    }

    #[test]
    fn map_properties_returns_reusable_closure() {
        let map = map_properties([("surname", "critic.surname")]).expect("mapper builds");
        assert_eq!(
            map(json!({"surname": "A"})),
            Ok(json!({"critic": {"surname": "A"}}))
        );
        assert_eq!(
            map(json!({"surname": "B"})),
            Ok(json!({"critic": {"surname": "B"}}))
        );
    }
}
