//! Field placement configuration: source field → destination path.

use crate::error::ConfigError;
use crate::mapper::FieldMapper;
use crate::path::{FieldPath, Segment, array_len_at};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Insertion-ordered mapping from source field names to destination paths.
///
/// Fields not listed here keep their own name at the top level of the
/// output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placement {
    fields: IndexMap<String, FieldPath>,
}

impl Placement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Placement::insert`].
    pub fn with(mut self, field: impl Into<String>, path: impl Into<FieldPath>) -> Self {
        self.insert(field, path);
        self
    }

    /// Place `field` at `path`, returning the previous path for that field.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        path: impl Into<FieldPath>,
    ) -> Option<FieldPath> {
        self.fields.insert(field.into(), path.into())
    }

    pub fn get(&self, field: &str) -> Option<&FieldPath> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldPath)> {
        self.fields.iter().map(|(field, path)| (field.as_str(), path))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check every path, in insertion order. The first violation wins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fields
            .iter()
            .try_for_each(|(field, path)| path.validate(field))
    }

    /// Distinct placeholder prefixes, in first-seen order.
    pub fn placeholder_prefixes(&self) -> Vec<&[Segment]> {
        let mut prefixes: Vec<&[Segment]> = Vec::new();
        for path in self.fields.values() {
            if let Some(prefix) = path.placeholder_prefix()
                && !prefixes.contains(&prefix)
            {
                prefixes.push(prefix);
            }
        }
        prefixes
    }

    /// Top-level keys written by configured paths.
    pub fn roots(&self) -> Vec<&str> {
        let mut roots: Vec<&str> = Vec::new();
        for root in self.fields.values().filter_map(FieldPath::root) {
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        roots
    }

    /// Resolve every placeholder against the partially built `entry`.
    ///
    /// Each prefix is measured once, before anything from the current row is
    /// merged, so all fields sharing a prefix bind to the same index.
    pub fn resolve_against(&self, entry: &Value) -> FieldMapper {
        let mut lengths: HashMap<&[Segment], usize> = HashMap::new();
        let paths = self
            .fields
            .iter()
            .map(|(field, path)| {
                let resolved = match path.placeholder_prefix() {
                    Some(prefix) => {
                        let next = *lengths
                            .entry(prefix)
                            .or_insert_with(|| array_len_at(entry, prefix));
                        path.bind(next)
                    }
                    None => path.clone(),
                };
                (field.clone(), resolved)
            })
            .collect();
        FieldMapper::from_resolved(paths)
    }
}

impl<K, P> FromIterator<(K, P)> for Placement
where
    K: Into<String>,
    P: Into<FieldPath>,
{
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, path)| (field.into(), path.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn movies_placement() -> Placement {
        Placement::new()
            .with("movie_id", "movies.[].movie_id")
            .with("title", "movies.[].title")
            .with("review_id", "reviews.[].review_id")
    }

    #[test]
    fn resolves_against_empty_entry_to_zero() {
        let mapper = movies_placement().resolve_against(&json!({}));
        assert_eq!(
            mapper.destination("movie_id").map(ToString::to_string),
            Some("movies.0.movie_id".to_string())
        );
        assert_eq!(
            mapper.destination("review_id").map(ToString::to_string),
            Some("reviews.0.review_id".to_string())
        );
    }

    #[test]
    fn resolves_each_prefix_to_its_own_length() {
        let entry = json!({
            "movies": [{}, {}, {}, {}],
            "reviews": [{}],
        });
        let mapper = movies_placement().resolve_against(&entry);
        assert_eq!(
            mapper.destination("movie_id").map(ToString::to_string),
            Some("movies.4.movie_id".to_string())
        );
        assert_eq!(
            mapper.destination("title").map(ToString::to_string),
            Some("movies.4.title".to_string())
        );
        assert_eq!(
            mapper.destination("review_id").map(ToString::to_string),
            Some("reviews.1.review_id".to_string())
        );
    }

    #[test]
    fn prefixes_and_roots_are_distinct_and_ordered() {
        let placement = movies_placement().with("surname", "critic.surname");
        let prefixes: Vec<String> = placement
            .placeholder_prefixes()
            .iter()
            .map(|prefix| FieldPath::new(prefix.to_vec()).to_string())
            .collect();
        assert_eq!(prefixes, vec!["movies", "reviews"]);
        assert_eq!(placement.roots(), vec!["movies", "reviews", "critic"]);
    }

    #[test]
    fn validate_reports_first_bad_field() {
        let placement = Placement::new()
            .with("title", "movies.[].title")
            .with("bad", vec![Segment::Next, Segment::key("bad")]);
        assert_eq!(
            placement.validate(),
            Err(ConfigError::PlaceholderFirst {
                field: "bad".to_string()
            })
        );
    }

    #[test]
    fn deserializes_from_json_object() {
        let placement: Placement = serde_json::from_value(json!({
            "movie_id": ["movies", null, "movie_id"],
            "surname": "critic.surname",
        }))
        .expect("placement parses");
        assert_eq!(placement.len(), 2);
        assert_eq!(
            placement.get("movie_id"),
            Some(&FieldPath::parse("movies.[].movie_id"))
        );
    }
}
