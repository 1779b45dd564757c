//! Destination paths.
//!
//! A path is an explicit sequence of segments. Textual paths use the
//! familiar deep-set notation, with `[]` standing for the placeholder:
//!
//! ```text
//! "movies.[].title"   → Key(movies), Next, Key(title)
//! "movies[].title"    → Key(movies), Next, Key(title)
//! "movies.0.title"    → Key(movies), Index(0), Key(title)
//! "critic.surname"    → Key(critic), Key(surname)
//! ```
//!
//! In JSON array form a `null` element is the placeholder and an integer is
//! an index.

use crate::error::ConfigError;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Textual spelling of [`Segment::Next`].
pub const PLACEHOLDER_TOKEN: &str = "[]";

/// Largest array position a path may name. Positions before a written
/// element are padded with `null`, so the bound caps that padding.
pub const MAX_INDEX: usize = 65_535;

/// One step of a destination path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object property.
    Key(String),
    /// Array position.
    Index(usize),
    /// Next free position of the array at the preceding segments, resolved
    /// per row.
    Next,
}

impl Segment {
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }

    /// Parse one textual segment.
    ///
    /// Canonical non-negative integers (`0`, `7`, `42`, but not `07`) are
    /// indices. `[]` is the placeholder. Anything else is a key.
    pub fn parse(token: &str) -> Self {
        if token == PLACEHOLDER_TOKEN {
            return Self::Next;
        }
        match parse_index(token) {
            Some(index) => Self::Index(index),
            None => Self::Key(token.to_string()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Next)
    }
}

fn parse_index(token: &str) -> Option<usize> {
    let canonical = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'));
    if canonical { token.parse().ok() } else { None }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
            Self::Next => f.write_str(PLACEHOLDER_TOKEN),
        }
    }
}

impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Key(name) => serializer.serialize_str(name),
            Self::Index(index) => serializer.serialize_u64(*index as u64),
            Self::Next => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SegmentVisitor;

        impl<'de> Visitor<'de> for SegmentVisitor {
            type Value = Segment;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a property name, an array index, or null")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Segment, E> {
                Ok(Segment::parse(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Segment, E> {
                usize::try_from(v)
                    .map(Segment::Index)
                    .map_err(|_| E::custom(format!("index {v} out of range")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Segment, E> {
                usize::try_from(v)
                    .map(Segment::Index)
                    .map_err(|_| E::custom(format!("index {v} must be non-negative")))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Segment, E> {
                Ok(Segment::Next)
            }

            fn visit_none<E: de::Error>(self) -> Result<Segment, E> {
                Ok(Segment::Next)
            }
        }

        deserializer.deserialize_any(SegmentVisitor)
    }
}

/// A destination path for one source field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// Parse deep-set notation: `.` separates segments and `[...]` opens an
    /// index or placeholder segment. The empty string is the empty path.
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut token = String::new();
        let mut chars = text.chars();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if !token.is_empty() {
                        segments.push(Segment::parse(&token));
                        token.clear();
                    }
                }
                '[' => {
                    if !token.is_empty() {
                        segments.push(Segment::parse(&token));
                        token.clear();
                    }
                    let inner: String = chars.by_ref().take_while(|c| *c != ']').collect();
                    if inner.is_empty() {
                        segments.push(Segment::Next);
                    } else {
                        segments.push(Segment::parse(&inner));
                    }
                }
                _ => token.push(c),
            }
        }
        if !token.is_empty() {
            segments.push(Segment::parse(&token));
        }

        Self(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First segment as an object key, if it is one.
    pub fn root(&self) -> Option<&str> {
        match self.0.first() {
            Some(Segment::Key(name)) => Some(name),
            _ => None,
        }
    }

    /// Position of the placeholder segment, if any.
    pub fn placeholder_position(&self) -> Option<usize> {
        self.0.iter().position(Segment::is_placeholder)
    }

    /// Segments before the placeholder.
    pub fn placeholder_prefix(&self) -> Option<&[Segment]> {
        self.placeholder_position().map(|pos| &self.0[..pos])
    }

    /// Replace every placeholder with `index`.
    pub fn bind(&self, index: usize) -> Self {
        Self(
            self.0
                .iter()
                .map(|segment| match segment {
                    Segment::Next => Segment::Index(index),
                    other => other.clone(),
                })
                .collect(),
        )
    }

    /// Check the path invariants for a grouping placement.
    pub fn validate(&self, field: &str) -> Result<(), ConfigError> {
        let Some(first) = self.0.first() else {
            return Err(ConfigError::EmptyPath {
                field: field.to_string(),
            });
        };
        if first.is_placeholder() {
            return Err(ConfigError::PlaceholderFirst {
                field: field.to_string(),
            });
        }
        if self.0.iter().filter(|s| s.is_placeholder()).count() > 1 {
            return Err(ConfigError::MultiplePlaceholders {
                field: field.to_string(),
            });
        }
        self.check_indices(field)
    }

    /// Reject index segments above [`MAX_INDEX`].
    pub fn check_indices(&self, field: &str) -> Result<(), ConfigError> {
        match self.0.iter().find_map(|segment| match segment {
            Segment::Index(index) if *index > MAX_INDEX => Some(*index),
            _ => None,
        }) {
            Some(index) => Err(ConfigError::IndexTooLarge {
                field: field.to_string(),
                index,
            }),
            None => Ok(()),
        }
    }

    /// Destination of a row key that has no configured path: the key read
    /// as a path, so `critic.surname` nests under `critic`. A key that does
    /// not read as a concrete path (empty, a placeholder, an index above
    /// [`MAX_INDEX`]) is kept verbatim as a single property.
    pub fn from_row_key(key: &str) -> Self {
        let path = Self::parse(key);
        if path.is_empty()
            || path.placeholder_position().is_some()
            || path.check_indices(key).is_err()
        {
            return Self(vec![Segment::key(key)]);
        }
        path
    }

    /// Read the value at this path. Placeholders never match.
    pub fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        lookup(value, &self.0)
    }
}

/// Walk `segments` from `value`. An index segment also matches the
/// same-named property of an object.
pub(crate) fn lookup<'a>(value: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(value, |current, segment| match (segment, current) {
            (Segment::Key(name), Value::Object(map)) => map.get(name),
            (Segment::Index(index), Value::Array(items)) => items.get(*index),
            (Segment::Index(index), Value::Object(map)) => map.get(&index.to_string()),
            _ => None,
        })
}

/// Length of the array at `segments`, or 0 when there is none.
pub(crate) fn array_len_at(value: &Value, segments: &[Segment]) -> usize {
    match lookup(value, segments) {
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl From<&str> for FieldPath {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for FieldPath {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<Vec<Segment>> for FieldPath {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl FromIterator<Segment> for FieldPath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for segment in &self.0 {
            seq.serialize_element(segment)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathVisitor;

        impl<'de> Visitor<'de> for PathVisitor {
            type Value = FieldPath;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a dotted path string or an array of path segments")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldPath, E> {
                Ok(FieldPath::parse(v))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<FieldPath, A::Error> {
                let mut segments = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(segment) = seq.next_element::<Segment>()? {
                    segments.push(segment);
                }
                Ok(FieldPath(segments))
            }
        }

        deserializer.deserialize_any(PathVisitor)
    }
}
