//! Partially built records.
//!
//! A mapped row is kept as a tree with sparse arrays so that a row writing
//! `movies[3]` does not carry `null`s for `movies[0..3]`. Holes are skipped
//! when merging into an accumulator and become `null` only when the tree is
//! materialised on its own.

use crate::path::Segment;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One node of a partial record.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Value(Value),
    Object(IndexMap<String, Node>),
    Array(BTreeMap<usize, Node>),
}

impl Node {
    /// Deep-set `value` at `path` below this node.
    ///
    /// Containers are created on demand: an index segment makes an array, a
    /// key segment makes an object. A scalar in the way is replaced, and so
    /// is an array reached by a key. An index reached on an object is used
    /// as the property name.
    pub fn set(&mut self, path: &[Segment], value: Value) {
        let Some((head, rest)) = path.split_first() else {
            *self = Node::Value(value);
            return;
        };

        let child = match head {
            Segment::Key(name) => self
                .object_mut()
                .entry(name.clone())
                .or_insert(Node::Value(Value::Null)),
            Segment::Index(index) if matches!(self, Node::Object(_)) => self
                .object_mut()
                .entry(index.to_string())
                .or_insert(Node::Value(Value::Null)),
            Segment::Index(index) => self
                .array_mut()
                .entry(*index)
                .or_insert(Node::Value(Value::Null)),
            Segment::Next => {
                let items = self.array_mut();
                let next = items.keys().next_back().map_or(0, |last| last.saturating_add(1));
                items.entry(next).or_insert(Node::Value(Value::Null))
            }
        };
        child.set(rest, value);
    }

    fn object_mut(&mut self) -> &mut IndexMap<String, Node> {
        if !matches!(self, Node::Object(_)) {
            *self = Node::Object(IndexMap::new());
        }
        match self {
            Node::Object(fields) => fields,
            _ => unreachable!("node was just made an object"),
        }
    }

    fn array_mut(&mut self) -> &mut BTreeMap<usize, Node> {
        if !matches!(self, Node::Array(_)) {
            *self = Node::Array(BTreeMap::new());
        }
        match self {
            Node::Array(items) => items,
            _ => unreachable!("node was just made an array"),
        }
    }

    /// Materialise, filling array holes with `null`.
    pub fn into_value(self) -> Value {
        match self {
            Node::Value(value) => value,
            Node::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, node)| (key, node.into_value()))
                    .collect(),
            ),
            Node::Array(items) => {
                let len = items
                    .keys()
                    .next_back()
                    .and_then(|last| last.checked_add(1))
                    .unwrap_or(0);
                let mut out = vec![Value::Null; len];
                for (index, node) in items {
                    if let Some(slot) = out.get_mut(index) {
                        *slot = node.into_value();
                    }
                }
                Value::Array(out)
            }
        }
    }

    /// Merge this node into `target`.
    ///
    /// Objects merge key by key, arrays merge position by position, and
    /// scalars overwrite. Array holes leave existing elements untouched.
    pub fn merge_into(self, target: &mut Value) {
        match self {
            Node::Value(value) => *target = value,
            Node::Object(fields) => {
                if !target.is_object() {
                    *target = Value::Object(Map::new());
                }
                if let Value::Object(map) = target {
                    for (key, node) in fields {
                        node.merge_into(map.entry(key).or_insert(Value::Null));
                    }
                }
            }
            Node::Array(items) => {
                if !target.is_array() {
                    *target = Value::Array(Vec::new());
                }
                if let Value::Array(out) = target {
                    for (index, node) in items {
                        let Some(len) = index.checked_add(1) else {
                            continue;
                        };
                        if out.len() < len {
                            out.resize(len, Value::Null);
                        }
                        node.merge_into(&mut out[index]);
                    }
                }
            }
        }
    }
}

/// The output of mapping one row: a top-level object of [`Node`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRecord {
    fields: IndexMap<String, Node>,
}

impl PartialRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-set `value` at `path`. An index at the top level is used as a
    /// property name, since the record itself is always an object.
    pub fn set(&mut self, path: &[Segment], value: Value) {
        let Some((head, rest)) = path.split_first() else {
            return;
        };
        let key = match head {
            Segment::Key(name) => name.clone(),
            other => other.to_string(),
        };
        self.fields
            .entry(key)
            .or_insert(Node::Value(Value::Null))
            .set(rest, value);
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_value(self) -> Value {
        Node::Object(self.fields).into_value()
    }

    /// Merge into the object `target`.
    ///
    /// Top-level keys for which `first_wins` holds are only written when
    /// `target` does not have them yet.
    pub fn merge_into(self, target: &mut Value, first_wins: impl Fn(&str) -> bool) {
        if !target.is_object() {
            *target = Value::Object(Map::new());
        }
        let Value::Object(map) = target else {
            return;
        };
        for (key, node) in self.fields {
            if first_wins(&key) && map.contains_key(&key) {
                continue;
            }
            node.merge_into(map.entry(key).or_insert(Value::Null));
        }
    }
}
