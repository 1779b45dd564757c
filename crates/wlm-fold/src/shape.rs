//! Shape files: a group key plus a placement, stored as TOML or JSON.
//!
//! ```toml
//! group_key = "theater_id"
//!
//! [fields]
//! movie_id = "movies.[].movie_id"
//! title = ["movies", "[]", "title"]
//! ```

use crate::error::ConfigError;
use crate::grouper::RowGrouper;
use crate::mapper::FieldMapper;
use crate::placement::Placement;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Shape {
    /// Field whose value selects the output record. Mapping-only shapes
    /// leave it out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,

    #[serde(default)]
    pub fields: Placement,
}

impl Shape {
    pub fn new(group_key: Option<String>, fields: Placement) -> Self {
        Self { group_key, fields }
    }

    /// Load a shape file. `.json` files are parsed as JSON, everything else
    /// as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShapeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ShapeError::Io(format!("{}: {e}", path.display())))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ShapeError> {
        toml::from_str(text).map_err(|e| ShapeError::Parse(e.to_string()))
    }

    pub fn from_json_str(text: &str) -> Result<Self, ShapeError> {
        serde_json::from_str(text).map_err(|e| ShapeError::Parse(e.to_string()))
    }

    /// Replace the group key.
    pub fn with_group_key(mut self, group_key: impl Into<String>) -> Self {
        self.group_key = Some(group_key.into());
        self
    }

    pub fn grouper(&self) -> Result<RowGrouper, ConfigError> {
        let group_key = self
            .group_key
            .as_deref()
            .ok_or(ConfigError::MissingGroupKey)?;
        RowGrouper::new(group_key, self.fields.clone())
    }

    pub fn mapper(&self) -> Result<FieldMapper, ConfigError> {
        FieldMapper::from_placement(&self.fields)
    }
}

/// Errors from loading a shape file.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("parse error: {0}")]
    Parse(String),
}
