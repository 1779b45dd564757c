//! Error types for folding operations.

/// Invalid placement or grouping configuration.
///
/// These are raised when a grouper or mapper is built, before any row is
/// looked at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A placeholder has no preceding segment to take a length from.
    #[error("path for `{field}` starts with a placeholder")]
    PlaceholderFirst { field: String },

    /// Only one array level per path can be resolved per row.
    #[error("path for `{field}` has more than one placeholder")]
    MultiplePlaceholders { field: String },

    /// Positions before a written element are padded, so they are bounded.
    #[error(
        "path for `{field}` names index {index}, above the limit of {max}",
        max = crate::path::MAX_INDEX
    )]
    IndexTooLarge { field: String, index: usize },

    #[error("path for `{field}` is empty")]
    EmptyPath { field: String },

    /// A mapper was given a path that still needs a row to resolve against.
    #[error("path for `{field}` has an unresolved placeholder")]
    UnresolvedPlaceholder { field: String },

    #[error("group key field name is empty")]
    EmptyGroupKey,

    /// A shape without `group_key` was used as a grouper.
    #[error("shape has no group key")]
    MissingGroupKey,
}

/// Errors raised while folding rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FoldError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The input at `index` is not a JSON object.
    #[error("row {index} is not an object (found {found})")]
    MalformedRow { index: usize, found: &'static str },
}
