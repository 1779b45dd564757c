use wlm_fold::{ConfigError, FoldError};

/// Errors from folding and decoding catalog rows.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fold(#[from] FoldError),

    /// Folded output does not match the entity type.
    #[error("{entity} {index}: {source}")]
    Decode {
        entity: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}
