//! # Error Types

/// Errors from wordlattice operations.
///
/// Conditions which the training loop absorbs (unsegmentable lines,
/// empty normalized lines, pruning past the end of the vocabulary)
/// are not errors; see [`crate::lattice::BestPath`] and
/// [`crate::training::TrainingStats`].
#[derive(Debug, thiserror::Error)]
pub enum LatticeError {
    /// A model file did not have the expected structure.
    #[error("malformed model: {0}")]
    MalformedModel(String),

    /// Trainer or tokenizer options are unusable.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for wordlattice operations.
pub type WLResult<T> = core::result::Result<T, LatticeError>;
