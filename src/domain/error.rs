// ============================================================
// Layer 3 — Pipeline Errors
// ============================================================
// Failures the domain and data layers report with a concrete
// kind, so callers (and tests) can match on them instead of
// parsing messages. The application layer wraps these in
// anyhow::Error together with file context.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Lookup of a token that the vocabulary has never seen
    /// and no unknown token is configured to absorb it.
    #[error("Token not found in vocabulary: {0:?}")]
    UnknownToken(String),

    /// Reverse lookup past the end of the vocabulary.
    #[error("Index {index} is out of range for a vocabulary of {len} tokens")]
    UnknownIndex { index: usize, len: usize },

    /// Registration attempted after the vocabulary was frozen.
    #[error("Cannot add token {0:?}: vocabulary is frozen")]
    FrozenVocabulary(String),

    /// A required header is absent from the input file.
    #[error("Required column '{0}' is missing from the input file")]
    MissingColumn(String),

    #[error("Surname {surname:?} encodes to {length} positions but max_seq_length is {max}")]
    SequenceTooLong {
        surname: String,
        length:  usize,
        max:     usize,
    },

    #[error("Delimiter {0:?} is not a single-byte ASCII character")]
    InvalidDelimiter(char),

    /// Serialized vocabulary contents that violate the density
    /// or special-token invariants.
    #[error("Malformed vocabulary: {0}")]
    MalformedVocabulary(String),

    #[error("Shape mismatch: {x_rows} surname rows but {y_rows} labels")]
    ShapeMismatch { x_rows: usize, y_rows: usize },
}
