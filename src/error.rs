//! Error types for the comparison core
//!
//! Degenerate similarity values (NaN) and empty-side pairs are data, not
//! errors; only genuine contract violations land here.

use thiserror::Error;

use crate::embeddings::ImageId;

/// Fatal failures raised by store construction and batch comparison.
#[derive(Debug, Error)]
pub enum CompareError {
    /// An image referenced by a non-empty listing side has no embedding
    /// under a required model. Indicates an upstream extraction bug, so the
    /// whole batch aborts with no partial output.
    #[error("no embedding for image {image_id} under model '{model}'")]
    MissingEmbedding { image_id: ImageId, model: String },

    /// A vector with the wrong length for its model reached a store.
    #[error(
        "model '{model}' holds {expected}-dimensional embeddings, got {actual} for image {image_id}"
    )]
    DimensionMismatch {
        model: String,
        expected: usize,
        actual: usize,
        image_id: ImageId,
    },

    /// `aggregate` was handed an empty image set. Emptiness is handled one
    /// level up, at the pair granularity, where it yields all-undefined
    /// records instead of an error.
    #[error("cannot aggregate an empty image set")]
    EmptySide,
}
