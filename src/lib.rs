//! Pairwise image-embedding similarity features for duplicate listing
//! detection.
//!
//! A listing pair carries two sets of images. For every configured
//! embedding model, this crate folds all cross-set comparisons into a
//! min/max/mean triple of per-image best-match similarities — the feature
//! columns a downstream duplicate classifier trains on. Embedding
//! extraction happens upstream; this crate only consumes resolved
//! `image id -> vector` tables through [`EmbeddingProvider`].

pub mod embeddings;
pub mod error;
pub mod imagepair;

// Re-export commonly used types
pub use embeddings::{
    cosine_similarity, EmbeddingProvider, EmbeddingStore, ImageId, InMemoryProvider, ModelName,
};
pub use error::CompareError;
pub use imagepair::{aggregate, BatchComparator, ImagePair, ResultRecord, SimilarityTriple};
