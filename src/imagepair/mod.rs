//! Image-pair similarity aggregation
//!
//! The core of the duplicate-detection feature pipeline: given the image
//! sets of two listings and per-model embedding stores, summarize cross-set
//! similarity as a min/max/mean triple per model. Deterministic, NaN-safe,
//! and free of shared mutable state, so batches can be partitioned across
//! threads at will.

mod aggregate;
mod comparator;
pub mod records;

pub use aggregate::{aggregate, SimilarityTriple};
pub use comparator::{BatchComparator, ImagePair, ResultRecord};
