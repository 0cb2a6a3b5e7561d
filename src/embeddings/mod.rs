//! Embeddings module - stores, providers, and similarity metrics
//!
//! The extraction stage (CNN inference over listing images) lives outside
//! this crate; it hands over fully resolved vectors through the
//! `EmbeddingProvider` trait. Everything below is a pure lookup layer.

pub mod models;
mod similarity;
mod store;

pub use models::{ModelDefinition, ModelRegistry};
pub use similarity::{cosine_similarity, euclidean_distance};
pub use store::EmbeddingStore;

use std::collections::{BTreeSet, HashMap};

use crate::error::CompareError;

/// Opaque image identifier, key into a store.
pub type ImageId = i64;

/// Fixed-length vector summarizing one image under one model.
pub type EmbeddingVector = Vec<f32>;

/// Key identifying which embedding model produced a vector.
pub type ModelName = String;

/// Bulk embedding resolution, supplied by the caller.
///
/// Must be total over the requested ids: an id the provider cannot resolve
/// indicates an upstream extraction bug and surfaces as
/// `CompareError::MissingEmbedding`, aborting the batch.
pub trait EmbeddingProvider: Send + Sync {
    /// Resolve every id in `ids` under `model` in one pass.
    fn resolve(&self, ids: &BTreeSet<ImageId>, model: &str)
        -> Result<EmbeddingStore, CompareError>;
}

/// Provider over fully precomputed vectors.
///
/// The normal deployment path when the extraction stage has already run for
/// the whole batch; also the test double.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    models: HashMap<ModelName, HashMap<ImageId, EmbeddingVector>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one vector under a model.
    pub fn insert(&mut self, model: impl Into<ModelName>, id: ImageId, vector: EmbeddingVector) {
        self.models.entry(model.into()).or_default().insert(id, vector);
    }

    /// Models this provider holds any vectors for, in sorted order.
    pub fn model_names(&self) -> Vec<ModelName> {
        let mut names: Vec<ModelName> = self.models.keys().cloned().collect();
        names.sort();
        names
    }
}

impl EmbeddingProvider for InMemoryProvider {
    fn resolve(
        &self,
        ids: &BTreeSet<ImageId>,
        model: &str,
    ) -> Result<EmbeddingStore, CompareError> {
        let vectors = self.models.get(model);
        let mut store = EmbeddingStore::new(model);
        for &id in ids {
            let vector = vectors
                .and_then(|m| m.get(&id))
                .ok_or_else(|| CompareError::MissingEmbedding {
                    image_id: id,
                    model: model.to_string(),
                })?;
            store.insert(id, vector.clone())?;
        }
        Ok(store)
    }
}
