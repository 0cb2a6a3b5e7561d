//! Per-model embedding lookup tables
//!
//! A store is populated once per batch (by the upstream extraction stage or
//! from precomputed vectors) and is read-only while comparisons run.

use std::collections::HashMap;

use crate::error::CompareError;

use super::{EmbeddingVector, ImageId, ModelName};

/// Read-only table of image embeddings for one model.
///
/// Every vector in a store has the same length. The dimension is either
/// declared up front (`with_dimension`) or pinned by the first insert;
/// later inserts that disagree fail with `DimensionMismatch`.
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    model: ModelName,
    dimension: Option<usize>,
    vectors: HashMap<ImageId, EmbeddingVector>,
}

impl EmbeddingStore {
    /// Create an empty store; dimension is pinned by the first insert.
    pub fn new(model: impl Into<ModelName>) -> Self {
        Self {
            model: model.into(),
            dimension: None,
            vectors: HashMap::new(),
        }
    }

    /// Create an empty store with a declared dimension.
    pub fn with_dimension(model: impl Into<ModelName>, dimension: usize) -> Self {
        Self {
            model: model.into(),
            dimension: Some(dimension),
            vectors: HashMap::new(),
        }
    }

    /// Build a store from precomputed `(id, vector)` pairs.
    pub fn from_vectors(
        model: impl Into<ModelName>,
        vectors: impl IntoIterator<Item = (ImageId, EmbeddingVector)>,
    ) -> Result<Self, CompareError> {
        let mut store = Self::new(model);
        for (id, vector) in vectors {
            store.insert(id, vector)?;
        }
        Ok(store)
    }

    /// Insert one embedding, enforcing dimension uniformity.
    pub fn insert(&mut self, id: ImageId, vector: EmbeddingVector) -> Result<(), CompareError> {
        match self.dimension {
            None => self.dimension = Some(vector.len()),
            Some(expected) if expected != vector.len() => {
                return Err(CompareError::DimensionMismatch {
                    model: self.model.clone(),
                    expected,
                    actual: vector.len(),
                    image_id: id,
                });
            }
            Some(_) => {}
        }
        self.vectors.insert(id, vector);
        Ok(())
    }

    /// Model this store holds vectors for.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Uniform vector length, if any vector has been inserted or a
    /// dimension was declared.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn get(&self, id: ImageId) -> Option<&[f32]> {
        self.vectors.get(&id).map(Vec::as_slice)
    }

    /// Lookup that treats absence as the fatal upstream bug it is.
    pub fn require(&self, id: ImageId) -> Result<&[f32], CompareError> {
        self.get(id).ok_or_else(|| CompareError::MissingEmbedding {
            image_id: id,
            model: self.model.clone(),
        })
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.vectors.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
