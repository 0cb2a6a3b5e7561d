//! Batch comparison across listing pairs and embedding models
//!
//! Drives the pair aggregation core over many listing pairs under every
//! configured model, producing one result record per pair in input order.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::embeddings::{EmbeddingProvider, EmbeddingStore, ImageId, ModelName};
use crate::error::CompareError;

use super::aggregate::{aggregate, SimilarityTriple};

/// The two sides of one listing-pair comparison. Either side may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePair {
    pub left: Vec<ImageId>,
    pub right: Vec<ImageId>,
}

impl ImagePair {
    pub fn new(left: Vec<ImageId>, right: Vec<ImageId>) -> Self {
        Self { left, right }
    }

    /// Pairs with an empty side compare to the all-undefined record.
    pub fn has_empty_side(&self) -> bool {
        self.left.is_empty() || self.right.is_empty()
    }

    fn image_ids(&self) -> impl Iterator<Item = ImageId> + '_ {
        self.left.iter().chain(self.right.iter()).copied()
    }
}

/// Per-pair output: one triple per model. `BTreeMap` keeps the keys in
/// sorted model order structurally, so downstream consumers see the same
/// column order on every record of every batch.
pub type ResultRecord = BTreeMap<ModelName, SimilarityTriple>;

/// Compares listing pairs against a fixed set of per-model embedding
/// stores.
///
/// The model set and its sorted ordering are fixed at construction and
/// reused for every record; stores are read-only for the comparator's
/// lifetime. No state is shared between pairs, which is what makes
/// `compare_par` a drop-in for `compare`.
#[derive(Debug)]
pub struct BatchComparator {
    /// Sorted by model name at construction.
    stores: Vec<(ModelName, EmbeddingStore)>,
}

impl BatchComparator {
    /// Build from already-resolved per-model stores. Insertion order of the
    /// input does not matter; models are sorted by name here.
    pub fn from_stores(stores: impl IntoIterator<Item = (ModelName, EmbeddingStore)>) -> Self {
        let mut stores: Vec<(ModelName, EmbeddingStore)> = stores.into_iter().collect();
        stores.sort_by(|a, b| a.0.cmp(&b.0));
        debug!(models = stores.len(), "batch comparator ready");
        Self { stores }
    }

    /// Bulk-resolve every image id referenced by `pairs` (union over both
    /// sides of all pairs) under each model — one resolution pass per
    /// model, never one lookup per pair.
    pub fn resolve<P: EmbeddingProvider>(
        provider: &P,
        models: &[ModelName],
        pairs: &[ImagePair],
    ) -> Result<Self, CompareError> {
        let ids: BTreeSet<ImageId> = pairs.iter().flat_map(ImagePair::image_ids).collect();
        debug!(
            pairs = pairs.len(),
            models = models.len(),
            ids = ids.len(),
            "resolving embeddings for batch"
        );

        let mut stores = Vec::with_capacity(models.len());
        for model in models {
            let store = provider.resolve(&ids, model)?;
            stores.push((model.clone(), store));
        }
        Ok(Self::from_stores(stores))
    }

    /// Model names in the sorted order used for every record.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.stores.iter().map(|(name, _)| name.as_str())
    }

    /// Compare every pair in input order.
    ///
    /// A missing embedding aborts the whole batch — partial output would
    /// silently hide an upstream extraction bug.
    pub fn compare<F>(&self, pairs: &[ImagePair], sim: F) -> Result<Vec<ResultRecord>, CompareError>
    where
        F: Fn(&[f32], &[f32]) -> f32,
    {
        pairs
            .iter()
            .map(|pair| self.compare_pair(pair, &sim))
            .collect()
    }

    /// Rayon-parallel `compare`. Identical contract and output: the cores
    /// are pure, so partitioning over the thread pool preserves input
    /// order and determinism.
    pub fn compare_par<F>(
        &self,
        pairs: &[ImagePair],
        sim: F,
    ) -> Result<Vec<ResultRecord>, CompareError>
    where
        F: Fn(&[f32], &[f32]) -> f32 + Sync,
    {
        pairs
            .par_iter()
            .map(|pair| self.compare_pair(pair, &sim))
            .collect()
    }

    fn compare_pair<F>(&self, pair: &ImagePair, sim: &F) -> Result<ResultRecord, CompareError>
    where
        F: Fn(&[f32], &[f32]) -> f32,
    {
        if pair.has_empty_side() {
            trace!(
                left = pair.left.len(),
                right = pair.right.len(),
                "empty side, emitting undefined record"
            );
            return Ok(self.undefined_record());
        }

        let mut record = ResultRecord::new();
        for (model, store) in &self.stores {
            let left = Self::gather(store, &pair.left)?;
            let right = Self::gather(store, &pair.right)?;
            let triple = aggregate(&left, &right, sim)?;
            record.insert(model.clone(), triple);
        }
        Ok(record)
    }

    /// Record mapping every model to the all-NaN triple.
    fn undefined_record(&self) -> ResultRecord {
        self.stores
            .iter()
            .map(|(model, _)| (model.clone(), SimilarityTriple::UNDEFINED))
            .collect()
    }

    fn gather<'a>(
        store: &'a EmbeddingStore,
        ids: &[ImageId],
    ) -> Result<Vec<&'a [f32]>, CompareError> {
        ids.iter().map(|&id| store.require(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::cosine_similarity;

    fn two_model_comparator() -> BatchComparator {
        // Image 1 and 3 agree under "a"; image 2 and 3 agree under "b".
        let store_a = EmbeddingStore::from_vectors(
            "a",
            [(1, vec![1.0, 0.0]), (2, vec![0.0, 1.0]), (3, vec![1.0, 0.0])],
        )
        .unwrap();
        let store_b = EmbeddingStore::from_vectors(
            "b",
            [(1, vec![0.0, 1.0]), (2, vec![1.0, 0.0]), (3, vec![1.0, 0.0])],
        )
        .unwrap();
        BatchComparator::from_stores([("b".to_string(), store_b), ("a".to_string(), store_a)])
    }

    #[test]
    fn test_model_order_sorted_regardless_of_insertion() {
        let comparator = two_model_comparator();
        let names: Vec<&str> = comparator.model_names().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_two_model_scenario() {
        let comparator = two_model_comparator();
        let pairs = vec![ImagePair::new(vec![1, 2], vec![3])];

        let records = comparator.compare(&pairs, cosine_similarity).unwrap();
        assert_eq!(records.len(), 1);

        // Minority side is the right ([3]); its best match is 1.0 under
        // both models, from image 1 under "a" and image 2 under "b".
        for model in ["a", "b"] {
            let triple = records[0][model];
            assert_eq!(triple.as_array(), [1.0, 1.0, 1.0]);
        }
    }

    #[test]
    fn test_empty_side_yields_undefined_for_every_model() {
        let comparator = two_model_comparator();
        let pairs = vec![
            ImagePair::new(vec![], vec![1, 2]),
            ImagePair::new(vec![1], vec![]),
            ImagePair::new(vec![], vec![]),
        ];

        let records = comparator.compare(&pairs, cosine_similarity).unwrap();
        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(record.len(), 2);
            assert!(record.values().all(SimilarityTriple::is_undefined));
        }
    }

    #[test]
    fn test_missing_embedding_aborts_batch() {
        let store_a =
            EmbeddingStore::from_vectors("a", [(1, vec![1.0, 0.0]), (2, vec![0.0, 1.0])]).unwrap();
        let comparator = BatchComparator::from_stores([("a".to_string(), store_a)]);

        // Image 3 never got extracted.
        let pairs = vec![
            ImagePair::new(vec![1], vec![2]),
            ImagePair::new(vec![1], vec![3]),
        ];
        let err = comparator.compare(&pairs, cosine_similarity).unwrap_err();
        assert!(matches!(
            err,
            CompareError::MissingEmbedding { image_id: 3, .. }
        ));
    }

    #[test]
    fn test_input_order_preserved() {
        let comparator = two_model_comparator();
        let pairs = vec![
            ImagePair::new(vec![1], vec![2]),
            ImagePair::new(vec![], vec![2]),
            ImagePair::new(vec![1], vec![1]),
        ];

        let records = comparator.compare(&pairs, cosine_similarity).unwrap();
        assert_eq!(records.len(), 3);
        // 1 vs 2 are orthogonal under "a"; the empty pair is undefined;
        // 1 vs 1 is identical under both models.
        assert_eq!(records[0]["a"].as_array(), [0.0, 0.0, 0.0]);
        assert!(records[1]["a"].is_undefined());
        assert_eq!(records[2]["a"].as_array(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_compare_par_matches_compare() {
        let comparator = two_model_comparator();
        let pairs = vec![
            ImagePair::new(vec![1, 2], vec![3]),
            ImagePair::new(vec![], vec![3]),
            ImagePair::new(vec![2], vec![1, 3]),
            ImagePair::new(vec![3], vec![3]),
        ];

        let serial = comparator.compare(&pairs, cosine_similarity).unwrap();
        let parallel = comparator.compare_par(&pairs, cosine_similarity).unwrap();
        assert_eq!(serial.len(), parallel.len());
        for (s, p) in serial.iter().zip(parallel.iter()) {
            let s_keys: Vec<_> = s.keys().collect();
            let p_keys: Vec<_> = p.keys().collect();
            assert_eq!(s_keys, p_keys);
            for key in s.keys() {
                // NaN != NaN, so compare component-wise.
                for (a, b) in s[key].as_array().iter().zip(p[key].as_array()) {
                    assert!(a == &b || (a.is_nan() && b.is_nan()));
                }
            }
        }
    }
}
