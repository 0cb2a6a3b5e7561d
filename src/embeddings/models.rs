//! Model registry for embedding backbones
//!
//! The networks themselves never load here — extraction runs upstream. The
//! registry pins down which models a batch is expected to carry, their
//! dimensionality, and the metric their vectors were trained for, so that
//! resolved stores can be validated before a comparison starts.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::{EmbeddingStore, ModelName};

/// One embedding backbone as declared in the registry file.
#[derive(Debug, Deserialize, Clone)]
pub struct ModelDefinition {
    pub name: String,
    pub dimensions: usize,
    /// Similarity metric the embeddings were trained for ("cosine", "euclidean")
    pub metric: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Registry of embedding models (from a TOML file).
///
/// Loaded once per batch and read-only afterwards.
#[derive(Debug, Deserialize)]
pub struct ModelRegistry {
    pub models: HashMap<String, ModelDefinition>,
}

impl ModelRegistry {
    /// Load a model registry from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model registry: {}", path.display()))?;

        toml::from_str(&content).context("Failed to parse model registry TOML")
    }

    /// Get model definition by name
    pub fn get_model(&self, name: &str) -> Result<&ModelDefinition> {
        self.models
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Model '{}' not found in registry", name))
    }

    /// Model names in sorted order — the ordering every result record in a
    /// batch uses for its keys.
    pub fn model_names(&self) -> Vec<ModelName> {
        let mut names: Vec<ModelName> = self.models.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check a resolved store against the registry's declared dimension.
    pub fn validate_store(&self, store: &EmbeddingStore) -> Result<()> {
        let def = self.get_model(store.model())?;
        if let Some(dimension) = store.dimension() {
            if dimension != def.dimensions {
                anyhow::bail!(
                    "Model '{}' expects {} dimensions, store holds {}-dimensional vectors",
                    def.name,
                    def.dimensions,
                    dimension
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const REGISTRY_TOML: &str = r#"
[models.bn]
name = "inception-bn"
dimensions = 1024
metric = "cosine"

[models.v3]
name = "inception-v3"
dimensions = 2048
metric = "cosine"
description = "Inception-7 checkpoint"

[models."21k"]
name = "inception-21k"
dimensions = 1024
metric = "cosine"
"#;

    fn write_registry() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(REGISTRY_TOML.as_bytes()).expect("write");
        file
    }

    #[test]
    fn test_load_registry() {
        let file = write_registry();
        let registry = ModelRegistry::load(file.path()).expect("Failed to load registry");
        assert!(registry.models.contains_key("bn"));
        assert!(registry.models.contains_key("21k"));
    }

    #[test]
    fn test_get_model() {
        let file = write_registry();
        let registry = ModelRegistry::load(file.path()).unwrap();
        let model = registry.get_model("v3").unwrap();
        assert_eq!(model.dimensions, 2048);
        assert_eq!(model.metric, "cosine");
        assert!(registry.get_model("nope").is_err());
    }

    #[test]
    fn test_model_names_sorted() {
        let file = write_registry();
        let registry = ModelRegistry::load(file.path()).unwrap();
        assert_eq!(registry.model_names(), vec!["21k", "bn", "v3"]);
    }

    #[test]
    fn test_validate_store() {
        let file = write_registry();
        let registry = ModelRegistry::load(file.path()).unwrap();

        let good = EmbeddingStore::with_dimension("bn", 1024);
        assert!(registry.validate_store(&good).is_ok());

        let mut bad = EmbeddingStore::new("bn");
        bad.insert(1, vec![0.0; 10]).unwrap();
        assert!(registry.validate_store(&bad).is_err());
    }
}
