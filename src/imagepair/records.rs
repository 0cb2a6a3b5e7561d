//! Line-oriented wire formats for the upstream orchestration layer
//!
//! The pairing stage feeds one JSON record per line; each side of a pair is
//! a comma-separated id list, with the empty string meaning a listing with
//! no images. Output records serialize as `model -> [min, max, mean]`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::embeddings::ImageId;

use super::comparator::{ImagePair, ResultRecord};

/// One listing-pair record as produced by the upstream pairing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairRecord {
    pub images_array_1: String,
    pub images_array_2: String,
}

impl PairRecord {
    /// Parse both sides into an `ImagePair`.
    pub fn to_image_pair(&self) -> Result<ImagePair> {
        Ok(ImagePair::new(
            parse_id_list(&self.images_array_1)?,
            parse_id_list(&self.images_array_2)?,
        ))
    }
}

/// Parse a comma-separated id list such as `"123, 456"`.
///
/// Blank segments are skipped, so `""` parses to an empty side and a
/// trailing comma is harmless. A non-numeric segment is an error.
pub fn parse_id_list(raw: &str) -> Result<Vec<ImageId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment
                .parse::<ImageId>()
                .with_context(|| format!("Invalid image id '{}' in '{}'", segment, raw))
        })
        .collect()
}

/// Serialize one result record as a JSON object `model -> [min, max, mean]`.
///
/// Undefined (NaN) components come out as `null`, serde_json's convention
/// for non-finite floats. Keys are already in sorted model order because
/// `ResultRecord` is a `BTreeMap`.
pub fn record_to_json(record: &ResultRecord) -> Result<String> {
    serde_json::to_string(record).context("Failed to serialize result record")
}
