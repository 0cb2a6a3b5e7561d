//! Best-match aggregation for one image-set pair
//!
//! For each image on the shorter side, find the best similarity it achieves
//! against any image on the longer side, then fold those best-match values
//! into a min/max/mean triple. NaN marks an undefined comparison and flows
//! through the fold instead of being masked.

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::error::CompareError;

/// Min / max / mean of per-image best-match similarities.
///
/// NaN components are meaningful: they mark comparisons that were undefined
/// (empty listing side, or degenerate vectors all the way down). Serializes
/// as a 3-element sequence `[min, max, mean]`; with serde_json, NaN
/// components come out as `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityTriple {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl SimilarityTriple {
    /// The all-NaN triple emitted for pairs with an empty side.
    pub const UNDEFINED: Self = Self {
        min: f32::NAN,
        max: f32::NAN,
        mean: f32::NAN,
    };

    /// True when every component is NaN.
    pub fn is_undefined(&self) -> bool {
        self.min.is_nan() && self.max.is_nan() && self.mean.is_nan()
    }

    pub fn as_array(&self) -> [f32; 3] {
        [self.min, self.max, self.mean]
    }
}

impl Serialize for SimilarityTriple {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element(&self.min)?;
        seq.serialize_element(&self.max)?;
        seq.serialize_element(&self.mean)?;
        seq.end()
    }
}

/// Compute best-match similarity statistics for one pair of image sets.
///
/// The shorter side drives the outer loop (the minority side); when both
/// sides have equal length the left side stays the minority. This is an
/// observable contract, not an internal detail: it decides which side's
/// best-match values feed the min/max/mean fold.
///
/// Undefined (NaN) similarities never update a best-match; a best-match
/// stays NaN only when every comparison for that image was undefined. In
/// the fold, NaN best-matches skip the min/max bounds but poison the
/// running sum, and with it the mean.
///
/// Both sides must be non-empty — emptiness is handled one level up, at the
/// pair granularity, where it yields an all-undefined record.
pub fn aggregate<V, F>(left: &[V], right: &[V], sim: F) -> Result<SimilarityTriple, CompareError>
where
    V: AsRef<[f32]>,
    F: Fn(&[f32], &[f32]) -> f32,
{
    if left.is_empty() || right.is_empty() {
        return Err(CompareError::EmptySide);
    }

    // Swap only on strictly greater, so equal lengths keep left as minority.
    let (minority, majority) = if left.len() > right.len() {
        (right, left)
    } else {
        (left, right)
    };

    let mut min = f32::NAN;
    let mut max = f32::NAN;
    let mut sum = 0.0f32;

    for probe in minority {
        let mut best = f32::NAN;
        for candidate in majority {
            let s = sim(probe.as_ref(), candidate.as_ref());
            if s.is_nan() {
                continue;
            }
            if best.is_nan() || s > best {
                best = s;
            }
        }

        if !best.is_nan() {
            if min.is_nan() || best < min {
                min = best;
            }
            if max.is_nan() || best > max {
                max = best;
            }
        }
        // NaN stays in the sum on purpose: one undefined best-match makes
        // the mean undefined.
        sum += best;
    }

    Ok(SimilarityTriple {
        min,
        max,
        mean: sum / minority.len() as f32,
    })
}
