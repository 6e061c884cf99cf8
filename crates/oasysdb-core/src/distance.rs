//! Distance metrics for vector similarity calculations.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::record::RecordId;

/// Distance metric for vector similarity calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean distance (L2 norm).
    /// Best for spatial data and when magnitude matters.
    #[default]
    Euclidean,

    /// Cosine similarity.
    /// Best for normalized vectors, commonly used with text embeddings.
    Cosine,

    /// Dot product (inner product).
    /// Best for maximum inner product search (MIPS).
    DotProduct,
}

impl DistanceMetric {
    /// Calculates the score between two vectors using the specified metric.
    ///
    /// Returns a distance for `Euclidean` (lower is more similar) and a
    /// similarity for `Cosine` and `DotProduct` (higher is more similar).
    /// A zero-norm vector has a cosine similarity of 0 with anything.
    ///
    /// Callers must pass vectors of equal length; extra components of the
    /// longer vector are ignored.
    #[must_use]
    #[inline]
    pub fn calculate(&self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "vectors must share a dimension");
        match self {
            Self::Euclidean => euclidean_distance(a, b),
            Self::Cosine => cosine_similarity(a, b),
            Self::DotProduct => dot_product(a, b),
        }
    }

    /// Returns whether higher values indicate more similarity.
    #[must_use]
    pub const fn higher_is_better(&self) -> bool {
        match self {
            Self::Cosine | Self::DotProduct => true,
            Self::Euclidean => false,
        }
    }

    /// Compares two scores so that the better one orders first.
    ///
    /// This is a total order: NaN scores, which finite vectors can still
    /// produce when products overflow, always order last.
    #[must_use]
    pub fn compare(&self, a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) if self.higher_is_better() => b.total_cmp(&a),
            (false, false) => a.total_cmp(&b),
        }
    }

    /// Returns true if `score` is at least as good as `threshold`.
    ///
    /// Distance metrics keep scores `<= threshold`, similarity metrics keep
    /// scores `>= threshold`.
    #[must_use]
    pub fn passes_relevancy(&self, score: f32, threshold: f32) -> bool {
        if self.higher_is_better() {
            score >= threshold
        } else {
            score <= threshold
        }
    }

    /// Sorts search results best-first according to the metric.
    ///
    /// Equal scores are ordered by ascending record ID so that results are
    /// deterministic.
    pub fn sort_results(&self, results: &mut [(RecordId, f32)]) {
        results.sort_by(|a, b| self.compare(a.1, b.1).then_with(|| a.0.cmp(&b.0)));
    }
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0_f32, 0.0_f32, 0.0_f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}
