//! Exact nearest-neighbour search over a collection.
//!
//! Every record is scored against the query in parallel with `rayon`; there
//! is no approximate index.

use crate::collection::types::Collection;
use crate::error::{Error, Result};
use crate::record::{RecordId, SearchResult};
use rayon::prelude::*;

impl Collection {
    /// Finds the `n` records closest to `query`.
    ///
    /// Results are ordered best-first according to the collection metric,
    /// with ties broken by ascending ID. When the config sets a relevancy
    /// threshold, records failing it are dropped before truncation. Records
    /// whose score is undefined (overflowing products give NaN) are never
    /// returned. An empty collection (or `n == 0`) yields no results.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVector`] for an empty or non-finite query and
    /// [`Error::DimensionMismatch`] if the query dimension differs from the
    /// collection's.
    pub fn search(&self, query: &[f32], n: usize) -> Result<Vec<SearchResult>> {
        if query.is_empty() {
            return Err(Error::InvalidVector("query vector is empty".to_string()));
        }
        if query.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidVector(
                "query vector holds a non-finite number".to_string(),
            ));
        }

        let Some(dimension) = self.dimension else {
            return Ok(Vec::new());
        };
        if query.len() != dimension {
            return Err(Error::DimensionMismatch {
                expected: dimension,
                actual: query.len(),
            });
        }

        if n == 0 || self.records.is_empty() {
            return Ok(Vec::new());
        }

        let metric = self.config.metric;
        let relevancy = self.config.relevancy;

        let mut scored: Vec<(RecordId, f32)> = self
            .records
            .par_iter()
            .map(|(id, record)| (*id, metric.calculate(query, &record.vector)))
            .filter(|(_, score)| !score.is_nan())
            .filter(|(_, score)| relevancy.map_or(true, |t| metric.passes_relevancy(*score, t)))
            .collect();

        metric.sort_results(&mut scored);
        scored.truncate(n);

        tracing::debug!(candidates = self.records.len(), returned = scored.len(), "search");

        Ok(scored
            .into_iter()
            .filter_map(|(id, score)| {
                self.records
                    .get(&id)
                    .map(|record| SearchResult::new(id, record.clone(), score))
            })
            .collect())
    }
}
