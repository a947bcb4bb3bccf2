//! Weighted random choice over named weights

use crate::contract::DatagenError;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

/// Draws one name per call with probability `weight / sum(weights)`.
///
/// Weights need not be normalized. The random source is supplied on every
/// draw; seed it to get reproducible runs.
#[derive(Debug, Clone)]
pub struct WeightedSampler<K> {
    names: Vec<K>,
    index: WeightedIndex<f64>,
}

impl<K> WeightedSampler<K> {
    /// Build a sampler, rejecting empty, all-zero, negative or non-finite
    /// weight sets
    pub fn new<I>(weights: I) -> Result<Self, DatagenError>
    where
        I: IntoIterator<Item = (K, f64)>,
    {
        let (names, weights): (Vec<K>, Vec<f64>) = weights.into_iter().unzip();

        if names.is_empty() {
            return Err(DatagenError::InvalidWeights {
                reason: "weight set is empty".to_string(),
            });
        }

        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(DatagenError::InvalidWeights {
                reason: format!("weights must be finite and non-negative, got {}", bad),
            });
        }

        if weights.iter().all(|w| *w == 0.0) {
            return Err(DatagenError::InvalidWeights {
                reason: "all weights are zero".to_string(),
            });
        }

        let index = WeightedIndex::new(&weights).map_err(|e| DatagenError::InvalidWeights {
            reason: e.to_string(),
        })?;

        Ok(Self { names, index })
    }

    /// Draw one name
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &K {
        &self.names[self.index.sample(rng)]
    }

    /// Number of candidate names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
