//! Error taxonomy for a generation run
//!
//! Every variant is fatal for the run. Nothing in the pipeline retries.

use super::model::Stage;

/// Retail datagen errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatagenError {
    /// Missing or malformed source catalog
    #[error("source document '{path}': {reason}")]
    Source {
        /// Path (or logical name) of the offending document
        path: String,
        /// What was wrong with it
        reason: String,
    },

    /// Invalid count/date/namespace configuration
    #[error("invalid configuration for {key}: {reason}")]
    Config {
        /// Configuration key
        key: String,
        /// Validation failure
        reason: String,
    },

    /// Write, clear or count failure reported by a sink
    #[error("sink failure in stage {stage} on collection '{collection}' at record {record_index}: {reason}")]
    Sink {
        /// Stage that was running
        stage: Stage,
        /// Target collection
        collection: String,
        /// Index of the first record of the failed batch
        record_index: usize,
        /// Underlying sink error
        reason: String,
    },

    /// A generator referenced an identifier that no earlier stage produced.
    /// Indicates a stage-ordering bug.
    #[error("integrity violation in stage {stage} at record {index}: unknown {kind} '{key}'")]
    Integrity {
        /// Stage that was running
        stage: Stage,
        /// Record index within the stage
        index: usize,
        /// Kind of lookup (store, product, category)
        kind: String,
        /// The key that was not found
        key: String,
    },

    /// Weight set rejected by the weighted sampler
    #[error("invalid weights: {reason}")]
    InvalidWeights {
        /// Rejection reason
        reason: String,
    },

    /// Seasonal multiplier sequence rejected by the transformer
    #[error("invalid seasonal multipliers: {reason}")]
    InvalidSeasonal {
        /// Rejection reason
        reason: String,
    },
}

impl DatagenError {
    pub(crate) fn source(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Source {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn integrity(
        stage: Stage,
        index: usize,
        kind: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self::Integrity {
            stage,
            index,
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// Stage the error is attributed to, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Sink { stage, .. } | Self::Integrity { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
