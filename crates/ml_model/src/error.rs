use std::path::PathBuf;

use thiserror::Error;

/// The serialized model could not be turned into a classifier.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to read model file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model file is not a valid XGBoost JSON document")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported objective {0:?}, expected binary:logistic")]
    UnsupportedObjective(String),

    #[error("unsupported booster {0:?}, expected gbtree")]
    UnsupportedBooster(String),

    #[error("model was saved without feature names")]
    MissingFeatureNames,

    #[error("invalid base_score {0:?}")]
    InvalidBaseScore(String),

    #[error("tree {tree} is malformed: {reason}")]
    MalformedTree { tree: usize, reason: String },
}

/// The metadata document could not be read.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read metadata file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("metadata file is not valid JSON")]
    Parse(#[from] serde_json::Error),
}

/// One submission could not be scored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("model feature {feature:?} does not match the profile schema: {reason}")]
    SchemaMismatch {
        feature: String,
        reason: &'static str,
    },

    #[error("classifier returned {0}, which is not a probability")]
    InvalidProbability(f64),
}
