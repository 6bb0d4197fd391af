//! ML model crate for purchase-propensity prediction.
//!
//! Loads a gradient-boosted tree classifier from an XGBoost JSON model,
//! encodes a customer profile into the model's feature vector and thresholds
//! the resulting probability into a purchase decision.

mod booster;
mod error;
mod metadata;
mod pipeline;
mod record;

pub use booster::BoostedTrees;
pub use error::{InferenceError, MetadataError, ModelLoadError};
pub use metadata::MetadataRecord;
pub use pipeline::{Classifier, DECISION_THRESHOLD, InferencePipeline, PredictionResult};
pub use record::TabularRecord;
