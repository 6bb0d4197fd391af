use std::path::Path;

use profile_structs::CustomerProfile;
use serde::Serialize;
use tracing::debug;

use crate::booster::BoostedTrees;
use crate::record::TabularRecord;
use crate::{InferenceError, ModelLoadError};

/// Probability at or above which a customer is predicted to purchase.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// A trained binary classifier.
pub trait Classifier: Send + Sync {
    /// Returns the probability that the positive class applies to `record`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not fit the model's input schema.
    fn predict_proba(&self, record: &TabularRecord) -> Result<f64, InferenceError>;
}

/// Outcome of one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Purchase probability in `[0, 1]`
    pub probability: f64,

    /// 1 if the customer is predicted to purchase, else 0
    pub label: u8,
}

impl PredictionResult {
    /// Applies the decision threshold to a probability.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        Self {
            probability,
            label: u8::from(probability >= DECISION_THRESHOLD),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label_text(&self) -> &'static str {
        if self.label == 1 {
            "Will Purchase (1)"
        } else {
            "Will Not Purchase (0)"
        }
    }

    /// Probability with three decimals.
    #[must_use]
    pub fn probability_text(&self) -> String {
        format!("{:.3}", self.probability)
    }
}

/// Turns profiles into predictions with a loaded classifier.
pub struct InferencePipeline {
    classifier: Box<dyn Classifier>,
}

impl InferencePipeline {
    /// Wraps an already loaded classifier.
    pub fn new(classifier: impl Classifier + 'static) -> Self {
        Self {
            classifier: Box::new(classifier),
        }
    }

    /// Loads a boosted tree model from an XGBoost JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded.
    pub fn load(model_path: &Path) -> Result<Self, ModelLoadError> {
        BoostedTrees::load(model_path).map(Self::new)
    }

    /// Scores one profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile does not fit the model's schema or the
    /// classifier produces something other than a probability.
    pub fn predict(&self, profile: &CustomerProfile) -> Result<PredictionResult, InferenceError> {
        let record = TabularRecord::from(profile);
        let probability = self.classifier.predict_proba(&record)?;

        if !(0.0..=1.0).contains(&probability) {
            return Err(InferenceError::InvalidProbability(probability));
        }

        let result = PredictionResult::from_probability(probability);
        debug!(probability, label = result.label, "Scored profile");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use profile_structs::{CityTier, Designation};

    use super::*;

    /// Returns a fixed probability regardless of input.
    struct Constant(f64);

    impl Classifier for Constant {
        fn predict_proba(&self, _record: &TabularRecord) -> Result<f64, InferenceError> {
            Ok(self.0)
        }
    }

    /// Returns the income share of a million, which responds to the input.
    struct IncomeShare;

    impl Classifier for IncomeShare {
        fn predict_proba(&self, record: &TabularRecord) -> Result<f64, InferenceError> {
            let features = record.encode(&["MonthlyIncome".to_owned()])?;
            Ok(f64::from(features[0]) / 1_000_000.0)
        }
    }

    fn fixture_pipeline() -> InferencePipeline {
        let model = BoostedTrees::from_slice(include_bytes!("../testdata/tourism_xgb.json"))
            .unwrap();
        InferencePipeline::new(model)
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(PredictionResult::from_probability(0.5).label, 1);
        assert_eq!(PredictionResult::from_probability(0.499_999).label, 0);
        assert_eq!(PredictionResult::from_probability(1.0).label, 1);
        assert_eq!(PredictionResult::from_probability(0.0).label, 0);
    }

    #[test]
    fn test_boundary_through_pipeline() {
        let pipeline = InferencePipeline::new(Constant(0.5));
        let result = pipeline.predict(&CustomerProfile::default()).unwrap();
        assert_eq!(result.label, 1);
        assert_eq!(result.label_text(), "Will Purchase (1)");
        assert_eq!(result.probability_text(), "0.500");
    }

    #[test]
    fn test_label_matches_threshold_over_profiles() {
        let pipeline = InferencePipeline::new(IncomeShare);
        for income in (0..=1_000_000).step_by(50_000) {
            let profile = CustomerProfile {
                monthly_income: income,
                ..CustomerProfile::default()
            };
            let result = pipeline.predict(&profile).unwrap();
            assert!((0.0..=1.0).contains(&result.probability));
            assert_eq!(result.label == 1, result.probability >= DECISION_THRESHOLD);
        }
    }

    #[test]
    fn test_rejects_non_probability() {
        for bad in [1.5, -0.1, f64::NAN] {
            let pipeline = InferencePipeline::new(Constant(bad));
            assert!(matches!(
                pipeline.predict(&CustomerProfile::default()),
                Err(InferenceError::InvalidProbability(_))
            ));
        }
    }

    #[test]
    fn test_default_profile_predicts() {
        let result = fixture_pipeline()
            .predict(&CustomerProfile::default())
            .unwrap();
        assert_eq!(result.probability_text(), "0.354");
        assert_eq!(result.label, 0);
        assert_eq!(result.label_text(), "Will Not Purchase (0)");
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let pipeline = fixture_pipeline();
        let profile = CustomerProfile {
            age: 27,
            passport: 1,
            city_tier: CityTier::Tier3,
            designation: Designation::Manager,
            ..CustomerProfile::default()
        };
        let first = pipeline.predict(&profile).unwrap();
        let second = pipeline.predict(&profile).unwrap();
        assert_eq!(first.probability.to_bits(), second.probability.to_bits());
        assert_eq!(first.label, 1);
    }

    #[test]
    fn test_schema_mismatch_fails_submission() {
        let mut doc: serde_json::Value =
            serde_json::from_str(include_str!("../testdata/tourism_xgb.json")).unwrap();
        doc["learner"]["feature_names"][1] = serde_json::json!("AnnualIncome");
        let model = BoostedTrees::from_slice(&serde_json::to_vec(&doc).unwrap()).unwrap();

        let err = InferencePipeline::new(model)
            .predict(&CustomerProfile::default())
            .unwrap_err();
        assert!(matches!(
            err,
            InferenceError::SchemaMismatch { feature, .. } if feature == "AnnualIncome"
        ));
    }
}
