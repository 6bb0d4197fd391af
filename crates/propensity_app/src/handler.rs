//! Framework-independent request handling.

use ml_model::{InferenceError, PredictionResult};
use profile_structs::CustomerProfile;
use tracing::{error, info};

use crate::context::AppContext;

/// Scores one submitted profile against the loaded model.
///
/// Each call is independent: nothing is cached or retried.
///
/// # Errors
///
/// Returns an error if the model cannot score the profile.
pub fn handle_submission(
    ctx: &AppContext,
    profile: &CustomerProfile,
) -> Result<PredictionResult, InferenceError> {
    let result = ctx.pipeline().predict(profile);

    match &result {
        Ok(prediction) => info!(
            probability = prediction.probability,
            label = prediction.label,
            "Prediction served"
        ),
        Err(err) => error!(error = %err, "Prediction failed"),
    }

    result
}

#[cfg(test)]
mod tests {
    use ml_model::{Classifier, InferencePipeline, MetadataRecord, TabularRecord};

    use super::*;
    use crate::context::fixture_context;

    struct Broken;

    impl Classifier for Broken {
        fn predict_proba(&self, _record: &TabularRecord) -> Result<f64, InferenceError> {
            Err(InferenceError::SchemaMismatch {
                feature: "Region".to_owned(),
                reason: "no column with this name or prefix",
            })
        }
    }

    #[test]
    fn test_default_profile_succeeds() {
        let ctx = fixture_context();
        let result = handle_submission(&ctx, &CustomerProfile::default()).unwrap();
        assert_eq!(result.label, 0);
        assert_eq!(result.probability_text(), "0.354");
    }

    #[test]
    fn test_repeat_submissions_agree() {
        let ctx = fixture_context();
        let profile = CustomerProfile {
            passport: 1,
            ..CustomerProfile::default()
        };
        let first = handle_submission(&ctx, &profile).unwrap();
        let second = handle_submission(&ctx, &profile).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_failure_does_not_poison_context() {
        let ctx = AppContext::new(
            InferencePipeline::new(Broken),
            MetadataRecord::default(),
            "acme/broken".to_owned(),
        );
        for _ in 0..2 {
            assert!(handle_submission(&ctx, &CustomerProfile::default()).is_err());
        }
    }
}
