use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ml_model::InferenceError;
use profile_structs::ProfileError;
use thiserror::Error;

/// A failed submission, for one request only.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The profile is outside its declared domain. HTTP 422.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// The JSON body is not a well-formed profile. Status from the rejection,
    /// 422 for a body that parses but does not fit the profile.
    #[error("{}", .0.body_text())]
    InvalidJson(#[from] JsonRejection),

    /// The model could not score the profile. HTTP 500.
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl SubmissionError {
    /// Stable, machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Profile(_) | Self::InvalidJson(_) => "INVALID_PROFILE",
            Self::Inference(_) => "INFERENCE_FAILED",
        }
    }

    /// HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Profile(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidJson(rejection) => rejection.status(),
            Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown inline on the page.
    #[must_use]
    pub fn page_message(&self) -> String {
        match self {
            Self::Profile(_) | Self::InvalidJson(_) => format!("Invalid input: {self}"),
            Self::Inference(err) => format!("Prediction failed: {err}"),
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
