use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use profile_structs::CustomerProfile;
use serde::Serialize;
use tracing::warn;

use crate::context::AppContext;
use crate::error::SubmissionError;
use crate::handler::handle_submission;
use crate::render::{Outcome, Page};

type AppState = State<Arc<AppContext>>;

/// Builds the service router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_json))
        .route("/health", get(health))
        .with_state(ctx)
}

fn page(ctx: &AppContext, values: &HashMap<String, String>, outcome: &Outcome) -> Html<String> {
    Html(
        Page {
            metadata: ctx.metadata(),
            model_repo: ctx.model_repo(),
            values,
            outcome,
        }
        .render(),
    )
}

async fn index(State(ctx): AppState) -> Html<String> {
    page(&ctx, &CustomerProfile::default().to_form(), &Outcome::Empty)
}

async fn predict_form(
    State(ctx): AppState,
    Form(values): Form<HashMap<String, String>>,
) -> Response {
    let result = CustomerProfile::from_form(&values)
        .map_err(SubmissionError::from)
        .inspect_err(|err| warn!(error = %err, "Rejected profile"))
        .and_then(|profile| handle_submission(&ctx, &profile).map_err(SubmissionError::from));

    match result {
        Ok(prediction) => page(&ctx, &values, &Outcome::Prediction(prediction)).into_response(),
        Err(err) => {
            let status = err.status_code();
            let body = page(&ctx, &values, &Outcome::Error(err.page_message()));
            (status, body).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    probability: f64,
    label: u8,
    label_text: &'static str,
}

async fn predict_json(
    State(ctx): AppState,
    payload: Result<Json<CustomerProfile>, JsonRejection>,
) -> Result<Json<PredictResponse>, SubmissionError> {
    let Json(profile) =
        payload.inspect_err(|err| warn!(error = %err, "Rejected JSON profile"))?;
    profile.validate()?;
    let prediction = handle_submission(&ctx, &profile)?;

    Ok(Json(PredictResponse {
        probability: prediction.probability,
        label: prediction.label,
        label_text: prediction.label_text(),
    }))
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use tower::ServiceExt as _;

    use super::*;
    use crate::context::fixture_context;

    fn app() -> Router {
        router(Arc::new(fixture_context()))
    }

    async fn send(request: Request<Body>) -> (StatusCode, String) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn form_request(values: &HashMap<String, String>) -> Request<Body> {
        let body = values
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        Request::post("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(body: String) -> Request<Body> {
        Request::post("/api/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    /// Minimal form encoding; test values only contain spaces and word characters.
    fn encode(text: &str) -> String {
        text.replace(' ', "+")
    }

    #[tokio::test]
    async fn test_index_shows_form_and_metrics() {
        let (status, html) = send(Request::get("/").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Customer Profile"));
        assert!(html.contains("Model training metrics"));
        assert!(html.contains("&quot;roc_auc&quot;: 0.954"));
        assert!(html.contains("value=\"70000\""));
        assert!(!html.contains("Purchase Probability"));
    }

    #[tokio::test]
    async fn test_form_prediction_with_defaults() {
        let (status, html) = send(form_request(&CustomerProfile::default().to_form())).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Purchase Probability"));
        assert!(html.contains("0.354"));
        assert!(html.contains("Will Not Purchase (0)"));
    }

    #[tokio::test]
    async fn test_form_prediction_positive() {
        let mut values = CustomerProfile::default().to_form();
        values.insert("Age".to_owned(), "25".to_owned());
        values.insert("Passport".to_owned(), "1".to_owned());

        let (status, html) = send(form_request(&values)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("0.818"));
        assert!(html.contains("Will Purchase (1)"));
        assert!(html.contains("value=\"25\""));
    }

    #[tokio::test]
    async fn test_form_rejects_out_of_range_value() {
        let mut values = CustomerProfile::default().to_form();
        values.insert("Age".to_owned(), "150".to_owned());

        let (status, html) = send(form_request(&values)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(html.contains("Invalid input: Age must be between 18 and 90, got 150"));
        assert!(html.contains("value=\"150\""));
        assert!(html.contains("Customer Profile"));
    }

    #[tokio::test]
    async fn test_form_rejects_missing_field() {
        let mut values = CustomerProfile::default().to_form();
        values.remove("Designation");

        let (status, html) = send(form_request(&values)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(html.contains("Designation is required"));
    }

    #[tokio::test]
    async fn test_json_prediction() {
        let body = serde_json::to_string(&CustomerProfile::default()).unwrap();
        let (status, text) = send(json_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["label"], 0);
        assert_eq!(value["label_text"], "Will Not Purchase (0)");
        let probability = value["probability"].as_f64().unwrap();
        assert!((probability - 0.354).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_json_rejects_out_of_range_value() {
        let profile = CustomerProfile {
            monthly_income: -5,
            ..CustomerProfile::default()
        };
        let (status, text) = send(json_request(serde_json::to_string(&profile).unwrap())).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["code"], "INVALID_PROFILE");
    }

    async fn send_json_error(body: String) -> (StatusCode, serde_json::Value) {
        let (status, text) = send(json_request(body)).await;
        (status, serde_json::from_str(&text).unwrap())
    }

    fn default_profile_json() -> serde_json::Value {
        serde_json::to_value(CustomerProfile::default()).unwrap()
    }

    #[tokio::test]
    async fn test_json_rejects_unknown_choice() {
        let mut profile = default_profile_json();
        profile["ProductPitched"] = serde_json::json!("Platinum");

        let (status, value) = send_json_error(profile.to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(value["code"], "INVALID_PROFILE");
        assert!(value["message"].as_str().unwrap().contains("Platinum"));
    }

    #[tokio::test]
    async fn test_json_rejects_missing_field() {
        let mut profile = default_profile_json();
        profile.as_object_mut().unwrap().remove("Gender");

        let (status, value) = send_json_error(profile.to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(value["code"], "INVALID_PROFILE");
        assert!(value["message"].as_str().unwrap().contains("Gender"));
    }

    #[tokio::test]
    async fn test_json_rejects_malformed_body() {
        let (status, value) = send_json_error("{\"Age\": ".to_owned()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["code"], "INVALID_PROFILE");
    }

    #[tokio::test]
    async fn test_json_requires_content_type() {
        let body = serde_json::to_string(&CustomerProfile::default()).unwrap();
        let request = Request::post("/api/predict").body(Body::from(body)).unwrap();

        let (status, text) = send(request).await;
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(value["code"], "INVALID_PROFILE");
    }

    #[tokio::test]
    async fn test_form_accepts_income_off_the_spinner_grid() {
        let mut values = CustomerProfile::default().to_form();
        values.insert("MonthlyIncome".to_owned(), "70500".to_owned());

        let (status, html) = send(form_request(&values)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Purchase Probability"));
        assert!(html.contains("value=\"70500\""));
        assert!(!html.contains("step=\"1000\""));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
