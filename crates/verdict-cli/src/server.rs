//! HTTP endpoint.
//!
//! Each request is an independent, stateless call into the evaluator; the
//! only thing shared between requests is the read-only built-in registry.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use verdict_core::{DecisionRecord, EvaluationError, FieldSpec, ScenarioSummary};

use crate::inputs::{from_json_map, UnsupportedValue};

/// `POST /evaluate` body.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub scenario_id: String,
    #[serde(default)]
    pub inputs: BTreeMap<String, Value>,
}

/// Errors surfaced to HTTP callers.
#[derive(Debug)]
pub enum ApiError {
    Evaluation(EvaluationError),
    Unsupported(UnsupportedValue),
}

impl From<EvaluationError> for ApiError {
    fn from(value: EvaluationError) -> Self {
        Self::Evaluation(value)
    }
}

impl From<UnsupportedValue> for ApiError {
    fn from(value: UnsupportedValue) -> Self {
        Self::Unsupported(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Evaluation(EvaluationError::UnknownScenario { id }) => (
                StatusCode::NOT_FOUND,
                json!({ "error": self.to_string(), "scenario_id": id }),
            ),
            ApiError::Evaluation(EvaluationError::InvalidInput { field, issue }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string(), "field": field, "issue": issue }),
            ),
            ApiError::Unsupported(UnsupportedValue { field }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string(), "field": field }),
            ),
            ApiError::Evaluation(EvaluationError::Catalogue(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Evaluation(err) => write!(f, "{err}"),
            ApiError::Unsupported(err) => write!(f, "{err}"),
        }
    }
}

/// Router exposing the evaluator and the scenario catalogue.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/scenarios", get(scenarios_handler))
        .route("/scenarios/:scenario_id/fields", get(fields_handler))
        .route("/evaluate", post(evaluate_handler))
}

async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn scenarios_handler() -> Json<Vec<ScenarioSummary>> {
    Json(verdict_core::list_scenarios())
}

async fn fields_handler(
    Path(scenario_id): Path<String>,
) -> Result<Json<&'static [FieldSpec]>, ApiError> {
    Ok(Json(verdict_core::get_fields(&scenario_id)?))
}

async fn evaluate_handler(
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<DecisionRecord>, ApiError> {
    let inputs = from_json_map(request.inputs)?;

    match verdict_core::evaluate(&request.scenario_id, &inputs) {
        Ok(record) => Ok(Json(record)),
        Err(err) => {
            warn!(scenario = %request.scenario_id, error = %err, "evaluation rejected");
            Err(err.into())
        }
    }
}

/// Bind and serve until the process is stopped.
pub async fn run(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "verdict evaluator listening");

    axum::serve(listener, router()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn call(request: Request<Body>) -> (StatusCode, Value) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_evaluate(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/evaluate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn evaluate_returns_decision() {
        let (status, body) = call(post_evaluate(json!({
            "scenario_id": "housing_loan",
            "inputs": { "creditScore": 750, "income": "1200000", "debt": "50000" }
        })))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "Denied");
        assert_eq!(body["key_factor"], "Debt-to-Income Ratio");
    }

    #[tokio::test]
    async fn unknown_scenario_is_not_found() {
        let (status, body) = call(post_evaluate(json!({
            "scenario_id": "car_loan",
            "inputs": {}
        })))
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["scenario_id"], "car_loan");
    }

    #[tokio::test]
    async fn invalid_input_names_field() {
        let (status, body) = call(post_evaluate(json!({
            "scenario_id": "scholarship",
            "inputs": { "percentage": "abc", "income": "250000" }
        })))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "percentage");
        assert_eq!(body["issue"]["issue"], "not_a_number");
    }

    #[tokio::test]
    async fn boolean_input_is_rejected() {
        let (status, body) = call(post_evaluate(json!({
            "scenario_id": "student_loan",
            "inputs": { "admission": true, "fees": 1, "parentIncome": 1 }
        })))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "admission");
    }

    #[tokio::test]
    async fn fields_endpoint_lists_schema() {
        let request = Request::builder()
            .uri("/scenarios/business_grant/fields")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[3]["id"], "sector");
        assert_eq!(body[3]["kind"], "enum");
    }

    #[tokio::test]
    async fn scenarios_endpoint_lists_catalogue() {
        let request = Request::builder()
            .uri("/scenarios")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(4));
    }
}
