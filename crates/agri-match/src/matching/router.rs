use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::catalog::{AidCatalog, CatalogError};
use super::service::{
    EligibilityRequest, EvaluateRequest, MatchingRequest, MatchingService, MatchingServiceError,
};

/// Router builder exposing the matching and eligibility endpoints.
pub fn matching_router<C>(service: Arc<MatchingService<C>>) -> Router
where
    C: AidCatalog + 'static,
{
    Router::new()
        .route("/api/v1/matching", post(match_handler::<C>))
        .route("/api/v1/matching/evaluate", post(evaluate_handler::<C>))
        .route("/api/v1/eligibility", post(eligibility_handler::<C>))
        .with_state(service)
}

pub(crate) async fn match_handler<C>(
    State(service): State<Arc<MatchingService<C>>>,
    axum::Json(request): axum::Json<MatchingRequest>,
) -> Response
where
    C: AidCatalog + 'static,
{
    match service.match_profile(request) {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluate_handler<C>(
    State(service): State<Arc<MatchingService<C>>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    C: AidCatalog + 'static,
{
    match service.evaluate_pair(&request) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<C>(
    State(service): State<Arc<MatchingService<C>>>,
    axum::Json(request): axum::Json<EligibilityRequest>,
) -> Response
where
    C: AidCatalog + 'static,
{
    let listing = service.check_eligibility(&request);
    (StatusCode::OK, axum::Json(listing)).into_response()
}

fn error_response(error: MatchingServiceError) -> Response {
    let status = match &error {
        MatchingServiceError::Evaluation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MatchingServiceError::Catalog(CatalogError::Parse(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        MatchingServiceError::Catalog(CatalogError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
