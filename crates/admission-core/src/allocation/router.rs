use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::CandidateId;
use super::repository::{AdmissionRepository, PublicationGate, RulesStore};
use super::rules::CategoryRules;
use super::service::{AllocationService, AllocationServiceError};

/// Router builder exposing the admin allocation endpoints and the
/// candidate-facing result endpoint.
pub fn admission_router<R, S, G>(service: Arc<AllocationService<R, S, G>>) -> Router
where
    R: AdmissionRepository + 'static,
    S: RulesStore + 'static,
    G: PublicationGate + 'static,
{
    Router::new()
        .route(
            "/api/v1/admin/allocation/run",
            post(run_allocation_handler::<R, S, G>),
        )
        .route(
            "/api/v1/admin/category-rules",
            get(rules_handler::<R, S, G>).put(update_rules_handler::<R, S, G>),
        )
        .route(
            "/api/v1/admin/results/publish",
            post(publish_handler::<R, S, G>),
        )
        .route(
            "/api/v1/admin/results/unpublish",
            post(unpublish_handler::<R, S, G>),
        )
        .route(
            "/api/v1/admin/seat-matrix",
            get(seat_matrix_handler::<R, S, G>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/result",
            get(result_handler::<R, S, G>),
        )
        .with_state(service)
}

pub(crate) async fn run_allocation_handler<R, S, G>(
    State(service): State<Arc<AllocationService<R, S, G>>>,
) -> Response
where
    R: AdmissionRepository + 'static,
    S: RulesStore + 'static,
    G: PublicationGate + 'static,
{
    match service.run_allocation() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rules_handler<R, S, G>(
    State(service): State<Arc<AllocationService<R, S, G>>>,
) -> Response
where
    R: AdmissionRepository + 'static,
    S: RulesStore + 'static,
    G: PublicationGate + 'static,
{
    match service.rules() {
        Ok(rules) => (StatusCode::OK, axum::Json(rules)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_rules_handler<R, S, G>(
    State(service): State<Arc<AllocationService<R, S, G>>>,
    axum::Json(rules): axum::Json<CategoryRules>,
) -> Response
where
    R: AdmissionRepository + 'static,
    S: RulesStore + 'static,
    G: PublicationGate + 'static,
{
    match service.update_rules(rules) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PublishRequest {
    pub(crate) doc_verification_date: NaiveDate,
}

pub(crate) async fn publish_handler<R, S, G>(
    State(service): State<Arc<AllocationService<R, S, G>>>,
    axum::Json(request): axum::Json<PublishRequest>,
) -> Response
where
    R: AdmissionRepository + 'static,
    S: RulesStore + 'static,
    G: PublicationGate + 'static,
{
    match service.publish(request.doc_verification_date) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn unpublish_handler<R, S, G>(
    State(service): State<Arc<AllocationService<R, S, G>>>,
) -> Response
where
    R: AdmissionRepository + 'static,
    S: RulesStore + 'static,
    G: PublicationGate + 'static,
{
    match service.unpublish() {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn seat_matrix_handler<R, S, G>(
    State(service): State<Arc<AllocationService<R, S, G>>>,
) -> Response
where
    R: AdmissionRepository + 'static,
    S: RulesStore + 'static,
    G: PublicationGate + 'static,
{
    match service.seat_matrix() {
        Ok(matrix) => (StatusCode::OK, axum::Json(matrix)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn result_handler<R, S, G>(
    State(service): State<Arc<AllocationService<R, S, G>>>,
    Path(candidate_id): Path<u64>,
) -> Response
where
    R: AdmissionRepository + 'static,
    S: RulesStore + 'static,
    G: PublicationGate + 'static,
{
    match service.result_for(&CandidateId(candidate_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AllocationServiceError) -> Response {
    let status = match &error {
        AllocationServiceError::ResultsNotPublished => StatusCode::FORBIDDEN,
        AllocationServiceError::Rules(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
