use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::classify::ComplaintClassifier;
use super::domain::{ComplaintCategory, ComplaintPriority, ComplaintStatus};
use super::repository::{ComplaintRepository, ListFilter};
use super::service::{ComplaintRegistry, ListQuery, RegistryError};

/// Router builder exposing the public intake/tracking surface and the
/// privileged administrative surface.
pub fn registry_router<R, C>(service: Arc<ComplaintRegistry<R, C>>) -> Router
where
    R: ComplaintRepository + 'static,
    C: ComplaintClassifier + 'static,
{
    Router::new()
        .route("/api/v1/complaints", post(submit_handler::<R, C>))
        .route(
            "/api/v1/complaints/:complaint_id/track",
            get(track_handler::<R, C>),
        )
        .route("/api/v1/admin/complaints", get(list_handler::<R, C>))
        .route(
            "/api/v1/admin/complaints/:complaint_id",
            get(get_handler::<R, C>),
        )
        .route(
            "/api/v1/admin/complaints/:complaint_id/status",
            post(update_status_handler::<R, C>),
        )
        .route("/api/v1/admin/metrics", get(metrics_handler::<R, C>))
        .with_state(service)
}

/// Query parameters accepted by the privileged list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub status: Option<ComplaintStatus>,
    #[serde(default)]
    pub category: Option<ComplaintCategory>,
    #[serde(default)]
    pub priority: Option<ComplaintPriority>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        ListQuery {
            filter: ListFilter {
                status: params.status,
                category: params.category,
                priority: params.priority,
            },
            page: params.page,
            page_size: params.page_size,
        }
    }
}

/// Body of a privileged status update. The actor is carried explicitly
/// rather than read from ambient state.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ComplaintStatus,
    #[serde(default)]
    pub remarks: Option<String>,
    pub actor: String,
}

pub(crate) async fn submit_handler<R, C>(
    State(service): State<Arc<ComplaintRegistry<R, C>>>,
    Json(submission): Json<super::domain::ComplaintSubmission>,
) -> Response
where
    R: ComplaintRepository + 'static,
    C: ComplaintClassifier + 'static,
{
    match service.submit(submission) {
        // Receipt carries the identifier only, never the stored record.
        Ok(record) => (
            StatusCode::CREATED,
            Json(json!({ "complaint_id": record.id })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn track_handler<R, C>(
    State(service): State<Arc<ComplaintRegistry<R, C>>>,
    Path(complaint_id): Path<String>,
) -> Response
where
    R: ComplaintRepository + 'static,
    C: ComplaintClassifier + 'static,
{
    match service.track(&complaint_id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, C>(
    State(service): State<Arc<ComplaintRegistry<R, C>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    R: ComplaintRepository + 'static,
    C: ComplaintClassifier + 'static,
{
    match service.list(params.into()) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, C>(
    State(service): State<Arc<ComplaintRegistry<R, C>>>,
    Path(complaint_id): Path<String>,
) -> Response
where
    R: ComplaintRepository + 'static,
    C: ComplaintClassifier + 'static,
{
    match service.get(&complaint_id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_status_handler<R, C>(
    State(service): State<Arc<ComplaintRegistry<R, C>>>,
    Path(complaint_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Response
where
    R: ComplaintRepository + 'static,
    C: ComplaintClassifier + 'static,
{
    match service.update_status(
        &complaint_id,
        request.status,
        request.remarks,
        &request.actor,
    ) {
        Ok(record) => (StatusCode::OK, Json(record.tracking_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn metrics_handler<R, C>(
    State(service): State<Arc<ComplaintRegistry<R, C>>>,
) -> Response
where
    R: ComplaintRepository + 'static,
    C: ComplaintClassifier + 'static,
{
    match service.metrics() {
        Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: RegistryError) -> Response {
    let (status, payload) = match &error {
        RegistryError::Validation(validation) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": validation.to_string() }),
        ),
        // Unknown and malformed identifiers share one generic answer so the
        // tracking surface cannot be used to probe the identifier space.
        RegistryError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "not found" })),
        RegistryError::InvalidTransition { .. } => {
            (StatusCode::CONFLICT, json!({ "error": error.to_string() }))
        }
        RegistryError::Repository(repository) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": repository.to_string() }),
        ),
    };
    (status, Json(payload)).into_response()
}
