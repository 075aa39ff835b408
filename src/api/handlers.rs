//! HTTP request handlers for the attendance API.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::Permission;
use crate::engine::{Actor, MonthQuery};

use super::request::{BulkMarkBody, MarkBody, OverrideBody};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attendance/mark", post(mark_handler))
        .route("/attendance/override", post(override_handler))
        .route("/attendance/bulk", post(bulk_handler))
        .route("/attendance/:year/:month", get(records_handler))
        .route("/attendance/:year/:month/summary", get(summary_handler))
        .with_state(state)
}

/// Division filter accepted by the read endpoints.
#[derive(Debug, Deserialize)]
struct MonthFilter {
    division: Option<String>,
}

/// Translates a body rejection into the error envelope.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        ),
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error).into_response()
}

/// Resolves the calling actor from the gateway-injected headers.
fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, ApiErrorResponse> {
    let id = headers
        .get("x-actor-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            ApiErrorResponse::bad_request(ApiError::invalid_actor("missing x-actor-id header"))
        })?;

    let mut permissions = Vec::new();
    if let Some(raw) = headers
        .get("x-actor-permissions")
        .and_then(|value| value.to_str().ok())
    {
        for code in raw.split(',').map(str::trim).filter(|code| !code.is_empty()) {
            let permission = Permission::from_code(code).ok_or_else(|| {
                ApiErrorResponse::bad_request(ApiError::invalid_actor(format!(
                    "unknown permission code '{}'",
                    code
                )))
            })?;
            permissions.push(permission);
        }
    }

    Ok(Actor {
        id: id.to_string(),
        permissions,
    })
}

/// Handler for POST /attendance/mark.
async fn mark_handler(
    State(state): State<AppState>,
    payload: Result<Json<MarkBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    info!(
        correlation_id = %correlation_id,
        employee_id = %body.employee_id,
        "Processing mark request"
    );
    match state.engine().mark(body.into()).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Mark failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /attendance/override.
async fn override_handler(
    State(state): State<AppState>,
    payload: Result<Json<OverrideBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    info!(
        correlation_id = %correlation_id,
        employee_id = %body.employee_id,
        "Processing override request"
    );
    match state.engine().override_record(body.into()).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Override failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /attendance/bulk.
async fn bulk_handler(
    State(state): State<AppState>,
    payload: Result<Json<BulkMarkBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    info!(
        correlation_id = %correlation_id,
        items = body.items.len(),
        "Processing bulk mark request"
    );
    match state.engine().bulk_mark(body.into()).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Bulk mark failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /attendance/:year/:month.
async fn records_handler(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Query(filter): Query<MonthFilter>,
    headers: HeaderMap,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(response) => return response.into_response(),
    };

    let query = MonthQuery {
        year,
        month,
        division: filter.division,
    };
    match state.engine().records_by_month(query, &actor).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for GET /attendance/:year/:month/summary.
async fn summary_handler(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Query(filter): Query<MonthFilter>,
    headers: HeaderMap,
) -> Response {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(response) => return response.into_response(),
    };

    let query = MonthQuery {
        year,
        month,
        division: filter.division,
    };
    match state.engine().month_summary(query, &actor).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}
