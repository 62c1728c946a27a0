use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::enrichment::GeocodeGateway;
use super::service::{RegistrationService, RegistrationServiceError};
use super::session::{SessionId, SessionRepository, SessionStoreError};
use super::steps::{SchedulingUpdate, StepUpdate};
use super::submission::{RegistrationError, RegistrationGateway};

/// Router builder exposing the hosted wizard over HTTP.
pub fn registration_router<S, G, R>(service: Arc<RegistrationService<S, G, R>>) -> Router
where
    S: SessionRepository + 'static,
    G: GeocodeGateway + 'static,
    R: RegistrationGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/registration/sessions",
            post(open_handler::<S, G, R>),
        )
        .route(
            "/api/v1/registration/sessions/:session_id",
            get(progress_handler::<S, G, R>),
        )
        .route(
            "/api/v1/registration/sessions/:session_id/advance",
            post(advance_handler::<S, G, R>),
        )
        .route(
            "/api/v1/registration/sessions/:session_id/back",
            post(back_handler::<S, G, R>),
        )
        .route(
            "/api/v1/registration/sessions/:session_id/submit",
            post(submit_handler::<S, G, R>),
        )
        .with_state(service)
}

pub(crate) async fn open_handler<S, G, R>(
    State(service): State<Arc<RegistrationService<S, G, R>>>,
) -> Response
where
    S: SessionRepository + 'static,
    G: GeocodeGateway + 'static,
    R: RegistrationGateway + 'static,
{
    match service.open() {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn progress_handler<S, G, R>(
    State(service): State<Arc<RegistrationService<S, G, R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionRepository + 'static,
    G: GeocodeGateway + 'static,
    R: RegistrationGateway + 'static,
{
    match service.progress(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn advance_handler<S, G, R>(
    State(service): State<Arc<RegistrationService<S, G, R>>>,
    Path(session_id): Path<String>,
    Json(update): Json<StepUpdate>,
) -> Response
where
    S: SessionRepository + 'static,
    G: GeocodeGateway + 'static,
    R: RegistrationGateway + 'static,
{
    match service.advance(&SessionId(session_id), update).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn back_handler<S, G, R>(
    State(service): State<Arc<RegistrationService<S, G, R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionRepository + 'static,
    G: GeocodeGateway + 'static,
    R: RegistrationGateway + 'static,
{
    match service.go_back(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<S, G, R>(
    State(service): State<Arc<RegistrationService<S, G, R>>>,
    Path(session_id): Path<String>,
    Json(update): Json<SchedulingUpdate>,
) -> Response
where
    S: SessionRepository + 'static,
    G: GeocodeGateway + 'static,
    R: RegistrationGateway + 'static,
{
    match service.submit(&SessionId(session_id), update).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: RegistrationServiceError) -> Response {
    let status = match &err {
        RegistrationServiceError::Session(SessionStoreError::NotFound) => StatusCode::NOT_FOUND,
        RegistrationServiceError::Session(SessionStoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        RegistrationServiceError::Wizard(_)
        | RegistrationServiceError::Geocode(_)
        | RegistrationServiceError::Transform(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RegistrationServiceError::Submission(RegistrationError::Rejected { .. })
        | RegistrationServiceError::Submission(RegistrationError::Transport(_)) => {
            StatusCode::BAD_GATEWAY
        }
        RegistrationServiceError::Busy => StatusCode::CONFLICT,
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
