// ============================
// crates/backend-lib/src/handlers/events.rs
// ============================
//! Event CRUD handlers. Reads are public; mutations sit behind the access gate.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use eventhub_common::{
    EventInput, EventMutationResponse, EventResponse, EventsResponse, MessageResponse,
};
use tracing::info;

use super::JsonBody;
use crate::auth::Claims;
use crate::error::AppError;
use crate::validation::{
    validate_event_input, EVENT_ADD_FAILED_MESSAGE, EVENT_UPDATE_FAILED_MESSAGE,
};
use crate::SharedState;

/// `GET /events`
pub async fn list_events(
    State(state): State<SharedState>,
) -> Result<Json<EventsResponse>, AppError> {
    let events = state.storage.list_events().await?;
    Ok(Json(EventsResponse { events }))
}

/// `GET /events/{id}`
pub async fn get_event(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state.storage.get_event(&id).await?;
    Ok(Json(EventResponse { event }))
}

/// `POST /events`
pub async fn create_event(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    JsonBody(input): JsonBody<EventInput>,
) -> Result<(StatusCode, Json<EventMutationResponse>), AppError> {
    let errors = validate_event_input(&input);
    if !errors.is_empty() {
        return Err(AppError::validation(EVENT_ADD_FAILED_MESSAGE, errors));
    }

    let event = state.storage.insert_event(input).await?;
    ::metrics::counter!(crate::metrics::EVENT_CREATED).increment(1);
    info!(event_id = %event.id, by = claims.subject(), "event created");

    Ok((
        StatusCode::CREATED,
        Json(EventMutationResponse {
            message: "Event saved.".to_string(),
            event,
        }),
    ))
}

/// `PATCH /events/{id}`
pub async fn update_event(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<EventInput>,
) -> Result<Json<EventMutationResponse>, AppError> {
    let errors = validate_event_input(&input);
    if !errors.is_empty() {
        return Err(AppError::validation(EVENT_UPDATE_FAILED_MESSAGE, errors));
    }

    let event = state.storage.replace_event(&id, input).await?;
    ::metrics::counter!(crate::metrics::EVENT_UPDATED).increment(1);
    info!(event_id = %event.id, by = claims.subject(), "event updated");

    Ok(Json(EventMutationResponse {
        message: "Event updated.".to_string(),
        event,
    }))
}

/// `DELETE /events/{id}`
pub async fn delete_event(
    State(state): State<SharedState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.storage.delete_event(&id).await?;
    ::metrics::counter!(crate::metrics::EVENT_DELETED).increment(1);
    info!(event_id = %id, by = claims.subject(), "event deleted");

    Ok(Json(MessageResponse {
        message: "Event deleted.".to_string(),
    }))
}
