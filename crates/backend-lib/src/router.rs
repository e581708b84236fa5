// ============================
// eventhub-backend-lib/src/router.rs
// ============================
//! HTTP routing table.
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::Settings;
use crate::handlers::{auth, events};
use crate::middleware::require_auth;
use crate::SharedState;

/// Build the full application router
pub fn create_router(state: SharedState) -> Router {
    // The gate also wraps the method fallback of these paths, so an
    // unsupported method (e.g. `PUT /events`) is 401 without a token and
    // 405 only once authenticated.
    let protected = Router::new()
        .route("/events", post(events::create_event))
        .route(
            "/events/{id}",
            patch(events::update_event).delete(events::delete_event),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/events", get(events::list_events))
        .route("/events/{id}", get(events::get_event))
        .merge(protected)
        .nest_service("/pictures", ServeDir::new(&state.settings.pictures_dir))
        .layer(cors_layer(&state.settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy from settings. `*` allows any origin; otherwise a
/// comma-separated list of exact origins.
pub fn cors_layer(settings: &Settings) -> CorsLayer {
    let origin = settings.cors_allow_origin.trim();
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origin
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = o, "ignoring invalid CORS origin");
                    None
                },
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
