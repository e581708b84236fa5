// ============================
// crates/backend-lib/src/middleware/auth.rs
// ============================
//! Access gate for mutating routes.
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Method},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::error::{AppError, NOT_AUTHENTICATED_MESSAGE};
use crate::SharedState;

fn not_authenticated() -> AppError {
    AppError::NotAuthenticated(NOT_AUTHENTICATED_MESSAGE.to_string())
}

/// Extract the credential from an `Authorization` header value.
///
/// The value must be exactly two parts separated by a single space,
/// `"<scheme> <credential>"`. The scheme word is not inspected.
pub fn parse_authorization(header: Option<&str>) -> Result<&str, AppError> {
    let Some(value) = header else {
        debug!("authorization header missing");
        return Err(not_authenticated());
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(credential), None) => Ok(credential),
        _ => {
            debug!("authorization header malformed");
            Err(not_authenticated())
        },
    }
}

/// Admit a request only if it carries a valid token.
///
/// Pre-flight `OPTIONS` requests pass through untouched. On success the
/// decoded [`Claims`](crate::auth::Claims) are inserted as a request
/// extension for the handler.
pub async fn require_auth(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let verified = {
        let header = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        parse_authorization(header).and_then(|token| {
            state.tokens.verify(token).map_err(|err| {
                warn!(error = %err, "rejected bearer token");
                AppError::from(err)
            })
        })
    };

    let claims = match verified {
        Ok(claims) => claims,
        Err(err) => {
            ::metrics::counter!(crate::metrics::GATE_REJECTED).increment(1);
            return Err(err);
        },
    };

    debug!(subject = claims.subject(), "request authenticated");
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
