// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Signup and login.
use axum::{extract::State, http::StatusCode, Json};
use eventhub_common::{Credentials, FieldErrors, LoginResponse, SignupResponse};
use tracing::{info, warn};

use super::JsonBody;
use crate::auth::{hash_password_secure, verify_password_secure};
use crate::error::{AppError, AUTH_FAILED_MESSAGE};
use crate::validation::{validate_signup, EMAIL_EXISTS_MESSAGE, SIGNUP_FAILED_MESSAGE};
use crate::SharedState;

/// `POST /signup`
pub async fn signup(
    State(state): State<SharedState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let mut errors = validate_signup(&credentials);
    if !errors.contains_key("email")
        && state
            .storage
            .find_user_by_email(&credentials.email)
            .await?
            .is_some()
    {
        errors.insert("email".to_string(), EMAIL_EXISTS_MESSAGE.to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::validation(SIGNUP_FAILED_MESSAGE, errors));
    }

    let Credentials { email, password } = credentials;
    let hash = hash_password_secure(password, state.settings.password_hash_log_n).await?;
    let user = state.storage.insert_user(&email, &hash).await?;
    let token = state.tokens.issue(&user.email)?;

    ::metrics::counter!(crate::metrics::SIGNUP_CREATED).increment(1);
    info!(user_id = %user.id, "user created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created.".to_string(),
            user: user.summary(),
            token,
        }),
    ))
}

/// `POST /login`
pub async fn login(
    State(state): State<SharedState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    let Credentials { email, password } = credentials;

    let Some(user) = state.storage.find_user_by_email(&email).await? else {
        ::metrics::counter!(crate::metrics::LOGIN_FAILED).increment(1);
        warn!("login for unknown email");
        return Err(AppError::NotAuthenticated(AUTH_FAILED_MESSAGE.to_string()));
    };

    if !verify_password_secure(user.password_hash.clone(), password).await? {
        ::metrics::counter!(crate::metrics::LOGIN_FAILED).increment(1);
        warn!(user_id = %user.id, "login with wrong password");
        let mut errors = FieldErrors::new();
        errors.insert(
            "credentials".to_string(),
            "Invalid email or password entered.".to_string(),
        );
        return Err(AppError::validation("Invalid credentials.", errors));
    }

    let token = state.tokens.issue(&user.email)?;
    ::metrics::counter!(crate::metrics::LOGIN_SUCCEEDED).increment(1);
    info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse { token }))
}
