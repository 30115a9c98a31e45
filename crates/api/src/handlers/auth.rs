//! Handlers for the `/auth` resource (signup, login, me, logout).
//!
//! Access tokens are stateless; logout only records the event and the
//! client discards its token.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use wonders_core::error::CoreError;
use wonders_core::roles::ROLE_MEMBER;
use wonders_core::validation::is_valid_email;
use wonders_db::models::account::{AccountResponse, CreateAccount};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: AccountResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Create a `member` account. Operator accounts are only created by the
/// startup bootstrap.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let username = input.username.trim();
    if username.is_empty() {
        return Err(CoreError::invalid_field("username", "Username is required").into());
    }
    if !is_valid_email(&input.email) {
        return Err(CoreError::invalid_field("email", "Email address is not valid").into());
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| CoreError::invalid_field("password", msg))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let account = state
        .accounts
        .create(&CreateAccount {
            username: username.to_string(),
            email: input.email.trim().to_string(),
            password_hash,
            role: ROLE_MEMBER.to_string(),
        })
        .await?;

    tracing::info!(account_id = account.id, username = %account.username, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AccountResponse::from(&account),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Unknown username and wrong
/// password are indistinguishable.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        ))
    };

    let account = state
        .accounts
        .find_by_username(&input.username)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::info!(account_id = account.id, "Login rejected");
        return Err(invalid());
    }

    let access_token = generate_access_token(account.id, &account.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(account_id = account.id, role = %account.role, "Login succeeded");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: AccountResponse::from(&account),
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let account = state
        .accounts
        .find_by_id(auth_user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;

    Ok(Json(DataResponse {
        data: AccountResponse::from(&account),
    }))
}

/// POST /api/v1/auth/logout
///
/// Returns 204 No Content.
pub async fn logout(auth_user: AuthUser) -> StatusCode {
    tracing::info!(account_id = auth_user.user_id, "Logout");
    StatusCode::NO_CONTENT
}
