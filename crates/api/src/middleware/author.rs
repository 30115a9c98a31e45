//! Author-grant extractor for edit and delete.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use wonders_core::error::CoreError;
use wonders_core::types::InquiryId;

use crate::auth::jwt::validate_author_grant;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the token returned by `POST /wonders/{id}/verify`.
pub const AUTHOR_GRANT_HEADER: &str = "x-author-grant";

/// A valid author grant. Handlers must still check that it covers the
/// inquiry being changed (see `policy::ensure_grant_covers`).
#[derive(Debug, Clone, Copy)]
pub struct AuthorGrant {
    pub inquiry_id: InquiryId,
}

impl FromRequestParts<AppState> for AuthorGrant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHOR_GRANT_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Author verification required".into(),
                ))
            })?;

        let inquiry_id = validate_author_grant(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired author verification".into(),
            ))
        })?;

        Ok(AuthorGrant { inquiry_id })
    }
}
