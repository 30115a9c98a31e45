//! Role-based access control extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use wonders_core::error::CoreError;
use wonders_core::roles::is_operator;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an operator account (role `admin`). Members get 403.
///
/// Operators read private inquiries without a secret, reply, and change
/// status.
///
/// ```ignore
/// async fn reply(RequireOperator(operator): RequireOperator) -> AppResult<Json<()>> {
///     tracing::info!(operator_id = operator.user_id, "replying");
///     Ok(Json(()))
/// }
/// ```
pub struct RequireOperator(pub AuthUser);

impl FromRequestParts<AppState> for RequireOperator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_operator(&user.role) {
            tracing::debug!(user_id = user.user_id, role = %user.role, "Operator route refused");
            return Err(CoreError::Forbidden("Operator access required".into()).into());
        }
        Ok(RequireOperator(user))
    }
}
