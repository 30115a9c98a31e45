//! Operator routes, mounted at `/admin/wonders`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin_wonders;
use crate::state::AppState;

/// ```text
/// GET  /               -> list_inquiries
/// GET  /{id}           -> get_inquiry
/// PUT  /{id}/reply     -> reply_to_inquiry
/// PUT  /{id}/status    -> update_inquiry_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_wonders::list_inquiries))
        .route("/{id}", get(admin_wonders::get_inquiry))
        .route("/{id}/reply", put(admin_wonders::reply_to_inquiry))
        .route("/{id}/status", put(admin_wonders::update_inquiry_status))
}
