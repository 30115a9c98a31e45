//! Route definitions for the public side of the board.
//!
//! Mounted at `/wonders` by `api_routes()`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::wonders;
use crate::state::AppState;
use crate::ws;

/// Public inquiry routes.
///
/// ```text
/// POST   /                  -> submit_inquiry
/// GET    /                  -> list_public_inquiries
/// POST   /upload            -> submit_inquiry_with_images (multipart)
/// POST   /lookup            -> lookup_private_inquiries
/// GET    /live              -> live_feed_handler (WebSocket)
/// GET    /{id}              -> get_inquiry
/// PUT    /{id}              -> update_inquiry (author grant)
/// DELETE /{id}              -> delete_inquiry (author grant)
/// POST   /{id}/unlock       -> unlock_inquiry
/// POST   /{id}/verify       -> verify_author
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(wonders::submit_inquiry).get(wonders::list_public_inquiries),
        )
        .route(
            "/upload",
            post(wonders::submit_inquiry_with_images)
                .layer(DefaultBodyLimit::max(wonders::MAX_UPLOAD_BODY_BYTES)),
        )
        .route("/lookup", post(wonders::lookup_private_inquiries))
        .route("/live", get(ws::live_feed_handler))
        .route(
            "/{id}",
            get(wonders::get_inquiry)
                .put(wonders::update_inquiry)
                .delete(wonders::delete_inquiry),
        )
        .route("/{id}/unlock", post(wonders::unlock_inquiry))
        .route("/{id}/verify", post(wonders::verify_author))
}
