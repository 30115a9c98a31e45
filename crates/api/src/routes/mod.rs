pub mod admin;
pub mod auth;
pub mod health;
pub mod wonders;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup                       create member account (public)
/// /auth/login                        login (public)
/// /auth/me                           current account (requires auth)
/// /auth/logout                       logout (requires auth)
///
/// /wonders                           submit (POST), public list (GET)
/// /wonders/upload                    submit with images (POST, multipart)
/// /wonders/lookup                    private lookup by email + secret (POST)
/// /wonders/live                      live public list (WebSocket)
/// /wonders/{id}                      get (locked if private), edit, delete
/// /wonders/{id}/unlock               reveal private content (POST)
/// /wonders/{id}/verify               author verification -> grant (POST)
///
/// /admin/wonders                     list all (admin only)
/// /admin/wonders/{id}                get full (admin only)
/// /admin/wonders/{id}/reply          reply (PUT, admin only)
/// /admin/wonders/{id}/status         status change (PUT, admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/wonders", wonders::router())
        .nest("/admin/wonders", admin::router())
}
