pub mod admin_wonders;
pub mod auth;
pub mod wonders;
