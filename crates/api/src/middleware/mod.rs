//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the signed-in account from a JWT Bearer token.
//! - [`rbac::RequireOperator`] -- requires the `admin` (operator) role.
//! - [`author::AuthorGrant`] -- proof of author verification for one inquiry.

pub mod auth;
pub mod author;
pub mod rbac;
