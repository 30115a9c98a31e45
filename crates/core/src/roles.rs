//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `accounts.role` in
//! `20260301000002_create_accounts_table.sql`.

/// Operators: may read every inquiry, reply, and change status.
pub const ROLE_ADMIN: &str = "admin";
/// Regular employee accounts created through sign-up.
pub const ROLE_MEMBER: &str = "member";

/// Whether `role` carries operator privileges on the wonders board.
pub fn is_operator(role: &str) -> bool {
    role == ROLE_ADMIN
}
