//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access tokens for accounts and author grants for inquiries.

pub mod jwt;
pub mod password;

use wonders_core::roles::ROLE_ADMIN;
use wonders_db::models::account::CreateAccount;
use wonders_db::AccountStore;

use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Make sure the configured operator account exists.
///
/// Returns `true` when the account was created, `false` when an account
/// with that username was already present (its password is left alone).
pub async fn ensure_bootstrap_admin(
    accounts: &dyn AccountStore,
    admin: &BootstrapAdmin,
) -> AppResult<bool> {
    if accounts.find_by_username(&admin.username).await?.is_some() {
        return Ok(false);
    }

    let password_hash = password::hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let account = accounts
        .create(&CreateAccount {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
        })
        .await?;

    tracing::info!(account_id = account.id, username = %account.username, "Bootstrap operator created");
    Ok(true)
}
