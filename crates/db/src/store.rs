//! Store collaborator traits.
//!
//! Handlers depend on these traits rather than on a pool so the backend can
//! be swapped: [`PgInquiryStore`] / [`PgAccountStore`] in production,
//! [`crate::memory`] in tests and database-less runs.

use async_trait::async_trait;
use wonders_core::types::{DbId, InquiryId, Timestamp};

use crate::error::StoreError;
use crate::models::account::{Account, CreateAccount};
use crate::models::inquiry::{Inquiry, InquiryFilter, NewInquiry};
use crate::repositories::{AccountRepo, InquiryRepo};
use crate::DbPool;

/// Message of the conflict raised when replying to a closed inquiry.
pub const CLOSED_REPLY_MESSAGE: &str = "Inquiry is closed and cannot be answered";

/// Document-store operations on inquiries.
///
/// List methods filter only; callers order the result. Mutations that
/// target a missing id return `Ok(None)` / `Ok(false)`. Concurrent writers
/// are last-write-wins.
#[async_trait]
pub trait InquiryStore: Send + Sync {
    /// Persist a new inquiry in `pending` status.
    async fn create(&self, input: &NewInquiry) -> Result<Inquiry, StoreError>;

    async fn find_by_id(&self, id: InquiryId) -> Result<Option<Inquiry>, StoreError>;

    /// Every inquiry with `is_public = true`, in no particular order.
    async fn list_public(&self) -> Result<Vec<Inquiry>, StoreError>;

    /// Every inquiry regardless of visibility (operator view).
    async fn list_all(&self, filter: &InquiryFilter) -> Result<Vec<Inquiry>, StoreError>;

    /// Private inquiries whose email and secret both match exactly.
    async fn find_private(
        &self,
        author_email: &str,
        access_secret: &str,
    ) -> Result<Vec<Inquiry>, StoreError>;

    async fn update_content(
        &self,
        id: InquiryId,
        title: &str,
        content: &str,
    ) -> Result<Option<Inquiry>, StoreError>;

    /// Set reply, reply time, and `answered` in one write.
    ///
    /// A closed inquiry is never reopened: the write is refused with
    /// [`StoreError::Conflict`] even if it was closed after the caller
    /// checked.
    async fn apply_reply(
        &self,
        id: InquiryId,
        reply: &str,
        replied_at: Timestamp,
    ) -> Result<Option<Inquiry>, StoreError>;

    async fn set_status(&self, id: InquiryId, status: &str)
        -> Result<Option<Inquiry>, StoreError>;

    /// Hard delete. There is no soft-delete or audit trail.
    async fn delete(&self, id: InquiryId) -> Result<bool, StoreError>;

    /// Whether the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Account lookups for sign-up and sign-in.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, input: &CreateAccount) -> Result<Account, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Account>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`InquiryStore`] backed by the `inquiries` table.
#[derive(Clone)]
pub struct PgInquiryStore {
    pool: DbPool,
}

impl PgInquiryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InquiryStore for PgInquiryStore {
    async fn create(&self, input: &NewInquiry) -> Result<Inquiry, StoreError> {
        Ok(InquiryRepo::create(&self.pool, input).await?)
    }

    async fn find_by_id(&self, id: InquiryId) -> Result<Option<Inquiry>, StoreError> {
        Ok(InquiryRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_public(&self) -> Result<Vec<Inquiry>, StoreError> {
        Ok(InquiryRepo::list_public(&self.pool).await?)
    }

    async fn list_all(&self, filter: &InquiryFilter) -> Result<Vec<Inquiry>, StoreError> {
        Ok(InquiryRepo::list_filtered(&self.pool, filter).await?)
    }

    async fn find_private(
        &self,
        author_email: &str,
        access_secret: &str,
    ) -> Result<Vec<Inquiry>, StoreError> {
        Ok(InquiryRepo::find_private(&self.pool, author_email, access_secret).await?)
    }

    async fn update_content(
        &self,
        id: InquiryId,
        title: &str,
        content: &str,
    ) -> Result<Option<Inquiry>, StoreError> {
        Ok(InquiryRepo::update_content(&self.pool, id, title, content).await?)
    }

    async fn apply_reply(
        &self,
        id: InquiryId,
        reply: &str,
        replied_at: Timestamp,
    ) -> Result<Option<Inquiry>, StoreError> {
        if let Some(row) = InquiryRepo::apply_reply(&self.pool, id, reply, replied_at).await? {
            return Ok(Some(row));
        }
        // No row written: either the id is unknown or the inquiry is closed.
        match InquiryRepo::find_by_id(&self.pool, id).await? {
            Some(_) => Err(StoreError::Conflict(CLOSED_REPLY_MESSAGE.into())),
            None => Ok(None),
        }
    }

    async fn set_status(
        &self,
        id: InquiryId,
        status: &str,
    ) -> Result<Option<Inquiry>, StoreError> {
        Ok(InquiryRepo::update_status(&self.pool, id, status).await?)
    }

    async fn delete(&self, id: InquiryId) -> Result<bool, StoreError> {
        Ok(InquiryRepo::delete(&self.pool, id).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

/// [`AccountStore`] backed by the `accounts` table.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: DbPool,
}

impl PgAccountStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, input: &CreateAccount) -> Result<Account, StoreError> {
        Ok(AccountRepo::create(&self.pool, input).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Account>, StoreError> {
        Ok(AccountRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(AccountRepo::find_by_username(&self.pool, username).await?)
    }
}
