//! In-memory stores.
//!
//! Used by the API integration tests and when the server starts without
//! `DATABASE_URL`. Rows live in insertion order, so `list_public` returns
//! them oldest-first, just as unordered as a real store may be.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;
use wonders_core::inquiry::{STATUS_ANSWERED, STATUS_CLOSED, STATUS_PENDING};
use wonders_core::ordering::sort_newest_first;
use wonders_core::policy;
use wonders_core::types::{DbId, InquiryId, Timestamp};

use crate::error::StoreError;
use crate::models::account::{Account, CreateAccount};
use crate::models::inquiry::{Inquiry, InquiryFilter, NewInquiry};
use crate::store::{AccountStore, InquiryStore, CLOSED_REPLY_MESSAGE};

/// [`InquiryStore`] holding rows in a `Vec` behind a `RwLock`.
pub struct MemoryInquiryStore {
    rows: RwLock<Vec<Inquiry>>,
    available: AtomicBool,
}

impl MemoryInquiryStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Insert a fully formed row as-is (timestamps included).
    pub async fn insert_row(&self, row: Inquiry) {
        self.rows.write().await.push(row);
    }

    /// Simulate the backend going away (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store is offline".into()))
        }
    }

    /// Apply `f` to the row with `id`, bumping `updated_at`.
    async fn modify(
        &self,
        id: InquiryId,
        f: impl FnOnce(&mut Inquiry),
    ) -> Result<Option<Inquiry>, StoreError> {
        self.ensure_available()?;
        let mut rows = self.rows.write().await;
        Ok(rows.iter_mut().find(|r| r.id == id).map(|row| {
            f(row);
            row.updated_at = Utc::now();
            row.clone()
        }))
    }
}

impl Default for MemoryInquiryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InquiryStore for MemoryInquiryStore {
    async fn create(&self, input: &NewInquiry) -> Result<Inquiry, StoreError> {
        self.ensure_available()?;
        let now = Utc::now();
        let row = Inquiry {
            id: InquiryId::now_v7(),
            title: input.title.clone(),
            content: input.content.clone(),
            category: input.category.clone(),
            author_name: input.author_name.clone(),
            author_email: input.author_email.clone(),
            author_phone: input.author_phone.clone(),
            company: input.company.clone(),
            is_public: input.is_public,
            access_secret: input.access_secret.clone(),
            status: STATUS_PENDING.to_string(),
            admin_reply: None,
            admin_replied_at: None,
            attached_images: Json(input.attached_images.clone()),
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: InquiryId) -> Result<Option<Inquiry>, StoreError> {
        self.ensure_available()?;
        Ok(self.rows.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn list_public(&self) -> Result<Vec<Inquiry>, StoreError> {
        self.ensure_available()?;
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| policy::is_publicly_listed(r.is_public))
            .cloned()
            .collect())
    }

    async fn list_all(&self, filter: &InquiryFilter) -> Result<Vec<Inquiry>, StoreError> {
        self.ensure_available()?;
        let mut rows: Vec<Inquiry> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| filter.status.as_deref().is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        sort_newest_first(&mut rows);
        Ok(rows
            .into_iter()
            .skip(usize::try_from(filter.offset).unwrap_or(0))
            .take(usize::try_from(filter.limit).unwrap_or(0))
            .collect())
    }

    async fn find_private(
        &self,
        author_email: &str,
        access_secret: &str,
    ) -> Result<Vec<Inquiry>, StoreError> {
        self.ensure_available()?;
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| policy::matches_private_lookup(&r.ownership(), author_email, access_secret))
            .cloned()
            .collect())
    }

    async fn update_content(
        &self,
        id: InquiryId,
        title: &str,
        content: &str,
    ) -> Result<Option<Inquiry>, StoreError> {
        self.modify(id, |row| {
            row.title = title.to_string();
            row.content = content.to_string();
        })
        .await
    }

    async fn apply_reply(
        &self,
        id: InquiryId,
        reply: &str,
        replied_at: Timestamp,
    ) -> Result<Option<Inquiry>, StoreError> {
        self.ensure_available()?;
        let mut rows = self.rows.write().await;
        let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if row.status == STATUS_CLOSED {
            return Err(StoreError::Conflict(CLOSED_REPLY_MESSAGE.into()));
        }
        row.admin_reply = Some(reply.to_string());
        row.admin_replied_at = Some(replied_at);
        row.status = STATUS_ANSWERED.to_string();
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn set_status(
        &self,
        id: InquiryId,
        status: &str,
    ) -> Result<Option<Inquiry>, StoreError> {
        self.modify(id, |row| row.status = status.to_string()).await
    }

    async fn delete(&self, id: InquiryId) -> Result<bool, StoreError> {
        self.ensure_available()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.ensure_available()
    }
}

/// [`AccountStore`] holding rows in a `Vec` behind a `RwLock`.
pub struct MemoryAccountStore {
    rows: RwLock<Vec<Account>>,
    next_id: AtomicI64,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, input: &CreateAccount) -> Result<Account, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|a| a.username == input.username) {
            return Err(StoreError::Conflict(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }
        if rows.iter().any(|a| a.email == input.email) {
            return Err(StoreError::Conflict(format!(
                "Email '{}' is already registered",
                input.email
            )));
        }
        let now = Utc::now();
        let account = Account {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.push(account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Account>, StoreError> {
        Ok(self.rows.read().await.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Duration;

    use super::*;

    fn new_inquiry(title: &str, is_public: bool) -> NewInquiry {
        NewInquiry {
            title: title.to_string(),
            content: "hello".into(),
            category: "general".into(),
            author_name: "Alice".into(),
            author_email: "a@b.com".into(),
            author_phone: None,
            company: None,
            is_public,
            access_secret: (!is_public).then(|| "1234".to_string()),
            attached_images: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_starts_pending_without_reply() {
        let store = MemoryInquiryStore::new();
        let row = store.create(&new_inquiry("Q1", true)).await.unwrap();
        assert_eq!(row.status, STATUS_PENDING);
        assert!(row.admin_reply.is_none());
        assert!(row.admin_replied_at.is_none());

        let fetched = store.find_by_id(row.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Q1");
    }

    #[tokio::test]
    async fn list_public_excludes_private() {
        let store = MemoryInquiryStore::new();
        store.create(&new_inquiry("public", true)).await.unwrap();
        store.create(&new_inquiry("private", false)).await.unwrap();

        let titles: Vec<_> = store
            .list_public()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, ["public"]);
    }

    #[tokio::test]
    async fn find_private_matches_exactly() {
        let store = MemoryInquiryStore::new();
        let private = store.create(&new_inquiry("private", false)).await.unwrap();
        store.create(&new_inquiry("public", true)).await.unwrap();

        let hits = store.find_private("a@b.com", "1234").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, private.id);
        assert!(store.find_private("a@b.com", "0000").await.unwrap().is_empty());
        assert!(store.find_private("A@b.com", "1234").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_all_pages_newest_first() {
        let store = MemoryInquiryStore::new();
        let base = store.create(&new_inquiry("template", true)).await.unwrap();
        store.delete(base.id).await.unwrap();
        for (i, title) in ["one", "two", "three"].into_iter().enumerate() {
            let mut row = base.clone();
            row.id = InquiryId::now_v7();
            row.title = title.into();
            row.created_at = base.created_at + Duration::minutes(i as i64);
            store.insert_row(row).await;
        }

        let filter = InquiryFilter {
            status: None,
            limit: 2,
            offset: 0,
        };
        let titles: Vec<_> = store
            .list_all(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, ["three", "two"]);
    }

    #[tokio::test]
    async fn reply_sets_all_three_fields() {
        let store = MemoryInquiryStore::new();
        let row = store.create(&new_inquiry("Q", true)).await.unwrap();
        let at = Utc::now();
        let updated = store.apply_reply(row.id, "answer", at).await.unwrap().unwrap();
        assert_eq!(updated.status, STATUS_ANSWERED);
        assert_eq!(updated.admin_reply.as_deref(), Some("answer"));
        assert_eq!(updated.admin_replied_at, Some(at));
    }

    #[tokio::test]
    async fn reply_never_reopens_closed_inquiry() {
        let store = MemoryInquiryStore::new();
        let row = store.create(&new_inquiry("Q", true)).await.unwrap();
        store.set_status(row.id, STATUS_CLOSED).await.unwrap();

        assert_matches!(
            store.apply_reply(row.id, "late answer", Utc::now()).await,
            Err(StoreError::Conflict(_))
        );
        let after = store.find_by_id(row.id).await.unwrap().unwrap();
        assert_eq!(after.status, STATUS_CLOSED);
        assert!(after.admin_reply.is_none());
    }

    #[tokio::test]
    async fn mutations_on_missing_ids_report_absence() {
        let store = MemoryInquiryStore::new();
        let id = InquiryId::now_v7();
        assert!(store.set_status(id, "closed").await.unwrap().is_none());
        assert!(store.apply_reply(id, "answer", Utc::now()).await.unwrap().is_none());
        assert!(!store.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn offline_store_reports_unavailable() {
        let store = MemoryInquiryStore::new();
        store.set_available(false);
        assert_matches!(store.list_public().await, Err(StoreError::Unavailable(_)));
        store.set_available(true);
        assert!(store.list_public().await.is_ok());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryAccountStore::new();
        let input = CreateAccount {
            username: "op".into(),
            email: "op@corp.com".into(),
            password_hash: "hash".into(),
            role: "admin".into(),
        };
        let first = store.create(&input).await.unwrap();
        assert_eq!(first.id, 1);
        assert_matches!(store.create(&input).await, Err(StoreError::Conflict(_)));
        assert!(store.find_by_username("op").await.unwrap().is_some());
    }
}
