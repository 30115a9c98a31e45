//! Repository for the `inquiries` table.
//!
//! Listing queries only filter; ordering for display is done by the caller
//! with [`wonders_core::ordering`]. The operator list is the exception: it
//! pages, so it needs a stable `ORDER BY`.

use sqlx::types::Json;
use sqlx::PgPool;
use wonders_core::inquiry::{STATUS_ANSWERED, STATUS_CLOSED};
use wonders_core::types::{InquiryId, Timestamp};

use crate::models::inquiry::{Inquiry, InquiryFilter, NewInquiry};

/// Column list for `inquiries` queries.
const COLUMNS: &str = "\
    id, title, content, category, author_name, author_email, author_phone, \
    company, is_public, access_secret, status, admin_reply, admin_replied_at, \
    attached_images, created_at, updated_at";

/// Provides CRUD operations for inquiries.
pub struct InquiryRepo;

impl InquiryRepo {
    /// Insert a new inquiry with a fresh UUID v7, returning the full row.
    ///
    /// `status` is left to the column default (`pending`).
    pub async fn create(pool: &PgPool, input: &NewInquiry) -> Result<Inquiry, sqlx::Error> {
        let query = format!(
            "INSERT INTO inquiries \
                (id, title, content, category, author_name, author_email, \
                 author_phone, company, is_public, access_secret, attached_images) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(InquiryId::now_v7())
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.category)
            .bind(&input.author_name)
            .bind(&input.author_email)
            .bind(&input.author_phone)
            .bind(&input.company)
            .bind(input.is_public)
            .bind(&input.access_secret)
            .bind(Json(&input.attached_images))
            .fetch_one(pool)
            .await
    }

    /// Find an inquiry by ID.
    pub async fn find_by_id(pool: &PgPool, id: InquiryId) -> Result<Option<Inquiry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inquiries WHERE id = $1");
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All public inquiries, unordered.
    pub async fn list_public(pool: &PgPool) -> Result<Vec<Inquiry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inquiries WHERE is_public = TRUE");
        sqlx::query_as::<_, Inquiry>(&query).fetch_all(pool).await
    }

    /// Every inquiry, public or not, with an optional status filter.
    ///
    /// Results are ordered newest-first so pages are stable.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &InquiryFilter,
    ) -> Result<Vec<Inquiry>, sqlx::Error> {
        let mut param_idx: usize = 1;
        let where_clause = if filter.status.is_some() {
            param_idx += 1;
            "WHERE status = $1"
        } else {
            ""
        };

        let query = format!(
            "SELECT {COLUMNS} FROM inquiries {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, Inquiry>(&query);
        if let Some(ref s) = filter.status {
            q = q.bind(s);
        }
        q = q.bind(filter.limit).bind(filter.offset);

        q.fetch_all(pool).await
    }

    /// Private inquiries filed under exactly this email with exactly this
    /// secret.
    pub async fn find_private(
        pool: &PgPool,
        author_email: &str,
        access_secret: &str,
    ) -> Result<Vec<Inquiry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inquiries \
             WHERE is_public = FALSE AND author_email = $1 AND access_secret = $2"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(author_email)
            .bind(access_secret)
            .fetch_all(pool)
            .await
    }

    /// Replace title and content. Returns the updated row if found.
    pub async fn update_content(
        pool: &PgPool,
        id: InquiryId,
        title: &str,
        content: &str,
    ) -> Result<Option<Inquiry>, sqlx::Error> {
        let query = format!(
            "UPDATE inquiries SET title = $1, content = $2 WHERE id = $3 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(title)
            .bind(content)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Write the reply, its timestamp, and `answered` in a single statement.
    ///
    /// Closed inquiries are left untouched and yield `None`, the same as a
    /// missing id.
    pub async fn apply_reply(
        pool: &PgPool,
        id: InquiryId,
        reply: &str,
        replied_at: Timestamp,
    ) -> Result<Option<Inquiry>, sqlx::Error> {
        let query = format!(
            "UPDATE inquiries \
             SET admin_reply = $1, admin_replied_at = $2, status = $3 \
             WHERE id = $4 AND status <> $5 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(reply)
            .bind(replied_at)
            .bind(STATUS_ANSWERED)
            .bind(id)
            .bind(STATUS_CLOSED)
            .fetch_optional(pool)
            .await
    }

    /// Update the status of an inquiry. Returns the updated row if found.
    pub async fn update_status(
        pool: &PgPool,
        id: InquiryId,
        new_status: &str,
    ) -> Result<Option<Inquiry>, sqlx::Error> {
        let query = format!("UPDATE inquiries SET status = $1 WHERE id = $2 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(new_status)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an inquiry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: InquiryId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inquiries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
