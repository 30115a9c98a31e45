//! Inquiry ("wonder") entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use wonders_core::inquiry::AttachedImage;
use wonders_core::ordering::Chronological;
use wonders_core::policy::{self, Ownership, Viewer};
use wonders_core::types::{InquiryId, Timestamp};
use wonders_core::validation::Submission;

/// A row from the `inquiries` table.
///
/// Holds the access secret in plaintext. NEVER serialize this directly; use
/// [`InquiryView`] for anything that leaves the service.
#[derive(Debug, Clone, FromRow)]
pub struct Inquiry {
    pub id: InquiryId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author_name: String,
    pub author_email: String,
    pub author_phone: Option<String>,
    pub company: Option<String>,
    pub is_public: bool,
    pub access_secret: Option<String>,
    pub status: String,
    pub admin_reply: Option<String>,
    pub admin_replied_at: Option<Timestamp>,
    pub attached_images: Json<Vec<AttachedImage>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Inquiry {
    /// The fields the visibility/ownership policy decides on.
    pub fn ownership(&self) -> Ownership<'_> {
        Ownership {
            is_public: self.is_public,
            author_email: &self.author_email,
            access_secret: self.access_secret.as_deref(),
        }
    }

    /// Render the record for `viewer`. `unlocked` is true when the viewer
    /// has just supplied this record's own secret.
    ///
    /// Contact details go only to operators and secret holders; everyone
    /// else gets at most [`InquiryView::public`].
    pub fn view_for(&self, viewer: Viewer, unlocked: bool) -> InquiryView {
        if !policy::can_read_full(viewer, self.is_public, unlocked) {
            InquiryView::redacted(self)
        } else if policy::can_read_contact(viewer, unlocked) {
            InquiryView::full(self)
        } else {
            InquiryView::public(self)
        }
    }

    /// Storage keys of every attached blob.
    pub fn storage_keys(&self) -> Vec<String> {
        self.attached_images
            .iter()
            .map(|img| img.storage_key.clone())
            .collect()
    }
}

impl Chronological for Inquiry {
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// Outward-facing representation of an inquiry.
///
/// For a locked private inquiry only metadata is present: content, reply,
/// attachments, and contact details are `None` and `locked` is `true`.
/// Public readers get content but no contact details.
#[derive(Debug, Clone, Serialize)]
pub struct InquiryView {
    pub id: InquiryId,
    pub title: String,
    pub category: String,
    pub status: String,
    pub author_name: String,
    pub is_public: bool,
    pub locked: bool,
    pub content: Option<String>,
    pub author_email: Option<String>,
    pub author_phone: Option<String>,
    pub company: Option<String>,
    pub admin_reply: Option<String>,
    pub admin_replied_at: Option<Timestamp>,
    pub attached_images: Option<Vec<AttachedImage>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InquiryView {
    /// Everything except the access secret.
    pub fn full(inquiry: &Inquiry) -> Self {
        Self {
            author_email: Some(inquiry.author_email.clone()),
            author_phone: inquiry.author_phone.clone(),
            company: inquiry.company.clone(),
            ..Self::public(inquiry)
        }
    }

    /// Content, reply, and attachments without the author's contact
    /// details. The email is what authors verify with, so it stays out of
    /// anything a stranger can read.
    pub fn public(inquiry: &Inquiry) -> Self {
        Self {
            locked: false,
            content: Some(inquiry.content.clone()),
            admin_reply: inquiry.admin_reply.clone(),
            admin_replied_at: inquiry.admin_replied_at,
            attached_images: Some(inquiry.attached_images.0.clone()),
            ..Self::redacted(inquiry)
        }
    }

    /// Title, category, status, and author name only.
    pub fn redacted(inquiry: &Inquiry) -> Self {
        Self {
            id: inquiry.id,
            title: inquiry.title.clone(),
            category: inquiry.category.clone(),
            status: inquiry.status.clone(),
            author_name: inquiry.author_name.clone(),
            is_public: inquiry.is_public,
            locked: true,
            content: None,
            author_email: None,
            author_phone: None,
            company: None,
            admin_reply: None,
            admin_replied_at: None,
            attached_images: None,
            created_at: inquiry.created_at,
            updated_at: inquiry.updated_at,
        }
    }
}

impl Chronological for InquiryView {
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// Request body for submitting an inquiry.
///
/// Also the `payload` part of a multipart submission with images.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInquiry {
    pub title: String,
    pub content: String,
    pub category: String,
    pub author_name: String,
    pub author_email: String,
    pub author_phone: Option<String>,
    pub company: Option<String>,
    pub is_public: bool,
    pub access_secret: Option<String>,
}

impl CreateInquiry {
    /// Borrowed view for [`wonders_core::validation::validate_submission`].
    pub fn submission(&self) -> Submission<'_> {
        Submission {
            title: &self.title,
            content: &self.content,
            category: &self.category,
            author_name: &self.author_name,
            author_email: &self.author_email,
            is_public: self.is_public,
            access_secret: self.access_secret.as_deref(),
        }
    }
}

/// A validated inquiry ready to be written by a store.
///
/// The store assigns `id`, `status`, and timestamps.
#[derive(Debug, Clone)]
pub struct NewInquiry {
    pub title: String,
    pub content: String,
    pub category: String,
    pub author_name: String,
    pub author_email: String,
    pub author_phone: Option<String>,
    pub company: Option<String>,
    pub is_public: bool,
    pub access_secret: Option<String>,
    pub attached_images: Vec<AttachedImage>,
}

impl NewInquiry {
    /// Build from a validated request. Text is stored as submitted; blank
    /// optional fields become `None` and a public inquiry's secret is
    /// dropped.
    pub fn from_request(input: CreateInquiry, attached_images: Vec<AttachedImage>) -> Self {
        Self {
            title: input.title,
            content: input.content,
            category: input.category,
            author_name: input.author_name,
            author_email: input.author_email,
            author_phone: non_blank(input.author_phone),
            company: non_blank(input.company),
            is_public: input.is_public,
            access_secret: wonders_core::validation::normalize_access_secret(
                input.is_public,
                input.access_secret,
            ),
            attached_images,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Request body for an author editing their inquiry.
#[derive(Debug, Deserialize)]
pub struct UpdateInquiryContent {
    pub title: String,
    pub content: String,
}

/// Request body for author verification.
#[derive(Debug, Deserialize)]
pub struct VerifyAuthor {
    pub author_email: String,
    pub access_secret: Option<String>,
}

/// Request body for the targeted private lookup.
#[derive(Debug, Deserialize)]
pub struct PrivateLookup {
    pub author_email: String,
    pub access_secret: String,
}

/// Request body for unlocking one private inquiry's content.
#[derive(Debug, Deserialize)]
pub struct UnlockInquiry {
    pub access_secret: String,
}

/// Request body for an operator reply.
#[derive(Debug, Deserialize)]
pub struct ReplyToInquiry {
    pub admin_reply: String,
}

/// Request body for an operator status change.
#[derive(Debug, Deserialize)]
pub struct UpdateInquiryStatus {
    pub status: String,
}

/// Query parameters for the public list.
#[derive(Debug, Default, Deserialize)]
pub struct PublicListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for the operator list.
#[derive(Debug, Default, Deserialize)]
pub struct InquiryListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Store-level filter for the operator list (already clamped).
#[derive(Debug, Clone, Default)]
pub struct InquiryFilter {
    pub status: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
