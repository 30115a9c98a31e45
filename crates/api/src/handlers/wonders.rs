//! Public handlers for the wonders board.
//!
//! Anyone may submit, browse the public list, read a public inquiry, or
//! unlock a private one with its secret. Editing and deleting need an
//! author grant obtained from `POST /wonders/{id}/verify`.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use wonders_core::error::CoreError;
use wonders_core::inquiry::{MAX_ATTACHMENTS, MAX_ATTACHMENT_BYTES};
use wonders_core::ordering::newest_first;
use wonders_core::pagination::{clamp_limit, clamp_offset, MAX_PAGE_SIZE};
use wonders_core::policy::{self, Viewer};
use wonders_core::types::InquiryId;
use wonders_core::validation;
use wonders_db::models::inquiry::{
    CreateInquiry, Inquiry, InquiryView, NewInquiry, PrivateLookup, PublicListParams,
    UnlockInquiry, UpdateInquiryContent, VerifyAuthor,
};
use wonders_events::InquiryEvent;

use crate::auth::jwt::generate_author_grant;
use crate::error::{AppError, AppResult};
use crate::middleware::author::AuthorGrant;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;
use crate::storage::{self, PendingUpload};

/// Name of the JSON part in a multipart submission.
const PAYLOAD_PART: &str = "payload";
/// Name of each image part in a multipart submission.
const IMAGE_PART: &str = "images";

/// Request body limit for multipart submissions: every image at the
/// maximum size, one extra so an over-count is reported as such, plus
/// room for the payload.
pub const MAX_UPLOAD_BODY_BYTES: usize =
    (MAX_ATTACHMENTS + 1) * MAX_ATTACHMENT_BYTES as usize + 64 * 1024;

/// Body of a successful author verification.
#[derive(Debug, Serialize)]
pub struct AuthorGrantResponse {
    pub inquiry_id: InquiryId,
    /// Send back in the `x-author-grant` header.
    pub grant: String,
    /// Grant lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// POST /wonders
// ---------------------------------------------------------------------------

/// Submit an inquiry without attachments.
pub async fn submit_inquiry(
    State(state): State<AppState>,
    Json(input): Json<CreateInquiry>,
) -> AppResult<impl IntoResponse> {
    let created = submit(&state, input, Vec::new()).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: InquiryView::full(&created),
        }),
    ))
}

// ---------------------------------------------------------------------------
// POST /wonders/upload
// ---------------------------------------------------------------------------

/// Submit an inquiry with images.
///
/// Expects a `payload` part holding the [`CreateInquiry`] JSON and up to
/// five `images` file parts.
pub async fn submit_inquiry_with_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut payload: Option<CreateInquiry> = None;
    let mut uploads: Vec<PendingUpload> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            PAYLOAD_PART => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| AppError::BadRequest(format!("Invalid payload: {e}")))?;
                payload = Some(parsed);
            }
            IMAGE_PART => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                uploads.push(PendingUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {} // ignore unknown fields
        }
    }

    let input = payload.ok_or_else(|| {
        AppError::BadRequest(format!("Missing required '{PAYLOAD_PART}' field"))
    })?;

    let created = submit(&state, input, uploads).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: InquiryView::full(&created),
        }),
    ))
}

/// Validate, store attachments, then persist.
///
/// Nothing is uploaded until the whole submission validates. If an upload
/// or the insert fails, every blob already stored is removed again.
async fn submit(
    state: &AppState,
    input: CreateInquiry,
    uploads: Vec<PendingUpload>,
) -> AppResult<Inquiry> {
    let candidates: Vec<_> = uploads.iter().map(PendingUpload::candidate).collect();
    validation::validate_submission(&input.submission(), &candidates)?;

    let images = storage::upload_all(state.blobs.as_ref(), &uploads).await?;
    let keys: Vec<String> = images.iter().map(|img| img.storage_key.clone()).collect();

    let new = NewInquiry::from_request(input, images);
    let created = match state.inquiries.create(&new).await {
        Ok(row) => row,
        Err(e) => {
            storage::remove_all(state.blobs.as_ref(), &keys).await;
            return Err(e.into());
        }
    };

    state
        .event_bus
        .publish(InquiryEvent::created(created.id, created.is_public));

    tracing::info!(
        inquiry_id = %created.id,
        is_public = created.is_public,
        category = %created.category,
        attachments = keys.len(),
        "Inquiry submitted",
    );

    Ok(created)
}

// ---------------------------------------------------------------------------
// GET /wonders
// ---------------------------------------------------------------------------

/// The public list, newest first.
///
/// The store returns public inquiries in no particular order; sorting and
/// paging happen here. `total` counts every public inquiry so clients can
/// tell when a page is not the whole list.
pub async fn list_public_inquiries(
    State(state): State<AppState>,
    Query(params): Query<PublicListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, MAX_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);

    let rows = state.inquiries.list_public().await?;
    let views: Vec<InquiryView> = rows
        .iter()
        .filter(|row| policy::is_publicly_listed(row.is_public))
        .map(|row| row.view_for(Viewer::Public, false))
        .collect();

    let total = views.len();
    let page: Vec<InquiryView> = newest_first(views)
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    Ok(Json(PageResponse::new(page, total, offset as usize)))
}

// ---------------------------------------------------------------------------
// GET /wonders/{id}
// ---------------------------------------------------------------------------

/// One inquiry. Private inquiries come back locked (metadata only).
pub async fn get_inquiry(
    State(state): State<AppState>,
    Path(id): Path<InquiryId>,
) -> AppResult<impl IntoResponse> {
    let inquiry = find_inquiry(&state, id).await?;
    Ok(Json(DataResponse {
        data: inquiry.view_for(Viewer::Public, false),
    }))
}

// ---------------------------------------------------------------------------
// POST /wonders/{id}/unlock
// ---------------------------------------------------------------------------

/// Reveal a private inquiry's content by its secret.
///
/// An unknown id fails exactly like a wrong secret. A public inquiry has no
/// secret to prove, so unlocking it yields the ordinary public view.
pub async fn unlock_inquiry(
    State(state): State<AppState>,
    Path(id): Path<InquiryId>,
    Json(input): Json<UnlockInquiry>,
) -> AppResult<impl IntoResponse> {
    let inquiry = state
        .inquiries
        .find_by_id(id)
        .await?
        .ok_or(CoreError::NoMatchingInquiry)?;

    if let Err(e) = policy::unlock(&inquiry.ownership(), &input.access_secret) {
        tracing::info!(inquiry_id = %id, "Unlock rejected");
        return Err(e.into());
    }

    Ok(Json(DataResponse {
        data: inquiry.view_for(Viewer::Public, !inquiry.is_public),
    }))
}

// ---------------------------------------------------------------------------
// POST /wonders/lookup
// ---------------------------------------------------------------------------

/// Find private inquiries by author email and secret.
///
/// Any miss (unknown email, wrong secret, or only public inquiries under
/// that email) is the same 404.
pub async fn lookup_private_inquiries(
    State(state): State<AppState>,
    Json(input): Json<PrivateLookup>,
) -> AppResult<impl IntoResponse> {
    let rows = state
        .inquiries
        .find_private(&input.author_email, &input.access_secret)
        .await?;

    let views: Vec<InquiryView> = rows
        .iter()
        .filter(|row| {
            policy::matches_private_lookup(
                &row.ownership(),
                &input.author_email,
                &input.access_secret,
            )
        })
        .map(|row| row.view_for(Viewer::Public, true))
        .collect();

    if views.is_empty() {
        return Err(CoreError::NoMatchingInquiry.into());
    }

    Ok(Json(DataResponse {
        data: newest_first(views),
    }))
}

// ---------------------------------------------------------------------------
// POST /wonders/{id}/verify
// ---------------------------------------------------------------------------

/// Check the author's credentials and issue a grant for this inquiry.
pub async fn verify_author(
    State(state): State<AppState>,
    Path(id): Path<InquiryId>,
    Json(input): Json<VerifyAuthor>,
) -> AppResult<impl IntoResponse> {
    let inquiry = state
        .inquiries
        .find_by_id(id)
        .await?
        .ok_or(CoreError::NoMatchingInquiry)?;

    if let Err(e) = policy::verify_author(
        &inquiry.ownership(),
        &input.author_email,
        input.access_secret.as_deref(),
    ) {
        tracing::info!(inquiry_id = %id, "Author verification rejected");
        return Err(e.into());
    }

    let grant = generate_author_grant(id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Grant generation error: {e}")))?;

    tracing::info!(inquiry_id = %id, "Author verified");

    Ok(Json(DataResponse {
        data: AuthorGrantResponse {
            inquiry_id: id,
            grant,
            expires_in: state.config.jwt.author_grant_expiry_mins * 60,
        },
    }))
}

// ---------------------------------------------------------------------------
// PUT /wonders/{id}
// ---------------------------------------------------------------------------

/// Edit title and content. Requires an author grant for this inquiry.
pub async fn update_inquiry(
    grant: AuthorGrant,
    State(state): State<AppState>,
    Path(id): Path<InquiryId>,
    Json(input): Json<UpdateInquiryContent>,
) -> AppResult<impl IntoResponse> {
    policy::ensure_grant_covers(grant.inquiry_id, id)?;
    validation::validate_edit(&input.title, &input.content)?;

    let updated = state
        .inquiries
        .update_content(id, &input.title, &input.content)
        .await?
        .ok_or_else(|| CoreError::not_found("Inquiry", id))?;

    state
        .event_bus
        .publish(InquiryEvent::updated(updated.id, updated.is_public));

    tracing::info!(inquiry_id = %id, "Inquiry edited by author");

    Ok(Json(DataResponse {
        data: InquiryView::full(&updated),
    }))
}

// ---------------------------------------------------------------------------
// DELETE /wonders/{id}
// ---------------------------------------------------------------------------

/// Delete an inquiry and its attachments. Requires an author grant.
pub async fn delete_inquiry(
    grant: AuthorGrant,
    State(state): State<AppState>,
    Path(id): Path<InquiryId>,
) -> AppResult<StatusCode> {
    policy::ensure_grant_covers(grant.inquiry_id, id)?;

    let inquiry = find_inquiry(&state, id).await?;
    if !state.inquiries.delete(id).await? {
        return Err(CoreError::not_found("Inquiry", id).into());
    }

    storage::remove_all(state.blobs.as_ref(), &inquiry.storage_keys()).await;

    state
        .event_bus
        .publish(InquiryEvent::deleted(id, inquiry.is_public));

    tracing::info!(inquiry_id = %id, "Inquiry deleted by author");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_inquiry(state: &AppState, id: InquiryId) -> AppResult<Inquiry> {
    state
        .inquiries
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Inquiry", id).into())
}
