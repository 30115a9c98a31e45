//! Operator handlers for the wonders board.
//!
//! Every handler requires [`RequireOperator`]. Operators see every inquiry in
//! full regardless of visibility, reply to inquiries, and move them through
//! the status workflow.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use wonders_core::error::CoreError;
use wonders_core::inquiry;
use wonders_core::ordering::newest_first;
use wonders_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use wonders_core::policy::Viewer;
use wonders_core::types::InquiryId;
use wonders_core::validation;
use wonders_core::workflow::{self, ReplyPlan};
use wonders_db::models::inquiry::{
    Inquiry, InquiryFilter, InquiryListParams, InquiryView, ReplyToInquiry, UpdateInquiryStatus,
};
use wonders_events::InquiryEvent;

use crate::error::AppResult;
use crate::middleware::rbac::RequireOperator;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /admin/wonders
// ---------------------------------------------------------------------------

/// Every inquiry, newest first, optionally filtered by status.
pub async fn list_inquiries(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    Query(params): Query<InquiryListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref s) = params.status {
        inquiry::validate_status(s)?;
    }

    let filter = InquiryFilter {
        status: params.status,
        limit: clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        offset: clamp_offset(params.offset),
    };

    let rows = state.inquiries.list_all(&filter).await?;
    let views: Vec<InquiryView> = rows
        .iter()
        .map(|row| row.view_for(Viewer::Operator, false))
        .collect();

    Ok(Json(DataResponse {
        data: newest_first(views),
    }))
}

// ---------------------------------------------------------------------------
// GET /admin/wonders/{id}
// ---------------------------------------------------------------------------

pub async fn get_inquiry(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    Path(id): Path<InquiryId>,
) -> AppResult<impl IntoResponse> {
    let inquiry = find_inquiry(&state, id).await?;
    Ok(Json(DataResponse {
        data: inquiry.view_for(Viewer::Operator, false),
    }))
}

// ---------------------------------------------------------------------------
// PUT /admin/wonders/{id}/reply
// ---------------------------------------------------------------------------

/// Record the operator's reply and mark the inquiry answered.
///
/// Re-sending the reply an answered inquiry already holds changes nothing,
/// including `admin_replied_at`.
pub async fn reply_to_inquiry(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Path(id): Path<InquiryId>,
    Json(input): Json<ReplyToInquiry>,
) -> AppResult<impl IntoResponse> {
    validation::validate_reply(&input.admin_reply)?;
    let reply = input.admin_reply.trim();

    let current = find_inquiry(&state, id).await?;

    let inquiry = match workflow::plan_reply(&current.status, current.admin_reply.as_deref(), reply)?
    {
        ReplyPlan::Unchanged => {
            tracing::debug!(inquiry_id = %id, "Reply unchanged, nothing written");
            current
        }
        ReplyPlan::Apply => {
            let updated = state
                .inquiries
                .apply_reply(id, reply, Utc::now())
                .await?
                .ok_or_else(|| CoreError::not_found("Inquiry", id))?;

            state
                .event_bus
                .publish(InquiryEvent::updated(updated.id, updated.is_public));

            tracing::info!(
                inquiry_id = %id,
                operator_id = operator.user_id,
                old_status = %current.status,
                "Inquiry answered",
            );
            updated
        }
    };

    Ok(Json(DataResponse {
        data: inquiry.view_for(Viewer::Operator, false),
    }))
}

// ---------------------------------------------------------------------------
// PUT /admin/wonders/{id}/status
// ---------------------------------------------------------------------------

/// Move an inquiry along the workflow. Admin only.
pub async fn update_inquiry_status(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Path(id): Path<InquiryId>,
    Json(input): Json<UpdateInquiryStatus>,
) -> AppResult<impl IntoResponse> {
    let current = find_inquiry(&state, id).await?;

    workflow::validate_transition(
        &current.status,
        &input.status,
        current.admin_reply.is_some(),
    )?;

    if current.status == input.status {
        return Ok(Json(DataResponse {
            data: current.view_for(Viewer::Operator, false),
        }));
    }

    let updated = state
        .inquiries
        .set_status(id, &input.status)
        .await?
        .ok_or_else(|| CoreError::not_found("Inquiry", id))?;

    state
        .event_bus
        .publish(InquiryEvent::updated(updated.id, updated.is_public));

    tracing::info!(
        inquiry_id = %id,
        operator_id = operator.user_id,
        old_status = %current.status,
        new_status = %updated.status,
        "Inquiry status updated",
    );

    Ok(Json(DataResponse {
        data: updated.view_for(Viewer::Operator, false),
    }))
}

async fn find_inquiry(state: &AppState, id: InquiryId) -> AppResult<Inquiry> {
    state
        .inquiries
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Inquiry", id).into())
}
