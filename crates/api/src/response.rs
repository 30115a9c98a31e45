//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: views }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "total": n, "has_more": bool }` for paged lists.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    /// Items across all pages.
    pub total: usize,
    /// Whether items remain after this page.
    pub has_more: bool,
}

impl<T: Serialize> PageResponse<T> {
    /// Wrap the page that starts `offset` items into a list of `total`.
    pub fn new(data: Vec<T>, total: usize, offset: usize) -> Self {
        let has_more = offset.saturating_add(data.len()) < total;
        Self {
            data,
            total,
            has_more,
        }
    }
}
