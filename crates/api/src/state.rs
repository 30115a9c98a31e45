use std::sync::Arc;

use wonders_db::{AccountStore, InquiryStore};
use wonders_events::EventBus;

use crate::config::ServerConfig;
use crate::storage::BlobStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Inquiry persistence (PostgreSQL or in-memory).
    pub inquiries: Arc<dyn InquiryStore>,
    /// Operator and member accounts.
    pub accounts: Arc<dyn AccountStore>,
    /// Attachment blob storage.
    pub blobs: Arc<dyn BlobStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Fan-out of inquiry changes to live feed subscribers.
    pub event_bus: Arc<EventBus>,
}
