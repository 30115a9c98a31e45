//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`InquiryEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use wonders_core::types::InquiryId;

// ---------------------------------------------------------------------------
// InquiryEvent
// ---------------------------------------------------------------------------

/// What happened to an inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryEventKind {
    Created,
    /// Content edit, reply, or status change.
    Updated,
    Deleted,
}

impl InquiryEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InquiryEventKind::Created => "inquiry.created",
            InquiryEventKind::Updated => "inquiry.updated",
            InquiryEventKind::Deleted => "inquiry.deleted",
        }
    }
}

/// A change to one inquiry.
///
/// Carries no record data: subscribers re-fetch, so the store stays the
/// single source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquiryEvent {
    pub kind: InquiryEventKind,
    pub inquiry_id: InquiryId,
    /// Visibility of the record at the time of the change.
    pub is_public: bool,
    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl InquiryEvent {
    pub fn new(kind: InquiryEventKind, inquiry_id: InquiryId, is_public: bool) -> Self {
        Self {
            kind,
            inquiry_id,
            is_public,
            timestamp: Utc::now(),
        }
    }

    pub fn created(inquiry_id: InquiryId, is_public: bool) -> Self {
        Self::new(InquiryEventKind::Created, inquiry_id, is_public)
    }

    pub fn updated(inquiry_id: InquiryId, is_public: bool) -> Self {
        Self::new(InquiryEventKind::Updated, inquiry_id, is_public)
    }

    pub fn deleted(inquiry_id: InquiryId, is_public: bool) -> Self {
        Self::new(InquiryEventKind::Deleted, inquiry_id, is_public)
    }

    /// Whether the public list can have changed.
    pub fn affects_public_list(&self) -> bool {
        self.is_public
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`InquiryEvent`].
///
/// # Usage
///
/// ```rust
/// use wonders_events::bus::{EventBus, InquiryEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(InquiryEvent::created(uuid::Uuid::now_v7(), true));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<InquiryEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: InquiryEvent) {
        // Err only means nobody is listening.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<InquiryEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
