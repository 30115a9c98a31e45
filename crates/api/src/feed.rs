//! Live public-list subscription.
//!
//! A [`FeedSubscription`] holds the newest-first list of public inquiries
//! and keeps it current: every [`InquiryEvent`] touching a public record
//! triggers a full re-fetch from the store, so the snapshot is always an
//! authoritative copy, never a patched one. Dropping the subscription (or
//! calling [`FeedSubscription::close`]) stops the background task and
//! releases its event-bus receiver.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use wonders_core::ordering::newest_first;
use wonders_core::policy::{self, Viewer};
use wonders_db::models::inquiry::InquiryView;
use wonders_db::InquiryStore;
use wonders_events::{EventBus, InquiryEvent};

use crate::error::BACKEND_UNAVAILABLE_MESSAGE;

/// One delivery of the public list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedSnapshot {
    /// Increments on every delivery.
    pub version: u64,
    /// Public inquiries, newest first.
    pub inquiries: Vec<InquiryView>,
    /// Set when the last refresh failed; `inquiries` then holds the last
    /// good list.
    pub error: Option<String>,
}

/// Handle to a running live feed.
pub struct FeedSubscription {
    snapshot: watch::Receiver<FeedSnapshot>,
    cancel: CancellationToken,
}

impl FeedSubscription {
    /// Load the current public list and start following changes.
    ///
    /// The first snapshot is available from [`current`](Self::current)
    /// as soon as this returns.
    pub async fn start(store: Arc<dyn InquiryStore>, bus: &EventBus) -> Self {
        // Subscribe before the first fetch so no change slips between them.
        let events = bus.subscribe();

        let (tx, mut rx) = watch::channel(FeedSnapshot::default());
        refresh(store.as_ref(), &tx).await;
        // The first snapshot is read through `current`, not `changed`.
        rx.borrow_and_update();

        let cancel = CancellationToken::new();
        tokio::spawn(follow(store, events, tx, cancel.clone()));

        Self {
            snapshot: rx,
            cancel,
        }
    }

    /// The most recent snapshot.
    pub fn current(&self) -> FeedSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Wait for the next snapshot. `None` once the feed has stopped.
    pub async fn changed(&mut self) -> Option<FeedSnapshot> {
        self.snapshot.changed().await.ok()?;
        Some(self.snapshot.borrow_and_update().clone())
    }

    /// Stop following changes.
    pub fn close(self) {
        // Drop does the work.
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn follow(
    store: Arc<dyn InquiryStore>,
    mut events: tokio::sync::broadcast::Receiver<InquiryEvent>,
    tx: watch::Sender<FeedSnapshot>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = events.recv() => match received {
                Ok(event) if !event.affects_public_list() => continue,
                Ok(event) => {
                    tracing::debug!(kind = event.kind.as_str(), inquiry_id = %event.inquiry_id, "Refreshing live feed");
                    refresh(store.as_ref(), &tx).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Live feed lagged, resyncing");
                    refresh(store.as_ref(), &tx).await;
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
    tracing::debug!("Live feed stopped");
}

async fn refresh(store: &dyn InquiryStore, tx: &watch::Sender<FeedSnapshot>) {
    let result = store.list_public().await;
    tx.send_modify(|snapshot| {
        snapshot.version += 1;
        match result {
            Ok(rows) => {
                let views: Vec<InquiryView> = rows
                    .iter()
                    .filter(|row| policy::is_publicly_listed(row.is_public))
                    .map(|row| row.view_for(Viewer::Public, false))
                    .collect();
                snapshot.inquiries = newest_first(views);
                snapshot.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Live feed refresh failed");
                snapshot.error = Some(BACKEND_UNAVAILABLE_MESSAGE.to_string());
            }
        }
    });
}
