//! Change notifications for the wonders board.
//!
//! [`EventBus`] is an in-process publish/subscribe hub backed by
//! `tokio::sync::broadcast`. Handlers publish an [`InquiryEvent`] after every
//! successful mutation; live list subscriptions listen and re-fetch.

pub mod bus;

pub use bus::{EventBus, InquiryEvent, InquiryEventKind};
