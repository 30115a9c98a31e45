//! WebSocket delivery of the live public list.

pub mod handler;

pub use handler::live_feed_handler;
