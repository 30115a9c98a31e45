//! Domain logic for the wonders (inquiry) board.
//!
//! Everything here is pure: no I/O, no async. The persistence and HTTP
//! layers call into these modules to validate submissions, decide what a
//! viewer may see or change, and order lists.

pub mod error;
pub mod inquiry;
pub mod ordering;
pub mod pagination;
pub mod policy;
pub mod roles;
pub mod types;
pub mod validation;
pub mod workflow;
