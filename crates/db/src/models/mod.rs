//! Row models and DTOs.

pub mod account;
pub mod inquiry;
