//! Persistence for the wonders board.
//!
//! - [`models`] -- row types and request/response DTOs.
//! - [`repositories`] -- PostgreSQL repositories (zero-sized structs taking
//!   `&PgPool`).
//! - [`store`] -- the [`InquiryStore`] / [`AccountStore`] collaborator traits
//!   and their PostgreSQL implementations.
//! - [`memory`] -- in-memory stores used by tests and database-less runs.

pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub use error::StoreError;
pub use memory::{MemoryAccountStore, MemoryInquiryStore};
pub use store::{AccountStore, InquiryStore, PgAccountStore, PgInquiryStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
