/// Errors surfaced by [`InquiryStore`](crate::InquiryStore) and
/// [`AccountStore`](crate::AccountStore) implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An error from the PostgreSQL driver.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness rule was violated (in-memory stores; PostgreSQL reports
    /// these as [`StoreError::Database`] with SQLSTATE 23505).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend could not be reached. Callers may retry manually.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
