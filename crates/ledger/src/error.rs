use thiserror::Error;

/// Errors that can occur when interacting with the ledger store.
///
/// All variants mean the append or read did not happen; the store never
/// leaves partial state behind. Retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The underlying persistence is unavailable.
    #[error("ledger store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for ledger store operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
