use rosterly_core::error::CoreError;

/// Persistence-layer error taxonomy.
///
/// `Conflict` is recoverable — the caller surfaces it and lets the user
/// adjust the time or owner. `Sqlx` errors are opaque and non-retryable at
/// this level; retry policy belongs to callers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("Shift conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Domain(#[from] CoreError),
}

/// PostgreSQL exclusion-constraint violation (class 23P01), raised by the
/// published-shift overlap backstop when concurrent writers race past the
/// in-memory check.
pub fn is_overlap_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23P01"),
        _ => false,
    }
}
