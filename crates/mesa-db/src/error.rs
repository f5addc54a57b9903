//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GatewayError (mesa-inventory) ← What the inventory facade sees        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller reconciles / retries                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    ///
    /// ## When This Occurs
    /// - Invalid SQL in migration
    /// - Migration version conflict
    #[error("Migration failed: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),

    /// Stock row not found.
    ///
    /// Carries the structured identity rather than a display string, so
    /// callers mapping it onward never have to re-parse a key. Product ids
    /// are arbitrary external strings and may themselves contain `/`.
    #[error("Stock row not found: {product_id}{}",
        .variant_id.as_deref().map(|v| format!("/{v}")).unwrap_or_default())]
    NotFound {
        product_id: String,
        variant_id: Option<String>,
    },

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),
}

/// Convenience type alias for Results with DbError.
pub type DbResult<T> = Result<T, DbError>;
