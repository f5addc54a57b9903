//! # Inventory Error Types
//!
//! Facade-level error union: everything `InventoryManager` can report is
//! either a local stock/reservation failure or a gateway failure.
//!
//! ## Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InsufficientStock   local, recoverable: inform user, don't retry      │
//! │  UnknownProduct      local, stale reference: refresh                    │
//! │  RemoteUnavailable   transient: retry with backoff                      │
//! │  Conflict            remote diverged: reload before retrying            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::gateway::GatewayError;
use mesa_core::error::StockError;

/// Errors surfaced by the inventory facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Local stock store / reservation failure.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Remote gateway failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl InventoryError {
    /// True when the operation may be retried as-is with backoff.
    ///
    /// Only transport-level gateway failures qualify; insufficient stock
    /// and conflicts need user action or a reload first.
    pub fn is_retryable(&self) -> bool {
        match self {
            InventoryError::Stock(_) => false,
            InventoryError::Gateway(err) => err.is_retryable(),
        }
    }

    /// True when the remote state diverged and the caller must reconcile
    /// (reload authoritative stock) before retrying.
    pub fn is_conflict(&self) -> bool {
        matches!(self, InventoryError::Gateway(GatewayError::Conflict { .. }))
    }

    /// True when the failure is a local shortage the user should see.
    pub fn is_insufficient_stock(&self) -> bool {
        matches!(
            self,
            InventoryError::Stock(StockError::InsufficientStock { .. })
        )
    }
}

/// Convenience type alias for facade results.
pub type InventoryResult<T> = Result<T, InventoryError>;
