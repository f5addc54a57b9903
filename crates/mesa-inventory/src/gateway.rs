//! # Sync Gateway
//!
//! The boundary trait between the in-memory engine and whatever storage
//! backend holds the authoritative stock counts. Reconciliation against the
//! remote source of truth happens entirely through this seam.
//!
//! ## Contract Summary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StockGateway                                     │
//! │                                                                         │
//! │  load_all(tenant)        ─► full authoritative stock listing           │
//! │                             errors: RemoteUnavailable                  │
//! │                                                                         │
//! │  persist_quantity(k, n)  ─► operator stock edit, durably stored        │
//! │                             errors: RemoteUnavailable | NotFound       │
//! │                                                                         │
//! │  confirm_order(lines)    ─► durably decrement remote totals            │
//! │                             ALL-OR-NOTHING at this boundary            │
//! │                             errors: RemoteUnavailable | Conflict       │
//! │                                                                         │
//! │  Conflict = the remote total was insufficient at confirmation time;    │
//! │  the remote diverged from local assumptions. Distinct from transport   │
//! │  failure, and must be handled by re-reading authoritative stock, not   │
//! │  by blind retry.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mesa_core::types::{OrderLine, StockKey};

// =============================================================================
// Remote Stock Level
// =============================================================================

/// One authoritative stock row as reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStockLevel {
    /// Product identifier.
    pub product_id: String,

    /// Optional variant identifier; `None` means the base product.
    pub variant_id: Option<String>,

    /// Authoritative total quantity.
    pub total_stock: i64,
}

impl RemoteStockLevel {
    /// Creates a remote stock row.
    pub fn new(product_id: impl Into<String>, variant_id: Option<String>, total_stock: i64) -> Self {
        RemoteStockLevel {
            product_id: product_id.into(),
            variant_id,
            total_stock,
        }
    }

    /// Returns the stock key for this row.
    pub fn key(&self) -> StockKey {
        StockKey::new(self.product_id.clone(), self.variant_id.clone())
    }
}

// =============================================================================
// Gateway Error
// =============================================================================

/// Failures crossing the remote-store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backing store cannot be reached.
    ///
    /// ## Caller Guidance
    /// Transient. Retry with backoff; local state is untouched.
    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(String),

    /// The referenced stock row does not exist remotely.
    #[error("Remote stock row not found for {product_id}{}",
        .variant_id.as_deref().map(|v| format!("/{v}")).unwrap_or_default())]
    NotFound {
        product_id: String,
        variant_id: Option<String>,
    },

    /// The remote total was insufficient when the order was confirmed.
    ///
    /// ## Caller Guidance
    /// The remote state diverged from the local assumption. Reconcile by
    /// re-reading authoritative stock (`load_all`/`reload`) before
    /// retrying; never blindly retry the same reservation.
    #[error("Remote stock conflict for {product_id}{}: total insufficient at confirmation",
        .variant_id.as_deref().map(|v| format!("/{v}")).unwrap_or_default())]
    Conflict {
        product_id: String,
        variant_id: Option<String>,
    },
}

impl GatewayError {
    /// True when the operation may be retried as-is with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::RemoteUnavailable(_))
    }
}

/// Convenience type alias for gateway results.
pub type GatewayResult<T> = Result<T, GatewayError>;

// =============================================================================
// Stock Gateway Trait
// =============================================================================

/// The seam a concrete persistence layer implements.
///
/// ## Suspension
/// Every method involves a remote round trip and may suspend. A bounded
/// wait followed by treating the call as failed is sufficient; no
/// cooperative cancellation is required. Implementations must not touch
/// the caller's in-memory state; the facade applies local effects only
/// after a gateway call reports success.
#[async_trait]
pub trait StockGateway: Send + Sync {
    /// Loads the full authoritative stock listing for a tenant.
    ///
    /// Called once at facade initialization and on explicit reloads.
    async fn load_all(&self, tenant_id: &str) -> GatewayResult<Vec<RemoteStockLevel>>;

    /// Durably stores an operator's explicit stock edit.
    ///
    /// Distinct from order-driven decrements: this replaces the remote
    /// total outright.
    async fn persist_quantity(&self, key: &StockKey, new_total_stock: i64) -> GatewayResult<()>;

    /// Durably decrements remote totals by the reserved quantities.
    ///
    /// All-or-nothing: either every line's decrement is applied, or none
    /// is and the error names the first conflicting line.
    async fn confirm_order(&self, lines: &[OrderLine]) -> GatewayResult<()>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_names_the_line() {
        let err = GatewayError::Conflict {
            product_id: "espresso".to_string(),
            variant_id: Some("double".to_string()),
        };
        assert!(err.to_string().contains("espresso/double"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_remote_unavailable_is_retryable() {
        assert!(GatewayError::RemoteUnavailable("timeout".into()).is_retryable());
        assert!(!GatewayError::NotFound {
            product_id: "espresso".to_string(),
            variant_id: None,
        }
        .is_retryable());
    }

    #[test]
    fn test_remote_stock_level_key() {
        let row = RemoteStockLevel::new("latte", Some("oat".to_string()), 3);
        assert_eq!(row.key(), StockKey::variant("latte", "oat"));
    }
}
