//! # Error Types
//!
//! Domain-specific error types for mesa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mesa-core errors (this file)                                          │
//! │  └── StockError       - Stock store / reservation failures             │
//! │                                                                         │
//! │  mesa-inventory errors (separate crate)                                │
//! │  ├── GatewayError     - Remote store failures                          │
//! │  └── InventoryError   - Facade-level union of the two                  │
//! │                                                                         │
//! │  mesa-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: StockError / GatewayError → InventoryError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product, variant, shortfall)
//! 3. Errors are enum variants, never String
//! 4. A failed operation leaves no partial state behind

use thiserror::Error;

// =============================================================================
// Stock Error
// =============================================================================

/// Stock store and reservation errors.
///
/// These are synchronous result values; the store never panics on a
/// business-rule violation and never leaves a record half-updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    /// Not enough available stock to satisfy a reservation.
    ///
    /// ## When This Occurs
    /// - A reservation line exceeds `total_stock - ordered_quantity`
    /// - A concurrent order won the race between check and commit
    ///
    /// ## Caller Guidance
    /// Recoverable. Inform the user; do not retry automatically, the
    /// stock is genuinely short.
    #[error("Insufficient stock for {product_id}{}: requested {requested}, available {available}",
        .variant_id.as_deref().map(|v| format!("/{v}")).unwrap_or_default())]
    InsufficientStock {
        product_id: String,
        variant_id: Option<String>,
        requested: i64,
        available: i64,
    },

    /// The referenced product/variant has no stock record.
    ///
    /// ## When This Occurs
    /// - A stale reference after the record was removed remotely
    /// - A typo'd or never-loaded product id
    ///
    /// ## Caller Guidance
    /// Refresh from the source of truth before retrying.
    #[error("Unknown product {product_id}{}",
        .variant_id.as_deref().map(|v| format!("/{v}")).unwrap_or_default())]
    UnknownProduct {
        product_id: String,
        variant_id: Option<String>,
    },

    /// An order line carried a non-positive quantity.
    #[error("Invalid quantity {quantity} for {product_id}: must be positive")]
    InvalidQuantity { product_id: String, quantity: i64 },

    /// A single line exceeds the per-line quantity cap.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// An order exceeds the maximum number of lines.
    #[error("Order cannot have more than {max} lines")]
    TooManyLines { max: usize },
}

impl StockError {
    /// Builds an `InsufficientStock` error for a key, computing nothing.
    pub(crate) fn insufficient(
        product_id: &str,
        variant_id: &Option<String>,
        requested: i64,
        available: i64,
    ) -> Self {
        StockError::InsufficientStock {
            product_id: product_id.to_string(),
            variant_id: variant_id.clone(),
            requested,
            available,
        }
    }

    /// Builds an `UnknownProduct` error for a key.
    pub(crate) fn unknown(product_id: &str, variant_id: &Option<String>) -> Self {
        StockError::UnknownProduct {
            product_id: product_id.to_string(),
            variant_id: variant_id.clone(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with StockError.
pub type StockResult<T> = Result<T, StockError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = StockError::InsufficientStock {
            product_id: "latte".to_string(),
            variant_id: Some("oat".to_string()),
            requested: 5,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for latte/oat: requested 5, available 3"
        );
    }

    #[test]
    fn test_unknown_product_message_without_variant() {
        let err = StockError::UnknownProduct {
            product_id: "latte".to_string(),
            variant_id: None,
        };
        assert_eq!(err.to_string(), "Unknown product latte");
    }

    #[test]
    fn test_invalid_quantity_message() {
        let err = StockError::InvalidQuantity {
            product_id: "latte".to_string(),
            quantity: 0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid quantity 0 for latte: must be positive"
        );
    }
}
