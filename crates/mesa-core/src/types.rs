//! # Domain Types
//!
//! Core domain types used throughout the inventory engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │    StockKey     │   │     StockRecord     │   │    OrderLine    │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  product_id     │   │  total_stock        │   │  product_id     │   │
//! │  │  variant_id?    │   │  ordered_quantity   │   │  variant_id?    │   │
//! │  │                 │   │  available()        │   │  quantity       │   │
//! │  └─────────────────┘   └─────────────────────┘   └─────────────────┘   │
//! │                                                                         │
//! │  StockKey identifies a record; variant_id = None means the base         │
//! │  product. The stock map is HashMap<StockKey, StockRecord>.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Stock Key
// =============================================================================

/// Composite identity of a stock record: product plus optional variant.
///
/// ## Identity Rules
/// - `product_id` is stable and externally assigned
/// - `variant_id = None` represents the base product
/// - Two keys are equal only when both components match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockKey {
    /// Product identifier (externally assigned, stable).
    pub product_id: String,

    /// Optional variant identifier; `None` means the base product.
    pub variant_id: Option<String>,
}

impl StockKey {
    /// Creates a key for a product/variant pair.
    pub fn new(product_id: impl Into<String>, variant_id: Option<String>) -> Self {
        StockKey {
            product_id: product_id.into(),
            variant_id,
        }
    }

    /// Creates a key for a base product (no variant).
    pub fn base(product_id: impl Into<String>) -> Self {
        StockKey {
            product_id: product_id.into(),
            variant_id: None,
        }
    }

    /// Creates a key for a specific variant of a product.
    pub fn variant(product_id: impl Into<String>, variant_id: impl Into<String>) -> Self {
        StockKey {
            product_id: product_id.into(),
            variant_id: Some(variant_id.into()),
        }
    }
}

impl fmt::Display for StockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant_id {
            Some(variant) => write!(f, "{}/{}", self.product_id, variant),
            None => write!(f, "{}", self.product_id),
        }
    }
}

// =============================================================================
// Stock Record
// =============================================================================

/// One stock counter per product/variant.
///
/// ## Counters
/// - `total_stock`: last known quantity from the source of truth, never
///   negative
/// - `ordered_quantity`: quantity reserved by in-flight local orders not yet
///   confirmed, never negative
///
/// ## Invariant
/// `ordered_quantity <= total_stock` is the target. The engine tolerates
/// transient violations (e.g., a remote recount lowering `total_stock` while
/// a reservation is pending) by clamping [`StockRecord::available`] at zero
/// instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    /// Product identifier.
    pub product_id: String,

    /// Optional variant identifier; `None` means the base product.
    pub variant_id: Option<String>,

    /// Last known quantity from the source of truth.
    pub total_stock: i64,

    /// Quantity reserved by local, unconfirmed orders.
    pub ordered_quantity: i64,
}

impl StockRecord {
    /// Creates a fresh record with no outstanding reservations.
    pub fn new(key: &StockKey, total_stock: i64) -> Self {
        StockRecord {
            product_id: key.product_id.clone(),
            variant_id: key.variant_id.clone(),
            total_stock: total_stock.max(0),
            ordered_quantity: 0,
        }
    }

    /// Returns the key identifying this record.
    pub fn key(&self) -> StockKey {
        StockKey {
            product_id: self.product_id.clone(),
            variant_id: self.variant_id.clone(),
        }
    }

    /// Quantity still available for new orders.
    ///
    /// Derived as `total_stock - ordered_quantity`, clamped at zero so a
    /// lagging remote recount is never reported as negative availability.
    #[inline]
    pub fn available(&self) -> i64 {
        (self.total_stock - self.ordered_quantity).max(0)
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// One line of an order: a quantity of a product/variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product identifier.
    pub product_id: String,

    /// Optional variant identifier; `None` means the base product.
    pub variant_id: Option<String>,

    /// Quantity ordered. Must be positive; the reservation engine rejects
    /// zero and negative quantities.
    pub quantity: i64,
}

impl OrderLine {
    /// Creates a new order line.
    pub fn new(product_id: impl Into<String>, variant_id: Option<String>, quantity: i64) -> Self {
        OrderLine {
            product_id: product_id.into(),
            variant_id,
            quantity,
        }
    }

    /// Returns the stock key this line targets.
    pub fn key(&self) -> StockKey {
        StockKey {
            product_id: self.product_id.clone(),
            variant_id: self.variant_id.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(StockKey::base("latte").to_string(), "latte");
        assert_eq!(StockKey::variant("latte", "oat").to_string(), "latte/oat");
    }

    #[test]
    fn test_key_equality_includes_variant() {
        assert_ne!(StockKey::base("latte"), StockKey::variant("latte", "oat"));
        assert_eq!(
            StockKey::variant("latte", "oat"),
            StockKey::new("latte", Some("oat".to_string()))
        );
    }

    #[test]
    fn test_record_available_clamps_at_zero() {
        let mut record = StockRecord::new(&StockKey::base("latte"), 5);
        record.ordered_quantity = 3;
        assert_eq!(record.available(), 2);

        // Remote recount dropped below the outstanding reservation
        record.total_stock = 2;
        assert_eq!(record.available(), 0);
    }

    #[test]
    fn test_record_new_clamps_negative_total() {
        let record = StockRecord::new(&StockKey::base("latte"), -4);
        assert_eq!(record.total_stock, 0);
        assert_eq!(record.ordered_quantity, 0);
    }

    #[test]
    fn test_order_line_key() {
        let line = OrderLine::new("latte", Some("oat".to_string()), 2);
        assert_eq!(line.key(), StockKey::variant("latte", "oat"));
    }
}
