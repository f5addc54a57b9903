//! # mesa-core: Pure Business Logic for the Mesa POS Inventory Engine
//!
//! This crate is the **heart** of the inventory engine. It contains the
//! stock-consistency logic as pure in-memory components with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Mesa POS Inventory Engine                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              mesa-inventory (Facade + Gateway)                  │   │
//! │  │    InventoryManager ──► StockGateway ──► remote store           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mesa-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌─────────────┐              │   │
//! │  │   │   types   │  │    store    │  │ reservation │              │   │
//! │  │   │ StockKey  │  │ StockStore  │  │  check-and- │              │   │
//! │  │   │StockRecord│  │ atomic ops  │  │  commit     │              │   │
//! │  │   └───────────┘  └─────────────┘  └─────────────┘              │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐                               │   │
//! │  │   │  notifier │  │    error    │                               │   │
//! │  │   │ fan-out   │  │ StockError  │                               │   │
//! │  │   └───────────┘  └─────────────┘                               │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO ASYNC                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (StockKey, StockRecord, OrderLine)
//! - [`store`] - The Stock Store: atomic read/write primitives over the map
//! - [`reservation`] - All-or-nothing multi-line reservation engine
//! - [`notifier`] - Coarse change-notification fan-out
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 2. **No suspension**: every operation is synchronous, so a reservation's
//!    check-and-commit sequence is never parked mid-flight
//! 3. **Atomic check-then-set**: availability checks happen inside the same
//!    lock as the write, closing the classic check-then-act race
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use mesa_core::store::StockStore;
//! use mesa_core::types::{OrderLine, StockKey};
//! use mesa_core::reservation;
//!
//! let store = StockStore::new();
//! store.set(&StockKey::base("espresso"), 10);
//!
//! let lines = vec![OrderLine::new("espresso", None, 6)];
//! reservation::reserve(&store, &lines).unwrap();
//!
//! let record = store.get(&StockKey::base("espresso")).unwrap();
//! assert_eq!(record.available(), 4);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod notifier;
pub mod reservation;
pub mod store;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mesa_core::StockStore` instead of
// `use mesa_core::store::StockStore`

pub use error::{StockError, StockResult};
pub use notifier::{ChangeNotifier, SubscriptionHandle};
pub use store::StockStore;
pub use types::{OrderLine, StockKey, StockRecord};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tenant ID for single-restaurant deployments.
///
/// The engine is instantiated per tenant context; this constant is the
/// conventional tenant for installations that never switch restaurants.
pub const DEFAULT_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Maximum lines allowed in a single order reservation.
///
/// Prevents runaway orders and keeps the rollback window of a failed
/// multi-line reservation bounded.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line in an order.
///
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
