//! # mesa-inventory: Per-Tenant Inventory Facade
//!
//! This crate composes the pure engine from `mesa-core` into the single
//! object a tenant session uses, and defines the Sync Gateway seam across
//! which storage backends plug in.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Inventory Facade Architecture                      │
//! │                                                                         │
//! │  UI / hook code (out of scope)                                         │
//! │       │  get_all_stock, is_available, process_order, listeners         │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                InventoryManager (one per tenant)                │   │
//! │  │                                                                 │   │
//! │  │   owns ──► StockStore          (mesa-core, in-memory, atomic)   │   │
//! │  │   uses ──► reservation engine  (mesa-core, all-or-nothing)      │   │
//! │  │   owns ──► ChangeNotifier      (mesa-core, coarse fan-out)      │   │
//! │  │   holds ─► Arc<dyn StockGateway>  (this crate, async seam)      │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               │                                         │
//! │              ┌────────────────┴────────────────┐                       │
//! │              ▼                                 ▼                        │
//! │     InMemoryGateway (tests/demos)     SqliteStockGateway (mesa-db)     │
//! │                                                                         │
//! │  Local reservations are session-scoped intent: a gateway failure on    │
//! │  confirmation leaves stock "locally reserved, remotely unconfirmed"    │
//! │  rather than silently releasing it.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`manager`] - The `InventoryManager` facade
//! - [`gateway`] - `StockGateway` trait and gateway error taxonomy
//! - [`memory`] - HashMap-backed gateway for tests and demos
//! - [`error`] - Facade-level error union
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mesa_inventory::{InventoryManager, memory::InMemoryGateway};
//! use mesa_core::OrderLine;
//!
//! let gateway = Arc::new(InMemoryGateway::new());
//! let manager = InventoryManager::initialize("tenant-1", gateway).await?;
//!
//! let lines = vec![OrderLine::new("espresso", None, 2)];
//! manager.process_order(&lines).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gateway;
pub mod manager;
pub mod memory;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{InventoryError, InventoryResult};
pub use gateway::{GatewayError, GatewayResult, RemoteStockLevel, StockGateway};
pub use manager::InventoryManager;
pub use memory::InMemoryGateway;
