//! # mesa-db: SQLite Gateway for Mesa POS
//!
//! Implements the [`mesa_inventory::StockGateway`] trait over SQLite,
//! giving the inventory engine a durable local source of truth.
//!
//! ## Modules
//!
//! - [`pool`] - Connection pool configuration and the `Database` handle
//! - [`migrations`] - Embedded schema migrations
//! - [`repository`] - Row-level stock operations
//! - [`gateway`] - `SqliteStockGateway`, the trait implementation
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mesa_db::{Database, DbConfig, SqliteStockGateway};
//! use mesa_inventory::InventoryManager;
//!
//! let db = Database::new(DbConfig::new("./mesa.db")).await?;
//! let gateway = Arc::new(SqliteStockGateway::new(db, "cafe-1"));
//! let manager = InventoryManager::initialize("cafe-1", gateway).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gateway;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use gateway::SqliteStockGateway;
pub use pool::{Database, DbConfig};
pub use repository::stock::{StockLevelRepository, StockLevelRow};
