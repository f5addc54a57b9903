//! # Inventory Manager
//!
//! The single object a tenant session uses. One instance per tenant
//! context, created explicitly at session start (no global singleton) and
//! discarded when the operator switches restaurants.
//!
//! ## Order Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      process_order(lines)                               │
//! │                                                                         │
//! │  1. reserve (mesa-core)      all-or-nothing against the local map      │
//! │        │ failure → error out, map untouched                            │
//! │        ▼                                                                │
//! │  2. publish                  UI re-reads: availability already reduced │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  3. confirm_order (gateway)  durably decrement remote totals           │
//! │        │                                                                │
//! │        ├── Ok ──────────► commit_confirmed + publish                    │
//! │        │                  (total↓, ordered↓, reservation retired)      │
//! │        │                                                                │
//! │        └── Err ─────────► reservation KEPT, error propagated            │
//! │                           "locally reserved, remotely unconfirmed":     │
//! │                           the UI keeps showing reduced availability     │
//! │                           and the caller retries or escalates.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The facade is the only component that calls Stock Store mutation
//! primitives; UI code sees snapshots and results, never the live map.

use std::sync::Arc;

use tracing::{debug, info, warn};

use mesa_core::notifier::{ChangeNotifier, SubscriptionHandle};
use mesa_core::reservation;
use mesa_core::store::StockStore;
use mesa_core::types::{OrderLine, StockKey, StockRecord};

use crate::error::InventoryResult;
use crate::gateway::StockGateway;

/// Per-tenant inventory facade.
pub struct InventoryManager {
    tenant_id: String,
    store: StockStore,
    notifier: ChangeNotifier,
    gateway: Arc<dyn StockGateway>,
}

impl InventoryManager {
    /// Creates the manager for a tenant session and performs the initial
    /// bulk load from the gateway.
    ///
    /// Every loaded record starts with `ordered_quantity = 0`: local
    /// reservations are ephemeral, session-scoped intent and never survive
    /// a fresh load.
    pub async fn initialize(
        tenant_id: impl Into<String>,
        gateway: Arc<dyn StockGateway>,
    ) -> InventoryResult<Self> {
        let manager = InventoryManager {
            tenant_id: tenant_id.into(),
            store: StockStore::new(),
            notifier: ChangeNotifier::new(),
            gateway,
        };
        manager.reload().await?;
        info!(
            tenant_id = %manager.tenant_id,
            records = manager.store.len(),
            "Inventory manager initialized"
        );
        Ok(manager)
    }

    /// Tenant this manager serves.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Re-reads the full authoritative stock listing and replaces the
    /// local map. Outstanding local reservations are discarded.
    ///
    /// This is the reconciliation step after a `Conflict`: re-read, then
    /// let the user re-attempt the order against fresh numbers.
    pub async fn reload(&self) -> InventoryResult<()> {
        let rows = self.gateway.load_all(&self.tenant_id).await?;
        self.store
            .replace_all(rows.into_iter().map(|row| (row.key(), row.total_stock)));
        self.notifier.publish();
        debug!(tenant_id = %self.tenant_id, "Stock map reloaded from gateway");
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Immutable snapshot of the full stock map.
    pub fn get_all_stock(&self) -> std::collections::HashMap<StockKey, StockRecord> {
        self.store.snapshot()
    }

    /// Record for one product/variant, or `None` when unknown.
    pub fn get_product_stock(
        &self,
        product_id: &str,
        variant_id: Option<&str>,
    ) -> Option<StockRecord> {
        self.store
            .get(&StockKey::new(product_id, variant_id.map(String::from)))
    }

    /// True when at least `quantity` units are available.
    ///
    /// An unknown product is "no information", which reports `false`
    /// rather than an error. UI treats absent as not-in-stock.
    pub fn is_available(&self, product_id: &str, variant_id: Option<&str>, quantity: i64) -> bool {
        self.get_product_stock(product_id, variant_id)
            .map(|record| record.available() >= quantity)
            .unwrap_or(false)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Operator edit of a stock total.
    ///
    /// Persists remotely FIRST; the local map changes only after the
    /// gateway reports success, so a failed edit leaves the local store
    /// exactly as it was and the caller knows the edit did not take effect.
    pub async fn update_total_stock(
        &self,
        product_id: &str,
        variant_id: Option<&str>,
        new_total_stock: i64,
    ) -> InventoryResult<()> {
        let key = StockKey::new(product_id, variant_id.map(String::from));
        self.gateway.persist_quantity(&key, new_total_stock).await?;
        self.store.set(&key, new_total_stock);
        self.notifier.publish();
        info!(key = %key, new_total_stock, "Stock total edited");
        Ok(())
    }

    /// Processes an order: local all-or-nothing reservation, then durable
    /// remote confirmation.
    ///
    /// ## Failure Semantics
    /// - Reservation failure: no state changed anywhere, error returned.
    /// - Confirmation failure: the local reservation is deliberately KEPT
    ///   (availability stays reduced for other callers) and the gateway
    ///   error propagates so the caller can retry (`RemoteUnavailable`) or
    ///   reconcile (`Conflict` → [`InventoryManager::reload`]). Retry
    ///   policy belongs to the caller; this method never retries.
    pub async fn process_order(&self, lines: &[OrderLine]) -> InventoryResult<()> {
        reservation::reserve(&self.store, lines)?;
        self.notifier.publish();

        match self.gateway.confirm_order(lines).await {
            Ok(()) => {
                self.store.commit_confirmed(lines);
                self.notifier.publish();
                info!(
                    tenant_id = %self.tenant_id,
                    lines = lines.len(),
                    "Order confirmed"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    tenant_id = %self.tenant_id,
                    error = %err,
                    "Order reserved locally but confirmation failed; reservation kept"
                );
                Err(err.into())
            }
        }
    }

    /// Releases a previous reservation (order cancelled or failed
    /// downstream). Unknown products are skipped with a warning.
    pub fn release_order(&self, lines: &[OrderLine]) {
        reservation::release(&self.store, lines);
        self.notifier.publish();
    }

    // =========================================================================
    // Change Notifications
    // =========================================================================

    /// Registers a change listener; fired once per committed operation.
    pub fn add_listener<F>(&self, listener: F) -> SubscriptionHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notifier.subscribe(listener)
    }

    /// Removes a listener by handle.
    pub fn remove_listener(&self, handle: SubscriptionHandle) -> bool {
        self.notifier.unsubscribe(handle)
    }
}

impl std::fmt::Debug for InventoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryManager")
            .field("tenant_id", &self.tenant_id)
            .field("records", &self.store.len())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
