//! # Stock Store
//!
//! The authoritative in-memory mapping of product/variant identity to stock
//! counters. Holds no business policy; the reservation engine layers the
//! order semantics on top of these primitives.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Stock Store Operations                             │
//! │                                                                         │
//! │  Caller A (order)          StockStore              Caller B (order)     │
//! │  ────────────────          ──────────              ────────────────     │
//! │                                                                         │
//! │  adjust_ordered(+4) ─────► ┌──────────┐ ◄───────── adjust_ordered(+4)  │
//! │                            │  Mutex   │                                │
//! │                            │ ┌──────┐ │   The availability check and   │
//! │                            │ │ map  │ │   the write happen inside the  │
//! │                            │ └──────┘ │   same lock acquisition. Two   │
//! │                            └──────────┘   racing reservations cannot   │
//! │                                           both commit past capacity.   │
//! │                                                                         │
//! │  All operations are synchronous and never suspend; the lock is held    │
//! │  only for the duration of one map operation.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::error::{StockError, StockResult};
use crate::types::{OrderLine, StockKey, StockRecord};

/// The Stock Store: read/write primitives over the stock map.
///
/// ## Ownership
/// Exclusively owned by the inventory facade for its tenant; no other
/// component holds a writable reference. All mutation goes through the
/// reservation engine or the reconciliation path.
#[derive(Debug, Default)]
pub struct StockStore {
    /// The stock map. Key uniqueness is by (product, variant).
    records: Mutex<HashMap<StockKey, StockRecord>>,
}

impl StockStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        StockStore {
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the record for a key, or `None` when it is unknown.
    ///
    /// "Unknown" is distinct from zero stock: an absent record means the
    /// engine has no information for that product at all.
    pub fn get(&self, key: &StockKey) -> Option<StockRecord> {
        self.lock().get(key).cloned()
    }

    /// Replaces `total_stock` for a record, creating it if absent.
    ///
    /// A newly created record starts with `ordered_quantity = 0`. An
    /// existing record keeps its outstanding reservations; only the
    /// authoritative total changes. Negative totals clamp to zero.
    pub fn set(&self, key: &StockKey, total_stock: i64) {
        let mut records = self.lock();
        match records.get_mut(key) {
            Some(record) => {
                record.total_stock = total_stock.max(0);
            }
            None => {
                records.insert(key.clone(), StockRecord::new(key, total_stock));
            }
        }
        debug!(key = %key, total_stock, "Stock total updated");
    }

    /// Applies `delta` to `ordered_quantity` for an existing record.
    ///
    /// ## Atomicity
    /// The bounds check and the write happen under one lock acquisition.
    /// On failure the record is left unmodified.
    ///
    /// ## Returns
    /// - `Ok(new_ordered_quantity)` on success
    /// - `Err(InsufficientStock)` if the result would exceed `total_stock`
    ///   or drop below zero
    /// - `Err(UnknownProduct)` if no record exists for the key
    pub fn adjust_ordered(&self, key: &StockKey, delta: i64) -> StockResult<i64> {
        let mut records = self.lock();
        let record = records
            .get_mut(key)
            .ok_or_else(|| StockError::unknown(&key.product_id, &key.variant_id))?;

        let new_ordered = record.ordered_quantity + delta;
        if new_ordered < 0 || new_ordered > record.total_stock {
            return Err(StockError::insufficient(
                &key.product_id,
                &key.variant_id,
                delta,
                record.available(),
            ));
        }

        record.ordered_quantity = new_ordered;
        debug!(key = %key, delta, new_ordered, "Ordered quantity adjusted");
        Ok(new_ordered)
    }

    /// Releases up to `quantity` from a record's `ordered_quantity`,
    /// clamping at zero.
    ///
    /// Unlike [`StockStore::adjust_ordered`] this never fails on bounds;
    /// it exists for the release path, which must succeed even when a
    /// remote recount already shrank the counters underneath us. Returns
    /// `Err(UnknownProduct)` only when the record is absent.
    pub fn release_ordered(&self, key: &StockKey, quantity: i64) -> StockResult<i64> {
        let mut records = self.lock();
        let record = records
            .get_mut(key)
            .ok_or_else(|| StockError::unknown(&key.product_id, &key.variant_id))?;

        record.ordered_quantity = (record.ordered_quantity - quantity).max(0);
        Ok(record.ordered_quantity)
    }

    /// Applies a confirmed order to the map under one lock acquisition.
    ///
    /// For each line: `total_stock -= quantity` and
    /// `ordered_quantity -= quantity`, both clamped at zero. Called after
    /// the remote store durably accepted the order, so a missing record
    /// here is only logged, as the authoritative decrement already happened.
    pub fn commit_confirmed(&self, lines: &[OrderLine]) {
        let mut records = self.lock();
        for line in lines {
            let key = line.key();
            match records.get_mut(&key) {
                Some(record) => {
                    record.total_stock = (record.total_stock - line.quantity).max(0);
                    record.ordered_quantity = (record.ordered_quantity - line.quantity).max(0);
                    debug!(
                        key = %key,
                        quantity = line.quantity,
                        total_stock = record.total_stock,
                        "Confirmed order applied"
                    );
                }
                None => {
                    debug!(key = %key, "Confirmed line has no local record; skipping");
                }
            }
        }
    }

    /// Returns an immutable copy of the full stock map.
    ///
    /// Concurrent mutation of the live map never affects the returned copy.
    pub fn snapshot(&self) -> HashMap<StockKey, StockRecord> {
        self.lock().clone()
    }

    /// Replaces the entire map with freshly loaded totals.
    ///
    /// Every record starts with `ordered_quantity = 0`: local reservations
    /// are ephemeral, session-scoped intent and do not survive a fresh
    /// load. Loading identical data twice yields identical maps.
    pub fn replace_all<I>(&self, rows: I)
    where
        I: IntoIterator<Item = (StockKey, i64)>,
    {
        let mut records = self.lock();
        records.clear();
        for (key, total_stock) in rows {
            records.insert(key.clone(), StockRecord::new(&key, total_stock));
        }
        debug!(count = records.len(), "Stock map replaced from load");
    }

    /// Number of records in the map.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when the map holds no records.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Acquires the map lock.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StockKey, StockRecord>> {
        self.records.lock().expect("stock map mutex poisoned")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
