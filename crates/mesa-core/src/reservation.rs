//! # Reservation Engine
//!
//! Applies an order (a sequence of lines) as a single all-or-nothing
//! reservation against the [`StockStore`].
//!
//! ## Check-and-Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    reserve(store, lines)                                │
//! │                                                                         │
//! │  1. Validate       quantity > 0, caps on lines and per-line quantity   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  2. Check pass     every line: available >= quantity                    │
//! │        │           any failure → abort, nothing written                 │
//! │        ▼                                                                │
//! │  3. Commit pass    per line: adjust_ordered(+qty)                       │
//! │        │           the store re-validates atomically, so a concurrent   │
//! │        │           racer can still make a later line fail               │
//! │        ▼                                                                │
//! │  4. Rollback       on a late failure, already-applied lines of THIS     │
//! │                    operation are reversed; the caller observes the      │
//! │                    operation as atomic either way                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, warn};

use crate::error::{StockError, StockResult};
use crate::store::StockStore;
use crate::types::OrderLine;
use crate::{MAX_LINE_QUANTITY, MAX_ORDER_LINES};

/// Reserves every line of an order, or nothing.
///
/// ## Contract
/// - On success every line's `ordered_quantity` grew by its quantity.
/// - On failure the store is left exactly as it was before the call: the
///   check pass writes nothing, and a commit-pass failure (a concurrent
///   racer shrank availability between check and commit) reverses the
///   lines already applied by this operation.
/// - The first failing line is reported with its shortfall.
pub fn reserve(store: &StockStore, lines: &[OrderLine]) -> StockResult<()> {
    validate(lines)?;

    // Check pass: confirm availability against current state. Nothing is
    // written here, so an abort needs no cleanup.
    for line in lines {
        let key = line.key();
        let record = store
            .get(&key)
            .ok_or_else(|| StockError::unknown(&line.product_id, &line.variant_id))?;
        if record.available() < line.quantity {
            return Err(StockError::insufficient(
                &line.product_id,
                &line.variant_id,
                line.quantity,
                record.available(),
            ));
        }
    }

    // Commit pass: adjust_ordered re-validates inside the store lock, so a
    // concurrent reservation cannot slip both of us past capacity.
    for (index, line) in lines.iter().enumerate() {
        if let Err(err) = store.adjust_ordered(&line.key(), line.quantity) {
            rollback(store, &lines[..index]);
            debug!(
                line = index,
                error = %err,
                "Reservation lost the race at commit; rolled back"
            );
            return Err(err);
        }
    }

    debug!(lines = lines.len(), "Reservation committed");
    Ok(())
}

/// Releases previously reserved quantities.
///
/// Symmetric to [`reserve`], used when an order is cancelled or fails
/// downstream after local reservation. Never fails on insufficient stock;
/// a line referencing an unknown product is a warn-level no-op, since the
/// record may have been removed by a remote reload.
pub fn release(store: &StockStore, lines: &[OrderLine]) {
    for line in lines {
        let key = line.key();
        if let Err(err) = store.release_ordered(&key, line.quantity) {
            warn!(key = %key, error = %err, "Release referenced an unknown product; skipping");
        }
    }
    debug!(lines = lines.len(), "Reservation released");
}

/// Reverses the already-applied prefix of a failed commit pass.
fn rollback(store: &StockStore, applied: &[OrderLine]) {
    for line in applied {
        // These quantities were added by this operation moments ago, so the
        // release can only fail if the record vanished. Log and continue.
        if let Err(err) = store.release_ordered(&line.key(), line.quantity) {
            warn!(key = %line.key(), error = %err, "Rollback skipped a vanished record");
        }
    }
}

/// Validates order shape before touching the store.
fn validate(lines: &[OrderLine]) -> StockResult<()> {
    if lines.len() > MAX_ORDER_LINES {
        return Err(StockError::TooManyLines {
            max: MAX_ORDER_LINES,
        });
    }
    for line in lines {
        if line.quantity <= 0 {
            return Err(StockError::InvalidQuantity {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
            });
        }
        if line.quantity > MAX_LINE_QUANTITY {
            return Err(StockError::QuantityTooLarge {
                requested: line.quantity,
                max: MAX_LINE_QUANTITY,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
