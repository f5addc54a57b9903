//! # In-Memory Gateway
//!
//! HashMap-backed [`StockGateway`] implementation. Used by facade tests and
//! available to demos that want the engine without a database.
//!
//! Failure injection: `set_offline(true)` makes every call fail with
//! `RemoteUnavailable`, which is how tests exercise the
//! "locally reserved, remotely unconfirmed" path.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::gateway::{GatewayError, GatewayResult, RemoteStockLevel, StockGateway};
use mesa_core::types::{OrderLine, StockKey};

/// An in-process remote store.
///
/// Rows are keyed by [`StockKey`] and shared across tenants; `load_all`
/// ignores the tenant id since a single in-memory instance backs exactly
/// one tenant in practice.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    rows: RwLock<HashMap<StockKey, i64>>,
    offline: RwLock<bool>,
}

impl InMemoryGateway {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway pre-populated with rows.
    pub fn with_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (StockKey, i64)>,
    {
        InMemoryGateway {
            rows: RwLock::new(rows.into_iter().collect()),
            offline: RwLock::new(false),
        }
    }

    /// Inserts or replaces one remote row.
    pub async fn put(&self, key: StockKey, total_stock: i64) {
        self.rows.write().await.insert(key, total_stock);
    }

    /// Reads one remote total (test observability).
    pub async fn remote_total(&self, key: &StockKey) -> Option<i64> {
        self.rows.read().await.get(key).copied()
    }

    /// Toggles failure injection: while offline, every call fails with
    /// `RemoteUnavailable` and mutates nothing.
    pub async fn set_offline(&self, offline: bool) {
        *self.offline.write().await = offline;
    }

    async fn check_online(&self) -> GatewayResult<()> {
        if *self.offline.read().await {
            Err(GatewayError::RemoteUnavailable(
                "in-memory gateway is offline".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StockGateway for InMemoryGateway {
    async fn load_all(&self, tenant_id: &str) -> GatewayResult<Vec<RemoteStockLevel>> {
        self.check_online().await?;
        let rows = self.rows.read().await;
        debug!(tenant_id, count = rows.len(), "Loading stock from in-memory gateway");
        Ok(rows
            .iter()
            .map(|(key, total)| {
                RemoteStockLevel::new(key.product_id.clone(), key.variant_id.clone(), *total)
            })
            .collect())
    }

    async fn persist_quantity(&self, key: &StockKey, new_total_stock: i64) -> GatewayResult<()> {
        self.check_online().await?;
        let mut rows = self.rows.write().await;
        match rows.get_mut(key) {
            Some(total) => {
                *total = new_total_stock.max(0);
                Ok(())
            }
            None => Err(GatewayError::NotFound {
                product_id: key.product_id.clone(),
                variant_id: key.variant_id.clone(),
            }),
        }
    }

    async fn confirm_order(&self, lines: &[OrderLine]) -> GatewayResult<()> {
        self.check_online().await?;
        let mut rows = self.rows.write().await;

        // Check every line first so the write below is all-or-nothing.
        for line in lines {
            let key = line.key();
            let total = rows.get(&key).copied().unwrap_or(0);
            if total < line.quantity {
                return Err(GatewayError::Conflict {
                    product_id: line.product_id.clone(),
                    variant_id: line.variant_id.clone(),
                });
            }
        }

        for line in lines {
            if let Some(total) = rows.get_mut(&line.key()) {
                *total -= line.quantity;
            }
        }
        debug!(lines = lines.len(), "Order confirmed in in-memory gateway");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_order_decrements_totals() {
        let gateway = InMemoryGateway::with_rows([(StockKey::base("espresso"), 10)]);

        gateway
            .confirm_order(&[OrderLine::new("espresso", None, 4)])
            .await
            .unwrap();

        assert_eq!(gateway.remote_total(&StockKey::base("espresso")).await, Some(6));
    }

    #[tokio::test]
    async fn test_confirm_order_conflict_is_all_or_nothing() {
        let gateway = InMemoryGateway::with_rows([
            (StockKey::base("espresso"), 10),
            (StockKey::base("croissant"), 1),
        ]);

        let err = gateway
            .confirm_order(&[
                OrderLine::new("espresso", None, 4),
                OrderLine::new("croissant", None, 2),
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Conflict { ref product_id, .. } if product_id == "croissant"));
        // First line untouched despite passing its own check
        assert_eq!(gateway.remote_total(&StockKey::base("espresso")).await, Some(10));
    }

    #[tokio::test]
    async fn test_offline_fails_everything() {
        let gateway = InMemoryGateway::with_rows([(StockKey::base("espresso"), 10)]);
        gateway.set_offline(true).await;

        assert!(matches!(
            gateway.load_all("t").await.unwrap_err(),
            GatewayError::RemoteUnavailable(_)
        ));
        assert!(gateway
            .persist_quantity(&StockKey::base("espresso"), 5)
            .await
            .is_err());

        gateway.set_offline(false).await;
        assert_eq!(gateway.load_all("t").await.unwrap().len(), 1);
        // Totals unchanged by the failed calls
        assert_eq!(gateway.remote_total(&StockKey::base("espresso")).await, Some(10));
    }

    #[tokio::test]
    async fn test_persist_quantity_not_found() {
        let gateway = InMemoryGateway::new();
        let err = gateway
            .persist_quantity(&StockKey::base("ghost"), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotFound { .. }));
    }
}
