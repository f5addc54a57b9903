//! # SQLite Stock Gateway
//!
//! [`StockGateway`] implementation backed by the SQLite pool.
//!
//! ## Confirmation Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                confirm_order(lines): all-or-nothing                     │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    per line:  UPDATE stock_levels                                       │
//! │               SET total_stock = total_stock - qty                       │
//! │               WHERE tenant/product/variant match                        │
//! │                 AND total_stock >= qty       ← conditional decrement    │
//! │               │                                                         │
//! │               ├── 1 row  → next line                                    │
//! │               └── 0 rows → ROLLBACK, return Conflict for this line      │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The WHERE guard makes the remote decrement atomic per row; the         │
//! │  transaction makes the whole order atomic. A transport error maps to    │
//! │  RemoteUnavailable and also rolls back.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use mesa_core::types::{OrderLine, StockKey};
use mesa_inventory::gateway::{GatewayError, GatewayResult, RemoteStockLevel, StockGateway};

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::stock::encode_variant;

/// SQLite-backed Sync Gateway, bound to one tenant.
#[derive(Debug, Clone)]
pub struct SqliteStockGateway {
    db: Database,
    tenant_id: String,
}

impl SqliteStockGateway {
    /// Creates a gateway bound to the given tenant.
    pub fn new(db: Database, tenant_id: impl Into<String>) -> Self {
        SqliteStockGateway {
            db,
            tenant_id: tenant_id.into(),
        }
    }

    /// Tenant this gateway serves.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }
}

/// Maps database failures to the gateway taxonomy.
fn map_db_error(err: DbError) -> GatewayError {
    match err {
        DbError::NotFound {
            product_id,
            variant_id,
        } => GatewayError::NotFound {
            product_id,
            variant_id,
        },
        other => GatewayError::RemoteUnavailable(other.to_string()),
    }
}

#[async_trait]
impl StockGateway for SqliteStockGateway {
    async fn load_all(&self, tenant_id: &str) -> GatewayResult<Vec<RemoteStockLevel>> {
        // The gateway serves exactly one tenant. A mismatched request is
        // logged and answered from the bound tenant, never the requested
        // one, matching persist_quantity and confirm_order.
        if tenant_id != self.tenant_id {
            warn!(
                requested = tenant_id,
                bound = %self.tenant_id,
                "Gateway queried for a tenant it is not bound to; serving bound tenant"
            );
        }

        let rows = self
            .db
            .stock_levels()
            .list_for_tenant(&self.tenant_id)
            .await
            .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let key = row.key();
                RemoteStockLevel::new(key.product_id, key.variant_id, row.total_stock)
            })
            .collect())
    }

    async fn persist_quantity(&self, key: &StockKey, new_total_stock: i64) -> GatewayResult<()> {
        self.db
            .stock_levels()
            .set_total(&self.tenant_id, key, new_total_stock)
            .await
            .map_err(map_db_error)
    }

    async fn confirm_order(&self, lines: &[OrderLine]) -> GatewayResult<()> {
        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| GatewayError::RemoteUnavailable(e.to_string()))?;

        let now = Utc::now();
        for line in lines {
            let result = sqlx::query(
                r#"
                UPDATE stock_levels
                SET total_stock = total_stock - ?4, updated_at = ?5
                WHERE tenant_id = ?1 AND product_id = ?2 AND variant_id = ?3
                  AND total_stock >= ?4
                "#,
            )
            .bind(&self.tenant_id)
            .bind(&line.product_id)
            .bind(encode_variant(&line.variant_id))
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| GatewayError::RemoteUnavailable(e.to_string()))?;

            if result.rows_affected() == 0 {
                // Dropping the transaction rolls back earlier lines.
                debug!(
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    "Remote total insufficient at confirmation"
                );
                return Err(GatewayError::Conflict {
                    product_id: line.product_id.clone(),
                    variant_id: line.variant_id.clone(),
                });
            }
        }

        tx.commit()
            .await
            .map_err(|e| GatewayError::RemoteUnavailable(e.to_string()))?;

        debug!(tenant_id = %self.tenant_id, lines = lines.len(), "Order confirmed durably");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn gateway_with(rows: &[(&StockKey, i64)]) -> SqliteStockGateway {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.stock_levels();
        for (key, total) in rows {
            repo.upsert("cafe-1", key, *total).await.unwrap();
        }
        SqliteStockGateway::new(db, "cafe-1")
    }

    #[tokio::test]
    async fn test_load_all_round_trips_variants() {
        let gateway = gateway_with(&[
            (&StockKey::base("espresso"), 10),
            (&StockKey::variant("latte", "oat"), 3),
        ])
        .await;

        let mut rows = gateway.load_all("cafe-1").await.unwrap();
        rows.sort_by(|a, b| a.product_id.cmp(&b.product_id));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key(), StockKey::base("espresso"));
        assert_eq!(rows[1].key(), StockKey::variant("latte", "oat"));
        assert_eq!(rows[1].total_stock, 3);
    }

    #[tokio::test]
    async fn test_load_all_ignores_foreign_tenant_request() {
        let gateway = gateway_with(&[(&StockKey::base("espresso"), 10)]).await;
        let repo = gateway.db.stock_levels();
        repo.upsert("cafe-2", &StockKey::base("secret"), 99).await.unwrap();

        // Bound to cafe-1: a request naming another tenant still answers
        // from cafe-1's rows.
        let rows = gateway.load_all("cafe-2").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key(), StockKey::base("espresso"));
    }

    #[tokio::test]
    async fn test_persist_quantity_not_found() {
        let gateway = gateway_with(&[]).await;

        let err = gateway
            .persist_quantity(&StockKey::variant("latte", "oat"), 5)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GatewayError::NotFound { ref product_id, ref variant_id }
                if product_id == "latte" && variant_id.as_deref() == Some("oat")
        ));
    }

    #[tokio::test]
    async fn test_not_found_keeps_slash_in_product_id() {
        let gateway = gateway_with(&[]).await;

        // Product ids are arbitrary external strings; a '/' in one must
        // not be misread as a variant separator.
        let err = gateway
            .persist_quantity(&StockKey::base("combo/2"), 5)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GatewayError::NotFound { ref product_id, ref variant_id }
                if product_id == "combo/2" && variant_id.is_none()
        ));
    }

    #[tokio::test]
    async fn test_confirm_order_decrements() {
        let gateway = gateway_with(&[(&StockKey::base("espresso"), 10)]).await;

        gateway
            .confirm_order(&[OrderLine::new("espresso", None, 4)])
            .await
            .unwrap();

        let total = gateway
            .db
            .stock_levels()
            .get_total("cafe-1", &StockKey::base("espresso"))
            .await
            .unwrap();
        assert_eq!(total, Some(6));
    }

    #[tokio::test]
    async fn test_confirm_order_conflict_rolls_back_earlier_lines() {
        let gateway = gateway_with(&[
            (&StockKey::base("espresso"), 10),
            (&StockKey::base("croissant"), 1),
        ])
        .await;

        let err = gateway
            .confirm_order(&[
                OrderLine::new("espresso", None, 4),
                OrderLine::new("croissant", None, 2),
            ])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GatewayError::Conflict { ref product_id, .. } if product_id == "croissant"
        ));

        // First line's decrement was rolled back with the transaction.
        let repo = gateway.db.stock_levels();
        assert_eq!(
            repo.get_total("cafe-1", &StockKey::base("espresso")).await.unwrap(),
            Some(10)
        );
        assert_eq!(
            repo.get_total("cafe-1", &StockKey::base("croissant")).await.unwrap(),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_confirm_order_unknown_row_is_conflict() {
        let gateway = gateway_with(&[]).await;

        let err = gateway
            .confirm_order(&[OrderLine::new("phantom", None, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_facade_end_to_end_over_sqlite() {
        use mesa_inventory::InventoryManager;
        use std::sync::Arc;

        let gateway = gateway_with(&[(&StockKey::base("espresso"), 10)]).await;
        let db = gateway.db.clone();
        let manager = InventoryManager::initialize("cafe-1", Arc::new(gateway))
            .await
            .unwrap();

        manager
            .process_order(&[OrderLine::new("espresso", None, 6)])
            .await
            .unwrap();

        let record = manager.get_product_stock("espresso", None).unwrap();
        assert_eq!(record.total_stock, 4);
        assert_eq!(record.ordered_quantity, 0);
        assert_eq!(
            db.stock_levels()
                .get_total("cafe-1", &StockKey::base("espresso"))
                .await
                .unwrap(),
            Some(4)
        );
    }
}
