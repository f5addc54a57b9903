//! # Stock Level Repository
//!
//! Database operations for stock level rows.
//!
//! ## Variant Encoding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Domain                      Database                                   │
//! │  ──────                      ────────                                   │
//! │  variant_id: None       ◄──► variant_id = ''                            │
//! │  variant_id: Some("oat")◄──► variant_id = 'oat'                         │
//! │                                                                         │
//! │  The empty string keeps the UNIQUE(tenant, product, variant) index      │
//! │  honest: SQLite treats NULLs as distinct in unique indexes, which       │
//! │  would allow duplicate base-product rows.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::types::StockKey;

// =============================================================================
// Row Type
// =============================================================================

/// One `stock_levels` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockLevelRow {
    /// Row ID (UUID v4).
    pub id: String,
    /// Tenant this row belongs to.
    pub tenant_id: String,
    /// Product identifier.
    pub product_id: String,
    /// Variant identifier; `''` encodes the base product.
    pub variant_id: String,
    /// Authoritative total quantity.
    pub total_stock: i64,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl StockLevelRow {
    /// Returns the domain stock key, decoding the variant column.
    pub fn key(&self) -> StockKey {
        StockKey::new(self.product_id.clone(), decode_variant(&self.variant_id))
    }
}

/// Maps the domain's optional variant to the column encoding.
pub(crate) fn encode_variant(variant_id: &Option<String>) -> &str {
    variant_id.as_deref().unwrap_or("")
}

/// Maps the column encoding back to the domain's optional variant.
pub(crate) fn decode_variant(column: &str) -> Option<String> {
    if column.is_empty() {
        None
    } else {
        Some(column.to_string())
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for stock level database operations.
#[derive(Debug, Clone)]
pub struct StockLevelRepository {
    pool: SqlitePool,
}

impl StockLevelRepository {
    /// Creates a new StockLevelRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockLevelRepository { pool }
    }

    /// Lists every stock row for a tenant.
    pub async fn list_for_tenant(&self, tenant_id: &str) -> DbResult<Vec<StockLevelRow>> {
        let rows = sqlx::query_as::<_, StockLevelRow>(
            r#"
            SELECT id, tenant_id, product_id, variant_id, total_stock, created_at, updated_at
            FROM stock_levels
            WHERE tenant_id = ?1
            ORDER BY product_id, variant_id
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(tenant_id, count = rows.len(), "Loaded stock rows");
        Ok(rows)
    }

    /// Reads one total, or `None` when the row is absent.
    pub async fn get_total(&self, tenant_id: &str, key: &StockKey) -> DbResult<Option<i64>> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT total_stock FROM stock_levels
            WHERE tenant_id = ?1 AND product_id = ?2 AND variant_id = ?3
            "#,
        )
        .bind(tenant_id)
        .bind(&key.product_id)
        .bind(encode_variant(&key.variant_id))
        .fetch_optional(&self.pool)
        .await?;

        Ok(total)
    }

    /// Inserts or replaces a stock row (provisioning / seeding path).
    pub async fn upsert(&self, tenant_id: &str, key: &StockKey, total_stock: i64) -> DbResult<()> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO stock_levels (id, tenant_id, product_id, variant_id, total_stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ON CONFLICT (tenant_id, product_id, variant_id)
            DO UPDATE SET total_stock = excluded.total_stock, updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(tenant_id)
        .bind(&key.product_id)
        .bind(encode_variant(&key.variant_id))
        .bind(total_stock.max(0))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(tenant_id, key = %key, total_stock, "Stock row upserted");
        Ok(())
    }

    /// Replaces a total for an existing row.
    ///
    /// ## Returns
    /// `Err(NotFound)` when no row matches: the operator edited a product
    /// that was never provisioned.
    pub async fn set_total(&self, tenant_id: &str, key: &StockKey, total_stock: i64) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE stock_levels
            SET total_stock = ?4, updated_at = ?5
            WHERE tenant_id = ?1 AND product_id = ?2 AND variant_id = ?3
            "#,
        )
        .bind(tenant_id)
        .bind(&key.product_id)
        .bind(encode_variant(&key.variant_id))
        .bind(total_stock.max(0))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                product_id: key.product_id.clone(),
                variant_id: key.variant_id.clone(),
            });
        }
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[test]
    fn test_variant_encoding_round_trip() {
        assert_eq!(encode_variant(&None), "");
        assert_eq!(encode_variant(&Some("oat".to_string())), "oat");
        assert_eq!(decode_variant(""), None);
        assert_eq!(decode_variant("oat"), Some("oat".to_string()));
    }

    #[tokio::test]
    async fn test_upsert_and_list() {
        let db = test_db().await;
        let repo = db.stock_levels();

        repo.upsert("cafe-1", &StockKey::base("espresso"), 10).await.unwrap();
        repo.upsert("cafe-1", &StockKey::variant("latte", "oat"), 3).await.unwrap();
        repo.upsert("cafe-2", &StockKey::base("espresso"), 99).await.unwrap();

        let rows = repo.list_for_tenant("cafe-1").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.tenant_id == "cafe-1"));

        // Upsert replaces, never duplicates
        repo.upsert("cafe-1", &StockKey::base("espresso"), 12).await.unwrap();
        let rows = repo.list_for_tenant("cafe-1").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            repo.get_total("cafe-1", &StockKey::base("espresso")).await.unwrap(),
            Some(12)
        );
    }

    #[tokio::test]
    async fn test_set_total_not_found() {
        let db = test_db().await;
        let repo = db.stock_levels();

        let err = repo
            .set_total("cafe-1", &StockKey::base("phantom"), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_base_and_variant_are_distinct_rows() {
        let db = test_db().await;
        let repo = db.stock_levels();

        repo.upsert("cafe-1", &StockKey::base("latte"), 5).await.unwrap();
        repo.upsert("cafe-1", &StockKey::variant("latte", "oat"), 2).await.unwrap();

        assert_eq!(
            repo.get_total("cafe-1", &StockKey::base("latte")).await.unwrap(),
            Some(5)
        );
        assert_eq!(
            repo.get_total("cafe-1", &StockKey::variant("latte", "oat")).await.unwrap(),
            Some(2)
        );
    }
}
