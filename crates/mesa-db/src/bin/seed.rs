//! Seeds a Mesa POS database with sample stock data.
//!
//! ## Usage
//! ```text
//! cargo run -p mesa-db --bin seed -- [database-path]
//! ```
//! Defaults to `./mesa.db`. Re-running is safe: rows are upserted.

use mesa_core::types::StockKey;
use mesa_core::DEFAULT_TENANT_ID;
use mesa_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sample menu: (product, variant, total_stock).
const SAMPLE_STOCK: &[(&str, Option<&str>, i64)] = &[
    ("espresso", None, 120),
    ("americano", None, 120),
    ("latte", None, 80),
    ("latte", Some("oat"), 40),
    ("latte", Some("soy"), 30),
    ("croissant", None, 24),
    ("croissant", Some("almond"), 12),
    ("quiche", None, 16),
    ("tart", Some("lemon"), 10),
    ("tart", Some("chocolate"), 10),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "./mesa.db".to_string());
    info!(path = %path, "Seeding stock data");

    let db = Database::new(DbConfig::new(&path)).await?;
    let repo = db.stock_levels();

    for (product, variant, total) in SAMPLE_STOCK {
        let key = StockKey::new(*product, variant.map(String::from));
        repo.upsert(DEFAULT_TENANT_ID, &key, *total).await?;
        info!(key = %key, total, "Seeded");
    }

    let rows = repo.list_for_tenant(DEFAULT_TENANT_ID).await?;
    info!(count = rows.len(), tenant = DEFAULT_TENANT_ID, "Seed complete");

    db.close().await;
    Ok(())
}
