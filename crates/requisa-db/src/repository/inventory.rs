//! # Inventory Repository
//!
//! Database operations for the inventory ledger.
//!
//! ## Mutation Discipline
//! Stock has exactly one writer: the approval processor's decrement step
//! (see `repository::approval`). This repository creates items and reads
//! them back; the stock a creation screen shows is a display hint, nothing
//! is reserved at creation time.

use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use requisa_core::{validation, Clock, InventoryItem, Quantity, ValidationError};

use crate::error::DbResult;

/// Repository for inventory item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.inventory();
///
/// let filter = repo
///     .create_item("SKU-001", "Filtro", Quantity::from_units(50), "un")
///     .await?;
/// let found = repo.get_by_sku("SKU-001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        InventoryRepository { pool, clock }
    }

    /// Inserts a new inventory item.
    ///
    /// ## Arguments
    /// * `sku` - Business identifier, unique
    /// * `description` - Human-readable description
    /// * `stock` - Opening stock level, must not be negative
    /// * `unit` - Unit of measure ("un", "pcs", "kg", ...)
    ///
    /// ## Returns
    /// * `Ok(InventoryItem)` - Inserted item
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn create_item(
        &self,
        sku: &str,
        description: &str,
        stock: Quantity,
        unit: &str,
    ) -> DbResult<InventoryItem> {
        validation::validate_sku(sku)?;
        validation::validate_description(description)?;
        validation::validate_unit(unit)?;
        if stock.milli() < 0 {
            return Err(ValidationError::Negative {
                field: "stock".to_string(),
            }
            .into());
        }

        debug!(sku = %sku, "Inserting inventory item");

        let now = self.clock.now();
        let item = InventoryItem {
            id: Uuid::new_v4().to_string(),
            sku: sku.trim().to_string(),
            description: description.trim().to_string(),
            stock_milli: stock.milli(),
            unit: unit.trim().to_string(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, sku, description, stock_milli, unit, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sku)
        .bind(&item.description)
        .bind(item.stock_milli)
        .bind(&item.unit)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets an inventory item by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(InventoryItem))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, sku, description, stock_milli, unit, created_at, updated_at
            FROM inventory_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets an inventory item by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, sku, description, stock_milli, unit, created_at, updated_at
            FROM inventory_items
            WHERE sku = ?1
            "#,
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists all inventory items, ordered by SKU.
    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, sku, description, stock_milli, unit, created_at, updated_at
            FROM inventory_items
            ORDER BY sku
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Counts inventory items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_item() {
        let db = test_db().await;
        let repo = db.inventory();

        let created = repo
            .create_item("SKU-001", "Filtro", Quantity::from_units(50), "un")
            .await
            .unwrap();
        assert_eq!(created.stock(), Quantity::from_units(50));

        let by_sku = repo.get_by_sku("SKU-001").await.unwrap().unwrap();
        assert_eq!(by_sku.id, created.id);
        assert_eq!(by_sku.description, "Filtro");

        let by_id = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.sku, "SKU-001");

        assert!(repo.get_by_sku("SKU-404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let db = test_db().await;
        let repo = db.inventory();

        repo.create_item("SKU-001", "Filtro", Quantity::from_units(1), "un")
            .await
            .unwrap();
        let err = repo
            .create_item("SKU-001", "Otro filtro", Quantity::from_units(2), "un")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_invalid_inputs_rejected_before_write() {
        let db = test_db().await;
        let repo = db.inventory();

        assert!(repo
            .create_item("", "Filtro", Quantity::from_units(1), "un")
            .await
            .is_err());
        assert!(repo
            .create_item("SKU-001", "", Quantity::from_units(1), "un")
            .await
            .is_err());
        assert!(repo
            .create_item("SKU-001", "Filtro", Quantity::from_milli(-1), "un")
            .await
            .is_err());

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_ordered_by_sku() {
        let db = test_db().await;
        let repo = db.inventory();

        repo.create_item("SKU-002", "Tornillo M8", Quantity::from_units(1000), "pcs")
            .await
            .unwrap();
        repo.create_item("SKU-001", "Filtro", Quantity::from_units(50), "un")
            .await
            .unwrap();

        let items = repo.list().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku, "SKU-001");
        assert_eq!(items[1].sku, "SKU-002");
    }
}
