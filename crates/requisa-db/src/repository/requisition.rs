//! # Requisition Repository
//!
//! Database operations for requisitions and their line items.
//!
//! ## Creation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Requisition Creation                                │
//! │                                                                         │
//! │  1. VALIDATE (before any write)                                        │
//! │     └── non-empty lines, every qty > 0, note length                    │
//! │                                                                         │
//! │  2. ONE TRANSACTION                                                    │
//! │     ├── allocate code from the per-day counter (atomic upsert)         │
//! │     ├── insert requisition { status: Pending }                         │
//! │     └── insert one line per resolvable inventory id                    │
//! │         unresolvable ids are skipped AND reported back                 │
//! │                                                                         │
//! │  3. NO INVENTORY MUTATION                                              │
//! │     └── stock shown at creation is a display hint, nothing reserved    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Skip-On-Missing-Reference
//! A line whose inventory id does not resolve (stale client-side item list)
//! is dropped rather than failing the whole call. The dropped inputs come
//! back in [`CreatedRequisition::skipped`] so the caller can tell the user
//! instead of losing them silently. A call where every line is skipped rolls
//! back: a requisition owns at least one line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use requisa_core::{
    validation, Actor, Clock, LineInput, Requisition, RequisitionItem, RequisitionStatus,
    ValidationError, CODE_PREFIX,
};

use crate::error::{DbError, DbResult};

/// Result of a creation call: the persisted requisition, its lines, and the
/// inputs that were skipped because their inventory id did not resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRequisition {
    pub requisition: Requisition,
    pub items: Vec<RequisitionItem>,
    pub skipped: Vec<LineInput>,
}

/// Repository for requisition database operations.
#[derive(Debug, Clone)]
pub struct RequisitionRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl RequisitionRepository {
    /// Creates a new RequisitionRepository.
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        RequisitionRepository { pool, clock }
    }

    /// Creates a requisition in `pending` status.
    ///
    /// ## Arguments
    /// * `requester` - The submitting actor (any authenticated role; the
    ///   caller gates access)
    /// * `machine_id` / `area_id` - Optional charge references; an id that
    ///   does not resolve is an error (unlike line ids, these were picked
    ///   from the catalog the caller just listed)
    /// * `lines` - Non-empty `(inventory_item_id, qty > 0)` pairs
    /// * `note` - Free text (machine, motive, priority)
    ///
    /// ## Returns
    /// The persisted requisition with its lines attached and the list of
    /// skipped inputs. All-or-nothing: any error leaves nothing behind.
    pub async fn create(
        &self,
        requester: &Actor,
        machine_id: Option<&str>,
        area_id: Option<&str>,
        lines: &[LineInput],
        note: &str,
    ) -> DbResult<CreatedRequisition> {
        validation::validate_lines(lines)?;
        validation::validate_note(note)?;

        let now = self.clock.now();
        let mut tx = self.pool.begin().await?;

        if let Some(machine_id) = machine_id {
            let exists: Option<String> =
                sqlx::query_scalar("SELECT id FROM machines WHERE id = ?1")
                    .bind(machine_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if exists.is_none() {
                return Err(DbError::not_found("Machine", machine_id));
            }
        }
        if let Some(area_id) = area_id {
            let exists: Option<String> = sqlx::query_scalar("SELECT id FROM areas WHERE id = ?1")
                .bind(area_id)
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_none() {
                return Err(DbError::not_found("Area", area_id));
            }
        }

        let code = next_code(&mut tx, now).await?;
        debug!(code = %code, requester = %requester.id, "Creating requisition");

        let requisition = Requisition {
            id: Uuid::new_v4().to_string(),
            code,
            requester_id: requester.id.clone(),
            machine_id: machine_id.map(str::to_string),
            area_id: area_id.map(str::to_string),
            status: RequisitionStatus::Pending,
            note: note.to_string(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO requisitions (
                id, code, requester_id, machine_id, area_id,
                status, note, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&requisition.id)
        .bind(&requisition.code)
        .bind(&requisition.requester_id)
        .bind(requisition.machine_id.as_deref())
        .bind(requisition.area_id.as_deref())
        .bind(requisition.status)
        .bind(&requisition.note)
        .bind(requisition.created_at)
        .bind(requisition.updated_at)
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        let mut skipped = Vec::new();

        for line in lines {
            let resolved: Option<String> =
                sqlx::query_scalar("SELECT id FROM inventory_items WHERE id = ?1")
                    .bind(&line.inventory_item_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            let Some(inventory_item_id) = resolved else {
                debug!(
                    inventory_item_id = %line.inventory_item_id,
                    "Skipping line with unresolvable inventory id"
                );
                skipped.push(line.clone());
                continue;
            };

            let item = RequisitionItem {
                id: Uuid::new_v4().to_string(),
                requisition_id: requisition.id.clone(),
                inventory_item_id,
                qty_requested_milli: line.qty.milli(),
                qty_approved_milli: None,
                created_at: now,
            };

            sqlx::query(
                r#"
                INSERT INTO requisition_items (
                    id, requisition_id, inventory_item_id,
                    qty_requested_milli, qty_approved_milli, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&item.id)
            .bind(&item.requisition_id)
            .bind(&item.inventory_item_id)
            .bind(item.qty_requested_milli)
            .bind(item.qty_approved_milli)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;

            items.push(item);
        }

        if items.is_empty() {
            // Dropping the transaction rolls back the header and the
            // counter bump.
            return Err(ValidationError::EmptyCollection {
                field: "resolved_line_items".to_string(),
            }
            .into());
        }

        tx.commit().await?;

        info!(
            code = %requisition.code,
            lines = items.len(),
            skipped = skipped.len(),
            "Requisition created"
        );

        Ok(CreatedRequisition {
            requisition,
            items,
            skipped,
        })
    }

    /// Gets a requisition by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Requisition>> {
        let requisition = sqlx::query_as::<_, Requisition>(
            r#"
            SELECT id, code, requester_id, machine_id, area_id,
                   status, note, created_at, updated_at
            FROM requisitions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(requisition)
    }

    /// Gets a requisition by its business code.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Requisition>> {
        let requisition = sqlx::query_as::<_, Requisition>(
            r#"
            SELECT id, code, requester_id, machine_id, area_id,
                   status, note, created_at, updated_at
            FROM requisitions
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(requisition)
    }

    /// Gets all line items of a requisition, in insertion order.
    pub async fn get_items(&self, requisition_id: &str) -> DbResult<Vec<RequisitionItem>> {
        let items = sqlx::query_as::<_, RequisitionItem>(
            r#"
            SELECT id, requisition_id, inventory_item_id,
                   qty_requested_milli, qty_approved_milli, created_at
            FROM requisition_items
            WHERE requisition_id = ?1
            ORDER BY created_at, rowid
            "#,
        )
        .bind(requisition_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists a requester's requisitions, newest first ("my requisitions").
    pub async fn list_by_requester(&self, requester_id: &str) -> DbResult<Vec<Requisition>> {
        let requisitions = sqlx::query_as::<_, Requisition>(
            r#"
            SELECT id, code, requester_id, machine_id, area_id,
                   status, note, created_at, updated_at
            FROM requisitions
            WHERE requester_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requisitions)
    }

    /// Lists requisitions in a status, oldest first (the approval queue).
    pub async fn list_by_status(&self, status: RequisitionStatus) -> DbResult<Vec<Requisition>> {
        let requisitions = sqlx::query_as::<_, Requisition>(
            r#"
            SELECT id, code, requester_id, machine_id, area_id,
                   status, note, created_at, updated_at
            FROM requisitions
            WHERE status = ?1
            ORDER BY created_at
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(requisitions)
    }

    /// Lists every requisition, newest first (unbounded history).
    pub async fn list_all(&self) -> DbResult<Vec<Requisition>> {
        let requisitions = sqlx::query_as::<_, Requisition>(
            r#"
            SELECT id, code, requester_id, machine_id, area_id,
                   status, note, created_at, updated_at
            FROM requisitions
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(requisitions)
    }

    /// Lists the most recent requisitions, newest first (history view).
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Requisition>> {
        let requisitions = sqlx::query_as::<_, Requisition>(
            r#"
            SELECT id, code, requester_id, machine_id, area_id,
                   status, note, created_at, updated_at
            FROM requisitions
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(requisitions)
    }
}

/// Allocates the next requisition code for the day of `now`:
/// `REQ-YYYYMMDD-NNNN`, NNNN a 1-based per-day sequence.
///
/// The sequence comes from an atomic upsert on `requisition_counters`
/// inside the caller's transaction, so two concurrent creations can never
/// compute the same number (the count-then-format race does not exist
/// here). Past 9999 the number simply widens to five digits.
async fn next_code(tx: &mut Transaction<'_, Sqlite>, now: DateTime<Utc>) -> DbResult<String> {
    let day = now.format("%Y%m%d").to_string();

    let seq: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO requisition_counters (day, next_seq) VALUES (?1, 1)
        ON CONFLICT(day) DO UPDATE SET next_seq = next_seq + 1
        RETURNING next_seq
        "#,
    )
    .bind(&day)
    .fetch_one(&mut **tx)
    .await?;

    Ok(format!("{}-{}-{:04}", CODE_PREFIX, day, seq))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::TimeZone;
    use requisa_core::{FixedClock, InventoryItem, Quantity, Role};

    fn supervisor() -> Actor {
        Actor::new("user-sup", "Supervisor Uno", Role::Supervisor)
    }

    fn march_14() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    async fn test_db() -> Database {
        let clock = Arc::new(FixedClock::new(march_14()));
        Database::with_clock(DbConfig::in_memory(), clock)
            .await
            .unwrap()
    }

    async fn seed_item(db: &Database, sku: &str, stock_units: i64) -> InventoryItem {
        db.inventory()
            .create_item(sku, "Repuesto", Quantity::from_units(stock_units), "un")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_basic() {
        let db = test_db().await;
        let item = seed_item(&db, "SKU-001", 50).await;

        let created = db
            .requisitions()
            .create(
                &supervisor(),
                None,
                None,
                &[LineInput::new(&item.id, Quantity::from_units(3))],
                "línea parada",
            )
            .await
            .unwrap();

        assert_eq!(created.requisition.code, "REQ-20250314-0001");
        assert_eq!(created.requisition.status, RequisitionStatus::Pending);
        assert_eq!(created.requisition.note, "línea parada");
        assert!(created.skipped.is_empty());

        // qty_requested stored verbatim, qty_approved still NULL
        assert_eq!(created.items.len(), 1);
        assert_eq!(created.items[0].qty_requested(), Quantity::from_units(3));
        assert!(created.items[0].qty_approved().is_none());

        // No inventory mutation at creation
        let item = db.inventory().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(item.stock(), Quantity::from_units(50));
    }

    #[tokio::test]
    async fn test_codes_sequence_within_a_day() {
        let db = test_db().await;
        let item = seed_item(&db, "SKU-001", 50).await;
        let lines = [LineInput::new(&item.id, Quantity::from_units(1))];

        let first = db
            .requisitions()
            .create(&supervisor(), None, None, &lines, "")
            .await
            .unwrap();
        let second = db
            .requisitions()
            .create(&supervisor(), None, None, &lines, "")
            .await
            .unwrap();

        assert_eq!(first.requisition.code, "REQ-20250314-0001");
        assert_eq!(second.requisition.code, "REQ-20250314-0002");
    }

    #[tokio::test]
    async fn test_code_sequence_restarts_on_a_new_day() {
        let db = test_db().await;
        let item = seed_item(&db, "SKU-001", 50).await;
        let lines = [LineInput::new(&item.id, Quantity::from_units(1))];

        db.requisitions()
            .create(&supervisor(), None, None, &lines, "")
            .await
            .unwrap();

        // Same pool, next calendar day
        let next_day = Utc.with_ymd_and_hms(2025, 3, 15, 0, 5, 0).unwrap();
        let repo = RequisitionRepository::new(
            db.pool().clone(),
            Arc::new(FixedClock::new(next_day)),
        );
        let created = repo
            .create(&supervisor(), None, None, &lines, "")
            .await
            .unwrap();

        assert_eq!(created.requisition.code, "REQ-20250315-0001");
    }

    #[tokio::test]
    async fn test_unresolvable_lines_are_skipped_and_reported() {
        let db = test_db().await;
        let item = seed_item(&db, "SKU-001", 50).await;

        let created = db
            .requisitions()
            .create(
                &supervisor(),
                None,
                None,
                &[
                    LineInput::new(&item.id, Quantity::from_units(2)),
                    LineInput::new("stale-id", Quantity::from_units(9)),
                ],
                "",
            )
            .await
            .unwrap();

        assert_eq!(created.items.len(), 1);
        assert_eq!(created.skipped.len(), 1);
        assert_eq!(created.skipped[0].inventory_item_id, "stale-id");

        let stored = db
            .requisitions()
            .get_items(&created.requisition.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_all_lines_skipped_rolls_back() {
        let db = test_db().await;
        seed_item(&db, "SKU-001", 50).await;

        let err = db
            .requisitions()
            .create(
                &supervisor(),
                None,
                None,
                &[LineInput::new("stale-id", Quantity::from_units(1))],
                "",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        // Nothing persisted, and the next code is 0001 again (counter bump
        // rolled back with the header)
        assert!(db.requisitions().list_recent(10).await.unwrap().is_empty());
        let item = seed_item(&db, "SKU-002", 1).await;
        let created = db
            .requisitions()
            .create(
                &supervisor(),
                None,
                None,
                &[LineInput::new(&item.id, Quantity::from_units(1))],
                "",
            )
            .await
            .unwrap();
        assert_eq!(created.requisition.code, "REQ-20250314-0001");
    }

    #[tokio::test]
    async fn test_validation_failures_reject_before_write() {
        let db = test_db().await;
        let item = seed_item(&db, "SKU-001", 50).await;

        // Empty line list
        let err = db
            .requisitions()
            .create(&supervisor(), None, None, &[], "")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        // Non-positive quantity
        let err = db
            .requisitions()
            .create(
                &supervisor(),
                None,
                None,
                &[LineInput::new(&item.id, Quantity::zero())],
                "",
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Line { index: 0, .. })
        ));

        assert!(db.requisitions().list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_machine_or_area_is_not_found() {
        let db = test_db().await;
        let item = seed_item(&db, "SKU-001", 50).await;
        let lines = [LineInput::new(&item.id, Quantity::from_units(1))];

        let err = db
            .requisitions()
            .create(&supervisor(), Some("ghost"), None, &lines, "")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = db
            .requisitions()
            .create(&supervisor(), None, Some("ghost"), &lines, "")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_with_machine_and_area() {
        let db = test_db().await;
        let item = seed_item(&db, "SKU-001", 50).await;
        let area = db.areas().create_area("A1", "Area A").await.unwrap();
        let machine = db
            .machines()
            .create_machine("MACH-001", "Corte 1", Some(&area.id))
            .await
            .unwrap();

        let created = db
            .requisitions()
            .create(
                &supervisor(),
                Some(&machine.id),
                Some(&area.id),
                &[LineInput::new(&item.id, Quantity::from_units(1))],
                "",
            )
            .await
            .unwrap();

        assert_eq!(created.requisition.machine_id.as_deref(), Some(machine.id.as_str()));
        assert_eq!(created.requisition.area_id.as_deref(), Some(area.id.as_str()));
    }

    #[tokio::test]
    async fn test_list_accessors() {
        let db = test_db().await;
        let item = seed_item(&db, "SKU-001", 50).await;
        let lines = [LineInput::new(&item.id, Quantity::from_units(1))];

        let other = Actor::new("user-other", "Otra", Role::Supervisor);
        db.requisitions()
            .create(&supervisor(), None, None, &lines, "")
            .await
            .unwrap();
        db.requisitions()
            .create(&other, None, None, &lines, "")
            .await
            .unwrap();

        let mine = db
            .requisitions()
            .list_by_requester("user-sup")
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].requester_id, "user-sup");

        let pending = db
            .requisitions()
            .list_by_status(RequisitionStatus::Pending)
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);

        assert_eq!(db.requisitions().list_recent(1).await.unwrap().len(), 1);
        assert_eq!(db.requisitions().list_all().await.unwrap().len(), 2);

        let by_code = db
            .requisitions()
            .get_by_code(&mine[0].code)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_code.id, mine[0].id);
    }
}
