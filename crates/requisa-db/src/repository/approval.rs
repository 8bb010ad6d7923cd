//! # Approval Processor
//!
//! The transactional shell around the pure lifecycle functions in
//! requisa-core: one `process` call takes a pending requisition to
//! approved / partially_approved / rejected and applies the ledger
//! decrement, all inside a single transaction.
//!
//! ## Processing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     process(requisition, decisions)                     │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                     │
//! │     │                                                                   │
//! │     ├── 1. load requisition + lines (missing → NotFound)               │
//! │     │                                                                   │
//! │     ├── 2. append ONE Approval row (rejections too)                    │
//! │     │                                                                   │
//! │     ├── 3. per line: resolve decision (omitted → zero),                │
//! │     │       write qty_approved,                                        │
//! │     │       on grant && qty > 0:                                       │
//! │     │         stock = MAX(0, stock - qty)   ← in-database arithmetic   │
//! │     │                                                                   │
//! │     └── 4. status := rejected | partially_approved | approved,         │
//! │            touch updated_at                                            │
//! │     │                                                                   │
//! │  COMMIT (or roll back everything)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The decrement runs as SQL arithmetic on the current row value, so two
//! concurrent approvals drawing on the same item serialize at the database
//! and neither reads a stale stock: the final stock is exactly
//! `max(0, initial - sum_of_grants)`.
//!
//! Re-processing a requisition that already has a decision is NOT blocked
//! here: quantities and status are overwritten and another Approval row is
//! appended. Callers that want a guard check `status.is_terminal()` first.

use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use requisa_core::{
    lifecycle, validation, Actor, Approval, Clock, Quantity, Requisition, RequisitionItem,
};

use crate::error::{DbError, DbResult};

/// Orchestrates the pending → terminal transition of a requisition.
#[derive(Debug, Clone)]
pub struct ApprovalProcessor {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl ApprovalProcessor {
    /// Creates a new ApprovalProcessor.
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        ApprovalProcessor { pool, clock }
    }

    /// Processes an approval decision for a requisition.
    ///
    /// ## Arguments
    /// * `requisition_id` - Requisition to decide on
    /// * `approver` - Deciding actor; the caller has already gated the call
    ///   to warehouse/admin roles (`Role::can_approve`)
    /// * `decisions` - Granted quantity per line id; an omitted line is
    ///   granted ZERO (implicit zero approval), which counts as partial
    /// * `approved` - Grant (true) or reject (false) the call as a whole;
    ///   a rejection never touches inventory even if quantities are supplied
    /// * `comment` - Free text recorded on the Approval row
    ///
    /// ## Returns
    /// The requisition with its new status, or `DbError::NotFound` if the
    /// id does not resolve. All effects land atomically or not at all.
    pub async fn process(
        &self,
        requisition_id: &str,
        approver: &Actor,
        decisions: &HashMap<String, Quantity>,
        approved: bool,
        comment: &str,
    ) -> DbResult<Requisition> {
        validation::validate_note(comment)?;

        let now = self.clock.now();
        let mut tx = self.pool.begin().await?;

        let requisition = sqlx::query_as::<_, Requisition>(
            r#"
            SELECT id, code, requester_id, machine_id, area_id,
                   status, note, created_at, updated_at
            FROM requisitions
            WHERE id = ?1
            "#,
        )
        .bind(requisition_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Requisition", requisition_id))?;

        let items = sqlx::query_as::<_, RequisitionItem>(
            r#"
            SELECT id, requisition_id, inventory_item_id,
                   qty_requested_milli, qty_approved_milli, created_at
            FROM requisition_items
            WHERE requisition_id = ?1
            ORDER BY created_at, rowid
            "#,
        )
        .bind(&requisition.id)
        .fetch_all(&mut *tx)
        .await?;

        debug!(
            code = %requisition.code,
            approver = %approver.id,
            approved,
            lines = items.len(),
            "Processing approval"
        );

        // The audit row lands first and unconditionally: the trail records
        // every decision call, full rejections included.
        let approval_id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO approvals (
                id, requisition_id, approver_id, approved, comment, timestamp
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&approval_id)
        .bind(&requisition.id)
        .bind(&approver.id)
        .bind(approved)
        .bind(comment)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let resolution = lifecycle::resolve_decisions(&items, decisions);

        for line in &resolution.lines {
            // Overwrites any prior value: re-processing is permitted.
            sqlx::query("UPDATE requisition_items SET qty_approved_milli = ?2 WHERE id = ?1")
                .bind(&line.line_id)
                .bind(line.qty_approved.milli())
                .execute(&mut *tx)
                .await?;

            if approved && line.qty_approved.is_positive() {
                sqlx::query(
                    r#"
                    UPDATE inventory_items
                    SET stock_milli = MAX(0, stock_milli - ?2),
                        updated_at = ?3
                    WHERE id = ?1
                    "#,
                )
                .bind(&line.inventory_item_id)
                .bind(line.qty_approved.milli())
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        let status = lifecycle::next_status(approved, resolution.any_partial);

        sqlx::query("UPDATE requisitions SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(&requisition.id)
            .bind(status)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            code = %requisition.code,
            status = ?status,
            approver = %approver.id,
            "Approval processed"
        );

        Ok(Requisition {
            status,
            updated_at: now,
            ..requisition
        })
    }

    /// Gets the approval audit trail of a requisition, oldest first.
    pub async fn history(&self, requisition_id: &str) -> DbResult<Vec<Approval>> {
        let approvals = sqlx::query_as::<_, Approval>(
            r#"
            SELECT id, requisition_id, approver_id, approved, comment, timestamp
            FROM approvals
            WHERE requisition_id = ?1
            ORDER BY timestamp, rowid
            "#,
        )
        .bind(requisition_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(approvals)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
