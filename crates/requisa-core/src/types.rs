//! # Domain Types
//!
//! Core domain types for the requisition engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │ InventoryItem   │   │   Requisition    │   │    Approval     │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id (UUID)      │   │  id (UUID)       │   │  id (UUID)      │      │
//! │  │  sku (business) │   │  code (business) │   │  approved: bool │      │
//! │  │  stock_milli    │   │  status          │   │  approver_id    │      │
//! │  └─────────────────┘   └──────────────────┘   └─────────────────┘      │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │ RequisitionItem │   │RequisitionStatus │   │  Actor / Role   │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  qty_requested  │   │  Pending         │   │  Supervisor     │      │
//! │  │  qty_approved?  │   │  Approved        │   │  Warehouse      │      │
//! │  └─────────────────┘   │  Partially…      │   │  Admin          │      │
//! │                        │  Rejected        │   └─────────────────┘      │
//! │                        │  Cancelled       │                            │
//! │                        └──────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (sku, requisition code, area/machine code) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::quantity::Quantity;

// =============================================================================
// Actor & Role
// =============================================================================

/// Role of an authenticated actor.
///
/// The engine does not authenticate anyone. It receives an [`Actor`] from
/// the identity gate in front of it and trusts the role it was handed.
/// `bodega` is accepted as a wire alias for `warehouse` (legacy clients).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Plant supervisor: submits requisitions.
    Supervisor,
    /// Warehouse staff: approves, partially approves, rejects.
    #[serde(alias = "bodega")]
    Warehouse,
    /// Administrator: both of the above.
    Admin,
}

impl Role {
    /// Whether this role may call the approval processor.
    ///
    /// Enforcement lives in the caller (the gate in front of the engine);
    /// this is the single place the rule is written down.
    #[inline]
    pub const fn can_approve(&self) -> bool {
        matches!(self, Role::Warehouse | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Supervisor => "supervisor",
            Role::Warehouse => "warehouse",
            Role::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "supervisor" => Ok(Role::Supervisor),
            "warehouse" | "bodega" => Ok(Role::Warehouse),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

/// An authenticated actor, supplied by the caller on every core call.
///
/// Replaces any notion of an ambient "current user": creation and approval
/// take an explicit `&Actor`, nothing is read from global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Identity-system id (opaque to the engine).
    pub id: String,
    /// Display name for logs and audit views.
    pub display_name: String,
    /// Trusted role, already verified by the identity gate.
    pub role: Role,
}

impl Actor {
    /// Convenience constructor.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Actor {
            id: id.into(),
            display_name: display_name.into(),
            role,
        }
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A consumable or spare part held in the warehouse.
///
/// Stock is mutated only by the approval processor's decrement step, which
/// clamps at zero. Everything else reads it as a display hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier, unique.
    pub sku: String,

    /// Human-readable description.
    pub description: String,

    /// Current stock in milli-units. Never negative.
    pub stock_milli: i64,

    /// Unit of measure ("un", "pcs", "kg", ...).
    pub unit: String,

    /// When the item was created.
    pub created_at: DateTime<Utc>,

    /// When the item was last updated (stock decrements touch this).
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Returns the stock level as a Quantity.
    #[inline]
    pub fn stock(&self) -> Quantity {
        Quantity::from_milli(self.stock_milli)
    }
}

// =============================================================================
// Catalog: Area & Machine
// =============================================================================

/// A plant area requisitions can be charged to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Area {
    pub id: String,
    /// Business code, unique (e.g. "A1").
    pub code: String,
    pub name: String,
}

/// A machine requisitions can be charged to, optionally tied to an area.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Machine {
    pub id: String,
    /// Business code, unique (e.g. "MACH-001").
    pub code: String,
    pub name: String,
    pub area_id: Option<String>,
}

// =============================================================================
// Requisition Status
// =============================================================================

/// Lifecycle status of a requisition.
///
/// ```text
///             ┌──────────► approved
///             │
///  pending ───┼──────────► partially_approved
///             │
///             └──────────► rejected
///
///  cancelled: in the vocabulary, reachable only by a future
///  administrative action outside this engine.
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum RequisitionStatus {
    /// Submitted, waiting for a warehouse decision.
    Pending,
    /// Every line granted in full.
    Approved,
    /// At least one line granted less than requested (implicit zero counts).
    PartiallyApproved,
    /// The whole requisition was declined. Inventory untouched.
    Rejected,
    /// Administratively withdrawn. No transition in core scope.
    Cancelled,
}

impl RequisitionStatus {
    /// Whether a decision has been recorded.
    ///
    /// The processor does not refuse to re-process a terminal requisition
    /// (re-processing overwrites); callers that want a guard check this.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequisitionStatus::Approved
                | RequisitionStatus::PartiallyApproved
                | RequisitionStatus::Rejected
                | RequisitionStatus::Cancelled
        )
    }
}

impl Default for RequisitionStatus {
    fn default() -> Self {
        RequisitionStatus::Pending
    }
}

// =============================================================================
// Requisition
// =============================================================================

/// A supply request moving through the approval lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Requisition {
    pub id: String,
    /// Business code, unique: `REQ-YYYYMMDD-NNNN`.
    pub code: String,
    /// Requesting actor (identity-system id).
    pub requester_id: String,
    pub machine_id: Option<String>,
    pub area_id: Option<String>,
    pub status: RequisitionStatus,
    /// Free-text note (machine, motive, priority).
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Requisition Item
// =============================================================================

/// One line of a requisition: an inventory item and a requested quantity.
///
/// `qty_requested_milli` is fixed at creation. `qty_approved_milli` stays
/// NULL until the first approval decision and is the only mutable field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RequisitionItem {
    pub id: String,
    pub requisition_id: String,
    pub inventory_item_id: String,
    /// Requested quantity in milli-units, strictly positive.
    pub qty_requested_milli: i64,
    /// Granted quantity in milli-units; None until a decision is processed.
    pub qty_approved_milli: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl RequisitionItem {
    /// Returns the requested quantity.
    #[inline]
    pub fn qty_requested(&self) -> Quantity {
        Quantity::from_milli(self.qty_requested_milli)
    }

    /// Returns the granted quantity, if a decision has been recorded.
    #[inline]
    pub fn qty_approved(&self) -> Option<Quantity> {
        self.qty_approved_milli.map(Quantity::from_milli)
    }
}

// =============================================================================
// Approval
// =============================================================================

/// Append-only audit record of one approval decision.
///
/// One row per `process` call, full rejections included, so the trail
/// survives independent of the requisition's final status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Approval {
    pub id: String,
    pub requisition_id: String,
    /// Deciding actor (identity-system id).
    pub approver_id: String,
    /// Grant (true) or rejection (false) of the call as a whole.
    pub approved: bool,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Line Input
// =============================================================================

/// One `(inventory item, quantity)` pair submitted at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    pub inventory_item_id: String,
    pub qty: Quantity,
}

impl LineInput {
    /// Convenience constructor.
    pub fn new(inventory_item_id: impl Into<String>, qty: Quantity) -> Self {
        LineInput {
            inventory_item_id: inventory_item_id.into(),
            qty,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
