//! # requisa-db: Database Layer for the Requisition Engine
//!
//! This crate provides persistence for the requisition system.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Requisa Data Flow                                │
//! │                                                                         │
//! │  Caller (API handler / UI) with Actor + decisions                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     requisa-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ requisition.rs │    │  (embedded)  │  │   │
//! │  │   │               │    │ approval.rs    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ inventory.rs   │    │ 001_init.sql │  │   │
//! │  │   │ + Clock       │    │ catalog.rs     │    │ 002_idx.sql  │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                        SQLite Database (WAL)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use requisa_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/requisa.db")).await?;
//!
//! let created = db
//!     .requisitions()
//!     .create(&actor, None, Some(&area_id), &lines, "línea parada")
//!     .await?;
//!
//! let updated = db
//!     .approvals()
//!     .process(&created.requisition.id, &approver, &decisions, true, "OK")
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::approval::ApprovalProcessor;
pub use repository::catalog::{AreaRepository, MachineRepository};
pub use repository::inventory::InventoryRepository;
pub use repository::requisition::{CreatedRequisition, RequisitionRepository};
