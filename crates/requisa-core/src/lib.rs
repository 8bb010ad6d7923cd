//! # requisa-core: Pure Business Logic for the Requisition Engine
//!
//! This crate is the **heart** of the requisition system. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Requisa Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Front end (web UI / CLI / API handler)               │   │
//! │  │      supplies Actor + Clock, gates create/process by role       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ requisa-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │ quantity  │  │ lifecycle │  │ validation│   │   │
//! │  │   │ Requisit. │  │ Quantity  │  │ resolve / │  │   rules   │   │   │
//! │  │   │ Approval  │  │ milli i64 │  │ next_stat │  │  checks   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO AMBIENT CLOCK • PURE FUNCTIONS      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 requisa-db (Database Layer)                     │   │
//! │  │        SQLite queries, migrations, transactional approvals      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Requisition, RequisitionItem, Approval, ...)
//! - [`quantity`] - Quantity type with integer milli-unit arithmetic
//! - [`lifecycle`] - The approval state machine as pure functions
//! - [`validation`] - Business rule validation
//! - [`clock`] - The Clock abstraction ("now" is an input)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Quantities**: all stock math in milli-units (i64), no floats
//! 4. **Explicit Context**: Actor and Clock come from the caller, never from
//!    global state

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod lifecycle;
pub mod quantity;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use requisa_core::Quantity` instead of
// `use requisa_core::quantity::Quantity`

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use lifecycle::{next_status, resolve_decisions, Resolution, ResolvedLine};
pub use quantity::Quantity;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every requisition business code (`REQ-YYYYMMDD-NNNN`).
pub const CODE_PREFIX: &str = "REQ";

/// Maximum line items allowed in a single requisition.
///
/// ## Business Reason
/// Keeps approval screens and the per-line decision map reviewable.
/// Can be made configurable in future versions.
pub const MAX_REQUISITION_LINES: usize = 100;

/// Maximum length of a free-text note or approval comment.
pub const MAX_NOTE_LEN: usize = 1_000;
