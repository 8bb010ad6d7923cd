//! # Error Types
//!
//! Domain-specific error types for requisa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  requisa-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                           │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  requisa-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError / DbError → caller                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, line index, value)
//! 3. Errors are enum variants, never String
//! 4. Validation fails before any persistence write

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Role string from the identity gate is not in the vocabulary.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before business logic runs and before anything is persisted:
/// a creation or approval call that fails validation has written nothing.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative (zero allowed).
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., bad SKU characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A collection that must carry at least one element is empty.
    #[error("{field} must not be empty")]
    EmptyCollection { field: String },

    /// A collection exceeds its size cap.
    #[error("{field} must have at most {max} entries")]
    TooMany { field: String, max: usize },

    /// A specific line item failed validation; index is zero-based input
    /// position so the caller can point at the offending row.
    #[error("line {index}: {source}")]
    Line {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
