//! # Validation Module
//!
//! Input validation for the requisition engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (form / API handler)                                  │
//! │  └── Basic format checks, immediate user feedback                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  └── Runs before any persistence write                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL, UNIQUE, CHECK, foreign key constraints                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::LineInput;
use crate::{MAX_NOTE_LEN, MAX_REQUISITION_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use requisa_core::validation::validate_sku;
///
/// assert!(validate_sku("SKU-001").is_ok());
/// assert!(validate_sku("").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a catalog business code (area or machine).
///
/// Same shape as a SKU: short, no whitespace, safe to print anywhere.
pub fn validate_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a catalog display name (area or machine).
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an item or catalog description/name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a unit of measure ("un", "pcs", "kg", ...).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 20 characters
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    let unit = unit.trim();

    if unit.is_empty() {
        return Err(ValidationError::Required {
            field: "unit".to_string(),
        });
    }

    if unit.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "unit".to_string(),
            max: 20,
        });
    }

    Ok(())
}

/// Validates a free-text note or approval comment.
///
/// Empty is fine; the cap protects list views and exports.
pub fn validate_note(note: &str) -> ValidationResult<()> {
    if note.len() > MAX_NOTE_LEN {
        return Err(ValidationError::TooLong {
            field: "note".to_string(),
            max: MAX_NOTE_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Line Validators
// =============================================================================

/// Validates the line-item list of a creation call.
///
/// ## Rules
/// - At least one line
/// - At most [`MAX_REQUISITION_LINES`] lines
/// - Every requested quantity strictly positive
///
/// Failures name the zero-based index of the offending line so the caller
/// can correct the input.
///
/// ## Example
/// ```rust
/// use requisa_core::quantity::Quantity;
/// use requisa_core::types::LineInput;
/// use requisa_core::validation::validate_lines;
///
/// let lines = vec![LineInput::new("item-1", Quantity::from_units(3))];
/// assert!(validate_lines(&lines).is_ok());
/// assert!(validate_lines(&[]).is_err());
/// ```
pub fn validate_lines(lines: &[LineInput]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::EmptyCollection {
            field: "line_items".to_string(),
        });
    }

    if lines.len() > MAX_REQUISITION_LINES {
        return Err(ValidationError::TooMany {
            field: "line_items".to_string(),
            max: MAX_REQUISITION_LINES,
        });
    }

    for (index, line) in lines.iter().enumerate() {
        if line.inventory_item_id.trim().is_empty() {
            return Err(ValidationError::Line {
                index,
                source: Box::new(ValidationError::Required {
                    field: "inventory_item_id".to_string(),
                }),
            });
        }

        if !line.qty.is_positive() {
            return Err(ValidationError::Line {
                index,
                source: Box::new(ValidationError::MustBePositive {
                    field: "qty".to_string(),
                }),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::Quantity;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("SKU-001").is_ok());
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("part_1").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("Tornillo M8").is_ok());
        assert!(validate_description("").is_err());
        assert!(validate_description(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_note() {
        assert!(validate_note("").is_ok());
        assert!(validate_note("urgente, línea parada").is_ok());
        assert!(validate_note(&"x".repeat(MAX_NOTE_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_lines_empty() {
        assert!(matches!(
            validate_lines(&[]),
            Err(ValidationError::EmptyCollection { .. })
        ));
    }

    #[test]
    fn test_validate_lines_non_positive_qty_names_index() {
        let lines = vec![
            LineInput::new("item-1", Quantity::from_units(3)),
            LineInput::new("item-2", Quantity::zero()),
        ];
        match validate_lines(&lines) {
            Err(ValidationError::Line { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected line error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_lines_blank_item_id() {
        let lines = vec![LineInput::new("  ", Quantity::from_units(1))];
        assert!(matches!(
            validate_lines(&lines),
            Err(ValidationError::Line { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_lines_too_many() {
        let lines: Vec<LineInput> = (0..MAX_REQUISITION_LINES + 1)
            .map(|i| LineInput::new(format!("item-{}", i), Quantity::from_units(1)))
            .collect();
        assert!(matches!(
            validate_lines(&lines),
            Err(ValidationError::TooMany { .. })
        ));
    }
}
