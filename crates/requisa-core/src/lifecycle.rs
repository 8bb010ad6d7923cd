//! # Approval Lifecycle
//!
//! The pure half of the approval processor: given a requisition's lines and
//! the approver's per-line decisions, compute what each line is granted and
//! which status the requisition lands in. The transactional shell in
//! requisa-db applies the result to storage.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Requisition Lifecycle                               │
//! │                                                                         │
//! │              process(approved=true,                                     │
//! │                      every line granted in full)                        │
//! │              ┌──────────────────────────────► approved                  │
//! │              │                                                          │
//! │   pending ───┤  process(approved=true,                                  │
//! │              │          any line short or omitted)                      │
//! │              ├──────────────────────────────► partially_approved        │
//! │              │                                                          │
//! │              │  process(approved=false)                                 │
//! │              └──────────────────────────────► rejected                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Implicit Zero Approval
//! A line absent from the decisions map is granted ZERO, not "left as is".
//! That forces `partially_approved` even if the approver meant to skip the
//! line. This is a deliberate, named contract of the engine (an approval
//! decision covers every line of the requisition), not an oversight. Do not
//! "fix" it into carrying prior values forward.

use std::collections::HashMap;

use crate::quantity::Quantity;
use crate::types::{RequisitionItem, RequisitionStatus};

// =============================================================================
// Resolution Types
// =============================================================================

/// The granted quantity for one line, ready to be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    /// Requisition line id.
    pub line_id: String,
    /// Inventory item the line draws from (denormalized for the ledger step).
    pub inventory_item_id: String,
    /// Granted quantity; zero when the line was omitted from the decisions.
    pub qty_approved: Quantity,
}

/// Outcome of resolving a decisions map against a requisition's lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// One entry per requisition line, in line order.
    pub lines: Vec<ResolvedLine>,
    /// True when any line was granted less than it requested.
    pub any_partial: bool,
}

// =============================================================================
// Pure Functions
// =============================================================================

/// Resolves the approver's decisions against every line of the requisition.
///
/// ## Contract
/// - Every line gets an entry, whether or not it appears in `decisions`
/// - A missing entry resolves to zero (implicit zero approval)
/// - `any_partial` is true when some granted quantity is strictly below the
///   requested one; a grant above the requested quantity does NOT count as
///   partial
/// - Entries in `decisions` whose key matches no line are ignored
///
/// ## Example
/// ```rust
/// use std::collections::HashMap;
/// use requisa_core::lifecycle::resolve_decisions;
/// use requisa_core::quantity::Quantity;
/// # use chrono::Utc;
/// # use requisa_core::types::RequisitionItem;
/// # let line = RequisitionItem {
/// #     id: "l1".into(), requisition_id: "r1".into(),
/// #     inventory_item_id: "i1".into(), qty_requested_milli: 3_000,
/// #     qty_approved_milli: None, created_at: Utc::now(),
/// # };
///
/// let mut decisions = HashMap::new();
/// decisions.insert("l1".to_string(), Quantity::from_units(2));
///
/// let resolution = resolve_decisions(&[line], &decisions);
/// assert!(resolution.any_partial); // 2 < 3
/// ```
pub fn resolve_decisions(
    items: &[RequisitionItem],
    decisions: &HashMap<String, Quantity>,
) -> Resolution {
    let mut lines = Vec::with_capacity(items.len());
    let mut any_partial = false;

    for item in items {
        let qty_approved = decisions
            .get(&item.id)
            .copied()
            .unwrap_or_else(Quantity::zero);

        if qty_approved < item.qty_requested() {
            any_partial = true;
        }

        lines.push(ResolvedLine {
            line_id: item.id.clone(),
            inventory_item_id: item.inventory_item_id.clone(),
            qty_approved,
        });
    }

    Resolution { lines, any_partial }
}

/// Resolves the requisition's next status, evaluated once after all lines.
///
/// ## Rules
/// - `approved == false` → `Rejected`, regardless of quantities supplied
/// - `approved == true` and any line short → `PartiallyApproved`
/// - `approved == true` and every line whole → `Approved`
pub const fn next_status(approved: bool, any_partial: bool) -> RequisitionStatus {
    if !approved {
        RequisitionStatus::Rejected
    } else if any_partial {
        RequisitionStatus::PartiallyApproved
    } else {
        RequisitionStatus::Approved
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn line(id: &str, inventory_item_id: &str, requested_milli: i64) -> RequisitionItem {
        RequisitionItem {
            id: id.to_string(),
            requisition_id: "req-1".to_string(),
            inventory_item_id: inventory_item_id.to_string(),
            qty_requested_milli: requested_milli,
            qty_approved_milli: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_grant_is_not_partial() {
        let items = vec![line("l1", "i1", 3_000), line("l2", "i2", 5_000)];
        let mut decisions = HashMap::new();
        decisions.insert("l1".to_string(), Quantity::from_units(3));
        decisions.insert("l2".to_string(), Quantity::from_units(5));

        let resolution = resolve_decisions(&items, &decisions);
        assert!(!resolution.any_partial);
        assert_eq!(resolution.lines.len(), 2);
        assert_eq!(resolution.lines[0].qty_approved, Quantity::from_units(3));
        assert_eq!(next_status(true, resolution.any_partial), RequisitionStatus::Approved);
    }

    #[test]
    fn test_short_grant_is_partial() {
        let items = vec![line("l1", "i1", 3_000)];
        let mut decisions = HashMap::new();
        decisions.insert("l1".to_string(), Quantity::from_units(2));

        let resolution = resolve_decisions(&items, &decisions);
        assert!(resolution.any_partial);
        assert_eq!(
            next_status(true, resolution.any_partial),
            RequisitionStatus::PartiallyApproved
        );
    }

    #[test]
    fn test_omitted_line_resolves_to_zero_and_forces_partial() {
        let items = vec![line("l1", "i1", 5_000), line("l2", "i1", 5_000)];
        let mut decisions = HashMap::new();
        decisions.insert("l1".to_string(), Quantity::from_units(5));
        // l2 omitted on purpose

        let resolution = resolve_decisions(&items, &decisions);
        assert!(resolution.any_partial);
        assert_eq!(resolution.lines[1].qty_approved, Quantity::zero());
    }

    #[test]
    fn test_over_grant_does_not_count_as_partial() {
        let items = vec![line("l1", "i1", 3_000)];
        let mut decisions = HashMap::new();
        decisions.insert("l1".to_string(), Quantity::from_units(4));

        let resolution = resolve_decisions(&items, &decisions);
        assert!(!resolution.any_partial);
    }

    #[test]
    fn test_unknown_decision_keys_are_ignored() {
        let items = vec![line("l1", "i1", 3_000)];
        let mut decisions = HashMap::new();
        decisions.insert("l1".to_string(), Quantity::from_units(3));
        decisions.insert("ghost".to_string(), Quantity::from_units(9));

        let resolution = resolve_decisions(&items, &decisions);
        assert_eq!(resolution.lines.len(), 1);
        assert!(!resolution.any_partial);
    }

    #[test]
    fn test_rejection_wins_over_quantities() {
        assert_eq!(next_status(false, false), RequisitionStatus::Rejected);
        assert_eq!(next_status(false, true), RequisitionStatus::Rejected);
    }

    #[test]
    fn test_empty_requisition_resolves_as_full_grant() {
        // No lines means nothing can be short. Creation forbids empty
        // requisitions; this pins the edge behavior anyway.
        let resolution = resolve_decisions(&[], &HashMap::new());
        assert!(!resolution.any_partial);
        assert_eq!(next_status(true, resolution.any_partial), RequisitionStatus::Approved);
    }
}
