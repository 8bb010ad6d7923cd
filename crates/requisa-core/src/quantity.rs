//! # Quantity Module
//!
//! Provides the `Quantity` type for stock levels and requested/approved
//! amounts.
//!
//! ## Why Integer Quantities?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Stock arithmetic in floats drifts:                                     │
//! │    10.0 - 3 × 3.3333… = 0.0000000000000004  ❌ never exactly zero       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Milli-Units                                      │
//! │    One unit = 1000 milli. 2.5 litres = 2500 milli.                      │
//! │    Every subtraction is exact, and "floor at zero" is exact too.        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use requisa_core::quantity::Quantity;
//!
//! let stock = Quantity::from_units(10);        // 10.000
//! let granted = Quantity::from_milli(2_500);   // 2.500
//!
//! // Ledger decrement: floored at zero, never negative
//! let remaining = stock.decrement(granted);
//! assert_eq!(remaining, Quantity::from_milli(7_500));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Milli-units per whole unit.
pub const MILLI_PER_UNIT: i64 = 1_000;

/// A stock or line quantity in milli-units (thousandths of a unit).
///
/// ## Design Decisions
/// - **i64 milli-units**: three decimal places of precision, exact arithmetic
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No general subtraction**: the only way down is [`Quantity::decrement`],
///   which floors at zero, matching the ledger invariant `stock >= 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a Quantity from milli-units (the smallest unit).
    ///
    /// ## Example
    /// ```rust
    /// use requisa_core::quantity::Quantity;
    ///
    /// let qty = Quantity::from_milli(2_500); // 2.5 units
    /// assert_eq!(qty.milli(), 2_500);
    /// ```
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a Quantity from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * MILLI_PER_UNIT)
    }

    /// Returns the value in milli-units.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn units_part(&self) -> i64 {
        self.0 / MILLI_PER_UNIT
    }

    /// Returns the fractional portion in milli-units (always 0-999).
    #[inline]
    pub const fn milli_part(&self) -> i64 {
        (self.0 % MILLI_PER_UNIT).abs()
    }

    /// Zero quantity.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    /// Checks if the quantity is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the quantity is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Ledger decrement: subtracts `taken`, floored at zero.
    ///
    /// This is the single arithmetic rule behind the stock invariant:
    /// `new_stock = max(0, stock - qty)`. Over-approval past available
    /// stock empties the shelf, it never produces negative stock.
    ///
    /// ## Example
    /// ```rust
    /// use requisa_core::quantity::Quantity;
    ///
    /// let stock = Quantity::from_units(2);
    /// assert_eq!(stock.decrement(Quantity::from_units(5)), Quantity::zero());
    /// ```
    #[inline]
    pub const fn decrement(&self, taken: Quantity) -> Self {
        let next = self.0 - taken.0;
        if next < 0 {
            Quantity(0)
        } else {
            Quantity(next)
        }
    }
}

/// Display shows units with three decimal places, e.g. `2.500`.
///
/// ## Note
/// This is for debugging and logs. Front ends format for locale.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:03}",
            sign,
            self.units_part().abs(),
            self.milli_part()
        )
    }
}

/// Default quantity is zero.
impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

/// Addition of two Quantity values (restocks, totals).
impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
