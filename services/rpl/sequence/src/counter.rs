//! Sequence counter values, regions, and the bounded comparison window.

use serde::{Deserialize, Serialize};
use std::cmp;
use std::fmt;
use thiserror::Error;

/// Default comparison window (`W`), matching the protocol default.
pub const DEFAULT_SEQUENCE_WINDOW: u8 = 16;

/// Value assigned to a counter at protocol-instance initialization.
pub const INITIAL_SEQUENCE: u8 = 0;

/// Highest value of the sequential region; 128..=255 form the circular region.
pub const SEQUENTIAL_REGION_MAX: u8 = 127;

/// Sequence counter errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    /// Comparison window outside the usable 1..=127 range
    #[error("comparison window {0} out of range")]
    WindowOutOfRange(u8),
}

/// Region a counter value belongs to, derived from the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    /// Values 0..=127, used immediately after a counter reset
    Sequential,
    /// Values 128..=255, used once a counter has wrapped at least once
    Circular,
}

/// Result of ordering two counter values.
///
/// `Incomparable` signals that the values are too far apart to order
/// safely; it must be propagated to the caller, never resolved here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceOrdering {
    /// Identical raw values
    Equal,
    /// The first value is more recent
    Greater,
    /// The second value is more recent
    Lesser,
    /// No safe ordering exists within the comparison window
    Incomparable,
}

/// Maximum counter distance within which two values are safely orderable.
///
/// Process-wide configuration: built once at startup and passed by value
/// into every comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonWindow(u8);

impl ComparisonWindow {
    /// The protocol-default window of 16.
    pub const DEFAULT: Self = Self(DEFAULT_SEQUENCE_WINDOW);

    /// Create a window, rejecting values that cannot bound a circular
    /// distance (0, or anything past the region boundary).
    pub fn new(window: u8) -> Result<Self, SequenceError> {
        if window == 0 || window > SEQUENTIAL_REGION_MAX {
            return Err(SequenceError::WindowOutOfRange(window));
        }
        Ok(Self(window))
    }

    /// Get the raw window width
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for ComparisonWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An 8-bit lollipop counter value.
///
/// Immutable once observed: [`SequenceNumber::increment`] is a pure
/// function from old value to new value, and the owner is responsible for
/// persisting the result as its counter of record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceNumber(u8);

impl SequenceNumber {
    /// Counter value at protocol-instance initialization.
    pub const INITIAL: Self = Self(INITIAL_SEQUENCE);

    /// Wrap a raw observed value. Every `u8` is a valid counter value.
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Get the raw 8-bit value
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Region this value belongs to
    pub const fn region(self) -> Region {
        if self.0 <= SEQUENTIAL_REGION_MAX {
            Region::Sequential
        } else {
            Region::Circular
        }
    }

    /// Advance the counter by one step, wrapping within its own region.
    ///
    /// 127 wraps back to 0 without entering the circular region; 255 wraps
    /// to 0 as a full counter reset.
    #[must_use = "increment returns the new value; the old one is unchanged"]
    pub const fn increment(self) -> Self {
        match self.0 {
            SEQUENTIAL_REGION_MAX | u8::MAX => Self(0),
            value => Self(value + 1),
        }
    }

    /// Determine which of `self` and `other` is the more recent counter.
    ///
    /// Same-region pairs order linearly (sequential region) or by signed
    /// circular distance bounded by `window` (circular region). For mixed
    /// regions the circular value wins unless the sequential value sits
    /// within `window` steps past the wrap boundary, in which case the
    /// counter has just reset and the low value has taken over.
    pub fn compare(self, other: Self, window: ComparisonWindow) -> SequenceOrdering {
        match (self.region(), other.region()) {
            (Region::Sequential, Region::Sequential) => match self.0.cmp(&other.0) {
                cmp::Ordering::Greater => SequenceOrdering::Greater,
                cmp::Ordering::Less => SequenceOrdering::Lesser,
                cmp::Ordering::Equal => SequenceOrdering::Equal,
            },
            (Region::Circular, Region::Circular) => {
                let distance = self.0.wrapping_sub(other.0) as i8;
                if distance == 0 {
                    SequenceOrdering::Equal
                } else if distance.unsigned_abs() > window.get() {
                    SequenceOrdering::Incomparable
                } else if distance > 0 {
                    SequenceOrdering::Greater
                } else {
                    SequenceOrdering::Lesser
                }
            }
            (Region::Circular, Region::Sequential) => {
                // skew counts the steps from the high value through the
                // wrap boundary to the low one
                let skew = 256 + other.0 as u16 - self.0 as u16;
                if skew <= window.get() as u16 {
                    SequenceOrdering::Lesser
                } else {
                    SequenceOrdering::Greater
                }
            }
            (Region::Sequential, Region::Circular) => {
                let skew = 256 + self.0 as u16 - other.0 as u16;
                if skew <= window.get() as u16 {
                    SequenceOrdering::Greater
                } else {
                    SequenceOrdering::Lesser
                }
            }
        }
    }

    /// True unless [`SequenceNumber::compare`] yields `Incomparable`
    pub fn is_comparable(self, other: Self, window: ComparisonWindow) -> bool {
        self.compare(other, window) != SequenceOrdering::Incomparable
    }

    /// True iff [`SequenceNumber::compare`] yields `Greater`
    pub fn is_greater(self, other: Self, window: ComparisonWindow) -> bool {
        self.compare(other, window) == SequenceOrdering::Greater
    }

    /// True iff [`SequenceNumber::compare`] yields `Lesser`
    pub fn is_lesser(self, other: Self, window: ComparisonWindow) -> bool {
        self.compare(other, window) == SequenceOrdering::Lesser
    }
}

impl Default for SequenceNumber {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl From<u8> for SequenceNumber {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl From<SequenceNumber> for u8 {
    fn from(seq: SequenceNumber) -> Self {
        seq.0
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: ComparisonWindow = ComparisonWindow::DEFAULT;

    fn seq(raw: u8) -> SequenceNumber {
        SequenceNumber::new(raw)
    }

    #[test]
    fn test_initial_value() {
        assert_eq!(SequenceNumber::INITIAL.raw(), INITIAL_SEQUENCE);
        assert_eq!(SequenceNumber::default(), SequenceNumber::INITIAL);
        assert_eq!(SequenceNumber::INITIAL.region(), Region::Sequential);
    }

    #[test]
    fn test_regions() {
        assert_eq!(seq(0).region(), Region::Sequential);
        assert_eq!(seq(127).region(), Region::Sequential);
        assert_eq!(seq(128).region(), Region::Circular);
        assert_eq!(seq(255).region(), Region::Circular);
    }

    #[test]
    fn test_increment_sequential_region() {
        assert_eq!(seq(1).increment(), seq(2));
        for x in 0..SEQUENTIAL_REGION_MAX {
            assert_eq!(seq(x).increment(), seq(x + 1));
        }
        // 127 wraps back into the sequential region, not into the circular one
        assert_eq!(seq(127).increment(), seq(0));
    }

    #[test]
    fn test_increment_circular_region() {
        assert_eq!(seq(140).increment(), seq(141));
        for x in 128..u8::MAX {
            assert_eq!(seq(x).increment(), seq(x + 1));
        }
        // 255 wraps out of the circular region, a full counter reset
        assert_eq!(seq(255).increment(), seq(0));
    }

    #[test]
    fn test_increment_round_trip() {
        // 256 steps from any sequential-region value land back on it
        for start in 0..=SEQUENTIAL_REGION_MAX {
            let mut value = seq(start);
            for _ in 0..256 {
                value = value.increment();
            }
            assert_eq!(value, seq(start));
        }
    }

    #[test]
    fn test_compare_equal_only_for_identical_values() {
        for raw in 0..=u8::MAX {
            assert_eq!(seq(raw).compare(seq(raw), W), SequenceOrdering::Equal);
        }
    }

    #[test]
    fn test_compare_sequential_region() {
        assert_eq!(seq(5).compare(seq(3), W), SequenceOrdering::Greater);
        assert_eq!(seq(3).compare(seq(5), W), SequenceOrdering::Lesser);
        // always comparable, even across the full region
        assert_eq!(seq(0).compare(seq(127), W), SequenceOrdering::Lesser);
        assert_eq!(seq(127).compare(seq(0), W), SequenceOrdering::Greater);
    }

    #[test]
    fn test_compare_circular_region() {
        // distance 10, inside the window
        assert_eq!(seq(200).compare(seq(190), W), SequenceOrdering::Greater);
        assert_eq!(seq(190).compare(seq(200), W), SequenceOrdering::Lesser);
        // distance 50, outside the window
        assert_eq!(seq(200).compare(seq(150), W), SequenceOrdering::Incomparable);
        assert_eq!(seq(150).compare(seq(200), W), SequenceOrdering::Incomparable);
        // exactly at the window boundary
        assert_eq!(seq(200).compare(seq(184), W), SequenceOrdering::Greater);
        assert_eq!(seq(200).compare(seq(183), W), SequenceOrdering::Incomparable);
    }

    #[test]
    fn test_compare_mixed_regions() {
        // skew 256 + 5 - 240 = 21 > 16: the old high value still wins
        assert_eq!(seq(240).compare(seq(5), W), SequenceOrdering::Greater);
        assert!(seq(240).is_comparable(seq(5), W));
        assert!(seq(240).is_greater(seq(5), W));
        assert!(!seq(240).is_lesser(seq(5), W));

        // skew 256 + 5 - 250 = 11 <= 16: the low value took over after a wrap
        assert_eq!(seq(250).compare(seq(5), W), SequenceOrdering::Lesser);
        assert!(seq(250).is_comparable(seq(5), W));
        assert!(!seq(250).is_greater(seq(5), W));
        assert!(seq(250).is_lesser(seq(5), W));
    }

    #[test]
    fn test_compare_antisymmetry() {
        for a in 0..=u8::MAX {
            for b in 0..=u8::MAX {
                let forward = seq(a).compare(seq(b), W);
                let backward = seq(b).compare(seq(a), W);
                let expected = match forward {
                    SequenceOrdering::Equal => SequenceOrdering::Equal,
                    SequenceOrdering::Greater => SequenceOrdering::Lesser,
                    SequenceOrdering::Lesser => SequenceOrdering::Greater,
                    SequenceOrdering::Incomparable => SequenceOrdering::Incomparable,
                };
                assert_eq!(backward, expected, "a={} b={}", a, b);
            }
        }
    }

    #[test]
    fn test_predicates_are_projections_of_compare() {
        for a in 0..=u8::MAX {
            for b in 0..=u8::MAX {
                let (a, b) = (seq(a), seq(b));
                let ordering = a.compare(b, W);
                assert_eq!(a.is_comparable(b, W), ordering != SequenceOrdering::Incomparable);
                assert_eq!(a.is_greater(b, W), ordering == SequenceOrdering::Greater);
                assert_eq!(a.is_lesser(b, W), ordering == SequenceOrdering::Lesser);

                // exactly one outcome holds for every pair
                let outcomes = [
                    ordering == SequenceOrdering::Equal,
                    ordering == SequenceOrdering::Greater,
                    ordering == SequenceOrdering::Lesser,
                    ordering == SequenceOrdering::Incomparable,
                ];
                assert_eq!(outcomes.iter().filter(|&&held| held).count(), 1);
            }
        }
    }

    #[test]
    fn test_window_validation() {
        assert!(ComparisonWindow::new(1).is_ok());
        assert!(ComparisonWindow::new(127).is_ok());
        assert_eq!(
            ComparisonWindow::new(0),
            Err(SequenceError::WindowOutOfRange(0))
        );
        assert_eq!(
            ComparisonWindow::new(128),
            Err(SequenceError::WindowOutOfRange(128))
        );
        assert_eq!(ComparisonWindow::default().get(), DEFAULT_SEQUENCE_WINDOW);
    }

    #[test]
    fn test_wider_window_extends_ordering() {
        let wide = ComparisonWindow::new(50).unwrap();
        assert_eq!(seq(200).compare(seq(150), W), SequenceOrdering::Incomparable);
        assert_eq!(seq(200).compare(seq(150), wide), SequenceOrdering::Greater);
        // and on the mixed boundary
        assert_eq!(seq(240).compare(seq(5), wide), SequenceOrdering::Lesser);
    }

    #[test]
    fn test_raw_conversions() {
        let value = SequenceNumber::from(42u8);
        assert_eq!(u8::from(value), 42);
        assert_eq!(value.to_string(), "42");
    }
}
