//! Unit types for timing, percentages and stepper counts.
//!
//! Keeps microseconds, fixed-point percentages and leadscrew steps apart at the
//! type level. Everything here is integer arithmetic so it can be used from
//! interrupt handlers.

use core::fmt;
use core::ops::{Add, Sub};

use serde::Deserialize;

/// Timestamp or duration in microseconds.
///
/// Timestamps come from a free-running wrapping counter, so intervals are
/// always computed with [`Micros::since`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Micros(pub u32);

impl Micros {
    /// Create a new Micros value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Elapsed time from `earlier` to `self`, tolerating counter wrap.
    ///
    /// Only correct for gaps under 2^32 us (about 71 minutes).
    #[inline]
    pub const fn since(self, earlier: Micros) -> Micros {
        Micros(self.0.wrapping_sub(earlier.0))
    }

    /// Signed difference `self - other` for two durations.
    #[inline]
    pub const fn deviation_from(self, other: Micros) -> i64 {
        self.0 as i64 - other.0 as i64
    }
}

impl Add for Micros {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl fmt::Display for Micros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

/// Percentage stored multiplied by 100 (two decimal digits, no floats).
///
/// `FixedPercent(-125)` is -1.25 %.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedPercent(pub i32);

impl FixedPercent {
    /// Scale factor between the stored value and whole percent.
    pub const SCALE: i32 = 100;

    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// Express `part` as a percentage of `whole`.
    ///
    /// Truncates toward zero. Returns zero when `whole` is zero.
    #[inline]
    pub fn of(part: i64, whole: u32) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let scaled = part * 100 * Self::SCALE as i64 / whole as i64;
        Self(scaled.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }

    /// Get the raw (x100) value.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Whole-percent part, truncated toward zero.
    #[inline]
    pub const fn whole(self) -> i32 {
        self.0 / Self::SCALE
    }

    /// Hundredths part, always non-negative.
    #[inline]
    pub const fn hundredths(self) -> u32 {
        (self.0 % Self::SCALE).unsigned_abs()
    }
}

impl fmt::Display for FixedPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02}%",
            sign,
            self.whole().unsigned_abs(),
            self.hundredths()
        )
    }
}

/// Leadscrew position in stepper steps (absolute from the zero-set point).
///
/// Positive is toward the tailstock (feeding right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Steps(pub i64);

impl Steps {
    /// Create a new Steps value.
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Get absolute value as u64.
    #[inline]
    pub fn abs(self) -> u64 {
        self.0.unsigned_abs()
    }
}

impl Add for Steps {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Steps {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} steps", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micros_since_wraps() {
        let earlier = Micros(u32::MAX - 99);
        let now = Micros(100);
        assert_eq!(now.since(earlier), Micros(200));
    }

    #[test]
    fn test_fixed_percent_of() {
        // 5005 of 100090 is 5.00 %
        assert_eq!(FixedPercent::of(5005, 100_090).raw(), 500);
        // -910 of 100090 is -0.90 %
        assert_eq!(FixedPercent::of(-910, 100_090).raw(), -90);
        assert_eq!(FixedPercent::of(10, 0), FixedPercent::ZERO);
    }

    #[test]
    fn test_fixed_percent_display() {
        extern crate std;
        use std::string::ToString;

        assert_eq!(FixedPercent(1234).to_string(), "12.34%");
        assert_eq!(FixedPercent(-5).to_string(), "-0.05%");
        assert_eq!(FixedPercent(-250).to_string(), "-2.50%");
    }
}
