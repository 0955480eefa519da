//! Two-decimal fixed-point arithmetic.
//!
//! Every fractional quantity in the engine (synergy multipliers, displayed
//! per-property potential changes, catalog material costs, expected success
//! rates) is carried as an exact number of hundredths so that truncation
//! behaves identically on every platform.

use core::fmt;

/// Exact decimal value with two fractional digits, stored as hundredths.
///
/// ```
/// # use enchant_core::Hundredths;
/// let multiplier = Hundredths::from_raw(145); // 1.45
/// assert_eq!(multiplier.scale_trunc(-110), -159); // -159.5 truncated toward zero
/// assert_eq!(multiplier.to_string(), "1.45");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "f64", into = "f64"))]
pub struct Hundredths(i64);

impl Hundredths {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(100);
    pub const HUNDRED: Self = Self(10_000);

    /// Wraps a raw hundredths count (`145` is `1.45`).
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Converts a whole number.
    pub const fn from_int(value: i64) -> Self {
        Self(value * 100)
    }

    /// Converts a float, rounding half away from zero to the nearest hundredth.
    ///
    /// Non-finite input maps to zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Self((value * 100.0).round() as i64)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Multiplies an integer by this value and truncates toward zero.
    pub const fn scale_trunc(self, value: i64) -> i64 {
        value * self.0 / 100
    }

    /// Multiplies an integer by this value without losing precision.
    pub const fn scale(self, value: i64) -> Self {
        Self(value * self.0)
    }

    /// Truncates toward zero to a whole number.
    pub const fn trunc(self) -> i64 {
        self.0 / 100
    }
}

impl From<f64> for Hundredths {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<Hundredths> for f64 {
    fn from(value: Hundredths) -> Self {
        value.to_f64()
    }
}

impl core::ops::Add for Hundredths {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Display for Hundredths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_conversion_rounds_to_nearest_hundredth() {
        assert_eq!(Hundredths::from_f64(16.5).raw(), 1650);
        assert_eq!(Hundredths::from_f64(0.1).raw(), 10);
        assert_eq!(Hundredths::from_f64(-2.125).raw(), -213);
        assert_eq!(Hundredths::from_f64(f64::NAN), Hundredths::ZERO);
    }

    #[test]
    fn scale_trunc_truncates_toward_zero() {
        let m = Hundredths::from_raw(120);
        assert_eq!(m.scale_trunc(7), 8); // 8.4
        assert_eq!(m.scale_trunc(-7), -8); // -8.4
        assert_eq!(Hundredths::from_raw(-850).trunc(), -8);
    }

    #[test]
    fn display_pads_fraction() {
        assert_eq!(Hundredths::from_raw(5).to_string(), "0.05");
        assert_eq!(Hundredths::from_raw(-5).to_string(), "-0.05");
        assert_eq!(Hundredths::from_int(100).to_string(), "100.00");
    }
}
