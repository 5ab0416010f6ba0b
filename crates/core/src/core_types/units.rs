//! Semantic unit types for type-safe physical quantity handling
//!
//! Newtype wrappers for the quantities that cross the public API of the snow
//! model, so that an altitude cannot be passed where a temperature threshold
//! is expected and degrees are never silently mixed with radians.
//!
//! # Design Philosophy
//! - All types wrap `f32`, the precision of the per-cell arena
//! - `Deref` to the raw value for arithmetic in hot loops
//! - Total ordering via `Ord` (NaN sorts above all values)
//! - Serde support (serialized as the bare number)
//!
//! # Usage
//! ```
//! use snow_sim_core::core_types::units::{Celsius, Degrees, Radians};
//!
//! let threshold = Celsius::new(-5.0);
//! assert!(*threshold < 0.0);
//! assert!(Celsius::try_new(-300.0).is_none());
//!
//! let slope: Radians = Degrees::new(30.0).into();
//! assert!((*slope - std::f32::consts::FRAC_PI_6).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Deref, DerefMut};

// ============================================================================
// HELPER FUNCTIONS FOR TOTAL ORDERING
// ============================================================================

/// Compare f32 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f32_total_cmp(a: f32, b: f32) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// TEMPERATURE
// ============================================================================

/// Air temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f32);

impl Eq for Celsius {}

impl PartialOrd for Celsius {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Celsius {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for Celsius {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl DerefMut for Celsius {
    #[inline]
    fn deref_mut(&mut self) -> &mut f32 {
        &mut self.0
    }
}

impl Celsius {
    /// Absolute zero in Celsius
    pub const ABSOLUTE_ZERO: Celsius = Celsius(-273.15);

    /// Create a new Celsius temperature. Asserts value >= absolute zero (-273.15°C).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f32) -> Self {
        assert!(
            value >= Self::ABSOLUTE_ZERO.0,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }

    /// Create from an untrusted value.
    ///
    /// Returns `None` for NaN, infinities and values below absolute zero.
    #[inline]
    #[must_use]
    pub fn try_new(value: f32) -> Option<Self> {
        (value.is_finite() && value >= Self::ABSOLUTE_ZERO.0).then_some(Celsius(value))
    }
}

impl From<f32> for Celsius {
    fn from(v: f32) -> Self {
        Celsius::new(v)
    }
}

impl From<Celsius> for f32 {
    fn from(c: Celsius) -> f32 {
        c.0
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} °C", self.0)
    }
}

// ============================================================================
// LENGTH
// ============================================================================

/// Length or altitude in meters
///
/// Unlike a distance, an altitude may be negative (below the datum), so no
/// sign check is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f32);

impl Eq for Meters {}

impl PartialOrd for Meters {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Meters {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for Meters {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl DerefMut for Meters {
    #[inline]
    fn deref_mut(&mut self) -> &mut f32 {
        &mut self.0
    }
}

impl Meters {
    /// Create a new length in meters
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Meters(value)
    }
}

impl From<f32> for Meters {
    fn from(v: f32) -> Self {
        Meters(v)
    }
}

impl From<Meters> for f32 {
    fn from(m: Meters) -> f32 {
        m.0
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m", self.0)
    }
}

// ============================================================================
// ANGLES
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f32);

impl Eq for Degrees {}

impl PartialOrd for Degrees {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Degrees {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for Degrees {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl DerefMut for Degrees {
    #[inline]
    fn deref_mut(&mut self) -> &mut f32 {
        &mut self.0
    }
}

impl Degrees {
    /// Create a new angle in degrees
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Degrees(value)
    }

    /// Convert to radians
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> Radians {
        Radians(self.0.to_radians())
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Radians(f32);

impl Eq for Radians {}

impl PartialOrd for Radians {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Radians {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for Radians {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl DerefMut for Radians {
    #[inline]
    fn deref_mut(&mut self) -> &mut f32 {
        &mut self.0
    }
}

impl Radians {
    /// Create a new angle in radians
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Radians(value)
    }

    /// Convert to degrees
    #[inline]
    #[must_use]
    pub fn to_degrees(self) -> Degrees {
        Degrees(self.0.to_degrees())
    }
}

impl From<Degrees> for Radians {
    fn from(d: Degrees) -> Radians {
        d.to_radians()
    }
}

impl From<Radians> for Degrees {
    fn from(r: Radians) -> Degrees {
        r.to_degrees()
    }
}

impl fmt::Display for Radians {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}

// ============================================================================
// TIME
// ============================================================================

/// Time offset or duration in hours
///
/// Signed: sunrise offsets before solar noon are negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Hours(f32);

impl Eq for Hours {}

impl PartialOrd for Hours {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hours {
    fn cmp(&self, other: &Self) -> Ordering {
        f32_total_cmp(self.0, other.0)
    }
}

impl Deref for Hours {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl DerefMut for Hours {
    #[inline]
    fn deref_mut(&mut self) -> &mut f32 {
        &mut self.0
    }
}

impl Hours {
    /// Create a new Hours value.
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Hours(value)
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} h", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_degree_radian_round_trip() {
        let deg = Degrees::new(45.0);
        let rad: Radians = deg.into();
        assert_relative_eq!(*rad, std::f32::consts::FRAC_PI_4, epsilon = 1e-6);
        assert_relative_eq!(*rad.to_degrees(), 45.0, epsilon = 1e-4);
    }

    #[test]
    #[should_panic(expected = "below absolute zero")]
    fn test_celsius_rejects_below_absolute_zero() {
        let _ = Celsius::new(-300.0);
    }

    #[test]
    fn test_celsius_try_new_filters_untrusted_values() {
        assert_eq!(Celsius::try_new(-5.0), Some(Celsius::new(-5.0)));
        assert_eq!(Celsius::try_new(-273.15), Some(Celsius::ABSOLUTE_ZERO));
        assert_eq!(Celsius::try_new(-300.0), None);
        assert_eq!(Celsius::try_new(f32::NAN), None);
        assert_eq!(Celsius::try_new(f32::INFINITY), None);
    }

    #[test]
    fn test_meters_allow_negative_altitude() {
        let dead_sea = Meters::new(-430.0);
        assert_eq!(f32::from(dead_sea), -430.0);
        assert!(dead_sea < Meters::new(0.0));
    }

    #[test]
    fn test_total_ordering() {
        let mut temps = [Celsius::new(3.0), Celsius::new(-2.0), Celsius::new(0.5)];
        temps.sort();
        assert_eq!(temps[0], Celsius::new(-2.0));
        assert_eq!(temps[2], Celsius::new(3.0));
    }

    #[test]
    fn test_display_suffix() {
        assert_eq!(format!("{}", Celsius::new(-5.0)), "-5.0 °C");
        assert_eq!(format!("{}", Hours::new(6.5)), "6.50 h");
        assert_eq!(format!("{}", Degrees::new(30.0)), "30.0°");
    }
}
