//! Potential solar radiation on sloped terrain.
//!
//! Implements L.W. Swift's algorithm for the daily potential direct-beam
//! radiation on an inclined surface. The slope is replaced by an
//! "equivalent horizontal surface" at a different latitude `L1`, rotated in
//! longitude by `L2`; the daily integral of extraterrestrial irradiance is then
//! evaluated over the part of the day when the sun is above both the real
//! horizon and the slope's own plane.
//!
//! The result is expressed as a ratio to flat ground at the same location and
//! day, so it is dimensionless and independent of the solar-constant units.
//!
//! # References
//!
//! - L.W. Swift (1976). Algorithm for solar radiation on mountain slopes.
//!   Water Resources Research 12(1), 108-112.
//! - R. Lee (1963). Evaluation of solar beam irradiation as a climatic
//!   parameter of mountain watersheds. Colorado State University Hydrology
//!   Paper 2.

use crate::core_types::units::{Hours, Radians};
use std::f32::consts::{PI, TAU};

/// Solar constant R0 (cal · cm⁻² · min⁻¹)
pub const SOLAR_CONSTANT: f32 = 1.95;

/// Angular speed of the earth expressed as hours per radian of hour angle
const HOURS_PER_RADIAN: f32 = 12.0 / PI;

/// Day-angle increment (radians per day, 2π / 365)
const DAY_ANGLE: f32 = 0.0172;

/// Sunrise/sunset offsets of the sloped surface, relative to solar noon.
///
/// Not guaranteed to straddle noon: a steep east- or west-facing slope can
/// lose the sun before noon or only gain it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RadiationBounds {
    /// Effective sunrise offset (T4)
    pub sunrise: Hours,
    /// Effective sunset offset (T5)
    pub sunset: Hours,
}

impl RadiationBounds {
    /// Effective day length `|T4| + |T5|` in hours
    #[inline]
    pub fn day_length(&self) -> f32 {
        self.sunrise.abs() + self.sunset.abs()
    }
}

/// Output of the radiation model for one slope and day.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RadiationIndex {
    /// Slope radiation relative to flat ground, ≥ 0 (can exceed 1)
    pub ratio: f32,
    /// Sunrise/sunset offsets of the sloped surface
    pub bounds: RadiationBounds,
    /// Daily potential radiation on the slope (cal/cm²)
    pub slope_energy: f32,
    /// Daily potential radiation on flat ground (cal/cm²)
    pub flat_energy: f32,
}

/// Daily integral over one hour-angle window for a single surface.
struct SlopeIntegral {
    energy: f32,
    sunrise: f32,
    sunset: f32,
}

/// Solar declination (radians) for day-of-year `j`
#[inline]
fn declination(j: f32) -> f32 {
    0.007 - 0.4067 * ((j + 10.0) * DAY_ANGLE).cos()
}

/// Earth radius vector (orbital eccentricity correction) for day-of-year `j`
#[inline]
fn radius_vector(j: f32) -> f32 {
    1.0 - 0.0167 * ((j - 3.0) * DAY_ANGLE).cos()
}

/// Half-day hour angle (sunrise to noon) at `latitude` for declination `decl`.
///
/// Clamped so polar day yields π (sun never sets) and polar night yields 0.
#[inline]
fn half_day_angle(latitude: f32, decl: f32) -> f32 {
    (-latitude.tan() * decl.tan()).clamp(-1.0, 1.0).acos()
}

/// Closed-form integral of extraterrestrial irradiance between two hour angles.
///
/// * `offset` - Hour-angle offset of the equivalent surface (L2)
/// * `latitude` - Equivalent latitude (L1)
/// * `end`, `start` - Hour-angle window
/// * `r1` - Solar constant corrected for earth-sun distance (per hour)
/// * `decl` - Solar declination
#[inline]
fn integrate_window(offset: f32, latitude: f32, end: f32, start: f32, r1: f32, decl: f32) -> f32 {
    r1 * (decl.sin() * latitude.sin() * (end - start) * HOURS_PER_RADIAN
        + decl.cos()
            * latitude.cos()
            * ((end + offset).sin() - (start + offset).sin())
            * HOURS_PER_RADIAN)
}

/// Daily potential radiation and sunlit window of one surface.
fn slope_integral(inclination: f32, aspect: f32, latitude: f32, day_of_year: u16) -> SlopeIntegral {
    let (sin_i, cos_i) = inclination.sin_cos();
    let (sin_l, cos_l) = latitude.sin_cos();
    let (sin_a, cos_a) = aspect.sin_cos();

    // Equivalent latitude and its hour-angle offset
    let l1 = (cos_i * sin_l + sin_i * cos_l * cos_a)
        .clamp(-1.0, 1.0)
        .asin();
    let numerator = sin_i * sin_a;
    let denominator = cos_i * cos_l - sin_i * sin_l * cos_a;
    let l2 = if numerator == 0.0 {
        0.0
    } else {
        (numerator / denominator).atan()
    };

    let j = f32::from(day_of_year);
    let decl = declination(j);
    let e = radius_vector(j);
    let r1 = 60.0 * SOLAR_CONSTANT / (e * e);

    // Sunlit window of the slope plane (T6..T7) and of the real horizon (T0..T1)
    let t = half_day_angle(l1, decl);
    let mut t7 = t - l2;
    let mut t6 = -t - l2;
    let t1 = half_day_angle(latitude, decl);
    let t0 = -t1;

    let mut t3 = t7.min(t1);
    let mut t2 = t6.max(t0);

    // Slope windows shifted by a full turn can re-enter the horizon window on
    // steep or reversed slopes, which then see the sun twice a day
    t6 += TAU;
    t7 -= TAU;
    let second_window = if t6 < t1 {
        Some((t6, t1))
    } else if t7 > t0 {
        Some((t0, t7))
    } else {
        None
    };

    if t3 < t2 {
        t2 = 0.0;
        t3 = 0.0;
    }

    let mut energy = integrate_window(l2, l1, t3, t2, r1, decl);
    if let Some((start, end)) = second_window {
        energy += integrate_window(l2, l1, end, start, r1, decl);
    }

    SlopeIntegral {
        energy: energy.max(0.0),
        sunrise: t2 * HOURS_PER_RADIAN,
        sunset: t3 * HOURS_PER_RADIAN,
    }
}

/// Compute the radiation index of a slope for one day.
///
/// The flat-ground reference is the same integral evaluated at zero
/// inclination, so horizontal cells get a ratio of exactly 1.0 regardless of
/// aspect. During polar night (no flat-ground radiation) the ratio is 0.
///
/// # Arguments
///
/// * `inclination` - Slope angle (0 = horizontal)
/// * `aspect` - Downslope azimuth, clockwise from north
/// * `latitude` - Geographic latitude (positive north)
/// * `day_of_year` - Day number 1-366
///
/// # Example
///
/// ```
/// use snow_sim_core::physics::compute_radiation_index;
/// use snow_sim_core::core_types::units::Radians;
///
/// let flat = compute_radiation_index(
///     Radians::new(0.0),
///     Radians::new(1.2),
///     Radians::new(0.8),
///     172,
/// );
/// assert_eq!(flat.ratio, 1.0);
/// ```
pub fn compute_radiation_index(
    inclination: Radians,
    aspect: Radians,
    latitude: Radians,
    day_of_year: u16,
) -> RadiationIndex {
    let slope = slope_integral(*inclination, *aspect, *latitude, day_of_year);
    let flat = slope_integral(0.0, *aspect, *latitude, day_of_year);

    let ratio = if flat.energy > 0.0 {
        slope.energy / flat.energy
    } else {
        0.0
    };

    RadiationIndex {
        ratio,
        bounds: RadiationBounds {
            sunrise: Hours::new(slope.sunrise),
            sunset: Hours::new(slope.sunset),
        },
        slope_energy: slope.energy,
        flat_energy: flat.energy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn index(incl_deg: f32, aspect_deg: f32, lat_deg: f32, day: u16) -> RadiationIndex {
        compute_radiation_index(
            Radians::new(incl_deg.to_radians()),
            Radians::new(aspect_deg.to_radians()),
            Radians::new(lat_deg.to_radians()),
            day,
        )
    }

    #[test]
    fn flat_ground_is_exactly_one_for_any_aspect() {
        for aspect in [0.0, 45.0, 90.0, 180.0, 270.0, 359.0] {
            for lat in [-60.0, -30.0, 0.0, 23.0, 47.0, 65.0] {
                for day in [1, 80, 172, 266, 355] {
                    let r = index(0.0, aspect, lat, day);
                    assert_eq!(r.ratio, 1.0, "aspect={aspect} lat={lat} day={day}");
                }
            }
        }
    }

    #[test]
    fn equator_facing_slope_gains_in_winter() {
        // 47°N in December: south-facing (aspect 180°) gains, north-facing loses
        let south = index(30.0, 180.0, 47.0, 355);
        let north = index(30.0, 0.0, 47.0, 355);
        assert!(south.ratio > 1.0, "south-facing ratio {}", south.ratio);
        assert!(north.ratio < 1.0, "north-facing ratio {}", north.ratio);
        assert!(north.ratio >= 0.0);
    }

    #[test]
    fn hemispheres_are_mirrored() {
        let north_hemisphere = index(25.0, 180.0, 45.0, 355);
        let south_hemisphere = index(25.0, 0.0, -45.0, 172);
        // Solar geometry is mirrored up to the small eccentricity term
        assert_relative_eq!(
            north_hemisphere.ratio,
            south_hemisphere.ratio,
            max_relative = 0.05
        );
    }

    #[test]
    fn equinox_day_length_is_twelve_hours() {
        let r = index(0.0, 0.0, 0.0, 80);
        assert_relative_eq!(*r.bounds.sunrise, -6.0, epsilon = 0.1);
        assert_relative_eq!(*r.bounds.sunset, 6.0, epsilon = 0.1);
        assert_relative_eq!(r.bounds.day_length(), 12.0, epsilon = 0.2);
    }

    #[test]
    fn east_facing_slope_loses_the_afternoon() {
        let flat = index(0.0, 0.0, 45.0, 172);
        let east = index(30.0, 90.0, 45.0, 172);
        assert!(*east.bounds.sunset < *flat.bounds.sunset);
        assert!(east.bounds.day_length() > 0.0);
    }

    #[test]
    fn polar_night_is_finite_and_dark() {
        let r = index(0.0, 0.0, 80.0, 355);
        assert_eq!(r.ratio, 0.0);
        assert_eq!(r.flat_energy, 0.0);

        let steep = index(40.0, 180.0, 80.0, 355);
        assert!(steep.ratio.is_finite());
        assert!(steep.ratio >= 0.0);
    }

    #[test]
    fn polar_day_gets_full_window() {
        let r = index(0.0, 0.0, 80.0, 172);
        assert_relative_eq!(r.bounds.day_length(), 24.0, epsilon = 0.01);
        assert_eq!(r.ratio, 1.0);
    }

    #[test]
    fn ratio_is_finite_and_non_negative_over_sweep() {
        for incl in (0..=80).step_by(10) {
            for aspect in (0..360).step_by(30) {
                for lat in (-75..=75).step_by(15) {
                    for day in (1..=365).step_by(28) {
                        let r = index(incl as f32, aspect as f32, lat as f32, day);
                        assert!(
                            r.ratio.is_finite() && r.ratio >= 0.0,
                            "incl={incl} aspect={aspect} lat={lat} day={day} ratio={}",
                            r.ratio
                        );
                        assert!(r.bounds.sunrise.is_finite());
                        assert!(r.bounds.sunset.is_finite());
                    }
                }
            }
        }
    }

    #[test]
    fn perihelion_gives_more_energy_than_aphelion() {
        let jan = slope_integral(0.0, 0.0, 0.0, 3);
        let jul = slope_integral(0.0, 0.0, 0.0, 185);
        assert!(radius_vector(3.0) < radius_vector(185.0));
        // At the equator day length is constant, so only distance and declination differ
        assert!(jan.energy > 0.0 && jul.energy > 0.0);
    }
}
