//! Persistent per-cell state of the snow grid.

use serde::{Deserialize, Serialize};

/// Albedo of bare, rained-on or old snow (the decay floor)
pub const ALBEDO_FLOOR: f32 = 0.4;

/// Albedo of freshly fallen snow
pub const ALBEDO_FRESH_SNOW: f32 = 0.8;

/// One terrain cell of the simulation grid.
///
/// Terrain attributes are produced once at grid setup and never written by the
/// kernel. The snow state (`snow_water_equivalent`, `interpolated_swe`,
/// `snow_albedo`, `days_since_last_snowfall`) persists across batches and is
/// mutated in place by the cell's own task only.
///
/// `#[repr(C)]` so a host engine can share the arena through the FFI layer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationCell {
    /// Direction of steepest descent, radians clockwise from north
    pub aspect: f32,
    /// Slope angle, radians (0 = horizontal)
    pub inclination: f32,
    /// Geographic latitude, radians (positive north)
    pub latitude: f32,
    /// Altitude above the datum in meters
    pub altitude: f32,
    /// True (sloped) surface area in m²
    pub area: f32,
    /// Horizontal projected area in m²
    pub area_xy: f32,
    /// Normalised curvature, positive for concave hollows
    pub curvature: f32,

    /// Snow water equivalent in liters, never negative
    pub snow_water_equivalent: f32,
    /// SWE after slope/curvature redistribution (output of the last batch)
    pub interpolated_swe: f32,
    /// Surface albedo, roughly [0.4, 0.8]
    pub snow_albedo: f32,
    /// Days since the last precipitation event
    pub days_since_last_snowfall: f32,
}

impl Default for SimulationCell {
    fn default() -> Self {
        Self {
            aspect: 0.0,
            inclination: 0.0,
            latitude: 0.0,
            altitude: 0.0,
            area: 1.0,
            area_xy: 1.0,
            curvature: 0.0,
            snow_water_equivalent: 0.0,
            interpolated_swe: 0.0,
            snow_albedo: ALBEDO_FLOOR,
            days_since_last_snowfall: 0.0,
        }
    }
}

impl SimulationCell {
    /// Create a snow-free cell from precomputed terrain attributes.
    ///
    /// Angles are in radians, areas in m².
    #[must_use]
    pub fn from_terrain(
        aspect: f32,
        inclination: f32,
        latitude: f32,
        altitude: f32,
        area: f32,
        area_xy: f32,
        curvature: f32,
    ) -> Self {
        Self {
            aspect,
            inclination,
            latitude,
            altitude,
            area,
            area_xy,
            curvature,
            ..Self::default()
        }
    }

    /// Flat cell of the given horizontal area at `latitude` radians.
    #[must_use]
    pub fn flat(latitude: f32, altitude: f32, area: f32) -> Self {
        Self::from_terrain(0.0, 0.0, latitude, altitude, area, area, 0.0)
    }

    /// Inclination in degrees
    #[inline]
    pub fn slope_degrees(&self) -> f32 {
        self.inclination.to_degrees()
    }

    /// Normalised snow depth (SWE per horizontal m²) of the last batch.
    #[inline]
    pub fn depth(&self) -> f32 {
        if self.area_xy > 0.0 {
            self.interpolated_swe / self.area_xy
        } else {
            0.0
        }
    }

    /// Whether the cell currently holds any snow
    #[inline]
    pub fn has_snow(&self) -> bool {
        self.snow_water_equivalent > 0.0
    }
}
