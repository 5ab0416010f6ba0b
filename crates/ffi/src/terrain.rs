//! FFI-exposed grid description.
//!
//! `SnowSimDesc` is a flat `#[repr(C)]` struct rather than a tagged union so
//! that C, C++ and C# hosts can fill it in field by field. Fields a given
//! terrain kind does not use are ignored.

use crate::error::DefaultFfiError;
use snow_sim_core::grid::MAX_TERRAIN_SAMPLES;
use snow_sim_core::{Degrees, Radians, TerrainData};

/// Shape of the terrain the grid is built from.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainKind {
    /// Level ground at `base_elevation`.
    Flat = 0,
    /// Gaussian mountain of `hill_height` and `hill_radius` in the middle.
    SingleHill = 1,
    /// Two hills of `hill_height` with a trough between them.
    ValleyBetweenHills = 2,
    /// Caller-supplied heightmap of `nx * ny` samples.
    Heightmap = 3,
}

/// Description of the simulation grid passed to `snow_sim_new`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SnowSimDesc {
    /// Which terrain generator to use.
    pub kind: TerrainKind,
    /// Extent west to east in meters.
    pub width: f32,
    /// Extent south to north in meters.
    pub height: f32,
    /// Sample spacing in meters. Ignored for heightmaps (derived from `width / (nx - 1)`).
    pub resolution: f32,
    /// Elevation added to every sample in meters.
    pub base_elevation: f32,
    /// Hill height above the base in meters.
    pub hill_height: f32,
    /// Hill radius in meters (`SingleHill` only).
    pub hill_radius: f32,
    /// Heightmap columns.
    pub nx: usize,
    /// Heightmap rows.
    pub ny: usize,
    /// Multiplier applied to heightmap values.
    pub elevation_scale: f32,
    /// Latitude of the southern row in degrees (positive north).
    pub origin_latitude_deg: f32,
    /// Latitude difference between the southern and northern rows in degrees.
    pub latitude_span_deg: f32,
}

impl SnowSimDesc {
    /// Row-0 latitude and the span across rows, in radians.
    pub(crate) fn latitudes(&self) -> Result<(Radians, Radians), DefaultFfiError> {
        let origin = self.origin_latitude_deg;
        let span = self.latitude_span_deg;
        if !origin.is_finite() || !(-90.0..=90.0).contains(&origin) {
            return Err(DefaultFfiError::invalid_terrain_parameter_msg(
                "origin_latitude_deg",
                &format!("must lie in [-90, 90], got {origin}"),
            ));
        }
        if !span.is_finite() || !(-90.0..=90.0).contains(&(origin + span)) {
            return Err(DefaultFfiError::invalid_terrain_parameter_msg(
                "latitude_span_deg",
                &format!("northern row must stay within [-90, 90], got {}", origin + span),
            ));
        }
        Ok((Degrees::new(origin).into(), Degrees::new(span).into()))
    }

    /// Build the elevation grid.
    ///
    /// `heightmap` is required for `TerrainKind::Heightmap` and ignored otherwise.
    pub(crate) fn terrain(&self, heightmap: Option<&[f32]>) -> Result<TerrainData, DefaultFfiError> {
        let terrain = match self.kind {
            TerrainKind::Flat => {
                TerrainData::flat(self.width, self.height, self.resolution, self.base_elevation)
            }
            TerrainKind::SingleHill => TerrainData::single_hill(
                self.width,
                self.height,
                self.resolution,
                self.base_elevation,
                self.hill_height,
                self.hill_radius,
            ),
            TerrainKind::ValleyBetweenHills => TerrainData::valley_between_hills(
                self.width,
                self.height,
                self.resolution,
                self.base_elevation,
                self.hill_height,
            ),
            TerrainKind::Heightmap => {
                let heightmap = heightmap.ok_or_else(|| DefaultFfiError::null_pointer("heightmap"))?;
                TerrainData::from_heightmap(
                    self.width,
                    self.height,
                    heightmap,
                    self.nx,
                    self.ny,
                    self.elevation_scale,
                    self.base_elevation,
                )
            }
        };
        terrain.map_err(DefaultFfiError::from)
    }

    /// Number of heightmap samples the caller must provide, checked for overflow.
    pub(crate) fn heightmap_len(&self) -> Result<usize, DefaultFfiError> {
        match self.nx.checked_mul(self.ny) {
            Some(len) if self.nx >= 2 && self.ny >= 2 && len <= MAX_TERRAIN_SAMPLES => Ok(len),
            _ => Err(DefaultFfiError::invalid_terrain_parameter_msg(
                "nx/ny",
                &format!(
                    "heightmap must be at least 2x2 with at most {MAX_TERRAIN_SAMPLES} samples, got {}x{}",
                    self.nx, self.ny
                ),
            )),
        }
    }
}

impl Default for SnowSimDesc {
    fn default() -> Self {
        Self {
            kind: TerrainKind::Flat,
            width: 100.0,
            height: 100.0,
            resolution: 10.0,
            base_elevation: 0.0,
            hill_height: 0.0,
            hill_radius: 1.0,
            nx: 0,
            ny: 0,
            elevation_scale: 1.0,
            origin_latitude_deg: 45.0,
            latitude_span_deg: 0.0,
        }
    }
}
