//! Terrain elevation grid and the topographic derivatives the snow kernel needs
//!
//! Implements Digital Elevation Model (DEM) support with Horn (1981) gradients
//! and a five-point Laplacian, evaluated directly on the elevation samples so
//! every sample maps to exactly one simulation cell.
//!
//! Axis convention: `x` grows east along a row, `y` grows north across rows.

use crate::error::{SnowSimError, SnowSimResult};
use serde::{Deserialize, Serialize};

/// Terrain data structure holding elevation information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainData {
    /// Width of terrain in meters
    pub(crate) width: f32,
    /// Height of terrain in meters
    pub(crate) height: f32,
    /// Grid resolution in meters per sample
    pub(crate) resolution: f32,
    /// Number of elevation samples in X direction
    pub(crate) nx: usize,
    /// Number of elevation samples in Y direction
    pub(crate) ny: usize,
    /// Elevation data in meters (row-major order: [y * nx + x])
    pub(crate) elevations: Vec<f32>,
    /// Minimum elevation in dataset
    pub(crate) min_elevation: f32,
    /// Maximum elevation in dataset
    pub(crate) max_elevation: f32,
}

/// Upper bound on elevation samples (and therefore simulation cells) in one grid
pub const MAX_TERRAIN_SAMPLES: usize = 1 << 26;

/// Reject zero, negative and non-finite extents.
fn positive(name: &'static str, value: f32) -> SnowSimResult<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SnowSimError::InvalidTerrain { name, value })
    }
}

/// Samples along one axis covering `extent` at `resolution`, fence posts included.
fn axis_samples(name: &'static str, extent: f32, resolution: f32) -> SnowSimResult<usize> {
    let steps = (extent / resolution).ceil();
    if steps < MAX_TERRAIN_SAMPLES as f32 {
        Ok(steps as usize + 1)
    } else {
        Err(SnowSimError::InvalidTerrain {
            name,
            value: extent,
        })
    }
}

/// Total sample count of an `nx` x `ny` grid, bounded by `MAX_TERRAIN_SAMPLES`.
fn grid_samples(nx: usize, ny: usize) -> SnowSimResult<usize> {
    match nx.checked_mul(ny) {
        Some(count) if count <= MAX_TERRAIN_SAMPLES => Ok(count),
        _ => Err(SnowSimError::DimensionMismatch {
            what: "terrain samples",
            expected: MAX_TERRAIN_SAMPLES,
            actual: nx.saturating_mul(ny),
        }),
    }
}

impl TerrainData {
    /// Sample `elevation(x, y)` on a regular grid covering `width` x `height`.
    fn sampled(
        width: f32,
        height: f32,
        resolution: f32,
        elevation: impl Fn(f32, f32) -> f32,
    ) -> SnowSimResult<Self> {
        let width = positive("width", width)?;
        let height = positive("height", height)?;
        let resolution = positive("resolution", resolution)?;

        let nx = axis_samples("width", width, resolution)?;
        let ny = axis_samples("height", height, resolution)?;

        let mut elevations = Vec::with_capacity(grid_samples(nx, ny)?);
        for iy in 0..ny {
            for ix in 0..nx {
                elevations.push(elevation(ix as f32 * resolution, iy as f32 * resolution));
            }
        }

        Ok(Self::from_samples(width, height, resolution, nx, ny, elevations))
    }

    fn from_samples(
        width: f32,
        height: f32,
        resolution: f32,
        nx: usize,
        ny: usize,
        elevations: Vec<f32>,
    ) -> Self {
        let (min_elevation, max_elevation) = elevations
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &e| (lo.min(e), hi.max(e)));

        TerrainData {
            width,
            height,
            resolution,
            nx,
            ny,
            elevations,
            min_elevation,
            max_elevation,
        }
    }

    /// Create flat terrain at given elevation
    ///
    /// # Errors
    ///
    /// Returns `SnowSimError::InvalidTerrain` if an extent or the resolution
    /// is not finite and positive, or the grid would exceed
    /// `MAX_TERRAIN_SAMPLES`.
    pub fn flat(width: f32, height: f32, resolution: f32, elevation: f32) -> SnowSimResult<Self> {
        Self::sampled(width, height, resolution, |_, _| elevation)
    }

    /// Create terrain with a single Gaussian mountain in the middle
    ///
    /// # Errors
    ///
    /// Returns `SnowSimError::InvalidTerrain` if an extent, the resolution or
    /// the radius is not finite and positive.
    pub fn single_hill(
        width: f32,
        height: f32,
        resolution: f32,
        base_elevation: f32,
        hill_height: f32,
        hill_radius: f32,
    ) -> SnowSimResult<Self> {
        let radius_sq = positive("hill_radius", hill_radius)?.powi(2);
        let center_x = width / 2.0;
        let center_y = height / 2.0;

        Self::sampled(width, height, resolution, |x, y| {
            let dist_sq = (x - center_x).powi(2) + (y - center_y).powi(2);
            base_elevation + hill_height * (-dist_sq / radius_sq).exp()
        })
    }

    /// Create terrain with a valley between two hills
    ///
    /// The hills sit at a quarter and three quarters of the width; a shallow
    /// trough runs north-south between them.
    ///
    /// # Errors
    ///
    /// Returns `SnowSimError::InvalidTerrain` if an extent or the resolution
    /// is not finite and positive.
    pub fn valley_between_hills(
        width: f32,
        height: f32,
        resolution: f32,
        base_elevation: f32,
        hill_height: f32,
    ) -> SnowSimResult<Self> {
        let hill1_x = width * 0.25;
        let hill2_x = width * 0.75;
        let center_y = height / 2.0;
        let radius_sq = (width * 0.2).powi(2);
        let valley_depth = hill_height * 0.1;

        Self::sampled(width, height, resolution, |x, y| {
            let dy_sq = (y - center_y).powi(2);
            let hill1 = hill_height * (-((x - hill1_x).powi(2) + dy_sq) / radius_sq).exp();
            let hill2 = hill_height * (-((x - hill2_x).powi(2) + dy_sq) / radius_sq).exp();

            let valley_x = (x - width / 2.0) / (width * 0.25);
            let valley = -valley_depth * (-(valley_x * valley_x)).exp();

            base_elevation + hill1 + hill2 + valley
        })
    }

    /// Create terrain from a heightmap array
    ///
    /// # Arguments
    /// * `width` - Width of terrain in meters
    /// * `height` - Height of terrain in meters
    /// * `heightmap` - 2D heightmap as 1D array in row-major order [y * nx + x]
    /// * `nx` - Number of samples in X direction (at least 2)
    /// * `ny` - Number of samples in Y direction (at least 2)
    /// * `elevation_scale` - Multiplier for heightmap values
    /// * `base_elevation` - Base elevation to add to all heights
    ///
    /// # Errors
    ///
    /// Returns `SnowSimError::DimensionMismatch` if `heightmap` does not hold
    /// `nx * ny` samples, either axis has fewer than two or the grid exceeds
    /// `MAX_TERRAIN_SAMPLES`, and
    /// `SnowSimError::InvalidTerrain` for a non-positive extent.
    pub fn from_heightmap(
        width: f32,
        height: f32,
        heightmap: &[f32],
        nx: usize,
        ny: usize,
        elevation_scale: f32,
        base_elevation: f32,
    ) -> SnowSimResult<Self> {
        let expected = grid_samples(nx, ny)?;
        if heightmap.len() != expected {
            return Err(SnowSimError::DimensionMismatch {
                what: "heightmap",
                expected,
                actual: heightmap.len(),
            });
        }
        if nx < 2 || ny < 2 {
            return Err(SnowSimError::DimensionMismatch {
                what: "heightmap axis",
                expected: 2,
                actual: nx.min(ny),
            });
        }

        let width = positive("width", width)?;
        let height = positive("height", height)?;
        let resolution = width / (nx - 1) as f32;

        let elevations = heightmap
            .iter()
            .map(|&h| base_elevation + h * elevation_scale)
            .collect();

        Ok(Self::from_samples(
            width, height, resolution, nx, ny, elevations,
        ))
    }

    /// Elevation of the sample at grid index, clamped to the edge
    #[inline]
    pub fn elevation_at_grid(&self, ix: usize, iy: usize) -> f32 {
        let ix = ix.min(self.nx - 1);
        let iy = iy.min(self.ny - 1);
        self.elevations[iy * self.nx + ix]
    }

    /// Neighbour sample at signed offset, clamped to the edge.
    #[inline]
    fn neighbour(&self, ix: usize, iy: usize, dx: isize, dy: isize) -> f32 {
        let x = ix.saturating_add_signed(dx);
        let y = iy.saturating_add_signed(dy);
        self.elevation_at_grid(x, y)
    }

    /// Surface gradient `(dz/dx, dz/dy)` at a sample using Horn's method
    ///
    /// Horn's method uses a 3x3 neighborhood kernel that weighs diagonal
    /// neighbors less. Edge samples reuse the nearest interior value, which
    /// reads as a flat border.
    ///
    /// # Scientific Reference
    /// Horn, B.K.P. (1981). "Hill Shading and the Reflectance Map."
    /// Proceedings of the IEEE, 69(1), 14-47.
    pub fn gradient_at_grid(&self, ix: usize, iy: usize) -> (f32, f32) {
        // z[0] z[1] z[2]   (NW) (N) (NE)
        // z[3] z[4] z[5]   (W)  (C) (E)
        // z[6] z[7] z[8]   (SW) (S) (SE)
        let z = [
            self.neighbour(ix, iy, -1, 1),
            self.neighbour(ix, iy, 0, 1),
            self.neighbour(ix, iy, 1, 1),
            self.neighbour(ix, iy, -1, 0),
            self.neighbour(ix, iy, 0, 0),
            self.neighbour(ix, iy, 1, 0),
            self.neighbour(ix, iy, -1, -1),
            self.neighbour(ix, iy, 0, -1),
            self.neighbour(ix, iy, 1, -1),
        ];

        let d = self.resolution;
        let dz_dx = ((z[2] + 2.0 * z[5] + z[8]) - (z[0] + 2.0 * z[3] + z[6])) / (8.0 * d);
        let dz_dy = ((z[0] + 2.0 * z[1] + z[2]) - (z[6] + 2.0 * z[7] + z[8])) / (8.0 * d);
        (dz_dx, dz_dy)
    }

    /// Slope angle at a sample in radians (0 = flat)
    pub fn inclination_at_grid(&self, ix: usize, iy: usize) -> f32 {
        let (dz_dx, dz_dy) = self.gradient_at_grid(ix, iy);
        dz_dx.hypot(dz_dy).atan()
    }

    /// Aspect at a sample in radians, clockwise from north in [0, 2π)
    ///
    /// Direction of steepest descent. Flat samples report 0 (north).
    pub fn aspect_at_grid(&self, ix: usize, iy: usize) -> f32 {
        let (dz_dx, dz_dy) = self.gradient_at_grid(ix, iy);
        if dz_dx == 0.0 && dz_dy == 0.0 {
            return 0.0;
        }
        (-dz_dx).atan2(-dz_dy).rem_euclid(std::f32::consts::TAU)
    }

    /// Five-point Laplacian `∇²z` at a sample (1/m)
    pub fn laplacian_at_grid(&self, ix: usize, iy: usize) -> f32 {
        let center = self.neighbour(ix, iy, 0, 0);
        let sum = self.neighbour(ix, iy, 1, 0)
            + self.neighbour(ix, iy, -1, 0)
            + self.neighbour(ix, iy, 0, 1)
            + self.neighbour(ix, iy, 0, -1);
        (sum - 4.0 * center) / (self.resolution * self.resolution)
    }

    /// Get terrain width in meters
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Get terrain height in meters
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Samples per row
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of rows
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Get minimum elevation in meters
    pub fn min_elevation(&self) -> f32 {
        self.min_elevation
    }

    /// Get maximum elevation in meters
    pub fn max_elevation(&self) -> f32 {
        self.max_elevation
    }

    /// Get terrain resolution in meters
    pub fn resolution(&self) -> f32 {
        self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_flat_terrain() {
        let terrain = TerrainData::flat(100.0, 100.0, 5.0, 50.0).unwrap();

        assert_eq!(terrain.nx(), 21);
        assert_eq!(terrain.ny(), 21);
        assert_eq!(terrain.elevation_at_grid(5, 5), 50.0);
        assert_eq!(terrain.inclination_at_grid(10, 10), 0.0);
        assert_eq!(terrain.aspect_at_grid(10, 10), 0.0);
        assert_eq!(terrain.laplacian_at_grid(0, 0), 0.0);
    }

    #[test]
    fn test_rejects_bad_resolution() {
        assert!(matches!(
            TerrainData::flat(100.0, 100.0, 0.0, 0.0),
            Err(SnowSimError::InvalidTerrain {
                name: "resolution",
                ..
            })
        ));
        assert!(TerrainData::flat(f32::NAN, 100.0, 5.0, 0.0).is_err());
    }

    #[test]
    fn test_rejects_oversized_grids() {
        assert!(matches!(
            TerrainData::flat(1e30, 10.0, 1.0, 0.0),
            Err(SnowSimError::InvalidTerrain { name: "width", .. })
        ));
        assert!(matches!(
            TerrainData::flat(10.0, 10.0, 1e-30, 0.0),
            Err(SnowSimError::InvalidTerrain { name: "width", .. })
        ));
        // Each axis fits but the product does not
        assert!(matches!(
            TerrainData::flat(1e6, 1e6, 1.0, 0.0),
            Err(SnowSimError::DimensionMismatch {
                what: "terrain samples",
                ..
            })
        ));
        assert!(matches!(
            TerrainData::from_heightmap(10.0, 10.0, &[0.0; 4], usize::MAX, 2, 1.0, 0.0),
            Err(SnowSimError::DimensionMismatch {
                what: "terrain samples",
                ..
            })
        ));
    }

    #[test]
    fn test_single_hill() {
        let terrain = TerrainData::single_hill(200.0, 200.0, 5.0, 50.0, 100.0, 50.0).unwrap();

        // Peak at the centre sample
        assert_relative_eq!(terrain.elevation_at_grid(20, 20), 150.0);
        assert_relative_eq!(terrain.max_elevation(), 150.0);
        assert!(terrain.elevation_at_grid(2, 2) < 60.0);

        assert_relative_eq!(terrain.inclination_at_grid(20, 20), 0.0, epsilon = 1e-6);
        assert!(terrain.inclination_at_grid(20, 26).to_degrees() > 5.0);

        // Summit is convex
        assert!(terrain.laplacian_at_grid(20, 20) < 0.0);
    }

    #[test]
    fn test_hill_aspects_face_away_from_summit() {
        let terrain = TerrainData::single_hill(200.0, 200.0, 5.0, 0.0, 100.0, 50.0).unwrap();

        // North of the summit the ground falls away to the north
        let north = terrain.aspect_at_grid(20, 28);
        assert!(north < 0.01 || north > 2.0 * PI - 0.01, "north aspect {north}");

        assert_relative_eq!(terrain.aspect_at_grid(28, 20), FRAC_PI_2, epsilon = 0.01);
        assert_relative_eq!(terrain.aspect_at_grid(20, 12), PI, epsilon = 0.01);
        assert_relative_eq!(terrain.aspect_at_grid(12, 20), 3.0 * FRAC_PI_2, epsilon = 0.01);
    }

    #[test]
    fn test_valley() {
        let terrain = TerrainData::valley_between_hills(400.0, 200.0, 5.0, 50.0, 80.0).unwrap();

        let hill1 = terrain.elevation_at_grid(20, 20);
        let hill2 = terrain.elevation_at_grid(60, 20);
        let valley = terrain.elevation_at_grid(40, 20);
        assert!(hill1 > 80.0);
        assert!(hill2 > 80.0);
        assert!(valley < hill1);
        assert!(valley < hill2);
    }

    #[test]
    fn test_from_heightmap() {
        // Single pit in the middle of a 3x3 heightmap
        let heightmap = [1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let terrain = TerrainData::from_heightmap(100.0, 100.0, &heightmap, 3, 3, 50.0, 10.0)
            .unwrap();

        assert_eq!(terrain.resolution(), 50.0);
        assert_eq!(terrain.min_elevation(), 10.0);
        assert_eq!(terrain.max_elevation(), 60.0);
        assert_eq!(terrain.elevation_at_grid(1, 1), 10.0);

        // (4 * 60 - 4 * 10) / 50² = 0.08
        assert_relative_eq!(terrain.laplacian_at_grid(1, 1), 0.08);
    }

    #[test]
    fn test_from_heightmap_size_mismatch() {
        let result = TerrainData::from_heightmap(10.0, 10.0, &[0.0; 5], 3, 2, 1.0, 0.0);
        assert!(matches!(
            result,
            Err(SnowSimError::DimensionMismatch {
                what: "heightmap",
                expected: 6,
                actual: 5
            })
        ));
        assert!(TerrainData::from_heightmap(10.0, 10.0, &[0.0; 3], 3, 1, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_planar_ramp_gradient() {
        // Rises 1 m per 10 m to the east
        let ramp: Vec<f32> = (0..5)
            .flat_map(|_| (0..5).map(|ix| ix as f32))
            .collect();
        let terrain = TerrainData::from_heightmap(40.0, 40.0, &ramp, 5, 5, 1.0, 0.0).unwrap();

        let (dz_dx, dz_dy) = terrain.gradient_at_grid(2, 2);
        assert_relative_eq!(dz_dx, 0.1);
        assert_relative_eq!(dz_dy, 0.0);
        assert_relative_eq!(terrain.inclination_at_grid(2, 2), 0.1_f32.atan());
        // Downhill is west
        assert_relative_eq!(terrain.aspect_at_grid(2, 2), 3.0 * FRAC_PI_2, epsilon = 1e-5);
        assert_relative_eq!(terrain.laplacian_at_grid(2, 2), 0.0);
    }
}
