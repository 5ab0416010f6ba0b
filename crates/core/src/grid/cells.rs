//! Conversion of a terrain grid into simulation cells.

use crate::core_types::cell::SimulationCell;
use crate::core_types::units::Radians;
use crate::core_types::vec3::Vec3;
use crate::grid::terrain::TerrainData;
use rayon::prelude::*;
use tracing::debug;

/// Curvature is the Laplacian scaled by `resolution / CURVATURE_NORMALIZATION`
const CURVATURE_NORMALIZATION: f32 = 8.0;

/// Unit upward surface normal for an elevation gradient.
#[inline]
pub fn surface_normal(dz_dx: f32, dz_dy: f32) -> Vec3 {
    Vec3::new(-dz_dx, -dz_dy, 1.0).normalize()
}

/// Build one snow-free cell per elevation sample, row-major.
///
/// Rows run south to north: row 0 sits at `origin_latitude` and the last row
/// at `origin_latitude + latitude_span`, with linear interpolation between.
///
/// Per cell:
/// - inclination and aspect from the Horn gradient
/// - `area_xy = resolution²`, `area = area_xy / cos(inclination)`
/// - curvature `∇²z · resolution / 8`, positive in hollows
pub fn build_cells(
    terrain: &TerrainData,
    origin_latitude: Radians,
    latitude_span: Radians,
) -> Vec<SimulationCell> {
    let nx = terrain.nx();
    let ny = terrain.ny();
    let resolution = terrain.resolution();
    let area_xy = resolution * resolution;
    let row_step = if ny > 1 {
        *latitude_span / (ny - 1) as f32
    } else {
        0.0
    };

    let cells: Vec<SimulationCell> = (0..nx * ny)
        .into_par_iter()
        .map(|i| {
            let (ix, iy) = (i % nx, i / nx);
            let (dz_dx, dz_dy) = terrain.gradient_at_grid(ix, iy);
            let normal = surface_normal(dz_dx, dz_dy);

            SimulationCell::from_terrain(
                terrain.aspect_at_grid(ix, iy),
                terrain.inclination_at_grid(ix, iy),
                *origin_latitude + row_step * iy as f32,
                terrain.elevation_at_grid(ix, iy),
                area_xy / normal.z,
                area_xy,
                terrain.laplacian_at_grid(ix, iy) * resolution / CURVATURE_NORMALIZATION,
            )
        })
        .collect();

    debug!(
        "Built {} cells ({}x{}) at {:.1} m resolution",
        cells.len(),
        nx,
        ny,
        resolution
    );

    cells
}
