//! Terrain grid and cell construction

pub mod cells;
pub mod terrain;

// Re-export main types
pub use cells::{build_cells, surface_normal};
pub use terrain::{TerrainData, MAX_TERRAIN_SAMPLES};
