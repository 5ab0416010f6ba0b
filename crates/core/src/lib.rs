//! Snow Simulation Core Library
//!
//! Terrain-aware snow cover simulation for landscape rendering. Every grid
//! cell accumulates snow from lapse-corrected precipitation, loses it to
//! temperature-index melt scaled by potential solar radiation on its slope
//! (Swift 1976), and finally has its pack redistributed by slope and
//! curvature.
//!
//! ## Pipeline
//!
//! - `grid`: elevation grid and per-cell terrain attributes
//! - `physics`: radiation index and the per-cell accumulation/melt kernel
//! - `solver`: parallel grid pass, depth field and global maximum
//! - `simulation`: batch orchestration and the simulation clock
//!
//! ## Example
//!
//! ```rust
//! use snow_sim_core::{
//!     Celsius, Radians, SimulationConstants, SnowSimulation, TerrainData, WeatherSample,
//!     WeatherSeries,
//! };
//!
//! let terrain = TerrainData::single_hill(500.0, 500.0, 25.0, 1200.0, 400.0, 150.0)?;
//! let weather = WeatherSeries::constant(WeatherSample::new(Celsius::new(-3.0), 0.5), 48);
//! let mut sim = SnowSimulation::from_terrain(
//!     &terrain,
//!     Radians::new(47_f32.to_radians()),
//!     Radians::new(0.0),
//!     weather,
//!     SimulationConstants::default(),
//! )?;
//!
//! let report = sim.run_batch(24)?;
//! assert!(report.max_depth > 0.0);
//! # Ok::<(), snow_sim_core::SnowSimError>(())
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Terrain, physics and the grid solver
pub mod grid;
pub mod physics;
pub mod simulation;
pub mod solver;

// Re-export core types
pub use core_types::{
    Celsius, Degrees, Hours, Meters, Radians, SimulationCell, SimulationConstants, WeatherSample,
    WeatherSeries,
};
pub use error::{SnowSimError, SnowSimResult};

// Re-export simulation types
pub use grid::{build_cells, TerrainData};
pub use physics::{compute_radiation_index, update_cell, RadiationBounds, RadiationIndex};
pub use simulation::{BatchReport, SnowSimulation};
pub use solver::{FieldData, GlobalMaxAccumulator, OutputField};
