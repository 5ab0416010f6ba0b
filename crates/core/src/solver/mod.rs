//! Grid solver for the snow-cover kernel
//!
//! Runs the per-cell physics over the whole grid on the rayon thread pool,
//! applies terrain redistribution and produces the depth field together with
//! its order-independent global maximum.
//!
//! # Example
//!
//! ```rust
//! use snow_sim_core::core_types::{Celsius, SimulationCell, SimulationConstants, WeatherSample};
//! use snow_sim_core::solver::{run_batch, GlobalMaxAccumulator, OutputField};
//!
//! let mut cells = vec![SimulationCell::flat(0.8, 0.0, 1.0); 4];
//! let mut output = OutputField::new(2, 2);
//! let weather = vec![WeatherSample::new(Celsius::new(-5.0), 1.0); 24];
//! let constants = SimulationConstants { grid_width: 2, ..SimulationConstants::default() };
//! let max = GlobalMaxAccumulator::new();
//!
//! run_batch(&mut cells, &weather, &constants, &mut output, &max).unwrap();
//! assert!(max.get() > 0.0);
//! ```

mod fields;
mod grid_driver;
pub mod profiler;
mod reduction;

// Re-exports
pub use fields::{FieldData, OutputField};
pub use grid_driver::{
    finalize_cell, redistributed_swe, run_batch, slope_flattening, CURVATURE_GAIN,
    REDISTRIBUTION_FULL_SLOPE_DEG, REDISTRIBUTION_MIN_SLOPE_DEG,
};
pub use profiler::ProfilerScope;
pub use reduction::GlobalMaxAccumulator;
