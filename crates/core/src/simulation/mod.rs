//! Simulation orchestration
//!
//! `SnowSimulation` drives the grid solver batch by batch over a weather
//! series and keeps the simulation clock.

mod snow_simulation;

pub use snow_simulation::{BatchReport, SnowSimulation};
