//! Core types and utilities

pub mod cell;
pub mod constants;
pub mod units;
pub mod vec3;
pub mod weather;

pub use cell::{SimulationCell, ALBEDO_FLOOR, ALBEDO_FRESH_SNOW};
pub use constants::SimulationConstants;
pub use units::*;
pub use vec3::Vec3;
pub use weather::{WeatherSample, WeatherSeries};
