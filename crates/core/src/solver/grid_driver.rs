//! Parallel grid pass: per-cell snow update, terrain redistribution and
//! global-maximum reduction.
//!
//! One rayon task per cell. A task reads only its own cell, the shared
//! weather window and the constants, writes only its own cell and output
//! slot, and touches shared state solely through the atomic max.

use super::fields::OutputField;
use super::profiler::ProfilerScope;
use super::reduction::GlobalMaxAccumulator;
use crate::core_types::cell::SimulationCell;
use crate::core_types::constants::SimulationConstants;
use crate::core_types::weather::WeatherSample;
use crate::error::{SnowSimError, SnowSimResult};
use crate::physics::update_cell;
use rayon::prelude::*;
use tracing::debug;

/// Slopes gentler than this keep all their snow (degrees)
pub const REDISTRIBUTION_MIN_SLOPE_DEG: f32 = 15.0;

/// Slope at which all snow slides off (degrees)
pub const REDISTRIBUTION_FULL_SLOPE_DEG: f32 = 60.0;

/// Gain of the curvature term: concave hollows trap snow, ridges shed it
pub const CURVATURE_GAIN: f32 = 50.0;

/// Fraction of the snowpack moved downslope on a slope of `slope_deg` degrees.
#[inline]
pub fn slope_flattening(slope_deg: f32) -> f32 {
    if slope_deg < REDISTRIBUTION_MIN_SLOPE_DEG {
        0.0
    } else {
        slope_deg / REDISTRIBUTION_FULL_SLOPE_DEG
    }
}

/// SWE left on the cell after slope and curvature redistribution, ≥ 0.
#[inline]
pub fn redistributed_swe(cell: &SimulationCell) -> f32 {
    let f = slope_flattening(cell.slope_degrees());
    (cell.snow_water_equivalent * (1.0 - f) * (1.0 + CURVATURE_GAIN * cell.curvature)).max(0.0)
}

/// Apply terrain redistribution to an updated cell and publish its depth.
///
/// Stores the redistributed SWE on the cell, writes the depth (SWE per
/// horizontal m²) to the cell's output slot and folds it into `max`.
#[inline]
pub fn finalize_cell(cell: &mut SimulationCell, slot: &mut f32, max: &GlobalMaxAccumulator) {
    cell.interpolated_swe = redistributed_swe(cell);
    let depth = cell.depth();
    *slot = depth;
    max.combine(depth);
}

/// Run one batch over every cell of the grid in parallel.
///
/// `weather` is the batch window already selected from the series. The
/// caller is expected to have validated `constants` and reset `max`.
///
/// # Errors
///
/// Returns `SnowSimError::DimensionMismatch` if the output field does not
/// have one slot per cell, or if the weather window is shorter than
/// `constants.batch_len`.
pub fn run_batch(
    cells: &mut [SimulationCell],
    weather: &[WeatherSample],
    constants: &SimulationConstants,
    output: &mut OutputField,
    max: &GlobalMaxAccumulator,
) -> SnowSimResult<()> {
    if output.len() != cells.len() {
        return Err(SnowSimError::DimensionMismatch {
            what: "output field",
            expected: cells.len(),
            actual: output.len(),
        });
    }
    if weather.len() < constants.batch_len {
        return Err(SnowSimError::DimensionMismatch {
            what: "weather window",
            expected: constants.batch_len,
            actual: weather.len(),
        });
    }

    let window = &weather[..constants.batch_len];
    let scope = ProfilerScope::new("grid batch");

    cells
        .par_iter_mut()
        .zip(output.as_mut_slice().par_iter_mut())
        .for_each(|(cell, slot)| {
            update_cell(cell, window, constants);
            finalize_cell(cell, slot, max);
        });

    debug!(
        "Grid batch: {} cells x {} steps in {:.2}ms, max depth {:.4}",
        cells.len(),
        window.len(),
        scope.elapsed_ms(),
        max.get()
    );

    Ok(())
}
