//! Batch orchestration for the snow-cover grid
//!
//! `SnowSimulation` owns the cell arena, the depth field and the weather
//! series, and advances the simulation clock one batch of hourly timesteps at
//! a time. Each batch is a single parallel pass over the grid.

use crate::core_types::cell::SimulationCell;
use crate::core_types::constants::SimulationConstants;
use crate::core_types::units::{Hours, Radians};
use crate::core_types::weather::{WeatherSample, WeatherSeries};
use crate::error::{SnowSimError, SnowSimResult};
use crate::grid::{build_cells, TerrainData};
use crate::solver::{run_batch, GlobalMaxAccumulator, OutputField, ProfilerScope};
use tracing::{debug, info, warn};

/// Summary of one completed batch
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatchReport {
    /// Hourly timesteps actually simulated
    pub timesteps: usize,
    /// Largest normalised depth on the grid after the batch
    pub max_depth: f32,
    /// Snow water equivalent summed over every cell (liters)
    pub total_swe_liters: f32,
    /// Cells holding any snow
    pub snow_covered_cells: usize,
    /// Wall time of the batch in milliseconds
    pub elapsed_ms: f64,
}

/// Snow-cover simulation over a terrain grid
///
/// Runs the per-cell accumulation/melt kernel, terrain redistribution and the
/// global maximum reduction for each batch, then advances the absolute
/// timestep offset together with the day-of-year and hour-of-day.
pub struct SnowSimulation {
    /// Cell arena in row-major order
    cells: Vec<SimulationCell>,

    /// Normalised depth written by the last batch
    output: OutputField,

    /// Hourly forcing indexed by absolute timestep
    weather: WeatherSeries,

    /// Constants for the next batch; clock fields advance after every batch
    constants: SimulationConstants,

    /// Grid-wide maximum of the last batch
    max_depth: GlobalMaxAccumulator,

    /// Statistics
    batches_run: usize,
    simulated_hours: usize,
}

impl SnowSimulation {
    /// Create a simulation over an existing cell arena
    ///
    /// `constants.grid_width` is overwritten with `width`.
    ///
    /// # Errors
    ///
    /// Returns `SnowSimError::DimensionMismatch` if the arena is empty or not a
    /// whole number of rows of `width` cells, or the validation error of the
    /// constants.
    pub fn new(
        cells: Vec<SimulationCell>,
        width: usize,
        weather: WeatherSeries,
        constants: SimulationConstants,
    ) -> SnowSimResult<Self> {
        let height = cells.len() / width.max(1);
        if width == 0 || height == 0 || height * width != cells.len() {
            return Err(SnowSimError::DimensionMismatch {
                what: "cell arena",
                expected: (height + 1) * width.max(1),
                actual: cells.len(),
            });
        }

        let constants = SimulationConstants {
            grid_width: width,
            ..constants
        };
        constants.validate()?;

        info!(
            "Snow simulation initialized: {}x{} grid, {} weather samples, day {} hour {:.1}",
            width,
            height,
            weather.len(),
            constants.day_of_year,
            *constants.hour_of_day
        );

        Ok(Self {
            cells,
            output: OutputField::new(width, height),
            weather,
            constants,
            max_depth: GlobalMaxAccumulator::new(),
            batches_run: 0,
            simulated_hours: 0,
        })
    }

    /// Create a simulation with one cell per terrain sample
    ///
    /// See [`build_cells`] for how latitude is laid out across rows.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the constants.
    pub fn from_terrain(
        terrain: &TerrainData,
        origin_latitude: Radians,
        latitude_span: Radians,
        weather: WeatherSeries,
        constants: SimulationConstants,
    ) -> SnowSimResult<Self> {
        let cells = build_cells(terrain, origin_latitude, latitude_span);
        Self::new(cells, terrain.nx(), weather, constants)
    }

    /// Simulate the next `batch_len` hourly timesteps
    ///
    /// A batch that would run past the end of the weather series is shortened
    /// to the samples that remain.
    ///
    /// # Errors
    ///
    /// Returns `SnowSimError::InvalidConstant` for a zero `batch_len` and
    /// `SnowSimError::WeatherWindow` once the series is exhausted. The grid is
    /// left untouched in both cases.
    pub fn run_batch(&mut self, batch_len: usize) -> SnowSimResult<BatchReport> {
        let offset = self.constants.timestep_offset;
        let remaining = self.weather.remaining(offset);

        if remaining == 0 {
            return Err(SnowSimError::WeatherWindow {
                offset,
                len: batch_len,
                available: self.weather.len(),
            });
        }

        let timesteps = if batch_len > remaining {
            warn!(
                "Batch of {} steps exceeds remaining weather, running {} steps",
                batch_len, remaining
            );
            remaining
        } else {
            batch_len
        };

        let constants = SimulationConstants {
            batch_len: timesteps,
            ..self.constants
        };
        constants.validate()?;

        let window = self.weather.window(offset, timesteps)?;
        let scope = ProfilerScope::new("snow batch");

        self.max_depth.reset();
        run_batch(
            &mut self.cells,
            window,
            &constants,
            &mut self.output,
            &self.max_depth,
        )?;

        let (day_of_year, hour_of_day) = constants.clock_at(timesteps);
        self.constants = SimulationConstants {
            day_of_year,
            hour_of_day: Hours::new(hour_of_day),
            timestep_offset: offset + timesteps,
            batch_len: timesteps,
            ..constants
        };
        self.batches_run += 1;
        self.simulated_hours += timesteps;

        let report = BatchReport {
            timesteps,
            max_depth: self.max_depth.get(),
            total_swe_liters: self.total_swe(),
            snow_covered_cells: self.snow_covered_cells(),
            elapsed_ms: scope.elapsed_ms(),
        };

        debug!(
            "Batch {} done: offset {} -> {}, clock day {} hour {:.1}",
            self.batches_run, offset, self.constants.timestep_offset, day_of_year, hour_of_day
        );
        info!(
            "Batch of {} steps: max depth {:.4}, {} snow-covered cells, total SWE {:.1} l in {:.2}ms",
            report.timesteps,
            report.max_depth,
            report.snow_covered_cells,
            report.total_swe_liters,
            report.elapsed_ms
        );

        Ok(report)
    }

    /// Replace the constants used by subsequent batches
    ///
    /// The clock fields and `timestep_offset` are taken as given, so a host can
    /// seek within the weather series. The grid width always follows the arena.
    ///
    /// # Errors
    ///
    /// Returns the validation error and keeps the previous constants.
    pub fn set_constants(&mut self, constants: SimulationConstants) -> SnowSimResult<()> {
        let constants = SimulationConstants {
            grid_width: self.output.width,
            ..constants
        };
        constants.validate()?;
        self.constants = constants;
        Ok(())
    }

    /// Replace the weather series and rewind to its first sample
    pub fn set_weather(&mut self, weather: WeatherSeries) {
        info!("Weather series replaced: {} samples", weather.len());
        self.weather = weather;
        self.constants.timestep_offset = 0;
    }

    /// Append samples to the end of the weather series without rewinding
    ///
    /// Lets a host stream forcing in ahead of the batches that consume it.
    pub fn append_weather(&mut self, samples: impl IntoIterator<Item = WeatherSample>) {
        let before = self.weather.len();
        self.weather.extend(samples);
        debug!(
            "Weather series extended: {} -> {} samples",
            before,
            self.weather.len()
        );
    }

    /// Cell arena in row-major order
    pub fn cells(&self) -> &[SimulationCell] {
        &self.cells
    }

    /// Depth field written by the last batch
    pub fn output(&self) -> &OutputField {
        &self.output
    }

    /// Depth field scaled to [0, 1] by the last batch maximum
    pub fn normalized_output(&self) -> Vec<f32> {
        self.output.normalized(self.max_depth())
    }

    /// Largest depth of the last batch
    pub fn max_depth(&self) -> f32 {
        self.max_depth.get()
    }

    /// Constants for the next batch
    pub fn constants(&self) -> &SimulationConstants {
        &self.constants
    }

    /// Weather series
    pub fn weather(&self) -> &WeatherSeries {
        &self.weather
    }

    /// Absolute index of the next weather sample
    pub fn timestep_offset(&self) -> usize {
        self.constants.timestep_offset
    }

    /// Hourly samples left in the series
    pub fn remaining_timesteps(&self) -> usize {
        self.weather.remaining(self.constants.timestep_offset)
    }

    /// Get grid dimensions (width, height) in cells
    pub fn grid_dimensions(&self) -> (usize, usize) {
        (self.output.width, self.output.height)
    }

    /// Number of batches completed
    pub fn batches_run(&self) -> usize {
        self.batches_run
    }

    /// Hours simulated so far
    pub fn simulated_hours(&self) -> usize {
        self.simulated_hours
    }

    /// Snow water equivalent over the whole grid (liters)
    pub fn total_swe(&self) -> f32 {
        self.cells.iter().map(|c| c.snow_water_equivalent).sum()
    }

    /// Cells holding any snow
    pub fn snow_covered_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.has_snow()).count()
    }
}
