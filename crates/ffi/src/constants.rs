//! FFI mirrors of the simulation constants and the per-batch report.

use crate::error::DefaultFfiError;
use snow_sim_core::{BatchReport, Celsius, Hours, Meters, SimulationConstants, SnowSimError};

/// Host temperature threshold, rejected as an invalid constant when it is not
/// a finite value above absolute zero.
fn threshold(name: &'static str, value: f32) -> Result<Celsius, DefaultFfiError> {
    Celsius::try_new(value).ok_or_else(|| {
        SnowSimError::InvalidConstant {
            name,
            reason: format!("must be finite and at least -273.15 °C, got {value}"),
        }
        .into()
    })
}

/// Model constants supplied by the host, all temperatures in °C.
///
/// The grid width, timestep offset and batch length are owned by the
/// simulation and cannot be set from here.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowSimConstants {
    /// Altitude of the weather station in meters.
    pub measurement_altitude: f32,
    /// Below this all precipitation falls as snow.
    pub t_snow_a: f32,
    /// Above this all precipitation falls as rain.
    pub t_snow_b: f32,
    /// Melt onset temperature.
    pub t_melt_a: f32,
    /// Quadratic to linear melt transition.
    pub t_melt_b: f32,
    /// Melt-rate coefficient.
    pub k_m: f32,
    /// Albedo decay per day since last snowfall.
    pub k_e: f32,
    /// Canopy density in [0, 1].
    pub vegetation_density: f32,
    /// Day of year (1-366) of the next timestep.
    pub day_of_year: u16,
    /// Local hour (0-24) of the next timestep.
    pub hour_of_day: f32,
}

impl SnowSimConstants {
    /// Overlay the host values onto `current`, keeping the simulation-owned fields.
    ///
    /// Temperatures are checked here; everything else is left to
    /// `SimulationConstants::validate`.
    pub(crate) fn apply_to(
        &self,
        current: &SimulationConstants,
    ) -> Result<SimulationConstants, DefaultFfiError> {
        Ok(SimulationConstants {
            measurement_altitude: Meters::new(self.measurement_altitude),
            t_snow_a: threshold("t_snow_a", self.t_snow_a)?,
            t_snow_b: threshold("t_snow_b", self.t_snow_b)?,
            t_melt_a: threshold("t_melt_a", self.t_melt_a)?,
            t_melt_b: threshold("t_melt_b", self.t_melt_b)?,
            k_m: self.k_m,
            k_e: self.k_e,
            vegetation_density: self.vegetation_density,
            day_of_year: self.day_of_year,
            hour_of_day: Hours::new(self.hour_of_day),
            ..*current
        })
    }
}

impl From<&SimulationConstants> for SnowSimConstants {
    fn from(constants: &SimulationConstants) -> Self {
        Self {
            measurement_altitude: *constants.measurement_altitude,
            t_snow_a: *constants.t_snow_a,
            t_snow_b: *constants.t_snow_b,
            t_melt_a: *constants.t_melt_a,
            t_melt_b: *constants.t_melt_b,
            k_m: constants.k_m,
            k_e: constants.k_e,
            vegetation_density: constants.vegetation_density,
            day_of_year: constants.day_of_year,
            hour_of_day: *constants.hour_of_day,
        }
    }
}

/// Summary of one batch, filled by `snow_sim_run_batch`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnowSimBatchReport {
    /// Timesteps actually simulated (may be fewer than requested at the end of the weather).
    pub timesteps: usize,
    /// Deepest snow in the grid after the batch, as liters of water per horizontal m² (mm).
    pub max_depth: f32,
    /// Snow water equivalent summed over all cells, in liters.
    pub total_swe_liters: f32,
    /// Cells holding any snow.
    pub snow_covered_cells: usize,
    /// Wall time of the batch in milliseconds.
    pub elapsed_ms: f64,
}

impl From<&BatchReport> for SnowSimBatchReport {
    fn from(report: &BatchReport) -> Self {
        Self {
            timesteps: report.timesteps,
            max_depth: report.max_depth,
            total_swe_liters: report.total_swe_liters,
            snow_covered_cells: report.snow_covered_cells,
            elapsed_ms: report.elapsed_ms,
        }
    }
}
