//! Process-wide simulation constants.
//!
//! One `SimulationConstants` value is built per batch by the orchestrator,
//! validated, then shared read-only by every cell task for the duration of
//! the batch.

use super::units::{Celsius, Hours, Meters};
use crate::error::{SnowSimError, SnowSimResult};
use serde::{Deserialize, Serialize};

/// Immutable configuration for one batch of snow cover updates.
///
/// Temperature thresholds:
/// - `t_snow_a` / `t_snow_b`: below `a` all precipitation is snow, above `b` all
///   of it is rain, linear ramp in between
/// - `t_melt_a` / `t_melt_b`: melt starts above `a`, grows quadratically up to `b`
///   and linearly beyond
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConstants {
    /// Altitude of the weather station the samples were measured at
    pub measurement_altitude: Meters,
    /// Lower snow/rain threshold
    pub t_snow_a: Celsius,
    /// Upper snow/rain threshold
    pub t_snow_b: Celsius,
    /// Melt onset threshold
    pub t_melt_a: Celsius,
    /// Quadratic to linear melt transition
    pub t_melt_b: Celsius,
    /// Melt-rate coefficient `k_m`
    pub k_m: f32,
    /// Albedo decay coefficient `k_e` (per day since last snowfall)
    pub k_e: f32,
    /// Canopy density in [0, 1]. Only 0 (open terrain) is calibrated.
    pub vegetation_density: f32,
    /// Grid width in cells
    pub grid_width: usize,
    /// Day of year (1-366) at the first timestep of the batch
    pub day_of_year: u16,
    /// Local hour (0-24) at the first timestep of the batch
    pub hour_of_day: Hours,
    /// Absolute index of the first weather sample of the batch
    pub timestep_offset: usize,
    /// Number of hourly timesteps in the batch
    pub batch_len: usize,
}

impl Default for SimulationConstants {
    fn default() -> Self {
        Self {
            measurement_altitude: Meters::new(0.0),
            t_snow_a: Celsius::new(0.0),
            t_snow_b: Celsius::new(2.0),
            t_melt_a: Celsius::new(-5.0),
            t_melt_b: Celsius::new(1.0),
            k_m: 4.0,
            k_e: 0.2,
            vegetation_density: 0.0,
            grid_width: 0,
            day_of_year: 1,
            hour_of_day: Hours::new(0.0),
            timestep_offset: 0,
            batch_len: 24,
        }
    }
}

impl SimulationConstants {
    /// Check every constant the kernel divides by or feeds into a transcendental.
    ///
    /// The kernel itself does not defend against these (equal melt thresholds
    /// would divide by zero), so this must pass before a batch is dispatched.
    ///
    /// # Errors
    ///
    /// Returns `SnowSimError::InvalidConstant` for non-finite or out-of-range
    /// values and `SnowSimError::InvertedThresholds` when a threshold pair is
    /// equal or reversed.
    pub fn validate(&self) -> SnowSimResult<()> {
        let finite = [
            ("measurement_altitude", *self.measurement_altitude),
            ("t_snow_a", *self.t_snow_a),
            ("t_snow_b", *self.t_snow_b),
            ("t_melt_a", *self.t_melt_a),
            ("t_melt_b", *self.t_melt_b),
            ("k_m", self.k_m),
            ("k_e", self.k_e),
            ("vegetation_density", self.vegetation_density),
            ("hour_of_day", *self.hour_of_day),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SnowSimError::InvalidConstant {
                    name,
                    reason: format!("must be finite, got {value}"),
                });
            }
        }

        if self.t_snow_a >= self.t_snow_b {
            return Err(SnowSimError::InvertedThresholds {
                lower: "t_snow_a",
                lower_value: *self.t_snow_a,
                upper: "t_snow_b",
                upper_value: *self.t_snow_b,
            });
        }
        if self.t_melt_a >= self.t_melt_b {
            return Err(SnowSimError::InvertedThresholds {
                lower: "t_melt_a",
                lower_value: *self.t_melt_a,
                upper: "t_melt_b",
                upper_value: *self.t_melt_b,
            });
        }

        if self.k_m < 0.0 {
            return Err(SnowSimError::InvalidConstant {
                name: "k_m",
                reason: format!("must be non-negative, got {}", self.k_m),
            });
        }
        if self.k_e < 0.0 {
            return Err(SnowSimError::InvalidConstant {
                name: "k_e",
                reason: format!("must be non-negative, got {}", self.k_e),
            });
        }
        if !(0.0..=1.0).contains(&self.vegetation_density) {
            return Err(SnowSimError::InvalidConstant {
                name: "vegetation_density",
                reason: format!("must lie in [0, 1], got {}", self.vegetation_density),
            });
        }
        if !(1..=366).contains(&self.day_of_year) {
            return Err(SnowSimError::InvalidConstant {
                name: "day_of_year",
                reason: format!("must lie in [1, 366], got {}", self.day_of_year),
            });
        }
        if !(0.0..24.0).contains(&*self.hour_of_day) {
            return Err(SnowSimError::InvalidConstant {
                name: "hour_of_day",
                reason: format!("must lie in [0, 24), got {}", *self.hour_of_day),
            });
        }
        if self.grid_width == 0 {
            return Err(SnowSimError::InvalidConstant {
                name: "grid_width",
                reason: "must be positive".to_string(),
            });
        }
        if self.batch_len == 0 {
            return Err(SnowSimError::InvalidConstant {
                name: "batch_len",
                reason: "must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Vegetation transmission factor `k_v = exp(-4 · density)`.
    #[inline]
    pub fn vegetation_factor(&self) -> f32 {
        (-4.0 * self.vegetation_density).exp()
    }

    /// Day of year and local hour at timestep `t` of the batch.
    ///
    /// The hour wraps at 24 and advances the day. A batch starting on day 366
    /// is in a leap year and wraps to 1 after it; otherwise day 365 wraps to 1.
    pub fn clock_at(&self, t: usize) -> (u16, f32) {
        let elapsed = *self.hour_of_day + t as f32;
        let days = (elapsed / 24.0).floor();
        let hour = elapsed - days * 24.0;
        let year_length = if self.day_of_year == 366 { 366 } else { 365 };
        let day = (u32::from(self.day_of_year) - 1 + days as u32) % year_length + 1;
        (day as u16, hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SimulationConstants {
        SimulationConstants {
            grid_width: 4,
            ..SimulationConstants::default()
        }
    }

    #[test]
    fn test_defaults_validate() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn test_equal_melt_thresholds_rejected() {
        let constants = SimulationConstants {
            t_melt_a: Celsius::new(1.0),
            t_melt_b: Celsius::new(1.0),
            ..valid()
        };
        assert!(matches!(
            constants.validate(),
            Err(SnowSimError::InvertedThresholds {
                lower: "t_melt_a",
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_snow_thresholds_rejected() {
        let constants = SimulationConstants {
            t_snow_a: Celsius::new(3.0),
            t_snow_b: Celsius::new(1.0),
            ..valid()
        };
        assert!(matches!(
            constants.validate(),
            Err(SnowSimError::InvertedThresholds {
                lower: "t_snow_a",
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let constants = SimulationConstants {
            k_m: f32::NAN,
            ..valid()
        };
        assert!(matches!(
            constants.validate(),
            Err(SnowSimError::InvalidConstant { name: "k_m", .. })
        ));
    }

    #[test]
    fn test_day_and_hour_ranges() {
        let bad_day = SimulationConstants {
            day_of_year: 0,
            ..valid()
        };
        assert!(bad_day.validate().is_err());

        let bad_hour = SimulationConstants {
            hour_of_day: Hours::new(24.0),
            ..valid()
        };
        assert!(bad_hour.validate().is_err());
    }

    #[test]
    fn test_vegetation_factor_open_terrain() {
        assert_eq!(valid().vegetation_factor(), 1.0);
    }

    #[test]
    fn test_clock_wraps_hour_and_day() {
        let constants = SimulationConstants {
            day_of_year: 365,
            hour_of_day: Hours::new(22.0),
            ..valid()
        };
        assert_eq!(constants.clock_at(0), (365, 22.0));
        assert_eq!(constants.clock_at(1), (365, 23.0));
        assert_eq!(constants.clock_at(2), (1, 0.0));
        assert_eq!(constants.clock_at(27), (2, 1.0));
    }

    #[test]
    fn test_leap_day_runs_before_wrapping() {
        let constants = SimulationConstants {
            day_of_year: 366,
            hour_of_day: Hours::new(0.0),
            ..valid()
        };
        assert_eq!(constants.validate(), Ok(()));
        assert_eq!(constants.clock_at(0), (366, 0.0));
        assert_eq!(constants.clock_at(23), (366, 23.0));
        assert_eq!(constants.clock_at(24), (1, 0.0));
        assert_eq!(constants.clock_at(49), (2, 1.0));
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let constants: SimulationConstants =
            serde_json::from_str(r#"{"k_m": 3.5, "grid_width": 8}"#).expect("valid json");
        assert_eq!(constants.k_m, 3.5);
        assert_eq!(constants.grid_width, 8);
        assert_eq!(constants.t_snow_b, Celsius::new(2.0));
    }
}
