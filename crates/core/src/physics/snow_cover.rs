//! Per-cell snow accumulation and melt.
//!
//! A temperature-index melt model with a radiation term: hourly precipitation
//! is split into rain and snow by a linear temperature ramp, fresh snow resets
//! the surface albedo which then decays with snow age, and melt is driven by
//! the product of air temperature excess, the slope's radiation index spread
//! over the day, and the absorbed fraction `1 - albedo`.
//!
//! The timestep loop of one cell is strictly sequential; different cells are
//! fully independent and are updated in parallel by the grid driver.

use super::radiation::{compute_radiation_index, RadiationIndex};
use crate::core_types::cell::{SimulationCell, ALBEDO_FLOOR, ALBEDO_FRESH_SNOW};
use crate::core_types::constants::SimulationConstants;
use crate::core_types::units::Radians;
use crate::core_types::weather::WeatherSample;
use std::f32::consts::PI;

/// Temperature lapse rate: 0.5 °C per 100 m
pub const TEMPERATURE_LAPSE_PER_METER: f32 = 0.5 / 100.0;

/// Precipitation lapse rate: +10/24 l/m² per km of altitude, per hour
pub const PRECIPITATION_LAPSE_PER_KM: f32 = 10.0 / 24.0;

/// Length of one timestep in days
pub const TIMESTEP_DAYS: f32 = 1.0 / 24.0;

/// Air temperature at the cell, corrected from the measurement altitude.
#[inline]
pub fn lapse_temperature(measured: f32, cell_altitude: f32, reference_altitude: f32) -> f32 {
    measured - TEMPERATURE_LAPSE_PER_METER * (cell_altitude - reference_altitude)
}

/// Precipitation at the cell, corrected from the measurement altitude.
///
/// Floored at zero: cells far below the station never get negative precipitation.
#[inline]
pub fn lapse_precipitation(measured: f32, cell_altitude: f32, reference_altitude: f32) -> f32 {
    let dz_km = (cell_altitude - reference_altitude) / 1000.0;
    (measured + PRECIPITATION_LAPSE_PER_KM * dz_km).max(0.0)
}

/// Fraction of precipitation falling as snow.
///
/// 1 below `t_snow_a`, 0 above `t_snow_b`, linear in between.
#[inline]
pub fn snow_fraction(t_air: f32, constants: &SimulationConstants) -> f32 {
    let (a, b) = (*constants.t_snow_a, *constants.t_snow_b);
    (1.0 - (t_air - a) / (b - a)).clamp(0.0, 1.0)
}

/// Snow albedo after `days` without precipitation.
///
/// Decays exponentially from 0.8 (fresh snow) toward the 0.4 floor.
#[inline]
pub fn decayed_albedo(days_since_snowfall: f32, k_e: f32) -> f32 {
    ALBEDO_FLOOR * (1.0 + (-k_e * days_since_snowfall).exp())
}

/// Temperature melt factor.
///
/// Quadratic between `t_melt_a` and `t_melt_b` (smooth onset), linear above.
/// Only meaningful for `t_air > t_melt_a`.
#[inline]
pub fn melt_factor(t_air: f32, constants: &SimulationConstants) -> f32 {
    let (a, b) = (*constants.t_melt_a, *constants.t_melt_b);
    if t_air < b {
        (t_air - a) * (t_air - a) / (b - a)
    } else {
        t_air - a
    }
}

/// Share of the daily radiation index received at `hour_of_day`.
///
/// A half-sine over the slope's effective day length `D = |T4| + |T5|`,
/// scaled so it integrates to the daily index. Zero at night and for slopes
/// in permanent shadow.
#[inline]
pub fn diurnal_radiation_weight(index: &RadiationIndex, hour_of_day: f32) -> f32 {
    let day_length = index.bounds.day_length();
    if day_length <= 0.0 {
        return 0.0;
    }
    let phase = PI * hour_of_day / day_length - index.bounds.sunrise.abs() / PI;
    (PI * index.ratio / 2.0 * phase.sin()).max(0.0)
}

/// Advance one cell through every timestep of the batch.
///
/// Mutates `snow_water_equivalent`, `snow_albedo` and
/// `days_since_last_snowfall` in place. `weather` is the batch window (one
/// sample per hour); the hour of day and day of year for each step come from
/// `constants.clock_at`.
///
/// The albedo decay on a precipitation step uses the counter that step has
/// just reset, so rain on an existing snowpack leaves the surface at fresh-snow
/// albedo.
pub fn update_cell(
    cell: &mut SimulationCell,
    weather: &[WeatherSample],
    constants: &SimulationConstants,
) {
    let reference_altitude = *constants.measurement_altitude;
    let vegetation = constants.vegetation_factor();

    for (t, sample) in weather.iter().enumerate() {
        let t_air = lapse_temperature(*sample.temperature, cell.altitude, reference_altitude);

        cell.days_since_last_snowfall += TIMESTEP_DAYS;

        if sample.precipitation > 0.0 {
            let precipitation =
                lapse_precipitation(sample.precipitation, cell.altitude, reference_altitude);
            cell.days_since_last_snowfall = 0.0;

            if t_air > *constants.t_snow_b {
                cell.snow_albedo = ALBEDO_FLOOR;
            } else {
                let snow_rate = snow_fraction(t_air, constants);
                cell.snow_water_equivalent += precipitation * cell.area * snow_rate;
                cell.snow_albedo = ALBEDO_FRESH_SNOW;
            }
        }

        if cell.snow_water_equivalent > 0.0 {
            cell.snow_albedo = decayed_albedo(cell.days_since_last_snowfall, constants.k_e);

            if t_air > *constants.t_melt_a {
                let (day_of_year, hour_of_day) = constants.clock_at(t);
                let index = compute_radiation_index(
                    Radians::new(cell.inclination),
                    Radians::new(cell.aspect),
                    Radians::new(cell.latitude),
                    day_of_year,
                );
                let r_i_t = diurnal_radiation_weight(&index, hour_of_day);

                let c_m = constants.k_m
                    * vegetation
                    * r_i_t
                    * (1.0 - cell.snow_albedo)
                    * TIMESTEP_DAYS
                    * cell.area;
                let melt = c_m * melt_factor(t_air, constants);

                cell.snow_water_equivalent = (cell.snow_water_equivalent - melt).max(0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::{Celsius, Hours, Meters};
    use approx::assert_relative_eq;

    fn constants() -> SimulationConstants {
        SimulationConstants {
            t_snow_a: Celsius::new(0.0),
            t_snow_b: Celsius::new(2.0),
            t_melt_a: Celsius::new(0.0),
            t_melt_b: Celsius::new(2.0),
            k_m: 4.0,
            k_e: 0.2,
            grid_width: 1,
            day_of_year: 80,
            hour_of_day: Hours::new(0.0),
            ..SimulationConstants::default()
        }
    }

    #[test]
    fn test_temperature_lapse() {
        assert_relative_eq!(lapse_temperature(5.0, 1100.0, 100.0), 0.0, epsilon = 1e-4);
        assert_relative_eq!(lapse_temperature(5.0, 0.0, 200.0), 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_precipitation_lapse_never_negative() {
        assert_relative_eq!(lapse_precipitation(1.0, 2400.0, 0.0), 2.0, epsilon = 1e-5);
        assert_eq!(lapse_precipitation(0.1, 0.0, 3000.0), 0.0);
    }

    #[test]
    fn test_snow_fraction_ramp() {
        let c = constants();
        assert_eq!(snow_fraction(-5.0, &c), 1.0);
        assert_eq!(snow_fraction(0.0, &c), 1.0);
        assert_relative_eq!(snow_fraction(1.0, &c), 0.5);
        assert_eq!(snow_fraction(2.0, &c), 0.0);
        assert_eq!(snow_fraction(4.0, &c), 0.0);
    }

    #[test]
    fn test_albedo_decay_bounds() {
        assert_eq!(decayed_albedo(0.0, 0.2), ALBEDO_FRESH_SNOW);
        let week = decayed_albedo(7.0, 0.2);
        assert!(week > ALBEDO_FLOOR && week < ALBEDO_FRESH_SNOW);
        assert_relative_eq!(decayed_albedo(1000.0, 0.2), ALBEDO_FLOOR);
    }

    #[test]
    fn test_melt_factor_is_continuous_at_transition() {
        let c = constants();
        assert_eq!(melt_factor(0.0, &c), 0.0);
        assert_relative_eq!(melt_factor(1.0, &c), 0.5);
        assert_relative_eq!(melt_factor(2.0 - 1e-4, &c), 2.0, epsilon = 1e-3);
        assert_eq!(melt_factor(2.0, &c), 2.0);
        assert_eq!(melt_factor(5.0, &c), 5.0);
    }

    #[test]
    fn test_diurnal_weight_is_zero_at_night_and_positive_by_day() {
        let index = compute_radiation_index(
            Radians::new(0.0),
            Radians::new(0.0),
            Radians::new(0.0),
            80,
        );
        assert_eq!(diurnal_radiation_weight(&index, 0.0), 0.0);
        assert_eq!(diurnal_radiation_weight(&index, 3.0), 0.0);
        assert!(diurnal_radiation_weight(&index, 12.0) > 0.0);
    }

    #[test]
    fn test_diurnal_weight_zero_for_shadowed_slope() {
        let shadow = RadiationIndex::default();
        assert_eq!(diurnal_radiation_weight(&shadow, 12.0), 0.0);
    }

    #[test]
    fn test_snow_event_adds_full_precipitation_below_t_snow_a() {
        let mut cell = SimulationCell::flat(0.0, 0.0, 25.0);
        let weather = [WeatherSample::new(Celsius::new(-4.0), 3.0)];
        update_cell(&mut cell, &weather, &constants());

        assert_eq!(cell.snow_water_equivalent, 75.0);
        assert_eq!(cell.snow_albedo, ALBEDO_FRESH_SNOW);
        assert_eq!(cell.days_since_last_snowfall, 0.0);
    }

    #[test]
    fn test_rain_on_bare_ground_darkens_without_snow() {
        let mut cell = SimulationCell::flat(0.0, 0.0, 25.0);
        cell.snow_albedo = 0.7;
        let weather = [WeatherSample::new(Celsius::new(6.0), 4.0)];
        update_cell(&mut cell, &weather, &constants());

        assert_eq!(cell.snow_water_equivalent, 0.0);
        assert_eq!(cell.snow_albedo, ALBEDO_FLOOR);
    }

    #[test]
    fn test_rain_on_snowpack_recomputes_albedo_from_reset_counter() {
        let mut cell = SimulationCell::flat(0.0, 0.0, 25.0);
        cell.snow_water_equivalent = 100.0;
        cell.days_since_last_snowfall = 10.0;
        // Midnight at the equator: no radiation, so no melt either
        let weather = [WeatherSample::new(Celsius::new(6.0), 4.0)];
        update_cell(&mut cell, &weather, &constants());

        assert_eq!(cell.snow_water_equivalent, 100.0);
        assert_eq!(cell.snow_albedo, ALBEDO_FRESH_SNOW);
    }

    #[test]
    fn test_mixed_precipitation_uses_ramp() {
        let mut cell = SimulationCell::flat(0.0, 0.0, 10.0);
        let weather = [WeatherSample::new(Celsius::new(1.0), 2.0)];
        update_cell(&mut cell, &weather, &constants());
        assert_relative_eq!(cell.snow_water_equivalent, 10.0);
    }

    #[test]
    fn test_melt_reduces_swe_in_daylight() {
        let mut cell = SimulationCell::flat(0.0, 0.0, 25.0);
        cell.snow_water_equivalent = 500.0;
        cell.days_since_last_snowfall = 5.0;
        let c = SimulationConstants {
            hour_of_day: Hours::new(12.0),
            ..constants()
        };
        let weather = [WeatherSample::dry(Celsius::new(8.0))];
        update_cell(&mut cell, &weather, &c);
        assert!(cell.snow_water_equivalent < 500.0);
        assert!(cell.snow_water_equivalent >= 0.0);
    }

    #[test]
    fn test_vegetation_damps_melt() {
        let run = |density: f32| {
            let mut cell = SimulationCell::flat(0.0, 0.0, 25.0);
            cell.snow_water_equivalent = 500.0;
            let c = SimulationConstants {
                hour_of_day: Hours::new(12.0),
                vegetation_density: density,
                ..constants()
            };
            update_cell(&mut cell, &[WeatherSample::dry(Celsius::new(8.0))], &c);
            500.0 - cell.snow_water_equivalent
        };
        let open = run(0.0);
        let forest = run(0.5);
        assert!(open > 0.0);
        assert_relative_eq!(forest, open * (-2.0_f32).exp(), max_relative = 1e-4);
    }

    #[test]
    fn test_cold_high_cell_gets_more_snow_than_station() {
        let c = SimulationConstants {
            measurement_altitude: Meters::new(500.0),
            ..constants()
        };
        let weather = [WeatherSample::new(Celsius::new(-3.0), 1.0)];

        let mut valley = SimulationCell::flat(0.0, 500.0, 1.0);
        let mut summit = SimulationCell::flat(0.0, 2900.0, 1.0);
        update_cell(&mut valley, &weather, &c);
        update_cell(&mut summit, &weather, &c);

        assert_relative_eq!(valley.snow_water_equivalent, 1.0);
        assert_relative_eq!(summit.snow_water_equivalent, 2.0, epsilon = 1e-5);
    }
}
