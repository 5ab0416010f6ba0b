//! Hourly weather forcing shared read-only by every cell of a batch.
//!
//! Samples are measured at a single reference altitude
//! (`SimulationConstants::measurement_altitude`); the snow kernel applies the
//! altitude lapse corrections per cell.

use super::units::Celsius;
use crate::error::{SnowSimError, SnowSimResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Amplitude of the synthetic diurnal temperature cycle (°C)
const DIURNAL_AMPLITUDE: f32 = 5.0;

/// Local hour of the daily temperature maximum
const DIURNAL_PEAK_HOUR: f32 = 15.0;

/// Fraction of hours that receive precipitation when disaggregating monthly totals
const WET_HOUR_FRACTION: f64 = 0.1;

/// First day-of-year of each month (non-leap year), zero based
const MONTH_START_DAY: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Days per month (non-leap year)
const MONTH_LENGTH: [u16; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// One hourly weather observation at the reference altitude.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Air temperature at the measurement altitude
    pub temperature: Celsius,
    /// Precipitation over the hour in l/m² (equivalently mm)
    pub precipitation: f32,
}

impl WeatherSample {
    /// Create a new sample
    #[must_use]
    pub fn new(temperature: Celsius, precipitation: f32) -> Self {
        Self {
            temperature,
            precipitation,
        }
    }

    /// Dry sample at the given temperature
    #[must_use]
    pub fn dry(temperature: Celsius) -> Self {
        Self::new(temperature, 0.0)
    }
}

/// Ordered hourly samples indexed by absolute timestep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSeries {
    samples: Vec<WeatherSample>,
}

impl WeatherSeries {
    /// Wrap an existing sample sequence
    #[must_use]
    pub fn new(samples: Vec<WeatherSample>) -> Self {
        Self { samples }
    }

    /// Constant weather for `hours` timesteps
    #[must_use]
    pub fn constant(sample: WeatherSample, hours: usize) -> Self {
        Self::new(vec![sample; hours])
    }

    /// Disaggregate monthly climate normals into hourly samples.
    ///
    /// Temperature follows the monthly mean plus a sine diurnal cycle peaking at
    /// 15:00. Each month's precipitation total (mm) is spread evenly over
    /// randomly chosen wet hours, so the expected monthly sum is preserved.
    /// Seeded, so the same inputs always give the same series.
    ///
    /// # Arguments
    ///
    /// * `mean_temperature` - Mean air temperature per month
    /// * `precipitation_mm` - Precipitation total per month (mm)
    /// * `start_day` - Day of year (1-365) of the first sample, starting at 00:00
    /// * `hours` - Number of hourly samples to generate
    /// * `seed` - RNG seed for the wet-hour selection
    #[must_use]
    pub fn from_monthly_normals(
        mean_temperature: &[Celsius; 12],
        precipitation_mm: &[f32; 12],
        start_day: u16,
        hours: usize,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let start = u32::from(start_day.clamp(1, 365)) - 1;

        let samples = (0..hours)
            .map(|h| {
                let day_index = ((start + (h / 24) as u32) % 365) as u16;
                let hour = (h % 24) as f32;
                let month = month_of(day_index);

                let diurnal =
                    DIURNAL_AMPLITUDE * (2.0 * PI * (hour - DIURNAL_PEAK_HOUR + 6.0) / 24.0).sin();
                let temperature = Celsius::new(*mean_temperature[month] + diurnal);

                let wet_hours = f32::from(MONTH_LENGTH[month]) * 24.0 * WET_HOUR_FRACTION as f32;
                let precipitation = if rng.random_bool(WET_HOUR_FRACTION) {
                    precipitation_mm[month].max(0.0) / wet_hours
                } else {
                    0.0
                };

                WeatherSample::new(temperature, precipitation)
            })
            .collect();

        Self { samples }
    }

    /// Number of samples held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples in timestep order
    pub fn samples(&self) -> &[WeatherSample] {
        &self.samples
    }

    /// Append samples (e.g. streamed in from a weather provider)
    pub fn extend(&mut self, samples: impl IntoIterator<Item = WeatherSample>) {
        self.samples.extend(samples);
    }

    /// Samples remaining from absolute timestep `offset`
    pub fn remaining(&self, offset: usize) -> usize {
        self.samples.len().saturating_sub(offset)
    }

    /// The active batch window `[offset, offset + len)`.
    ///
    /// # Errors
    ///
    /// Returns `SnowSimError::WeatherWindow` if the window is empty or extends
    /// past the end of the series.
    pub fn window(&self, offset: usize, len: usize) -> SnowSimResult<&[WeatherSample]> {
        let end = offset.checked_add(len);
        match end {
            Some(end) if len > 0 && end <= self.samples.len() => Ok(&self.samples[offset..end]),
            _ => Err(SnowSimError::WeatherWindow {
                offset,
                len,
                available: self.samples.len(),
            }),
        }
    }
}

/// Zero-based month containing zero-based `day_index`
fn month_of(day_index: u16) -> usize {
    MONTH_START_DAY
        .iter()
        .rposition(|&start| start <= day_index)
        .unwrap_or(0)
}
