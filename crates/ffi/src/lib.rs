//! C ABI over `snow-sim-core` for game engines and other native hosts.
//!
//! Every entry point returns a `SnowSimErrorCode`; on failure the message is
//! available from `snow_sim_get_last_error` on the same thread. Results are
//! written through out-parameters, and handles are created with
//! `snow_sim_new` and released with `snow_sim_destroy`.

mod constants;
mod error;
mod helpers;
mod instance;
mod terrain;

pub use constants::{SnowSimBatchReport, SnowSimConstants};
pub use error::{snow_sim_get_last_error, snow_sim_get_last_error_code, SnowSimErrorCode};
pub use instance::{snow_sim_destroy, snow_sim_new, SnowSimInstance};
pub use terrain::{SnowSimDesc, TerrainKind};

use error::DefaultFfiError;
use helpers::{instance_from_ptr, track_code, with_sim_read, with_sim_write};
use snow_sim_core::{Celsius, WeatherSample, WeatherSeries};

/// Replace the simulation constants.
///
/// The next batch starts at `constants.day_of_year` / `constants.hour_of_day`.
/// Invalid constants are rejected and the previous ones stay in effect.
///
/// # Safety
/// `ptr` must be a live instance and `constants` must be valid for reads.
#[no_mangle]
pub unsafe extern "C" fn snow_sim_set_constants(
    ptr: *const SnowSimInstance,
    constants: *const SnowSimConstants,
) -> SnowSimErrorCode {
    let result = unsafe { instance_from_ptr(ptr) }.and_then(|instance| {
        let constants = unsafe { constants.as_ref() }
            .ok_or_else(|| DefaultFfiError::null_pointer("constants"))?;
        with_sim_write(instance, |sim| {
            let updated = constants.apply_to(sim.constants())?;
            sim.set_constants(updated).map_err(DefaultFfiError::from)
        })
    });
    track_code(result)
}

/// Read back the current simulation constants, including the advanced clock.
///
/// # Safety
/// `ptr` must be a live instance and `out_constants` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn snow_sim_get_constants(
    ptr: *const SnowSimInstance,
    out_constants: *mut SnowSimConstants,
) -> SnowSimErrorCode {
    let result = unsafe { instance_from_ptr(ptr) }.and_then(|instance| {
        let out = unsafe { out_constants.as_mut() }
            .ok_or_else(|| DefaultFfiError::null_pointer("out_constants"))?;
        with_sim_read(instance, |sim| {
            *out = SnowSimConstants::from(sim.constants());
            Ok(())
        })
    });
    track_code(result)
}

/// Copy `len` host samples into weather samples.
///
/// # Safety
/// `temperatures` must hold `len` values; `precipitation` must be null or hold `len` values.
unsafe fn read_weather(
    temperatures: *const f32,
    precipitation: *const f32,
    len: usize,
) -> Result<Vec<WeatherSample>, DefaultFfiError> {
    if temperatures.is_null() {
        return Err(DefaultFfiError::null_pointer("temperatures"));
    }
    // SAFETY: non-null and the caller guarantees `len` readable values
    let temperatures = unsafe { std::slice::from_raw_parts(temperatures, len) };
    let precipitation = if precipitation.is_null() {
        None
    } else {
        // SAFETY: as above
        Some(unsafe { std::slice::from_raw_parts(precipitation, len) })
    };

    temperatures
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let p = precipitation.map_or(0.0, |p| p[i]);
            match Celsius::try_new(t) {
                Some(temperature) if p.is_finite() => Ok(WeatherSample::new(temperature, p)),
                _ => Err(DefaultFfiError::invalid_parameter(format!(
                    "weather sample {i} needs a finite temperature above absolute zero and finite precipitation, got {t} °C and {p} l/m²"
                ))),
            }
        })
        .collect()
}

/// Replace the hourly weather series and rewind to its first sample.
///
/// `temperatures` holds `len` air temperatures (°C) at the measurement
/// altitude. `precipitation` holds `len` hourly totals (l/m²) or may be null
/// for a dry series. Both buffers are copied.
///
/// # Safety
/// `ptr` must be a live instance; non-null buffers must hold `len` values.
#[no_mangle]
pub unsafe extern "C" fn snow_sim_set_weather(
    ptr: *const SnowSimInstance,
    temperatures: *const f32,
    precipitation: *const f32,
    len: usize,
) -> SnowSimErrorCode {
    let result = unsafe { instance_from_ptr(ptr) }.and_then(|instance| {
        let samples = unsafe { read_weather(temperatures, precipitation, len) }?;
        with_sim_write(instance, |sim| {
            sim.set_weather(WeatherSeries::new(samples));
            Ok(())
        })
    });
    track_code(result)
}

/// Append hourly samples to the end of the weather series.
///
/// The timestep offset is kept, so an exhausted simulation resumes with the
/// first appended sample. Buffers follow `snow_sim_set_weather`. Nothing is
/// appended if any sample is rejected.
///
/// # Safety
/// `ptr` must be a live instance; non-null buffers must hold `len` values.
#[no_mangle]
pub unsafe extern "C" fn snow_sim_append_weather(
    ptr: *const SnowSimInstance,
    temperatures: *const f32,
    precipitation: *const f32,
    len: usize,
) -> SnowSimErrorCode {
    let result = unsafe { instance_from_ptr(ptr) }.and_then(|instance| {
        let samples = unsafe { read_weather(temperatures, precipitation, len) }?;
        with_sim_write(instance, |sim| {
            sim.append_weather(samples);
            Ok(())
        })
    });
    track_code(result)
}

/// Advance the simulation by up to `batch_len` hourly timesteps.
///
/// Fewer steps run when the weather series ends first; the actual count is
/// reported in `out_report.timesteps`. Returns `WeatherExhausted` once no
/// samples remain. `out_report` may be null.
///
/// # Safety
/// `ptr` must be a live instance; `out_report` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn snow_sim_run_batch(
    ptr: *const SnowSimInstance,
    batch_len: usize,
    out_report: *mut SnowSimBatchReport,
) -> SnowSimErrorCode {
    let result = unsafe { instance_from_ptr(ptr) }.and_then(|instance| {
        let report = with_sim_write(instance, |sim| {
            sim.run_batch(batch_len).map_err(DefaultFfiError::from)
        })?;
        if let Some(out) = unsafe { out_report.as_mut() } {
            *out = SnowSimBatchReport::from(&report);
        }
        Ok(())
    });
    track_code(result)
}

/// Copy the snow depth field into `out_buffer`, row-major with the southern row first.
///
/// With `normalized` set, depths are divided by the grid maximum so the
/// deepest cell reads 1.0 (all zeros when the grid is bare). The number of
/// values written is stored in `out_written` when it is non-null.
///
/// # Safety
/// `ptr` must be a live instance; `out_buffer` must be valid for `buffer_len` writes.
#[no_mangle]
pub unsafe extern "C" fn snow_sim_read_output(
    ptr: *const SnowSimInstance,
    out_buffer: *mut f32,
    buffer_len: usize,
    normalized: bool,
    out_written: *mut usize,
) -> SnowSimErrorCode {
    let result = unsafe { instance_from_ptr(ptr) }.and_then(|instance| {
        if out_buffer.is_null() {
            return Err(DefaultFfiError::null_pointer("out_buffer"));
        }
        let written = with_sim_read(instance, |sim| {
            let required = sim.cells().len();
            if buffer_len < required {
                return Err(DefaultFfiError::buffer_too_small(required, buffer_len));
            }
            // SAFETY: non-null and the caller guarantees `buffer_len >= required` slots
            let out = unsafe { std::slice::from_raw_parts_mut(out_buffer, required) };
            if normalized {
                out.copy_from_slice(&sim.normalized_output());
            } else {
                out.copy_from_slice(sim.output().as_slice());
            }
            Ok(required)
        })?;
        if let Some(out) = unsafe { out_written.as_mut() } {
            *out = written;
        }
        Ok(())
    });
    track_code(result)
}

/// Deepest snow on the grid after the last batch.
///
/// # Safety
/// `ptr` must be a live instance and `out_max` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn snow_sim_max_depth(
    ptr: *const SnowSimInstance,
    out_max: *mut f32,
) -> SnowSimErrorCode {
    let result = unsafe { instance_from_ptr(ptr) }.and_then(|instance| {
        let out = unsafe { out_max.as_mut() }.ok_or_else(|| DefaultFfiError::null_pointer("out_max"))?;
        with_sim_read(instance, |sim| {
            *out = sim.max_depth();
            Ok(())
        })
    });
    track_code(result)
}

/// Grid size in cells, west to east (`out_nx`) and south to north (`out_ny`).
///
/// # Safety
/// `ptr` must be a live instance; both out-pointers must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn snow_sim_grid_dimensions(
    ptr: *const SnowSimInstance,
    out_nx: *mut usize,
    out_ny: *mut usize,
) -> SnowSimErrorCode {
    let result = unsafe { instance_from_ptr(ptr) }.and_then(|instance| {
        let nx = unsafe { out_nx.as_mut() }.ok_or_else(|| DefaultFfiError::null_pointer("out_nx"))?;
        let ny = unsafe { out_ny.as_mut() }.ok_or_else(|| DefaultFfiError::null_pointer("out_ny"))?;
        with_sim_read(instance, |sim| {
            (*nx, *ny) = sim.grid_dimensions();
            Ok(())
        })
    });
    track_code(result)
}
