use snow_sim_core::{SimulationConstants, SnowSimulation, WeatherSeries};
use std::ptr;
use std::sync::RwLock;

use crate::error::{DefaultFfiError, SnowSimErrorCode};
use crate::helpers::{track_error, track_result};
use crate::terrain::{SnowSimDesc, TerrainKind};

/// The snow simulation context handed to the host as an opaque pointer.
///
/// # Thread Safety
/// The simulation is protected by an `RwLock`:
/// - **Multiple concurrent readers** (`snow_sim_read_output`, `snow_sim_max_depth`)
/// - **Exclusive writer** (`snow_sim_run_batch`, `snow_sim_set_constants`, `snow_sim_set_weather`)
///
/// A host can therefore copy the depth field out on its render thread while
/// the game thread schedules the next batch.
///
/// ## Unreal Engine Example
/// ```cpp
/// SnowSimDesc desc = {};
/// desc.kind = Heightmap;
/// desc.width = 2000.0f; desc.height = 2000.0f;
/// desc.nx = 201; desc.ny = 201;
/// desc.elevation_scale = 1.0f;
/// desc.origin_latitude_deg = 47.0f;
///
/// SnowSimInstance* Snow = nullptr;
/// if (snow_sim_new(&desc, Heights.GetData(), &Snow) != Ok) {
///     UE_LOG(LogTemp, Error, TEXT("%hs"), snow_sim_get_last_error());
/// }
/// ```
pub struct SnowSimInstance {
    pub(crate) sim: RwLock<SnowSimulation>,
}

impl SnowSimInstance {
    /// Build the terrain, derive the cells and wrap a fresh simulation.
    ///
    /// Starts with no weather and default constants; the host supplies both
    /// before the first batch.
    ///
    /// # Errors
    ///
    /// Returns `SnowSimErrorCode::NullPointer` if a heightmap is required but
    /// `heightmap` is null, and `SnowSimErrorCode::InvalidTerrainParameters`
    /// for bad extents, dimensions or latitudes.
    ///
    /// # Safety
    ///
    /// For `TerrainKind::Heightmap`, `heightmap` must point to `nx * ny`
    /// readable `f32` values.
    pub(crate) unsafe fn new(
        desc: &SnowSimDesc,
        heightmap: *const f32,
    ) -> Result<Box<Self>, DefaultFfiError> {
        let (origin_latitude, latitude_span) = desc.latitudes()?;

        let samples = if desc.kind == TerrainKind::Heightmap {
            let len = desc.heightmap_len()?;
            if heightmap.is_null() {
                return Err(DefaultFfiError::null_pointer("heightmap"));
            }
            // SAFETY: non-null and the caller guarantees `len` readable values
            Some(unsafe { std::slice::from_raw_parts(heightmap, len) })
        } else {
            None
        };

        let terrain = desc.terrain(samples)?;
        let sim = SnowSimulation::from_terrain(
            &terrain,
            origin_latitude,
            latitude_span,
            WeatherSeries::default(),
            SimulationConstants::default(),
        )?;

        Ok(Box::new(Self {
            sim: RwLock::new(sim),
        }))
    }
}

/// Create a new snow simulation and return it via out-parameter.
///
/// - Returns `SnowSimErrorCode::Ok` (0) on success with a valid instance in `out_instance`
/// - Returns a non-zero error code on failure with `out_instance` set to null
///
/// Parameters
/// - `desc`: Grid description. Must be non-null.
/// - `heightmap`: `desc.nx * desc.ny` elevations in row-major order (south row
///   first) when `desc.kind` is `Heightmap`, otherwise ignored and may be null.
///   The data is copied; the caller may free it after this call.
/// - `out_instance`: Pointer to receive the created instance. Must be non-null.
///
/// # Safety
///
/// - `desc` and `out_instance` must be valid pointers.
/// - The caller takes ownership of the returned instance and MUST call
///   `snow_sim_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn snow_sim_new(
    desc: *const SnowSimDesc,
    heightmap: *const f32,
    out_instance: *mut *mut SnowSimInstance,
) -> SnowSimErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_instance"));
    }
    // SAFETY: caller guarantees `desc` is null or valid
    let Some(desc) = (unsafe { desc.as_ref() }) else {
        unsafe {
            *out_instance = ptr::null_mut();
        }
        return track_error(&DefaultFfiError::null_pointer("desc"));
    };

    // SAFETY: heightmap contract forwarded from the caller
    match track_result(unsafe { SnowSimInstance::new(desc, heightmap) }) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            SnowSimErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroys an instance previously created by `snow_sim_new`.
///
/// A null `ptr` is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `snow_sim_new` and not freed already.
/// - The pointer must not be used after this call.
#[no_mangle]
pub unsafe extern "C" fn snow_sim_destroy(ptr: *mut SnowSimInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `snow_sim_new` and not yet freed
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
