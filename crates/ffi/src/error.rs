use snow_sim_core::SnowSimError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for errors crossing the FFI boundary.
///
/// - `code()` - the error code returned to the caller
/// - `msg()` - the diagnostic message stored for `snow_sim_get_last_error`
pub(crate) trait FfiError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> SnowSimErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Error code plus message for every failure an FFI entry point can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFfiError {
    code: SnowSimErrorCode,
    msg: String,
}

impl DefaultFfiError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: SnowSimErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: SnowSimErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for invalid terrain parameters with a custom message.
    pub fn invalid_terrain_parameter_msg(param_name: &str, message: &str) -> Self {
        Self {
            code: SnowSimErrorCode::InvalidTerrainParameters,
            msg: format!("Terrain parameter {param_name}: {message}"),
        }
    }

    /// Create error for invalid parameter.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: SnowSimErrorCode::InvalidParameter,
            msg: message,
        }
    }

    /// Create error for a caller buffer that cannot hold the result.
    pub fn buffer_too_small(required: usize, provided: usize) -> Self {
        Self {
            code: SnowSimErrorCode::BufferTooSmall,
            msg: format!("Buffer holds {provided} values but {required} are required"),
        }
    }
}

impl From<SnowSimError> for DefaultFfiError {
    fn from(error: SnowSimError) -> Self {
        let code = match error {
            SnowSimError::InvalidConstant { .. } | SnowSimError::InvertedThresholds { .. } => {
                SnowSimErrorCode::InvalidConstants
            }
            SnowSimError::WeatherWindow { .. } => SnowSimErrorCode::WeatherExhausted,
            SnowSimError::DimensionMismatch { .. } => SnowSimErrorCode::InvalidParameter,
            SnowSimError::InvalidTerrain { .. } => SnowSimErrorCode::InvalidTerrainParameters,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl FfiError for DefaultFfiError {
    fn code(&self) -> SnowSimErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by snow simulation functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnowSimErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Invalid terrain parameters: extents and resolution must be finite and
    /// positive, heightmaps at least 2x2.
    InvalidTerrainParameters = 3,

    /// Invalid parameter passed to function.
    InvalidParameter = 4,

    /// Simulation constants failed validation (non-finite, out of range or
    /// inverted thresholds). The previous constants stay in effect.
    InvalidConstants = 5,

    /// No weather samples remain at the current timestep offset.
    WeatherExhausted = 6,

    /// Output buffer is smaller than the grid.
    BufferTooSmall = 7,
}

impl From<DefaultFfiError> for SnowSimErrorCode {
    fn from(error: DefaultFfiError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The `CString` is kept here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, SnowSimErrorCode)> = const { RefCell::new((None, SnowSimErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, SnowSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, SnowSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded or no call has been made.
///
/// # Thread Safety
/// Error messages are stored per-thread, so each thread sees only its own failures.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// SnowSimInstance* sim = nullptr;
/// SnowSimErrorCode err = snow_sim_new(&desc, nullptr, &sim);
/// if (err != Ok) {
///     const char* error = snow_sim_get_last_error();
///     if (error) {
///         printf("Snow sim creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn snow_sim_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `SnowSimErrorCode::Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn snow_sim_get_last_error_code() -> SnowSimErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
