use crate::error::{with_last_error_mut, DefaultFfiError, FfiError, SnowSimErrorCode};
use crate::instance::SnowSimInstance;
use snow_sim_core::SnowSimulation;
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing the `FfiError` trait.
pub(crate) fn set_last_error(error: &impl FfiError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Clear the thread-local error message and code.
/// Called by every entry point that succeeds.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = SnowSimErrorCode::Ok;
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl FfiError) -> SnowSimErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the outcome of a fallible operation in thread-local storage.
///
/// Clears the last error on success; on failure stores it and yields its code.
pub(crate) fn track_result<T>(result: Result<T, DefaultFfiError>) -> Result<T, SnowSimErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Collapse a unit result into the code returned across the boundary.
pub(crate) fn track_code(result: Result<(), DefaultFfiError>) -> SnowSimErrorCode {
    match track_result(result) {
        Ok(()) => SnowSimErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow an instance from a raw handle.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `snow_sim_new`.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const SnowSimInstance,
) -> Result<&'a SnowSimInstance, DefaultFfiError> {
    // SAFETY: caller guarantees `ptr` is null or valid for the returned lifetime
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultFfiError::null_pointer("ptr"))
}

/// Run `f` with shared access to the simulation behind `instance`.
pub(crate) fn with_sim_read<T>(
    instance: &SnowSimInstance,
    f: impl FnOnce(&SnowSimulation) -> Result<T, DefaultFfiError>,
) -> Result<T, DefaultFfiError> {
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultFfiError::lock_poisoned("sim"))?;
    f(&sim)
}

/// Run `f` with exclusive access to the simulation behind `instance`.
pub(crate) fn with_sim_write<T>(
    instance: &SnowSimInstance,
    f: impl FnOnce(&mut SnowSimulation) -> Result<T, DefaultFfiError>,
) -> Result<T, DefaultFfiError> {
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultFfiError::lock_poisoned("sim"))?;
    f(&mut sim)
}
