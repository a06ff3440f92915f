//! Library lifecycle
//!
//! The namespace and alias tables are created by the first [`initialize`]
//! and dropped when a matching number of [`terminate`] calls brings the
//! count back to zero. Nested init/terminate pairs are allowed. All of this
//! state sits behind one process-wide lock.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use crate::errors::{Result, XmpError};
use crate::notify::{ErrorCallback, ErrorCallbackInfo};
use crate::registry::{Registries, SharedRegistries};
use crate::render;
use crate::{log_op_end, log_op_error, log_op_start};

struct LibraryState {
    init_count: u32,
    registries: Option<SharedRegistries>,
    default_callback: Option<ErrorCallbackInfo>,
}

static LIBRARY: Mutex<LibraryState> = Mutex::new(LibraryState {
    init_count: 0,
    registries: None,
    default_callback: None,
});

fn state() -> Result<MutexGuard<'static, LibraryState>> {
    LIBRARY.lock().map_err(|_| XmpError::Internal {
        message: "library lock poisoned".to_string(),
    })
}

/// Crate version and a descriptive message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
    pub message: String,
}

/// Initialize the library, seeding the standard namespaces and aliases on
/// the first call.
///
/// # Errors
/// * `InitializationFailed` - If a standard table entry is rejected
/// * `Internal` - If the library lock is poisoned
pub fn initialize() -> Result<()> {
    log_op_start!("initialize");
    let start = Instant::now();

    let count = initialize_locked().map_err(|e| {
        log_op_error!(
            "initialize",
            &e,
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "initialize",
        duration_ms = start.elapsed().as_millis() as u64,
        init_count = count
    );
    Ok(())
}

fn initialize_locked() -> Result<u32> {
    let mut state = state()?;
    state.init_count += 1;
    if state.init_count > 1 {
        return Ok(state.init_count);
    }
    match Registries::with_standard() {
        Ok(registries) => {
            state.registries = Some(SharedRegistries::new(registries));
            Ok(state.init_count)
        }
        Err(err) => {
            state.init_count -= 1;
            Err(err)
        }
    }
}

/// Balance one [`initialize`]. The last call drops the shared tables and
/// the default error callback. Extra calls are ignored.
pub fn terminate() {
    log_op_start!("terminate");
    let start = Instant::now();

    let remaining = match state() {
        Ok(mut state) => {
            state.init_count = state.init_count.saturating_sub(1);
            if state.init_count == 0 {
                state.registries = None;
                state.default_callback = None;
            }
            state.init_count
        }
        Err(e) => {
            log_op_error!(
                "terminate",
                &e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            return;
        }
    };

    log_op_end!(
        "terminate",
        duration_ms = start.elapsed().as_millis() as u64,
        init_count = remaining
    );
}

/// Current init/terminate balance
pub fn init_count() -> u32 {
    state().map(|s| s.init_count).unwrap_or(0)
}

pub fn is_initialized() -> bool {
    init_count() > 0
}

/// Handle to the process-wide tables
///
/// # Errors
/// * `NotInitialized` - If [`initialize`] has not been called
pub fn registries() -> Result<SharedRegistries> {
    state()?.registries.clone().ok_or(XmpError::NotInitialized)
}

/// Install the callback that new metadata objects start with
///
/// # Errors
/// * `Internal` - If the library lock is poisoned
pub fn set_default_error_callback(callback: ErrorCallback, limit: u32) -> Result<()> {
    state()?.default_callback = Some(ErrorCallbackInfo::new(callback, limit));
    tracing::debug!(limit, "default error callback installed");
    Ok(())
}

/// Remove the default callback
///
/// # Errors
/// * `Internal` - If the library lock is poisoned
pub fn clear_default_error_callback() -> Result<()> {
    state()?.default_callback = None;
    Ok(())
}

/// Copy of the default callback, with fresh accounting
pub fn default_error_callback() -> ErrorCallbackInfo {
    state()
        .ok()
        .and_then(|s| s.default_callback.clone())
        .map(|mut info| {
            let limit = info.limit();
            info.reset_limit(limit);
            info
        })
        .unwrap_or_default()
}

/// Dump the process-wide namespace table through `out`
///
/// # Errors
/// * `NotInitialized` - If [`initialize`] has not been called
pub fn dump_namespaces(out: &mut dyn FnMut(&str)) -> Result<()> {
    let registries = registries()?;
    let guard = registries.read()?;
    render::dump_namespaces(&guard.namespaces, out);
    Ok(())
}

/// No global options are defined
pub fn get_global_options() -> u32 {
    0
}

/// # Errors
/// * `Unimplemented` - Always
pub fn set_global_options(_options: u32) -> Result<()> {
    Err(XmpError::Unimplemented {
        operation: "SetGlobalOptions".to_string(),
    })
}

pub fn version_info() -> VersionInfo {
    let part = |text: &str| text.parse::<u32>().unwrap_or(0);
    VersionInfo {
        major: part(env!("CARGO_PKG_VERSION_MAJOR")),
        minor: part(env!("CARGO_PKG_VERSION_MINOR")),
        micro: part(env!("CARGO_PKG_VERSION_PATCH")),
        message: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    // Lifecycle tests live in tests/library_lifecycle_tests.rs so they run
    // in their own process.

    #[test]
    fn test_global_options() {
        assert_eq!(get_global_options(), 0);
        let err = set_global_options(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unimplemented);
    }

    #[test]
    fn test_version_info_matches_package() {
        let info = version_info();
        assert_eq!(
            format!("{}.{}.{}", info.major, info.minor, info.micro),
            env!("CARGO_PKG_VERSION")
        );
        assert!(info.message.starts_with("xmpcore "));
    }
}
