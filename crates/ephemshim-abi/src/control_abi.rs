//! C-callable controls for the embedding host.
//!
//! These are always exported under their own names; nothing in libc uses
//! the `ephemshim_` prefix, so they never interpose anything.

use std::ffi::{CStr, c_char, c_int};

use ephemshim_core::{ShimMode, StubSymbol, ledger, resolve_mode, set_shim_mode, shim_mode};

/// Resolve the mode from `EPHEMSHIM_MODE` if nothing has yet, and return it
/// in the `ephemshim_set_mode` encoding.
///
/// Hosts without ELF constructors (Wasm, static links that drop them) call
/// this once before the vendored code runs; otherwise the stubs use the
/// default mode.
#[unsafe(no_mangle)]
pub extern "C" fn ephemshim_init() -> c_int {
    resolve_mode().to_c()
}

// Resolve at load time so the first stub call never touches the environment.
#[cfg(all(any(target_os = "linux", target_os = "android"), not(test)))]
#[used]
#[unsafe(link_section = ".init_array")]
static RESOLVE_MODE_AT_LOAD: extern "C" fn() = resolve_mode_at_load;

#[cfg(all(any(target_os = "linux", target_os = "android"), not(test)))]
extern "C" fn resolve_mode_at_load() {
    resolve_mode();
}

/// Set the mode: `0` = audit, `1` = silent. Returns `0`, or `-1` for an
/// unknown value (mode unchanged).
#[unsafe(no_mangle)]
pub extern "C" fn ephemshim_set_mode(mode: c_int) -> c_int {
    match ShimMode::from_c(mode) {
        Some(mode) => {
            set_shim_mode(mode);
            0
        }
        None => -1,
    }
}

/// Current mode in the `ephemshim_set_mode` encoding.
#[unsafe(no_mangle)]
pub extern "C" fn ephemshim_get_mode() -> c_int {
    shim_mode().to_c()
}

/// `1` if any `exit` was suppressed (and recorded) since the last reset.
#[unsafe(no_mangle)]
pub extern "C" fn ephemshim_exit_requested() -> c_int {
    c_int::from(ledger().exit_requested())
}

/// Write the most recent suppressed exit status to `*out`.
///
/// Returns `1` when a status was recorded, `0` otherwise. `out` may be null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ephemshim_last_exit_status(out: *mut c_int) -> c_int {
    match ledger().last_exit_status() {
        Some(status) => {
            if !out.is_null() {
                // SAFETY: caller passes a writable int or null.
                unsafe { *out = status };
            }
            1
        }
        None => 0,
    }
}

/// Suppressed-call count for the stub named by `symbol` (`"printf"`, ...).
/// Null or unknown names give `0`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ephemshim_suppressed_count(symbol: *const c_char) -> u64 {
    if symbol.is_null() {
        return 0;
    }
    // SAFETY: caller passes a NUL-terminated string.
    let name = unsafe { CStr::from_ptr(symbol) };
    name.to_str()
        .ok()
        .and_then(StubSymbol::from_name)
        .map_or(0, |sym| ledger().count(sym))
}

/// Zero all counters and forget recorded exits.
#[unsafe(no_mangle)]
pub extern "C" fn ephemshim_reset_ledger() {
    ledger().reset();
}
