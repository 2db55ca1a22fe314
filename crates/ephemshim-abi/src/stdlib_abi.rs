//! No-op `exit`.
//!
//! The vendored ephemeris code calls `exit` on unrecoverable errors. On Wasm
//! and mobile that takes the whole host down, so the stub returns instead.
//! Code after the call runs; C callers that assume `exit` never returns may
//! misbehave, which is preferable to killing the embedding process.

use std::ffi::c_int;

use ephemshim_core::suppress::suppress_exit;

/// `exit` stub: records `status` (audit mode) and returns to the caller.
#[cfg_attr(all(feature = "interpose", not(test)), unsafe(no_mangle))]
#[cfg_attr(
    all(feature = "linker-wrap", not(test)),
    unsafe(export_name = "__wrap_exit")
)]
pub extern "C" fn exit(status: c_int) {
    suppress_exit(status);
}
