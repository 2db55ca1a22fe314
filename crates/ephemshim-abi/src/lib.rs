#![feature(c_variadic)]
// Every stub ignores its pointer arguments entirely, so per-function safety
// docs would all say the same thing.
#![allow(clippy::missing_safety_doc)]
//! # ephemshim-abi
//!
//! `extern "C"` no-op replacements for `printf`, `fprintf`, `sprintf`,
//! `snprintf` and `exit`, for linking a vendored ephemeris library into
//! targets (Wasm, mobile) where real stdio or process termination would crash.
//!
//! ```text
//! vendored C caller -> stub (this crate) -> ephemshim_core::suppress -> ledger
//! ```
//!
//! Which names the stubs are exported under is a build-time choice:
//! - feature `interpose` (default): `printf`, `exit`, ... resolve ahead of libc.
//! - feature `linker-wrap`: `__wrap_printf`, `__wrap_exit`, ... for links
//!   that pass `-Wl,--wrap=<name>`.
//!
//! The mode (`EPHEMSHIM_MODE`) is resolved at load time by an ELF constructor
//! or explicitly by `ephemshim_init`, never inside a stub.
//!
//! Unit tests build without either export so the test binary keeps the real
//! libc `printf` and `exit`.

#[cfg(all(feature = "interpose", feature = "linker-wrap"))]
compile_error!("features `interpose` and `linker-wrap` are mutually exclusive");

pub mod control_abi;
pub mod stdio_abi;
pub mod stdlib_abi;

/// Serializes unit tests that touch the process-global mode or ledger.
#[cfg(test)]
pub(crate) static TEST_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());
