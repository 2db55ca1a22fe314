//! # ephemshim-core
//!
//! Safe half of the ephemshim libc stubs.
//!
//! The ABI crate exports `printf`, `fprintf`, `sprintf`, `snprintf` and `exit`
//! as no-ops so a vendored ephemeris library can run where stdio and process
//! termination are unavailable (Wasm, mobile). Everything those exports need
//! that does not touch raw pointers lives here:
//!
//! - [`symbol`]: the closed table of stubbed symbols and their behavior.
//! - [`config`]: runtime mode (`EPHEMSHIM_MODE`) with an embedding override.
//! - [`ledger`]: process-global record of suppressed calls.
//! - [`suppress`]: the entrypoints each exported stub delegates to.
//! - [`link`]: interposition vs `--wrap` naming, linker args, version scripts.

#![deny(unsafe_code)]

pub mod config;
pub mod ledger;
pub mod link;
pub mod suppress;
pub mod symbol;

pub use config::{ShimMode, resolve_mode, set_shim_mode, shim_mode};
pub use ledger::{LedgerSnapshot, SuppressionLedger, ledger};
pub use link::LinkMechanism;
pub use symbol::{StubBehavior, StubSymbol, SymbolFamily};

/// Serializes unit tests that touch the process-global mode or ledger.
#[cfg(test)]
pub(crate) static TEST_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

/// Global allocator for the unit-test binary that counts allocations made by
/// the current thread, so tests can assert a code path never allocates.
#[cfg(test)]
#[allow(unsafe_code)]
pub(crate) mod alloc_counter {
    use std::alloc::{GlobalAlloc, Layout, System};
    use std::cell::Cell;

    thread_local! {
        static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
    }

    struct CountingAllocator;

    // SAFETY: forwards to the system allocator unchanged.
    unsafe impl GlobalAlloc for CountingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let _ = ALLOCATIONS.try_with(|n| n.set(n.get() + 1));
            unsafe { System.alloc(layout) }
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            unsafe { System.dealloc(ptr, layout) }
        }

        unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
            let _ = ALLOCATIONS.try_with(|n| n.set(n.get() + 1));
            unsafe { System.realloc(ptr, layout, new_size) }
        }
    }

    #[global_allocator]
    static GLOBAL: CountingAllocator = CountingAllocator;

    /// Allocations made by this thread while running `f`.
    pub(crate) fn allocations_during<R>(f: impl FnOnce() -> R) -> (R, usize) {
        let before = ALLOCATIONS.with(Cell::get);
        let out = f();
        let after = ALLOCATIONS.with(Cell::get);
        (out, after - before)
    }
}
