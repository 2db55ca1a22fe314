//! Entrypoints the exported stubs delegate to.
//!
//! These are the whole behavior of the shim: never format, never terminate,
//! and (in audit mode) leave a trace in the ledger.

use crate::config::shim_mode;
use crate::ledger::ledger;
use crate::symbol::StubSymbol;

/// Byte count every formatting stub reports.
pub const FORMAT_STUB_RETURN: i32 = 0;

/// Suppress one call to a formatting function.
///
/// Always returns [`FORMAT_STUB_RETURN`]. Passing [`StubSymbol::Exit`] counts
/// the call but records no exit status; use [`suppress_exit`] for that.
#[inline]
pub fn suppress_format(symbol: StubSymbol) -> i32 {
    if shim_mode().records_calls() {
        ledger().record_call(symbol);
    }
    FORMAT_STUB_RETURN
}

/// Suppress one call to `exit(status)`. Returns to the caller.
#[inline]
pub fn suppress_exit(status: i32) {
    if shim_mode().records_calls() {
        ledger().record_exit(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc_counter::allocations_during;
    use crate::config::{ShimMode, reset_mode_for_tests, set_mode_env, set_shim_mode};

    #[test]
    fn audit_mode_records_and_returns_zero() {
        let _guard = crate::TEST_LOCK.lock();
        let previous = set_shim_mode(ShimMode::Audit);
        ledger().reset();

        assert_eq!(suppress_format(StubSymbol::Printf), 0);
        assert_eq!(suppress_format(StubSymbol::Sprintf), 0);
        suppress_exit(42);

        let snap = ledger().snapshot();
        assert_eq!(snap.count(StubSymbol::Printf), 1);
        assert_eq!(snap.count(StubSymbol::Sprintf), 1);
        assert_eq!(snap.last_exit_status, Some(42));

        ledger().reset();
        set_shim_mode(previous);
    }

    #[test]
    fn silent_mode_records_nothing() {
        let _guard = crate::TEST_LOCK.lock();
        let previous = set_shim_mode(ShimMode::Silent);
        ledger().reset();

        for sym in StubSymbol::ALL {
            assert_eq!(suppress_format(sym), FORMAT_STUB_RETURN);
        }
        suppress_exit(1);

        let snap = ledger().snapshot();
        assert_eq!(snap.total_suppressed(), 0);
        assert!(!snap.exit_requested);

        set_shim_mode(previous);
    }

    #[test]
    fn exit_returns_for_any_status() {
        let _guard = crate::TEST_LOCK.lock();
        let previous = set_shim_mode(ShimMode::Audit);
        ledger().reset();

        for status in [i32::MIN, -1, 0, 1, 255, 256, i32::MAX] {
            suppress_exit(status);
        }
        // Still running.
        let snap = ledger().snapshot();
        assert_eq!(snap.count(StubSymbol::Exit), 7);
        assert_eq!(snap.last_exit_status, Some(i32::MAX));

        ledger().reset();
        set_shim_mode(previous);
    }

    #[test]
    fn stubs_never_allocate_even_before_mode_resolution() {
        let _guard = crate::TEST_LOCK.lock();
        let previous = shim_mode();
        ledger().reset();

        // Unresolved mode with the env var set: the stub must not go read it.
        reset_mode_for_tests();
        set_mode_env(Some("silent"));
        let (rc, allocations) = allocations_during(|| {
            let rc = suppress_format(StubSymbol::Printf);
            suppress_exit(9);
            rc
        });
        assert_eq!(rc, FORMAT_STUB_RETURN);
        assert_eq!(allocations, 0, "first stub call allocated");
        // Unresolved reads as the default, so the calls were recorded.
        assert_eq!(ledger().count(StubSymbol::Printf), 1);
        assert_eq!(ledger().last_exit_status(), Some(9));

        for mode in [ShimMode::Audit, ShimMode::Silent] {
            set_shim_mode(mode);
            let ((), allocations) = allocations_during(|| {
                for sym in StubSymbol::ALL {
                    suppress_format(sym);
                }
                for status in 0..(crate::ledger::EXIT_HISTORY_CAP as i32 * 2) {
                    suppress_exit(status);
                }
            });
            assert_eq!(allocations, 0, "{mode:?}");
        }

        set_mode_env(None);
        ledger().reset();
        set_shim_mode(previous);
    }
}
