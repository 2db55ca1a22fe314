//! Runtime mode configuration.
//!
//! The mode is read from the `EPHEMSHIM_MODE` environment variable:
//! - `audit` (default): suppressed calls are counted in the [`ledger`](crate::ledger)
//!   so the embedding host can see what the vendored code tried to do.
//! - `silent`: nothing is recorded. The stubs still never format and never exit.
//!
//! The environment is read by [`resolve_mode`], never by the stubs: reading
//! it allocates, and the stubs must not. The ABI crate calls `resolve_mode`
//! from an ELF load-time constructor and from `ephemshim_init`. Until then
//! [`shim_mode`] reports the default.
//!
//! An embedding host may override the environment at any time with
//! [`set_shim_mode`]; the override is process-wide and sticky.

use std::sync::atomic::{AtomicU8, Ordering};

/// Whether suppressed calls are recorded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShimMode {
    /// Count every suppressed call and keep recent exit statuses.
    #[default]
    Audit,
    /// Record nothing.
    Silent,
}

impl ShimMode {
    /// Parse from string (case-insensitive). Unknown values map to `Audit`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" | "quiet" | "off" | "none" => Self::Silent,
            _ => Self::Audit,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Audit => "audit",
            Self::Silent => "silent",
        }
    }

    /// Returns true if suppressed calls go into the ledger.
    #[must_use]
    pub const fn records_calls(self) -> bool {
        matches!(self, Self::Audit)
    }

    /// C ABI encoding used by `ephemshim_set_mode`/`ephemshim_get_mode`.
    #[must_use]
    pub const fn to_c(self) -> i32 {
        match self {
            Self::Audit => 0,
            Self::Silent => 1,
        }
    }

    #[must_use]
    pub const fn from_c(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Audit),
            1 => Some(Self::Silent),
            _ => None,
        }
    }
}

pub const MODE_ENV_VAR: &str = "EPHEMSHIM_MODE";

// 0=unresolved, 1=Audit, 2=Silent, 255=resolving.
// Atomic state machine rather than OnceLock: a stub called while the env var
// is being read must not wait on the resolving thread.
// Unresolved and resolving both read as the default mode.
static CACHED_MODE: AtomicU8 = AtomicU8::new(MODE_UNRESOLVED);

const MODE_UNRESOLVED: u8 = 0;
const MODE_AUDIT: u8 = 1;
const MODE_SILENT: u8 = 2;
const MODE_RESOLVING: u8 = 255;

fn mode_to_u8(mode: ShimMode) -> u8 {
    match mode {
        ShimMode::Audit => MODE_AUDIT,
        ShimMode::Silent => MODE_SILENT,
    }
}

fn u8_to_mode(v: u8) -> ShimMode {
    match v {
        MODE_SILENT => ShimMode::Silent,
        _ => ShimMode::Audit,
    }
}

/// Current mode. Never reads the environment and never allocates.
///
/// Before [`resolve_mode`] (or [`set_shim_mode`]) has run this is the
/// default, `Audit`.
#[inline]
#[must_use]
pub fn shim_mode() -> ShimMode {
    u8_to_mode(CACHED_MODE.load(Ordering::Acquire))
}

/// Resolve the mode from `EPHEMSHIM_MODE` once and cache it.
///
/// Later calls return the cached mode. An explicit [`set_shim_mode`]
/// always wins, including one that lands while the env var is being read.
/// Allocates on the resolving call; not for use inside a stub.
pub fn resolve_mode() -> ShimMode {
    let cached = CACHED_MODE.load(Ordering::Acquire);
    if cached != MODE_UNRESOLVED {
        return u8_to_mode(cached);
    }

    if CACHED_MODE
        .compare_exchange(
            MODE_UNRESOLVED,
            MODE_RESOLVING,
            Ordering::SeqCst,
            Ordering::Relaxed,
        )
        .is_err()
    {
        // Lost the race: resolved, resolving elsewhere, or overridden.
        return shim_mode();
    }

    let mode = std::env::var(MODE_ENV_VAR)
        .map(|v| ShimMode::from_str_loose(&v))
        .unwrap_or_default();
    finish_resolution(mode)
}

fn finish_resolution(mode: ShimMode) -> ShimMode {
    match CACHED_MODE.compare_exchange(
        MODE_RESOLVING,
        mode_to_u8(mode),
        Ordering::AcqRel,
        Ordering::Acquire,
    ) {
        Ok(_) => mode,
        Err(current) => u8_to_mode(current),
    }
}

/// Explicitly set the mode for the whole process, replacing whatever the
/// environment said. Returns the previous mode.
pub fn set_shim_mode(mode: ShimMode) -> ShimMode {
    let previous = CACHED_MODE.swap(mode_to_u8(mode), Ordering::AcqRel);
    u8_to_mode(previous)
}

/// Forget any resolved or overridden mode, as if the process had just started.
#[cfg(test)]
pub(crate) fn reset_mode_for_tests() {
    CACHED_MODE.store(MODE_UNRESOLVED, Ordering::SeqCst);
}

/// Set or clear `EPHEMSHIM_MODE`. Callers must hold `TEST_LOCK`.
#[cfg(test)]
#[allow(unsafe_code)]
pub(crate) fn set_mode_env(value: Option<&str>) {
    // SAFETY: every test that touches the environment holds TEST_LOCK.
    unsafe {
        match value {
            Some(v) => std::env::set_var(MODE_ENV_VAR, v),
            None => std::env::remove_var(MODE_ENV_VAR),
        }
    }
}
