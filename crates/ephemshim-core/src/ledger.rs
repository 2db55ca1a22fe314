//! Process-global record of suppressed calls.
//!
//! The stubs cannot report anything back to the vendored caller, so the
//! ledger is how an embedding host finds out that, say, the ephemeris code
//! asked to `exit(1)` after failing to open a data file.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::symbol::{STUB_COUNT, StubSymbol};

/// How many recent exit statuses are retained.
pub const EXIT_HISTORY_CAP: usize = 16;

/// Fixed-size ring of the most recent exit statuses.
#[derive(Debug, Clone, Copy)]
struct ExitHistory {
    slots: [i32; EXIT_HISTORY_CAP],
    len: usize,
    next: usize,
}

impl ExitHistory {
    const fn new() -> Self {
        Self {
            slots: [0; EXIT_HISTORY_CAP],
            len: 0,
            next: 0,
        }
    }

    fn push(&mut self, status: i32) {
        self.slots[self.next] = status;
        self.next = (self.next + 1) % EXIT_HISTORY_CAP;
        self.len = (self.len + 1).min(EXIT_HISTORY_CAP);
    }

    /// Oldest first.
    fn to_vec(self) -> Vec<i32> {
        let start = (self.next + EXIT_HISTORY_CAP - self.len) % EXIT_HISTORY_CAP;
        (0..self.len)
            .map(|i| self.slots[(start + i) % EXIT_HISTORY_CAP])
            .collect()
    }
}

/// Counters for every stubbed symbol plus exit bookkeeping.
#[derive(Debug)]
pub struct SuppressionLedger {
    counts: [AtomicU64; STUB_COUNT],
    exit_requested: AtomicBool,
    last_exit_status: AtomicI32,
    exit_history: Mutex<ExitHistory>,
}

impl SuppressionLedger {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: [const { AtomicU64::new(0) }; STUB_COUNT],
            exit_requested: AtomicBool::new(false),
            last_exit_status: AtomicI32::new(0),
            exit_history: parking_lot::const_mutex(ExitHistory::new()),
        }
    }

    /// Count one suppressed call to `symbol`.
    ///
    /// For `exit` prefer [`Self::record_exit`]; counting it here records no
    /// status.
    pub fn record_call(&self, symbol: StubSymbol) {
        self.counts[symbol.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Count one suppressed `exit` and remember its status.
    ///
    /// The exit count, status, flag and history change together under the
    /// history lock, so [`Self::snapshot`] never sees them disagree.
    pub fn record_exit(&self, status: i32) {
        let mut history = self.exit_history.lock();
        self.record_call(StubSymbol::Exit);
        self.last_exit_status.store(status, Ordering::Relaxed);
        self.exit_requested.store(true, Ordering::Release);
        history.push(status);
    }

    #[must_use]
    pub fn count(&self, symbol: StubSymbol) -> u64 {
        self.counts[symbol.index()].load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn exit_requested(&self) -> bool {
        self.exit_requested.load(Ordering::Acquire)
    }

    /// Status of the most recent suppressed `exit`, if any.
    #[must_use]
    pub fn last_exit_status(&self) -> Option<i32> {
        let _history = self.exit_history.lock();
        self.exit_requested()
            .then(|| self.last_exit_status.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        let history = self.exit_history.lock();
        let mut counts = [0u64; STUB_COUNT];
        for (slot, counter) in counts.iter_mut().zip(&self.counts) {
            *slot = counter.load(Ordering::Relaxed);
        }
        let exit_requested = self.exit_requested();
        LedgerSnapshot {
            counts,
            exit_requested,
            last_exit_status: exit_requested
                .then(|| self.last_exit_status.load(Ordering::Relaxed)),
            recent_exit_statuses: history.to_vec(),
        }
    }

    /// Zero every counter and forget exit history.
    pub fn reset(&self) {
        let mut history = self.exit_history.lock();
        for counter in &self.counts {
            counter.store(0, Ordering::Relaxed);
        }
        self.exit_requested.store(false, Ordering::Release);
        self.last_exit_status.store(0, Ordering::Relaxed);
        *history = ExitHistory::new();
    }
}

impl Default for SuppressionLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of a [`SuppressionLedger`].
///
/// The exit fields (`counts[exit]`, `exit_requested`, `last_exit_status`,
/// `recent_exit_statuses`) are mutually consistent. Formatting counts are
/// each read atomically but not as a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub counts: [u64; STUB_COUNT],
    pub exit_requested: bool,
    pub last_exit_status: Option<i32>,
    /// Oldest first, at most [`EXIT_HISTORY_CAP`] entries.
    pub recent_exit_statuses: Vec<i32>,
}

impl LedgerSnapshot {
    #[must_use]
    pub fn count(&self, symbol: StubSymbol) -> u64 {
        self.counts[symbol.index()]
    }

    #[must_use]
    pub fn total_suppressed(&self) -> u64 {
        self.counts.iter().sum()
    }
}

static LEDGER: SuppressionLedger = SuppressionLedger::new();

/// The process-global ledger the exported stubs write to.
#[must_use]
pub fn ledger() -> &'static SuppressionLedger {
    &LEDGER
}
