//! The stubbed symbol table.

/// Which part of libc a stub replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolFamily {
    /// `<stdio.h>` formatted output.
    Formatting,
    /// `<stdlib.h>` process termination.
    Termination,
}

impl SymbolFamily {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Formatting => "formatting",
            Self::Termination => "termination",
        }
    }
}

/// What a stub does instead of the libc behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubBehavior {
    /// No formatting, no I/O, destination untouched; returns `0`.
    ReportZeroBytes,
    /// Does not terminate; control goes back to the caller.
    ReturnToCaller,
}

impl StubBehavior {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReportZeroBytes => "report_zero_bytes",
            Self::ReturnToCaller => "return_to_caller",
        }
    }

    /// Human-readable description used in manifests and contract files.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ReportZeroBytes => {
                "accepts any arguments, performs no formatting or I/O, returns 0"
            }
            Self::ReturnToCaller => "records the status and returns without terminating",
        }
    }
}

/// A libc symbol replaced by the shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StubSymbol {
    Printf,
    Fprintf,
    Sprintf,
    Snprintf,
    Exit,
}

/// Number of stubbed symbols.
pub const STUB_COUNT: usize = 5;

impl StubSymbol {
    /// Every stubbed symbol, in index order.
    pub const ALL: [Self; STUB_COUNT] = [
        Self::Printf,
        Self::Fprintf,
        Self::Sprintf,
        Self::Snprintf,
        Self::Exit,
    ];

    /// The C symbol name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Printf => "printf",
            Self::Fprintf => "fprintf",
            Self::Sprintf => "sprintf",
            Self::Snprintf => "snprintf",
            Self::Exit => "exit",
        }
    }

    /// Stable dense index, matches the position in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Printf => 0,
            Self::Fprintf => 1,
            Self::Sprintf => 2,
            Self::Snprintf => 3,
            Self::Exit => 4,
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < STUB_COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Look up a symbol by its exact C name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sym| sym.name() == name)
    }

    #[must_use]
    pub const fn family(self) -> SymbolFamily {
        match self {
            Self::Exit => SymbolFamily::Termination,
            _ => SymbolFamily::Formatting,
        }
    }

    #[must_use]
    pub const fn behavior(self) -> StubBehavior {
        match self.family() {
            SymbolFamily::Formatting => StubBehavior::ReportZeroBytes,
            SymbolFamily::Termination => StubBehavior::ReturnToCaller,
        }
    }

    /// The C prototype the exported stub matches.
    #[must_use]
    pub const fn c_prototype(self) -> &'static str {
        match self {
            Self::Printf => "int printf(const char *fmt, ...)",
            Self::Fprintf => "int fprintf(FILE *stream, const char *fmt, ...)",
            Self::Sprintf => "int sprintf(char *str, const char *fmt, ...)",
            Self::Snprintf => "int snprintf(char *str, size_t size, const char *fmt, ...)",
            Self::Exit => "void exit(int status)",
        }
    }

    /// Value handed back to the caller: `Some(0)` for formatting stubs,
    /// `None` for `exit` (void).
    #[must_use]
    pub const fn stub_return(self) -> Option<i32> {
        match self.behavior() {
            StubBehavior::ReportZeroBytes => Some(0),
            StubBehavior::ReturnToCaller => None,
        }
    }
}

impl std::fmt::Display for StubSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
