//! How the stubs get in front of libc at link time.
//!
//! Two mechanisms are supported:
//! - [`LinkMechanism::Interpose`]: stubs carry the libc names (`printf`, ...)
//!   and must be linked ahead of libc.
//! - [`LinkMechanism::Wrap`]: stubs are named `__wrap_<name>` and the final
//!   link passes `-Wl,--wrap=<name>`, so only objects linked with that flag
//!   are redirected.

use crate::symbol::StubSymbol;

/// Prefix GNU ld expects for `--wrap` replacements.
pub const WRAP_PREFIX: &str = "__wrap_";

/// Host control functions exported alongside the stubs.
pub const CONTROL_SYMBOLS: [&str; 7] = [
    "ephemshim_init",
    "ephemshim_set_mode",
    "ephemshim_get_mode",
    "ephemshim_exit_requested",
    "ephemshim_last_exit_status",
    "ephemshim_suppressed_count",
    "ephemshim_reset_ledger",
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkMechanism {
    #[default]
    Interpose,
    Wrap,
}

impl LinkMechanism {
    /// Parse from string (case-insensitive). Unknown values map to `Interpose`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "wrap" | "linker-wrap" | "--wrap" => Self::Wrap,
            _ => Self::Interpose,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interpose => "interpose",
            Self::Wrap => "wrap",
        }
    }
}

/// Symbol name the stub for `symbol` is exported under.
#[must_use]
pub fn exported_name(symbol: StubSymbol, mechanism: LinkMechanism) -> String {
    match mechanism {
        LinkMechanism::Interpose => symbol.name().to_string(),
        LinkMechanism::Wrap => format!("{WRAP_PREFIX}{}", symbol.name()),
    }
}

/// Linker arguments the final link needs for `mechanism`.
///
/// Interposition forces each stub to be pulled out of the static archive
/// before libc is searched; wrapping redirects every reference.
#[must_use]
pub fn linker_args(mechanism: LinkMechanism) -> Vec<String> {
    StubSymbol::ALL
        .into_iter()
        .map(|sym| match mechanism {
            LinkMechanism::Interpose => format!("-Wl,--undefined={}", sym.name()),
            LinkMechanism::Wrap => format!("-Wl,--wrap={}", sym.name()),
        })
        .collect()
}

/// GNU ld version script exporting only the stubs and the control ABI.
#[must_use]
pub fn render_version_script(mechanism: LinkMechanism) -> String {
    let mut out = String::from("{\n  global:\n");
    for sym in StubSymbol::ALL {
        out.push_str("    ");
        out.push_str(&exported_name(sym, mechanism));
        out.push_str(";\n");
    }
    for name in CONTROL_SYMBOLS {
        out.push_str("    ");
        out.push_str(name);
        out.push_str(";\n");
    }
    out.push_str("  local:\n    *;\n};\n");
    out
}
