//! Machine-readable description of the shim for a given link mechanism.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use ephemshim_core::config::MODE_ENV_VAR;
use ephemshim_core::link::{
    CONTROL_SYMBOLS, exported_name, linker_args, render_version_script,
};
use ephemshim_core::{LinkMechanism, ShimMode, StubSymbol};

pub const MANIFEST_VERSION: u32 = 1;

/// One stubbed symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub symbol: String,
    pub family: String,
    pub prototype: String,
    pub behavior: String,
    pub description: String,
    pub exported_name: String,
    /// `None` for `void` stubs.
    pub returns: Option<i32>,
}

impl SymbolEntry {
    #[must_use]
    pub fn new(symbol: StubSymbol, mechanism: LinkMechanism) -> Self {
        Self {
            symbol: symbol.name().to_string(),
            family: symbol.family().as_str().to_string(),
            prototype: symbol.c_prototype().to_string(),
            behavior: symbol.behavior().as_str().to_string(),
            description: symbol.behavior().description().to_string(),
            exported_name: exported_name(symbol, mechanism),
            returns: symbol.stub_return(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolManifest {
    pub manifest_version: u32,
    pub mechanism: String,
    pub mode_env_var: String,
    pub default_mode: String,
    pub symbols: Vec<SymbolEntry>,
    pub control_symbols: Vec<String>,
    pub linker_args: Vec<String>,
    pub version_script_sha256: String,
}

impl SymbolManifest {
    #[must_use]
    pub fn build(mechanism: LinkMechanism) -> Self {
        Self {
            manifest_version: MANIFEST_VERSION,
            mechanism: mechanism.as_str().to_string(),
            mode_env_var: MODE_ENV_VAR.to_string(),
            default_mode: ShimMode::default().as_str().to_string(),
            symbols: StubSymbol::ALL
                .into_iter()
                .map(|sym| SymbolEntry::new(sym, mechanism))
                .collect(),
            control_symbols: CONTROL_SYMBOLS.iter().map(|s| (*s).to_string()).collect(),
            linker_args: linker_args(mechanism),
            version_script_sha256: sha256_hex(render_version_script(mechanism).as_bytes()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_lists_every_stub_once() {
        let manifest = SymbolManifest::build(LinkMechanism::Interpose);
        let names: Vec<_> = manifest.symbols.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(names, ["printf", "fprintf", "sprintf", "snprintf", "exit"]);
        assert_eq!(manifest.mechanism, "interpose");
        assert_eq!(manifest.default_mode, "audit");
        assert_eq!(manifest.mode_env_var, "EPHEMSHIM_MODE");
    }

    #[test]
    fn wrap_manifest_uses_wrap_names() {
        let manifest = SymbolManifest::build(LinkMechanism::Wrap);
        assert!(
            manifest
                .symbols
                .iter()
                .all(|e| e.exported_name == format!("__wrap_{}", e.symbol))
        );
        assert!(manifest.linker_args.iter().all(|a| a.starts_with("-Wl,--wrap=")));
    }

    #[test]
    fn exit_entry_is_void_and_non_terminating() {
        let manifest = SymbolManifest::build(LinkMechanism::Interpose);
        let exit = manifest
            .symbols
            .iter()
            .find(|e| e.symbol == "exit")
            .unwrap();
        assert_eq!(exit.returns, None);
        assert_eq!(exit.behavior, "return_to_caller");
        assert_eq!(exit.family, "termination");
    }

    #[test]
    fn version_script_digest_depends_on_mechanism() {
        let a = SymbolManifest::build(LinkMechanism::Interpose);
        let b = SymbolManifest::build(LinkMechanism::Wrap);
        assert_eq!(a.version_script_sha256.len(), 64);
        assert_ne!(a.version_script_sha256, b.version_script_sha256);
        assert_eq!(a, SymbolManifest::build(LinkMechanism::Interpose));
    }

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn manifest_json_round_trips() {
        let manifest = SymbolManifest::build(LinkMechanism::Wrap);
        let json = manifest.to_json().unwrap();
        let parsed: SymbolManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, manifest);
    }
}
