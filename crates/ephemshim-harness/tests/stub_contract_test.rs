//! Integration test: checked-in stub contracts.
//!
//! Validates that:
//! 1. stub_contracts.json exists and parses.
//! 2. It verifies clean against the core symbol table.
//! 3. It is exactly what `generate-contracts` would write.
//! 4. Every contracted symbol is defined in the ABI source with a C signature.
//! 5. No ABI stub body formats, writes or terminates.
//!
//! Run: cargo test -p ephemshim-harness --test stub_contract_test

use std::path::{Path, PathBuf};

use ephemshim_core::StubSymbol;
use ephemshim_harness::contracts::{StubContractFile, verify_contracts};

fn workspace_root() -> PathBuf {
    let manifest = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest)
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn load_contracts() -> StubContractFile {
    let path = workspace_root().join("tests/conformance/stub_contracts.json");
    StubContractFile::from_file(&path).expect("stub_contracts.json should load")
}

fn abi_sources() -> Vec<String> {
    let src = workspace_root().join("crates/ephemshim-abi/src");
    ["stdio_abi.rs", "stdlib_abi.rs"]
        .iter()
        .map(|f| std::fs::read_to_string(src.join(f)).expect("ABI source should exist"))
        .collect()
}

#[test]
fn contracts_file_verifies_clean() {
    let file = load_contracts();
    let report = verify_contracts(&file);
    assert!(report.is_clean(), "findings: {:#?}", report.findings);
    assert_eq!(report.checked, StubSymbol::ALL.len());
}

#[test]
fn contracts_file_matches_generated() {
    let on_disk = load_contracts();
    assert_eq!(
        on_disk,
        StubContractFile::generate(),
        "regenerate with: cargo run -p ephemshim-harness -- generate-contracts"
    );
}

#[test]
fn every_contracted_symbol_is_defined_in_abi_source() {
    let source = abi_sources().join("\n");
    for contract in load_contracts().contracts {
        let needle = format!("extern \"C\" fn {}(", contract.symbol);
        assert!(
            source.contains(&needle),
            "{}: no `{needle}` in ABI source",
            contract.symbol
        );
        let wrap_name = format!("export_name = \"__wrap_{}\"", contract.symbol);
        assert!(
            source.contains(&wrap_name),
            "{}: missing linker-wrap export",
            contract.symbol
        );
    }
}

#[test]
fn abi_stubs_never_format_write_or_terminate() {
    let non_test: String = abi_sources()
        .iter()
        .map(|source| source.split("#[cfg(test)]").next().unwrap_or_default())
        .collect();
    for forbidden in [
        "process::exit",
        "libc::",
        "write(",
        "copy_nonoverlapping",
        "panic!",
        "todo!",
        "unimplemented!",
    ] {
        assert!(
            !non_test.contains(forbidden),
            "ABI stub source contains `{forbidden}`"
        );
    }
}
