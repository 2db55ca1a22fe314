//! Tooling for the ephemshim libc stubs.
//!
//! This crate provides:
//! - Symbol manifests: what is stubbed, under which names, with which behavior
//! - Link arguments and version scripts for interposition or `--wrap` builds
//! - Contract verification: checked-in stub contracts vs the core symbol table
//! - Structured JSONL logging for tooling runs

#![forbid(unsafe_code)]

pub mod contracts;
pub mod manifest;
pub mod structured_log;

pub use contracts::{ContractError, ContractReport, StubContractFile};
pub use manifest::SymbolManifest;
