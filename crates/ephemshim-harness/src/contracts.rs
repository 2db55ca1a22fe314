//! Stub contracts: the checked-in promise of what each stub does.
//!
//! `tests/conformance/stub_contracts.json` states, per symbol, the return
//! value, whether the stub terminates or writes its destination, and why the
//! stub exists. [`verify_contracts`] checks that file against the core
//! symbol table so the two cannot drift apart.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ephemshim_core::{StubBehavior, StubSymbol};

pub const CONTRACT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractBehavior {
    pub description: String,
    /// `None` for `void` stubs.
    pub returns: Option<i32>,
    pub terminates: bool,
    pub writes_destination: bool,
    pub panics: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubContract {
    pub symbol: String,
    pub family: String,
    pub behavior: ContractBehavior,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSummary {
    pub total: usize,
    pub formatting: usize,
    pub termination: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubContractFile {
    pub contract_version: u32,
    pub contracts: Vec<StubContract>,
    pub summary: ContractSummary,
}

impl StubContractFile {
    pub fn from_file(path: &Path) -> Result<Self, ContractError> {
        let content = std::fs::read_to_string(path).map_err(|source| ContractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ContractError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Contract file describing the current core symbol table.
    #[must_use]
    pub fn generate() -> Self {
        let contracts: Vec<StubContract> = StubSymbol::ALL
            .into_iter()
            .map(|sym| StubContract {
                symbol: sym.name().to_string(),
                family: sym.family().as_str().to_string(),
                behavior: ContractBehavior {
                    description: sym.behavior().description().to_string(),
                    returns: sym.stub_return(),
                    terminates: false,
                    writes_destination: false,
                    panics: false,
                },
                rationale: rationale_for(sym).to_string(),
            })
            .collect();
        let termination = contracts.iter().filter(|c| c.family == "termination").count();
        Self {
            contract_version: CONTRACT_VERSION,
            summary: ContractSummary {
                total: contracts.len(),
                formatting: contracts.len() - termination,
                termination,
            },
            contracts,
        }
    }
}

fn rationale_for(symbol: StubSymbol) -> &'static str {
    match symbol.behavior() {
        StubBehavior::ReportZeroBytes => {
            "vendored ephemeris diagnostics have no stdout on Wasm/mobile; formatting them is wasted work or a crash"
        }
        StubBehavior::ReturnToCaller => {
            "terminating from inside the vendored library kills the embedding host"
        }
    }
}

/// One problem found while verifying contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractFinding {
    pub symbol: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContractReport {
    pub checked: usize,
    pub findings: Vec<ContractFinding>,
}

impl ContractReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    fn flag(&mut self, symbol: &str, message: impl Into<String>) {
        self.findings.push(ContractFinding {
            symbol: symbol.to_string(),
            message: message.into(),
        });
    }
}

/// Check `file` against the core symbol table.
#[must_use]
pub fn verify_contracts(file: &StubContractFile) -> ContractReport {
    let mut report = ContractReport::default();

    if file.contract_version != CONTRACT_VERSION {
        report.flag(
            "<file>",
            format!(
                "contract_version {} != supported {CONTRACT_VERSION}",
                file.contract_version
            ),
        );
    }

    let mut seen = BTreeSet::new();
    for contract in &file.contracts {
        report.checked += 1;
        let name = contract.symbol.as_str();
        if !seen.insert(name) {
            report.flag(name, "duplicate contract");
            continue;
        }
        let Some(sym) = StubSymbol::from_name(name) else {
            report.flag(name, "not a stubbed symbol");
            continue;
        };

        if contract.family != sym.family().as_str() {
            report.flag(
                name,
                format!("family '{}' != '{}'", contract.family, sym.family().as_str()),
            );
        }
        if contract.behavior.returns != sym.stub_return() {
            report.flag(
                name,
                format!(
                    "returns {:?} != stub return {:?}",
                    contract.behavior.returns,
                    sym.stub_return()
                ),
            );
        }
        if contract.behavior.terminates {
            report.flag(name, "stubs never terminate the process");
        }
        if contract.behavior.writes_destination {
            report.flag(name, "stubs never write their destination");
        }
        if contract.behavior.panics {
            report.flag(name, "stubs never panic");
        }
        if contract.behavior.description.trim().is_empty() {
            report.flag(name, "empty description");
        }
        if contract.rationale.trim().is_empty() {
            report.flag(name, "empty rationale");
        }
    }

    for sym in StubSymbol::ALL {
        if !seen.contains(sym.name()) {
            report.flag(sym.name(), "missing contract");
        }
    }

    let termination = file
        .contracts
        .iter()
        .filter(|c| c.family == "termination")
        .count();
    let summary = &file.summary;
    if summary.total != file.contracts.len()
        || summary.termination != termination
        || summary.formatting + summary.termination != summary.total
    {
        report.flag(
            "<summary>",
            format!(
                "summary total={} formatting={} termination={} does not match {} contracts",
                summary.total,
                summary.formatting,
                summary.termination,
                file.contracts.len()
            ),
        );
    }

    report
}
