//! CLI entrypoint for ephemshim tooling.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ephemshim_core::LinkMechanism;
use ephemshim_core::link::{linker_args, render_version_script};
use ephemshim_harness::SymbolManifest;
use ephemshim_harness::contracts::{StubContractFile, verify_contracts};
use ephemshim_harness::structured_log::{LogEmitter, LogLevel, Outcome};

/// Tooling for the ephemshim libc stubs.
#[derive(Debug, Parser)]
#[command(name = "ephemshim-harness")]
#[command(about = "Manifest, link-argument and contract tooling for ephemshim")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Emit the JSON symbol manifest.
    Manifest {
        /// Link mechanism (`interpose` or `wrap`).
        #[arg(long, default_value = "interpose")]
        mechanism: String,
        /// Output JSON path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the linker arguments for a mechanism, one per line.
    LinkArgs {
        #[arg(long, default_value = "interpose")]
        mechanism: String,
    },
    /// Emit the GNU ld version script for a mechanism.
    VersionScript {
        #[arg(long, default_value = "interpose")]
        mechanism: String,
        /// Output path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write a contract file generated from the current symbol table.
    GenerateContracts {
        #[arg(long, default_value = "tests/conformance/stub_contracts.json")]
        output: PathBuf,
    },
    /// Verify a stub contract file against the symbol table.
    VerifyContracts {
        #[arg(long, default_value = "tests/conformance/stub_contracts.json")]
        contracts: PathBuf,
        /// Structured JSONL log output path.
        #[arg(
            long,
            default_value = "target/conformance/stub_contracts.log.jsonl"
        )]
        log: PathBuf,
    },
}

fn write_or_print(output: Option<PathBuf>, content: &str) -> std::io::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, content)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Manifest { mechanism, output } => {
            let manifest = SymbolManifest::build(LinkMechanism::from_str_loose(&mechanism));
            write_or_print(output, &manifest.to_json()?)?;
        }
        Command::LinkArgs { mechanism } => {
            for arg in linker_args(LinkMechanism::from_str_loose(&mechanism)) {
                println!("{arg}");
            }
        }
        Command::VersionScript { mechanism, output } => {
            let script = render_version_script(LinkMechanism::from_str_loose(&mechanism));
            write_or_print(output, script.trim_end())?;
        }
        Command::GenerateContracts { output } => {
            let file = StubContractFile::generate();
            let json = serde_json::to_string_pretty(&file)?;
            std::fs::write(&output, json + "\n")?;
            eprintln!("Wrote {} contracts to {}", file.contracts.len(), output.display());
        }
        Command::VerifyContracts { contracts, log } => {
            let run_id = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs()
                .to_string();
            let mut emitter = LogEmitter::to_file(&log, &run_id)?;
            let file = StubContractFile::from_file(&contracts)?;
            let report = verify_contracts(&file);

            for finding in &report.findings {
                let entry = emitter
                    .entry(LogLevel::Error, "contract_finding")
                    .with_symbol(&finding.symbol)
                    .with_outcome(Outcome::Fail)
                    .with_details(serde_json::json!({ "message": finding.message }));
                emitter.emit_entry(&entry)?;
                eprintln!("{}: {}", finding.symbol, finding.message);
            }
            let outcome = if report.is_clean() {
                Outcome::Pass
            } else {
                Outcome::Fail
            };
            let summary = emitter
                .entry(LogLevel::Info, "contract_verification")
                .with_outcome(outcome)
                .with_artifacts(vec![contracts.display().to_string()])
                .with_details(serde_json::json!({
                    "checked": report.checked,
                    "findings": report.findings.len(),
                }));
            emitter.emit_entry(&summary)?;
            emitter.flush()?;

            eprintln!(
                "Contract verification: checked={}, findings={}",
                report.checked,
                report.findings.len()
            );
            if !report.is_clean() {
                return Err("stub contract verification failed".into());
            }
        }
    }

    Ok(())
}
