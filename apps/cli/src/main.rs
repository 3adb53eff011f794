//! Dropcraft CLI
//!
//! Command-line front end for the Merkle distribution toolkit: generate a
//! distribution manifest from a balance map, verify an existing manifest,
//! and inspect individual claims. All file I/O lives here; the library
//! crates stay pure.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use dropcraft_core::Address;
use dropcraft_distributor::{parse_balance_map, DistributionManifest};
use dropcraft_logging::LogLevel;

/// Dropcraft - Merkle distribution toolkit
#[derive(Parser)]
#[command(name = "dropcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a distribution manifest from a balance-map JSON file
    Generate {
        /// Input JSON file mapping addresses to decimal-string balances
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file for the manifest
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Check every claim in a manifest against its Merkle root
    Verify {
        /// Manifest JSON file produced by `generate`
        #[arg(short, long)]
        manifest: PathBuf,
    },

    /// Print one claimant's index, amount, and proof
    Proof {
        /// Manifest JSON file produced by `generate`
        #[arg(short, long)]
        manifest: PathBuf,

        /// Claimant address (any accepted case)
        #[arg(short, long)]
        address: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    dropcraft_logging::init(LogLevel::from_verbose(cli.verbose));

    match cli.command {
        Commands::Generate { input, output } => generate(&input, &output),
        Commands::Verify { manifest } => verify(&manifest),
        Commands::Proof { manifest, address } => proof(&manifest, &address),
    }
}

fn generate(input: &Path, output: &Path) -> Result<()> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let json: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    let balances = json
        .as_object()
        .context("input must be a JSON object mapping addresses to string balances")?;

    let manifest = parse_balance_map(balances)?;

    let pretty = serde_json::to_string_pretty(&manifest)?;
    fs::write(output, pretty)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(
        "Wrote manifest for {} claimants to {}",
        manifest.claims.len(),
        output.display(),
    );

    // Root on stdout, for piping into deployment tooling
    println!("0x{}", hex::encode(manifest.merkle_root));
    Ok(())
}

fn verify(path: &Path) -> Result<()> {
    let manifest = load_manifest(path)?;
    manifest
        .verify()
        .with_context(|| format!("manifest {} failed verification", path.display()))?;

    println!(
        "OK: {} claims verified against root 0x{}",
        manifest.claims.len(),
        hex::encode(manifest.merkle_root),
    );
    Ok(())
}

fn proof(path: &Path, address: &str) -> Result<()> {
    let manifest = load_manifest(path)?;
    let canonical = Address::parse(address)
        .context("invalid claimant address")?
        .to_checksum();
    let claim = manifest
        .claims
        .get(&canonical)
        .with_context(|| format!("no claim for {canonical}"))?;

    println!("{}", serde_json::to_string_pretty(claim)?);
    Ok(())
}

fn load_manifest(path: &Path) -> Result<DistributionManifest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
