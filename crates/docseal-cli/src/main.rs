//! Docseal CLI - notarize documents and verify them against a registry.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod errors;
mod extractor;
mod generator;
mod output;
mod registry;
mod settings;

use commands::{canonicalize, hash, notarize, register, verify};
use settings::StampArgs;

#[derive(Parser)]
#[command(name = "docseal")]
#[command(about = "Reproducible document notarization and verification")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute content and metadata identifiers for a document
    Notarize {
        /// Path to the document
        input: String,
        /// JSON file used as the generated metadata candidate
        #[arg(long)]
        candidate: Option<String>,
        #[command(flatten)]
        stamp: StampArgs,
        /// Output the full envelope as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a document and its metadata in a registry file
    Register {
        /// Path to the document
        input: String,
        /// Metadata JSON (a notarize envelope is accepted)
        #[arg(long)]
        metadata: String,
        /// Registry file
        #[arg(long, env = "DOCSEAL_REGISTRY")]
        registry: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify a document by its content identifier
    VerifyFile {
        /// Path to the document
        input: String,
        /// Registry file (lookup is skipped when absent)
        #[arg(long, env = "DOCSEAL_REGISTRY")]
        registry: Option<String>,
        /// Exit with code 2 if the document is not registered
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify a metadata JSON document by its metadata identifier
    VerifyMeta {
        /// Path to the metadata JSON
        input: String,
        /// Registry file (lookup is skipped when absent)
        #[arg(long, env = "DOCSEAL_REGISTRY")]
        registry: Option<String>,
        /// Exit with code 2 if the metadata is not registered
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show canonical bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Normalize onto the metadata schema before canonicalizing
        #[arg(long)]
        normalize: bool,
    },
    /// Hash a file with the content hash, or its text with the fingerprint hash
    Hash {
        /// Input file (or stdin if not provided)
        input: Option<String>,
        /// Use the text fingerprint hash instead of the content hash
        #[arg(long)]
        text: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Notarize {
            input,
            candidate,
            stamp,
            json,
        } => notarize::run(input, candidate, stamp, json).await,
        Commands::Register {
            input,
            metadata,
            registry,
            json,
        } => register::run(input, metadata, registry, json).await,
        Commands::VerifyFile {
            input,
            registry,
            strict,
            json,
        } => verify::run_file(input, registry, strict, json).await,
        Commands::VerifyMeta {
            input,
            registry,
            strict,
            json,
        } => verify::run_meta(input, registry, strict, json).await,
        Commands::Canonicalize { input, normalize } => canonicalize::run(input, normalize),
        Commands::Hash { input, text } => hash::run(input, text),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
