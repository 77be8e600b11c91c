use docseal_core::{PipelineError, RegistryError};
use thiserror::Error;

/// Errors raised by CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    /// Input file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The notarization pipeline aborted.
    #[error("notarization aborted: {}", .0.reason())]
    Aborted(#[from] PipelineError),
    /// The registry rejected or failed the registration.
    #[error("registration failed: {0}")]
    Registration(#[from] RegistryError),
}
