//! CLI error types

use std::io;
use std::path::PathBuf;

use arbor::OptionsError;

/// Errors that abort a CLI run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A script step could not be parsed.
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    /// A script step names a node that is not in the tree.
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// An input file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// An input file is not valid JSON for its purpose.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Options(#[from] OptionsError),

    /// Writing the log file or the rendered tree failed.
    #[error("Output error: {0}")]
    Output(#[from] io::Error),

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}
