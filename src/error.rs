//! Failure taxonomy for the moderation pipeline.
//!
//! Every failure surfaces to the top-level runner; nothing is swallowed
//! or replaced with a default value.

use thiserror::Error;

/// Errors from invoking a remote capability endpoint.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request never produced a usable HTTP response (connection
    /// refused, timeout, unreadable body).
    #[error("transport failure calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The capability answered, but with an error payload, a non-2xx
    /// status, or a payload missing the expected field.
    #[error("capability at {endpoint} failed: {detail}")]
    Remote { endpoint: String, detail: String },
}

/// Top-level pipeline failure. All variants are fatal: a failing row
/// aborts the whole run rather than being skipped.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Not enough file arguments provided. Both input and output files are required.")]
    MissingFileArgument,

    /// The input file could not be opened or read.
    #[error("cannot read input file {path}: {source}")]
    InputUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A header or row in the input file is missing required fields.
    #[error("malformed input at line {line}: {detail}")]
    InputMalformed { line: usize, detail: String },

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Database failure. Rows appended before the failure stay durable.
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The report could not be written. The aggregate itself already
    /// succeeded, so the caller may retry with another path.
    #[error("cannot write output file {path}: {source}")]
    OutputUnwritable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
