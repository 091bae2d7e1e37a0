use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure reported by a [`ChunkProcessor`](crate::ChunkProcessor).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransformError(String);

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        TransformError(message.into())
    }
}

/// Which end of the pipeline a close fault came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Sink,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Source => f.write_str("input"),
            Endpoint::Sink => f.write_str("output"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown processor type: {0}. Use 'case' or 'log'")]
    UnknownProcessor(String),

    #[error("Invalid processor pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Couldn't open input {}: {source}", path.display())]
    OpenInput { path: PathBuf, source: io::Error },

    #[error("Couldn't create output {}: {source}", path.display())]
    OpenOutput { path: PathBuf, source: io::Error },

    #[error("error reading: {0}")]
    Read(#[source] io::Error),

    #[error("error processing: {0}")]
    Transform(#[from] TransformError),

    #[error("error writing: {0}")]
    Write(#[source] io::Error),

    #[error("error closing {endpoint}: {source}")]
    Close {
        endpoint: Endpoint,
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
