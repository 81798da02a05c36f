use shared::ParseError;
use std::io;
use thiserror::Error;

/// Everything that can go wrong between binding an endpoint and appending
/// markers.
///
/// Only [`IngestError::Bind`] stops the ingestion loop; the rest cost at
/// most one connection's chunk.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to bind {target}: {source}")]
    Bind {
        target: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),
    #[error("failed to read from connection: {0}")]
    Read(#[source] io::Error),
    #[error("malformed chunk: {0}")]
    MalformedInput(#[from] ParseError),
    #[error("connection closed without sending data")]
    EmptyRead,
}

impl IngestError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, IngestError::Bind { .. })
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
