use std::fmt;

use thiserror::Error;

/// Which end of a requested itinerary an airport code refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin => write!(f, "Origin"),
            Endpoint::Destination => write!(f, "Destination"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{endpoint} airport not found: {code}")]
    AirportNotFound { endpoint: Endpoint, code: String },

    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse flight network JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write flight report: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to build flight network: {0}")]
    ModelConstructionError(String),
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
