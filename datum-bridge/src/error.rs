//! Error type for the bridge crate

use datum_bridge_core::{BridgeError, TypeOid};
use thiserror::Error;

/// Errors surfaced by conversion, view access and configuration loading
#[derive(Error, Debug)]
pub enum Error {
    /// A hard conversion or access failure from the core rules
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// No decode strategy for the type, raised only in strict mode
    #[error("No decode strategy registered for {0}")]
    Unmapped(TypeOid),

    /// Configuration or catalog description could not be parsed
    #[cfg(feature = "serde")]
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// The underlying core error, if this is one
    pub fn as_bridge(&self) -> Option<BridgeError> {
        match self {
            Error::Bridge(err) => Some(*err),
            _ => None,
        }
    }
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, Error>;
