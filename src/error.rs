// In: src/error.rs

//! This module defines the single, unified error type for the entire dsl2sr library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Only fatal conditions live here. Per-probe conditions that a conversion is
//! allowed to survive are modelled separately as [`ConversionWarning`] so that a
//! structural absence and a per-item absence can never be confused.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    // =========================================================================
    // === Header & Dispatch Errors (abort before any data is transformed)
    // =========================================================================
    #[error("Unsupported header format version: found {found}, supported {supported}")]
    UnsupportedVersion { found: String, supported: u32 },

    #[error("Unknown capture driver: '{0}'")]
    UnknownDriver(String),

    #[error("Malformed record for probe {probe}: {reason}")]
    MalformedProbeRecord { probe: usize, reason: String },

    #[error("Missing required header field: {0}")]
    MissingField(String),

    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    // =========================================================================
    // === Data Errors
    // =========================================================================
    #[error("Required container entry '{0}' does not exist")]
    MissingEntry(String),

    #[error("Channel length mismatch in block {block}: probe {probe} has {actual} bytes, expected {expected}")]
    ChannelLengthMismatch {
        block: usize,
        probe: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid conversion state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g., file not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the zip archive layer backing both containers.
    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// An error from the Serde JSON library, typically during config loading.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// Result type alias for dsl2sr operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// A non-fatal condition recorded during a conversion. The affected output
/// entry is omitted; everything else proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionWarning {
    /// Neither the dedicated nor the paired layout holds data for this probe/block.
    MissingProbeData { probe: usize, block: usize },
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionWarning::MissingProbeData { probe, block } => {
                write!(f, "failed to convert probe {} block {}: no source data", probe, block)
            }
        }
    }
}
