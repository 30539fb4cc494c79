// In: src/config.rs

//! The single source of truth for all dsl2sr conversion configuration.
//!
//! This module defines the unified `ConvertConfig` struct, which is created once
//! at the application boundary (e.g., from command line options or a JSON
//! document) and then passed by reference into the orchestrator. Nothing in the
//! library reads process-wide state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

//==================================================================================
// I. Core Configuration Enums
//==================================================================================

/// Compression method applied to every entry of the output `.sr` archive.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputCompression {
    /// **Default:** Deflate, matching what sigrok itself writes.
    #[default]
    Deflated,
    /// Entries are stored uncompressed. Faster, and handy for inspecting output.
    Stored,
}

/// What to do when the per-probe logic buffers of one block differ in length.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LengthMismatchPolicy {
    /// **Default:** Abort the conversion with `ChannelLengthMismatch`.
    #[default]
    Reject,
    /// Cut every channel down to the shortest buffer in the block and continue.
    Truncate,
}

//==================================================================================
// II. The Unified ConvertConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ConvertConfig {
    /// Path of the `.dsl` capture to read.
    #[serde(default)]
    pub input: PathBuf,

    /// Path of the `.sr` session to create. An existing file is replaced.
    #[serde(default)]
    pub output: PathBuf,

    #[serde(default)]
    pub compression: OutputCompression,

    #[serde(default)]
    pub length_mismatch: LengthMismatchPolicy,

    /// The value written to the output `version` entry.
    #[serde(default = "default_output_format_version")]
    pub output_format_version: u32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::new(),
            compression: OutputCompression::default(),
            length_mismatch: LengthMismatchPolicy::default(),
            output_format_version: default_output_format_version(),
        }
    }
}

impl ConvertConfig {
    /// Builds a config for the given input/output paths with every other setting defaulted.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON config document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Helper for `serde` to provide the sigrok session format generation.
fn default_output_format_version() -> u32 {
    2
}
