//! The summary handed back by a successful conversion.

use serde::Serialize;

use crate::error::ConversionWarning;
use crate::header::DriverKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub driver: DriverKind,
    /// `total probes` as declared by the source header.
    pub source_probes: usize,
    /// Probes present in the output: all of them for logic, enabled ones for analog.
    pub output_probes: usize,
    pub blocks: usize,
    /// Data entries written, excluding `version` and `metadata`.
    pub data_entries: usize,
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
