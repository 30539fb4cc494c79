// In: src/container/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Container Layer
// ====================================================================================
//
// Both capture formats are keyed archives of whole byte blobs. The conversion
// engine never sees a zip file; it only talks to these two traits:
//
//   [ContainerReader]  list / exists / read       <- the `.dsl` capture
//   [ContainerWriter]  write                      -> the `.sr` session
//
// Absence is never an error at this layer. `read_entry` answers `Ok(None)` and
// the caller decides whether that absence is fatal (`read_required`) or a
// per-item condition (analog layout fallback).
//
// ====================================================================================

pub mod memory;
pub mod zip_archive;

pub use memory::MemoryContainer;
pub use zip_archive::{DeferredZipWriter, ZipContainerReader, ZipContainerWriter};

use crate::error::{ConvertError, Result};

/// Read side of a capture container.
pub trait ContainerReader {
    /// Names of every entry, in archive order.
    fn entry_names(&self) -> Vec<String>;

    fn entry_exists(&self, name: &str) -> bool;

    /// Reads one entry as a complete blob. `Ok(None)` means the entry does not exist.
    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Reads an entry whose absence makes the conversion impossible.
    fn read_required(&mut self, name: &str) -> Result<Vec<u8>> {
        self.read_entry(name)?
            .ok_or_else(|| ConvertError::MissingEntry(name.to_string()))
    }
}

/// Write side of a capture container. Each call produces one complete entry.
pub trait ContainerWriter {
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<()>;
}
