// In: src/format.rs

//! Defines all entry names and constants for both capture formats.
//! This is the single source of truth for how `.dsl` entries are looked up and
//! how `.sr` entries are named. Source numbering is 0-based throughout; every
//! sigrok name is 1-based.

//==================================================================================
// I. Source Format (DSLogic `.dsl`)
//==================================================================================

/// The only `.dsl` header format version this converter understands.
pub const SUPPORTED_HEADER_VERSION: u32 = 3;

/// The textual header entry of a `.dsl` capture.
pub const HEADER_ENTRY: &str = "header";

/// One bit-packed logic channel for one block.
pub fn logic_source_entry(probe: usize, block: usize) -> String {
    format!("L-{}/{}", probe, block)
}

/// One byte per sample for a single analog probe.
pub fn analog_dedicated_entry(probe: usize, block: usize) -> String {
    format!("O-{}/{}", probe, block)
}

/// Interleaved samples of the probe pair `probe / 2`.
pub fn analog_paired_entry(probe: usize, block: usize) -> String {
    format!("A-{}/{}", probe / 2, block)
}

//==================================================================================
// II. Destination Format (sigrok `.sr`)
//==================================================================================

pub const VERSION_ENTRY: &str = "version";
pub const METADATA_ENTRY: &str = "metadata";

/// The `sigrok version` marker written to the `[global]` section.
pub const SIGROK_VERSION: &str = "0.6.0";

/// Prefix shared by every logic data entry; also the `capturefile` value.
pub const LOGIC_CAPTURE_FILE: &str = "logic-1";

pub fn logic_output_entry(block: usize) -> String {
    format!("{}-{}", LOGIC_CAPTURE_FILE, block + 1)
}

pub fn analog_output_entry(probe: usize, block: usize) -> String {
    format!("analog-1-{}-{}", probe + 1, block + 1)
}

/// Bytes needed to hold one packed multi-channel logic sample.
pub fn unitsize(probe_count: usize) -> usize {
    probe_count.div_ceil(8)
}
