//! This file is the root of the `dsl2sr` Rust crate.
//!
//! `dsl2sr` transcodes DSLogic/DSCope `.dsl` captures into sigrok `.sr`
//! sessions. Its responsibilities are strictly limited to declaring the
//! top-level modules and re-exporting the conversion entry points.
//!
//! ```no_run
//! use dsl2sr::{convert_files, ConvertConfig};
//!
//! let config = ConvertConfig::new("capture.dsl", "capture.sr");
//! let report = convert_files(&config)?;
//! println!("{} data entries written", report.data_entries);
//! # Ok::<(), dsl2sr::ConvertError>(())
//! ```

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod config;
pub mod container;
pub mod error;
pub mod format;
pub mod header;
pub mod kernels;
pub mod metadata;
pub mod pipeline;
pub mod utils;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use config::{ConvertConfig, LengthMismatchPolicy, OutputCompression};
pub use error::{ConversionWarning, ConvertError, Result};
pub use pipeline::{convert_files, ConversionReport, ConversionState, Orchestrator};
