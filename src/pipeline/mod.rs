// In: src/pipeline/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Conversion Pipeline
// ====================================================================================
//
//   1. [Orchestrator]  reads `header`, owns the Dispatcher and both containers
//         |
//         `-> [Dispatcher] Start -> VersionChecked -> DriverIdentified
//                 |
//                 |-> LogicPipeline  : kernels::bitmerge once per block
//                 `-> AnalogPipeline : kernels::analog once per enabled probe per block
//         |
//   2. [Metadata Emitter] builds `metadata` from the final descriptor
//         |
//         `-> MetadataEmitted -> Complete
//
// Any fatal error moves the Dispatcher to `Failed` and stops all writes.
// Analog layout misses are warnings and never leave the happy path.
//
// ====================================================================================

pub mod analog;
pub mod dispatch;
pub mod logic;
pub mod orchestrator;
pub mod report;

pub use dispatch::{ConversionState, Dispatcher, PipelineKind};
pub use orchestrator::{convert_files, Orchestrator};
pub use report::ConversionReport;
