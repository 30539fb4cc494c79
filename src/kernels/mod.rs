//! This module serves as the public API for the collection of pure, stateless
//! sample-transform kernels. Kernels never touch a container; the pipelines in
//! `crate::pipeline` fetch the buffers and hand them over.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Logic: per-channel bitstreams <-> packed sample units.
pub mod bitmerge;

/// Analog: raw bytes -> physical `f32` values.
pub mod analog;
