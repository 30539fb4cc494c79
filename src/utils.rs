//! This module provides a set of shared, low-level utility functions used
//! throughout the dsl2sr core.
//!
//! Its primary responsibility is converting between typed sample slices and the
//! little-endian byte buffers both capture formats store.

use crate::error::{ConvertError, Result};

//==================================================================================
// 1. Core Utility Functions
//==================================================================================

/// Serializes `f32` samples as little-endian bytes.
pub fn f32_slice_to_le_bytes(values: &[f32]) -> Vec<u8> {
    #[cfg(target_endian = "little")]
    {
        bytemuck::cast_slice::<f32, u8>(values).to_vec()
    }
    #[cfg(not(target_endian = "little"))]
    {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }
}

/// Reads little-endian `f32` samples back out of a byte buffer.
///
/// # Errors
/// Returns `ConvertError::InternalError` if the length is not a multiple of four.
pub fn le_bytes_to_f32_vec(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % std::mem::size_of::<f32>() != 0 {
        return Err(ConvertError::InternalError(format!(
            "f32 buffer length {} is not a multiple of {}",
            bytes.len(),
            std::mem::size_of::<f32>()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
