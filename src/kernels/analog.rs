//! This module contains the pure, stateless kernels for analog samples.
//!
//! `.dsl` analog probes store one unsigned byte per sample. Two layouts exist:
//! a dedicated buffer per probe, or a paired buffer where two probes alternate
//! byte by byte. sigrok wants physical values as little-endian `f32`, computed
//! as `(offset - raw) / divisor` in single precision.

use crate::error::{ConvertError, Result};
use crate::utils::f32_slice_to_le_bytes;

//==================================================================================
// 1. Core Logic
//==================================================================================

/// Rescales one raw byte sample into a physical value.
#[inline]
pub fn rescale_sample(raw: u8, voltage_offset: i64, voltage_divisor: i64) -> f32 {
    (voltage_offset - i64::from(raw)) as f32 / voltage_divisor as f32
}

/// Selects one probe's bytes out of a paired buffer: lane 0 takes even
/// positions, lane 1 takes odd positions.
pub fn deinterleave(paired: &[u8], lane: usize) -> Vec<u8> {
    paired.iter().skip(lane % 2).step_by(2).copied().collect()
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Rescales `raw` into `output_buf` as little-endian `f32`, one per input byte.
///
/// # Errors
/// Returns `ConvertError::InternalError` for a zero divisor. Probe records with
/// a zero divisor are rejected during header parsing, so this is a bug guard.
pub fn repack(
    raw: &[u8],
    voltage_offset: i64,
    voltage_divisor: i64,
    output_buf: &mut Vec<u8>,
) -> Result<()> {
    if voltage_divisor == 0 {
        return Err(ConvertError::InternalError(
            "analog repack called with a zero divisor".to_string(),
        ));
    }

    let physical: Vec<f32> = raw
        .iter()
        .map(|&r| rescale_sample(r, voltage_offset, voltage_divisor))
        .collect();

    output_buf.clear();
    output_buf.extend_from_slice(&f32_slice_to_le_bytes(&physical));
    Ok(())
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::le_bytes_to_f32_vec;
    use proptest::prelude::*;

    #[test]
    fn test_rescale_example() {
        assert_eq!(rescale_sample(108, 128, 10), 2.0);
        assert_eq!(rescale_sample(128, 128, 10), 0.0);
        assert_eq!(rescale_sample(255, 128, 127), -1.0);
        assert_eq!(rescale_sample(0, 0, 3), 0.0);
    }

    #[test]
    fn test_repack_writes_le_f32_in_sample_order() {
        let mut out = Vec::new();
        repack(&[108, 128, 148], 128, 10, &mut out).unwrap();
        assert_eq!(out.len(), 12);
        assert_eq!(&out[..4], &2.0f32.to_le_bytes());
        assert_eq!(le_bytes_to_f32_vec(&out).unwrap(), vec![2.0, 0.0, -2.0]);
    }

    #[test]
    fn test_repack_empty_and_zero_divisor() {
        let mut out = vec![1, 2, 3];
        repack(&[], 128, 10, &mut out).unwrap();
        assert!(out.is_empty());
        assert!(repack(&[1], 128, 0, &mut out).is_err());
    }

    #[test]
    fn test_deinterleave_even_and_odd_lanes() {
        let paired = [10, 11, 20, 21, 30, 31];
        assert_eq!(deinterleave(&paired, 0), vec![10, 20, 30]);
        assert_eq!(deinterleave(&paired, 1), vec![11, 21, 31]);
        // Lane is taken modulo two, so the probe index itself can be passed.
        assert_eq!(deinterleave(&paired, 3), vec![11, 21, 31]);
        assert_eq!(deinterleave(&[7], 1), Vec::<u8>::new());
    }

    proptest! {
        #[test]
        fn prop_rescale_is_bit_deterministic(
            raw in any::<u8>(),
            offset in -100_000i64..100_000,
            divisor in prop_oneof![-5000i64..-1, 1i64..5000],
        ) {
            let first = rescale_sample(raw, offset, divisor).to_bits();
            let second = rescale_sample(raw, offset, divisor).to_bits();
            let expected = ((offset - raw as i64) as f32 / divisor as f32).to_bits();
            prop_assert_eq!(first, second);
            prop_assert_eq!(first, expected);
        }
    }
}
