//! This module contains the pure, stateless kernels for merging per-channel
//! logic bitstreams into sigrok's packed sample units, and for splitting them
//! back apart.
//!
//! A `.dsl` block stores every logic channel as its own bitstream. sigrok wants
//! one stream of samples where each sample is `unitsize` bytes and holds bit
//! `p` for channel `p`. Both directions use little-endian bit order: bit 0 of
//! byte 0 is the first sample. Merging is a bit-level transpose, so no probe or
//! sample is ever reordered. This module is PURE RUST and relies on `bitvec`.

use bitvec::prelude::*;

use crate::error::{ConvertError, Result};
use crate::format::unitsize;

//==================================================================================
// 1. Generic Core Logic (The "Engine")
//==================================================================================

/// Transposes `samples` bits of every channel into packed sample units.
fn merge_slices(channels: &[&BitSlice<u8, Lsb0>], samples: usize) -> BitVec<u8, Lsb0> {
    let unit_bits = unitsize(channels.len()) * 8;
    let padding = unit_bits - channels.len();
    let mut merged = BitVec::<u8, Lsb0>::with_capacity(samples * unit_bits);

    for sample in 0..samples {
        for channel in channels {
            merged.push(channel[sample]);
        }
        // Unused high bits of the last byte in each unit stay zero.
        merged.resize(merged.len() + padding, false);
    }

    merged
}

/// Pulls channel bitstreams back out of packed sample units.
fn split_slice(packed: &BitSlice<u8, Lsb0>, probe_count: usize) -> Vec<BitVec<u8, Lsb0>> {
    let unit_bits = unitsize(probe_count) * 8;
    let samples = packed.len() / unit_bits;
    let mut channels = vec![BitVec::<u8, Lsb0>::with_capacity(samples); probe_count];

    for unit in packed.chunks_exact(unit_bits) {
        for (probe, channel) in channels.iter_mut().enumerate() {
            channel.push(unit[probe]);
        }
    }

    channels
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Merges the first `samples` bits of each channel into `output_buf`.
///
/// The output is exactly `samples * unitsize(channels.len())` bytes.
///
/// # Errors
/// Returns `ConvertError::InternalError` if there are no channels or a channel
/// holds fewer than `samples` bits. Callers decide how unequal channels are
/// reconciled before calling this kernel.
pub fn merge(channels: &[&[u8]], samples: usize, output_buf: &mut Vec<u8>) -> Result<()> {
    if channels.is_empty() {
        return Err(ConvertError::InternalError(
            "bitstream merge needs at least one channel".to_string(),
        ));
    }
    if let Some((probe, short)) = channels
        .iter()
        .enumerate()
        .find(|(_, c)| c.len() * 8 < samples)
    {
        return Err(ConvertError::InternalError(format!(
            "channel {} holds {} bits, {} samples requested",
            probe,
            short.len() * 8,
            samples
        )));
    }

    let bit_channels: Vec<&BitSlice<u8, Lsb0>> = channels
        .iter()
        .map(|c| BitSlice::<u8, Lsb0>::from_slice(c))
        .collect();

    log_metric!("event"="bitmerge", "channels"=channels.len(), "samples"=samples);

    let merged = merge_slices(&bit_channels, samples);
    output_buf.clear();
    output_buf.extend_from_slice(merged.as_raw_slice());
    Ok(())
}

/// Splits packed sample units back into one bitstream per channel.
///
/// Each returned channel holds one bit per sample, padded with zero bits to a
/// whole byte.
///
/// # Errors
/// Returns `ConvertError::InternalError` if `probe_count` is zero or `packed`
/// is not a whole number of units.
pub fn split(packed: &[u8], probe_count: usize) -> Result<Vec<Vec<u8>>> {
    let unit = unitsize(probe_count);
    if unit == 0 || packed.len() % unit != 0 {
        return Err(ConvertError::InternalError(format!(
            "{} packed bytes do not form whole {}-byte units",
            packed.len(),
            unit
        )));
    }
    let channels = split_slice(BitSlice::<u8, Lsb0>::from_slice(packed), probe_count);
    Ok(channels
        .into_iter()
        .map(|mut channel| {
            channel.set_uninitialized(false);
            channel.into_vec()
        })
        .collect())
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
