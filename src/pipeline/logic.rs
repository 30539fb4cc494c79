//! The logic pipeline: one merged `logic-1-<N>` entry per `.dsl` block.

use crate::config::LengthMismatchPolicy;
use crate::container::{ContainerReader, ContainerWriter};
use crate::error::{ConvertError, Result};
use crate::format::{logic_output_entry, logic_source_entry};
use crate::header::DeviceDescriptor;
use crate::kernels::bitmerge;

/// Converts every block in ascending order. Returns the number of data entries written.
pub fn run<R, W>(
    descriptor: &DeviceDescriptor,
    policy: LengthMismatchPolicy,
    input: &mut R,
    output: &mut W,
) -> Result<usize>
where
    R: ContainerReader + ?Sized,
    W: ContainerWriter + ?Sized,
{
    let mut merged = Vec::new();

    for block in 0..descriptor.block_count {
        let channels = (0..descriptor.probe_count)
            .map(|probe| input.read_required(&logic_source_entry(probe, block)))
            .collect::<Result<Vec<Vec<u8>>>>()?;

        let samples = reconcile_lengths(block, &channels, policy)?;
        let refs: Vec<&[u8]> = channels.iter().map(Vec::as_slice).collect();
        bitmerge::merge(&refs, samples, &mut merged)?;

        let name = logic_output_entry(block);
        output.write_entry(&name, &merged)?;
        log::debug!("wrote {} ({} bytes, {} samples)", name, merged.len(), samples);
    }

    Ok(descriptor.block_count)
}

/// Number of samples to merge from one block's channels.
fn reconcile_lengths(
    block: usize,
    channels: &[Vec<u8>],
    policy: LengthMismatchPolicy,
) -> Result<usize> {
    let expected = channels.first().map_or(0, Vec::len);
    let mismatch = channels
        .iter()
        .enumerate()
        .find(|(_, c)| c.len() != expected);

    match (mismatch, policy) {
        (None, _) => Ok(expected * 8),
        (Some((probe, channel)), LengthMismatchPolicy::Reject) => {
            Err(ConvertError::ChannelLengthMismatch {
                block,
                probe,
                expected,
                actual: channel.len(),
            })
        }
        (Some(_), LengthMismatchPolicy::Truncate) => {
            let shortest = channels.iter().map(Vec::len).min().unwrap_or(0);
            log::warn!(
                "block {}: channel lengths differ, truncating every channel to {} bytes",
                block,
                shortest
            );
            Ok(shortest * 8)
        }
    }
}
