//! The analog pipeline: one `analog-1-<probe>-<block>` entry per enabled probe
//! and block, resolved through the dedicated-then-paired layout fallback.

use serde::Serialize;

use crate::container::{ContainerReader, ContainerWriter};
use crate::error::{ConversionWarning, ConvertError, Result};
use crate::format::{analog_dedicated_entry, analog_output_entry, analog_paired_entry};
use crate::header::{DeviceDescriptor, ProbeDescriptor};
use crate::kernels::analog;

/// Where a probe's raw samples were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLayout {
    /// `O-<probe>/<block>`: contiguous bytes for this probe only.
    Dedicated,
    /// `A-<probe / 2>/<block>`: two probes interleaved byte by byte.
    Paired,
}

#[derive(Debug, Default)]
pub struct AnalogOutcome {
    pub entries_written: usize,
    pub warnings: Vec<ConversionWarning>,
}

/// Fetches one probe's raw samples for one block. `Ok(None)` means neither
/// layout holds the data, which callers treat as a per-item miss.
pub fn fetch_probe_samples<R>(
    input: &mut R,
    probe: usize,
    block: usize,
) -> Result<Option<(SourceLayout, Vec<u8>)>>
where
    R: ContainerReader + ?Sized,
{
    if let Some(raw) = input.read_entry(&analog_dedicated_entry(probe, block))? {
        return Ok(Some((SourceLayout::Dedicated, raw)));
    }
    if let Some(paired) = input.read_entry(&analog_paired_entry(probe, block))? {
        return Ok(Some((SourceLayout::Paired, analog::deinterleave(&paired, probe % 2))));
    }
    Ok(None)
}

/// Converts probes in index order, blocks ascending within each probe.
///
/// Disabled probes lower `descriptor.probe_count` and are skipped. Missing
/// data is recorded as a warning and does not stop the pipeline.
pub fn run<R, W>(
    descriptor: &mut DeviceDescriptor,
    probes: &[ProbeDescriptor],
    input: &mut R,
    output: &mut W,
) -> Result<AnalogOutcome>
where
    R: ContainerReader + ?Sized,
    W: ContainerWriter + ?Sized,
{
    let mut outcome = AnalogOutcome::default();
    let mut physical = Vec::new();

    for probe in probes {
        if !probe.enabled {
            descriptor.probe_count = descriptor.probe_count.checked_sub(1).ok_or_else(|| {
                ConvertError::InternalError(format!(
                    "disabled probe {} drove the probe count below zero",
                    probe.index
                ))
            })?;
            log::info!("Skipping disabled probe {} ({})", probe.index, probe.name);
            continue;
        }

        for block in 0..descriptor.block_count {
            let Some((layout, raw)) = fetch_probe_samples(input, probe.index, block)? else {
                log::warn!("Failed to convert probe {} block {}", probe.index, block);
                outcome.warnings.push(ConversionWarning::MissingProbeData {
                    probe: probe.index,
                    block,
                });
                continue;
            };

            analog::repack(&raw, probe.voltage_offset, probe.voltage_divisor, &mut physical)?;
            let name = analog_output_entry(probe.index, block);
            output.write_entry(&name, &physical)?;
            outcome.entries_written += 1;
            log::debug!("wrote {} from {:?} layout ({} samples)", name, layout, raw.len());
        }
    }

    Ok(outcome)
}
