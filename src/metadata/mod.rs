// In: src/metadata/mod.rs

//! The metadata emitter: builds the sigrok `metadata` document from the final
//! device descriptor and channel list.

pub mod document;

pub use document::OutputMetadata;

use crate::error::{ConvertError, Result};
use crate::format::{unitsize, LOGIC_CAPTURE_FILE, SIGROK_VERSION};
use crate::header::samplerate::format_samplerate;
use crate::header::{DeviceDescriptor, LogicChannel, ProbeDescriptor};

pub const GLOBAL_SECTION: &str = "global";
pub const DEVICE_SECTION: &str = "device 1";

fn with_global_section() -> OutputMetadata {
    let mut meta = OutputMetadata::new();
    meta.set(GLOBAL_SECTION, "sigrok version", SIGROK_VERSION);
    meta
}

/// Metadata for a logic session. One `probe<N>` key per channel, 1-based.
pub fn emit_logic(descriptor: &DeviceDescriptor, channels: &[LogicChannel]) -> OutputMetadata {
    let mut meta = with_global_section();
    meta.set(DEVICE_SECTION, "capturefile", LOGIC_CAPTURE_FILE);
    meta.set(
        DEVICE_SECTION,
        "total probes",
        descriptor.probe_count.to_string(),
    );
    if let Some(rate) = descriptor.sample_rate {
        meta.set(DEVICE_SECTION, "samplerate", format_samplerate(rate));
    }
    meta.set(DEVICE_SECTION, "total analog", "0");
    for channel in channels {
        meta.set(
            DEVICE_SECTION,
            format!("probe{}", channel.index + 1),
            channel.name.as_str(),
        );
    }
    meta.set(
        DEVICE_SECTION,
        "unitsize",
        unitsize(descriptor.probe_count).to_string(),
    );
    meta
}

/// Metadata for an analog session. Disabled probes get no key; the others keep
/// their source numbering.
///
/// `total analog` is reserved before the per-probe keys and filled in after,
/// so it always precedes them in the document.
///
/// # Errors
/// Returns `ConvertError::InternalError` if the descriptor's probe count does
/// not match the number of enabled probes.
pub fn emit_analog(
    descriptor: &DeviceDescriptor,
    probes: &[ProbeDescriptor],
) -> Result<OutputMetadata> {
    let mut meta = with_global_section();
    if let Some(rate) = descriptor.sample_rate {
        meta.set(DEVICE_SECTION, "samplerate", format_samplerate(rate));
    }
    meta.set(DEVICE_SECTION, "total analog", "");

    let mut enabled = 0usize;
    for probe in probes.iter().filter(|p| p.enabled) {
        meta.set(
            DEVICE_SECTION,
            format!("analog{}", probe.index + 1),
            probe.name.as_str(),
        );
        enabled += 1;
    }

    if enabled != descriptor.probe_count {
        return Err(ConvertError::InternalError(format!(
            "descriptor lists {} analog probes but {} are enabled",
            descriptor.probe_count, enabled
        )));
    }
    meta.set(DEVICE_SECTION, "total analog", enabled.to_string());
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::DriverKind;

    fn descriptor(kind: DriverKind, probe_count: usize) -> DeviceDescriptor {
        DeviceDescriptor {
            format_version: 3,
            driver_kind: kind,
            probe_count,
            block_count: 1,
            sample_rate: Some(1_000_000),
        }
    }

    fn probe(index: usize, enabled: bool) -> ProbeDescriptor {
        ProbeDescriptor {
            index,
            name: format!("CH{}", index),
            enabled,
            voltage_offset: 128,
            voltage_divisor: 10,
        }
    }

    #[test]
    fn test_logic_metadata_text() {
        let channels = vec![
            LogicChannel { index: 0, name: "CLK".to_string() },
            LogicChannel { index: 1, name: "DATA".to_string() },
        ];
        let meta = emit_logic(&descriptor(DriverKind::Logic, 2), &channels);
        assert_eq!(
            meta.to_text(),
            "[global]\nsigrok version=0.6.0\n[device 1]\ncapturefile=logic-1\n\
             total probes=2\nsamplerate=1 MHz\ntotal analog=0\nprobe1=CLK\nprobe2=DATA\n\
             unitsize=1\n"
        );
    }

    #[test]
    fn test_logic_unitsize_for_sixteen_probes() {
        let channels: Vec<LogicChannel> = (0..16)
            .map(|index| LogicChannel { index, name: index.to_string() })
            .collect();
        let meta = emit_logic(&descriptor(DriverKind::Logic, 16), &channels);
        assert_eq!(meta.get(DEVICE_SECTION, "unitsize"), Some("2"));
        assert_eq!(meta.get(DEVICE_SECTION, "probe16"), Some("15"));
    }

    #[test]
    fn test_analog_total_precedes_probe_keys() {
        let probes = vec![probe(0, true), probe(1, false), probe(2, true)];
        let meta = emit_analog(&descriptor(DriverKind::AnalogScope, 2), &probes).unwrap();
        assert_eq!(
            meta.keys(DEVICE_SECTION),
            vec!["samplerate", "total analog", "analog1", "analog3"]
        );
        assert_eq!(meta.get(DEVICE_SECTION, "total analog"), Some("2"));
    }

    #[test]
    fn test_analog_count_mismatch_is_internal_error() {
        let probes = vec![probe(0, true), probe(1, true)];
        let result = emit_analog(&descriptor(DriverKind::AnalogScope, 1), &probes);
        assert!(matches!(result, Err(ConvertError::InternalError(_))));
    }

    #[test]
    fn test_missing_samplerate_is_omitted() {
        let mut d = descriptor(DriverKind::AnalogVirtualDemo, 0);
        d.sample_rate = None;
        let meta = emit_analog(&d, &[]).unwrap();
        assert_eq!(meta.keys(DEVICE_SECTION), vec!["total analog"]);
        assert_eq!(meta.get(DEVICE_SECTION, "total analog"), Some("0"));
    }
}
