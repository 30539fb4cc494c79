// In: src/header/mod.rs

//! The header parser: turns the `.dsl` `header` entry into a [`ParsedHeader`].
//!
//! Parsing happens in three steps so the dispatcher can drive them one state
//! at a time: [`check_version`], [`identify_driver`], then [`describe`].
//! [`parse_header`] runs all three for callers that do not care about states.

pub mod descriptor;
pub mod document;
pub mod probe;
pub mod samplerate;

pub use descriptor::{ChannelSet, DeviceDescriptor, DriverKind, LogicChannel, ParsedHeader};
pub use document::HeaderDocument;
pub use probe::ProbeDescriptor;

use crate::error::{ConvertError, Result};
use crate::format::SUPPORTED_HEADER_VERSION;

const VERSION_SECTION: &str = "version";
const HEADER_SECTION: &str = "header";

pub fn parse_header(text: &str) -> Result<ParsedHeader> {
    let doc = HeaderDocument::parse(text)?;
    let version = check_version(&doc)?;
    let kind = identify_driver(&doc)?;
    describe(&doc, version, kind)
}

/// Decodes raw `header` entry bytes. The header is always UTF-8.
pub fn decode_header_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| ConvertError::MalformedHeader(format!("header is not UTF-8: {}", e)))
}

pub fn check_version(doc: &HeaderDocument) -> Result<u32> {
    let raw = doc
        .lookup(VERSION_SECTION, "version")
        .ok_or_else(|| ConvertError::MissingField("version".to_string()))?;
    match raw.parse::<u32>() {
        Ok(version) if version == SUPPORTED_HEADER_VERSION => Ok(version),
        _ => Err(ConvertError::UnsupportedVersion {
            found: raw.to_string(),
            supported: SUPPORTED_HEADER_VERSION,
        }),
    }
}

pub fn identify_driver(doc: &HeaderDocument) -> Result<DriverKind> {
    let driver = required(doc, "driver")?;
    DriverKind::from_driver_name(driver)
}

/// Reads the scalar fields and the per-probe records for an already identified driver.
pub fn describe(
    doc: &HeaderDocument,
    format_version: u32,
    kind: DriverKind,
) -> Result<ParsedHeader> {
    let probe_count = parse_count(doc, "total probes")?;
    let block_count = parse_count(doc, "total blocks")?;
    let sample_rate = doc
        .lookup(HEADER_SECTION, "samplerate")
        .map(samplerate::parse_samplerate)
        .transpose()?;

    let probe_entries = doc.probe_entries(HEADER_SECTION);
    let channels = if kind.is_analog() {
        ChannelSet::Analog(analog_probes(&probe_entries, probe_count)?)
    } else {
        if probe_count == 0 {
            return Err(ConvertError::MalformedHeader(
                "a logic capture needs at least one probe".to_string(),
            ));
        }
        ChannelSet::Logic(logic_channels(&probe_entries, probe_count))
    };

    Ok(ParsedHeader {
        descriptor: DeviceDescriptor {
            format_version,
            driver_kind: kind,
            probe_count,
            block_count,
            sample_rate,
        },
        channels,
    })
}

//==================================================================================
// Private Helpers
//==================================================================================

fn required<'a>(doc: &'a HeaderDocument, key: &str) -> Result<&'a str> {
    doc.lookup(HEADER_SECTION, key)
        .ok_or_else(|| ConvertError::MissingField(key.to_string()))
}

fn parse_count(doc: &HeaderDocument, key: &str) -> Result<usize> {
    let raw = required(doc, key)?;
    raw.parse::<usize>().map_err(|e| {
        ConvertError::MalformedHeader(format!("'{}' = '{}' is not a count: {}", key, raw, e))
    })
}

/// Logic channel names. A channel without a `probe<N>` key is named after its index.
fn logic_channels(entries: &[(usize, &str)], probe_count: usize) -> Vec<LogicChannel> {
    (0..probe_count)
        .map(|index| {
            let name = entries
                .iter()
                .find(|(i, _)| *i == index)
                .map(|(_, v)| v.lines().next().unwrap_or("").trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| index.to_string());
            LogicChannel { index, name }
        })
        .collect()
}

/// Every analog probe `0..probe_count` must carry a record.
fn analog_probes(entries: &[(usize, &str)], probe_count: usize) -> Result<Vec<ProbeDescriptor>> {
    (0..probe_count)
        .map(|index| {
            let record = entries
                .iter()
                .find(|(i, _)| *i == index)
                .map(|(_, v)| *v)
                .ok_or_else(|| ConvertError::MalformedProbeRecord {
                    probe: index,
                    reason: "no probe record in header".to_string(),
                })?;
            ProbeDescriptor::decode(index, record)
        })
        .collect()
}
