//! Typed descriptors produced by the header parser.

use serde::Serialize;

use super::probe::ProbeDescriptor;
use crate::error::{ConvertError, Result};

/// Which conversion pipeline a capture needs, decided once from the `driver` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    /// DSLogic: bit-packed logic channels.
    Logic,
    /// DSCope: byte-sampled analog channels.
    AnalogScope,
    /// DSView's virtual demo device, stored like a DSCope capture.
    AnalogVirtualDemo,
}

impl DriverKind {
    pub fn from_driver_name(driver: &str) -> Result<Self> {
        match driver {
            "DSLogic" => Ok(DriverKind::Logic),
            "DSCope" => Ok(DriverKind::AnalogScope),
            "virtual-demo" => Ok(DriverKind::AnalogVirtualDemo),
            other => Err(ConvertError::UnknownDriver(other.to_string())),
        }
    }

    pub fn is_analog(self) -> bool {
        matches!(self, DriverKind::AnalogScope | DriverKind::AnalogVirtualDemo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    pub format_version: u32,
    pub driver_kind: DriverKind,
    /// Total probes in the source. The analog pipeline lowers this to the
    /// number of enabled probes.
    pub probe_count: usize,
    pub block_count: usize,
    /// Hz.
    pub sample_rate: Option<u64>,
}

/// A named logic channel, 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicChannel {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSet {
    Logic(Vec<LogicChannel>),
    Analog(Vec<ProbeDescriptor>),
}

/// Everything the header tells us about a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    pub descriptor: DeviceDescriptor,
    pub channels: ChannelSet,
}
