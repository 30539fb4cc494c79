//! Structured decoder for the nested per-probe records of analog captures.
//!
//! An analog `probe<N>` value is a small multi-line record:
//!
//! ```text
//! CH0            <- line 0: the probe name
//! enable0 = 1    <- `key<N> = value`, where <N> repeats the probe index
//! vOffset0 = 128
//! vDiv0 = 1000
//! ```
//!
//! The decoder strips the numeric suffix to recover the logical key and turns
//! the record into a typed [`ProbeDescriptor`].

use serde::Serialize;

use crate::error::{ConvertError, Result};

/// Calibration and identity of one analog probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeDescriptor {
    /// 0-based source index.
    pub index: usize,
    pub name: String,
    pub enabled: bool,
    pub voltage_offset: i64,
    /// Never zero.
    pub voltage_divisor: i64,
}

impl ProbeDescriptor {
    pub fn decode(index: usize, record: &str) -> Result<Self> {
        let malformed = |reason: String| ConvertError::MalformedProbeRecord {
            probe: index,
            reason,
        };

        let mut lines = record.lines().map(str::trim);
        let name = lines
            .next()
            .ok_or_else(|| malformed("empty probe record".to_string()))?
            .to_string();
        let lines = lines.filter(|l| !l.is_empty());

        let suffix = index.to_string();
        let mut enabled = None;
        let mut voltage_offset = None;
        let mut voltage_divisor = None;

        for line in lines {
            let (raw_key, raw_value) = line
                .split_once('=')
                .ok_or_else(|| malformed(format!("line '{}' has no '='", line)))?;
            let key = raw_key.trim();
            let value = raw_value.trim();

            let stem = key
                .strip_suffix(suffix.as_str())
                .filter(|s| !s.is_empty() && !s.ends_with(|c: char| c.is_ascii_digit()))
                .ok_or_else(|| {
                    malformed(format!("key '{}' does not carry the probe suffix '{}'", key, suffix))
                })?;

            if stem.eq_ignore_ascii_case("enable") {
                enabled = Some(parse_flag(value).ok_or_else(|| {
                    malformed(format!("enable value '{}' is not a flag", value))
                })?);
            } else if stem.eq_ignore_ascii_case("vOffset") {
                voltage_offset = Some(parse_int(value).map_err(malformed)?);
            } else if stem.eq_ignore_ascii_case("vDiv") {
                voltage_divisor = Some(parse_int(value).map_err(malformed)?);
            } else {
                log::trace!("probe {}: ignoring key '{}'", index, stem);
            }
        }

        let voltage_divisor =
            voltage_divisor.ok_or_else(|| malformed("missing vDiv".to_string()))?;
        if voltage_divisor == 0 {
            return Err(malformed("vDiv must not be zero".to_string()));
        }

        Ok(Self {
            index,
            name,
            enabled: enabled.ok_or_else(|| malformed("missing enable".to_string()))?,
            voltage_offset: voltage_offset
                .ok_or_else(|| malformed("missing vOffset".to_string()))?,
            voltage_divisor,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn parse_int(value: &str) -> std::result::Result<i64, String> {
    value
        .parse::<i64>()
        .map_err(|e| format!("'{}' is not an integer: {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_record_strips_suffix() {
        let record = "CH1\nenable1 = 1\ncoupling1 = 0\nvDiv1 = 500\nvFactor1 = 1\nvOffset1 = 128";
        let probe = ProbeDescriptor::decode(1, record).unwrap();
        assert_eq!(
            probe,
            ProbeDescriptor {
                index: 1,
                name: "CH1".to_string(),
                enabled: true,
                voltage_offset: 128,
                voltage_divisor: 500,
            }
        );
    }

    #[test]
    fn test_decode_accepts_lowercased_keys_and_negative_offset() {
        let record = "Probe A\n  enable12=false\n  voffset12 = -40 \n vdiv12= 7";
        let probe = ProbeDescriptor::decode(12, record).unwrap();
        assert_eq!(probe.name, "Probe A");
        assert!(!probe.enabled);
        assert_eq!(probe.voltage_offset, -40);
        assert_eq!(probe.voltage_divisor, 7);
    }

    #[test]
    fn test_blank_name_line_keeps_first_key() {
        let record = "\nenable0 = 1\nvOffset0 = 128\nvDiv0 = 10";
        let probe = ProbeDescriptor::decode(0, record).unwrap();
        assert_eq!(
            probe,
            ProbeDescriptor {
                index: 0,
                name: String::new(),
                enabled: true,
                voltage_offset: 128,
                voltage_divisor: 10,
            }
        );
    }

    #[test]
    fn test_blank_key_lines_are_skipped() {
        let record = "CH3\n\nenable3 = 0\n  \nvOffset3 = 1\nvDiv3 = 2";
        let probe = ProbeDescriptor::decode(3, record).unwrap();
        assert_eq!(probe.name, "CH3");
        assert!(!probe.enabled);
    }

    #[test]
    fn test_wrong_suffix_is_malformed() {
        let record = "CH0\nenable1 = 1\nvOffset0 = 128\nvDiv0 = 10";
        let err = ProbeDescriptor::decode(0, record).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedProbeRecord { probe: 0, .. }));
    }

    #[test]
    fn test_longer_index_suffix_is_malformed() {
        // `enable10` must not be read as key `enable1` of probe 0.
        let record = "CH0\nenable10 = 1\nvOffset0 = 128\nvDiv0 = 10";
        assert!(ProbeDescriptor::decode(0, record).is_err());
    }

    #[test]
    fn test_missing_equals_is_malformed() {
        let record = "CH0\nenable0 1\nvOffset0 = 128\nvDiv0 = 10";
        let err = ProbeDescriptor::decode(0, record).unwrap_err();
        assert!(err.to_string().contains("has no '='"));
    }

    #[test]
    fn test_missing_required_keys() {
        for (record, missing) in [
            ("CH0\nvOffset0 = 1\nvDiv0 = 1", "missing enable"),
            ("CH0\nenable0 = 1\nvDiv0 = 1", "missing vOffset"),
            ("CH0\nenable0 = 1\nvOffset0 = 1", "missing vDiv"),
        ] {
            let err = ProbeDescriptor::decode(0, record).unwrap_err();
            assert!(err.to_string().contains(missing), "{} -> {}", record, err);
        }
    }

    #[test]
    fn test_zero_divisor_and_bad_numbers() {
        assert!(ProbeDescriptor::decode(0, "CH0\nenable0=1\nvOffset0=1\nvDiv0=0").is_err());
        assert!(ProbeDescriptor::decode(0, "CH0\nenable0=1\nvOffset0=x\nvDiv0=1").is_err());
        assert!(ProbeDescriptor::decode(0, "CH0\nenable0=yes\nvOffset0=1\nvDiv0=1").is_err());
        assert!(ProbeDescriptor::decode(0, "").is_err());
    }
}
