//! A sectioned key/value document, the textual form of a `.dsl` header.
//!
//! Lines are `[section]`, `key = value`, or continuation lines. A continuation
//! line starts with whitespace and appends one more line to the value of the
//! key above it; this is how analog probe records nest their per-probe keys.
//! Key lookup is ASCII case-insensitive.

use crate::error::{ConvertError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl HeaderSection {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderDocument {
    sections: Vec<HeaderSection>,
}

impl HeaderDocument {
    pub fn parse(text: &str) -> Result<Self> {
        let mut sections = vec![HeaderSection::new("")];

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let current = sections.last_mut().ok_or_else(|| {
                ConvertError::InternalError("header document lost its section list".to_string())
            })?;

            if raw.starts_with(char::is_whitespace) {
                let (_, value) = current.entries.last_mut().ok_or_else(|| {
                    ConvertError::MalformedHeader(format!(
                        "line {}: continuation line without a preceding key",
                        line_no + 1
                    ))
                })?;
                value.push('\n');
                value.push_str(line);
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                sections.push(HeaderSection::new(name.trim()));
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                ConvertError::MalformedHeader(format!(
                    "line {}: expected 'key = value', got '{}'",
                    line_no + 1,
                    line
                ))
            })?;
            current
                .entries
                .push((key.trim().to_string(), value.trim().to_string()));
        }

        Ok(Self { sections })
    }

    pub fn section(&self, name: &str) -> Option<&HeaderSection> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Looks `key` up in the named section first, then in every section in order.
    pub fn lookup(&self, preferred_section: &str, key: &str) -> Option<&str> {
        self.section(preferred_section)
            .and_then(|s| s.get(key))
            .or_else(|| self.sections.iter().find_map(|s| s.get(key)))
    }

    /// Every `probe<N>` key of the named section (or of all sections when it is
    /// absent), sorted by `N`.
    pub fn probe_entries(&self, preferred_section: &str) -> Vec<(usize, &str)> {
        let candidates: Vec<&HeaderSection> = match self.section(preferred_section) {
            Some(section) => vec![section],
            None => self.sections.iter().collect(),
        };

        let mut probes: Vec<(usize, &str)> = candidates
            .into_iter()
            .flat_map(|s| s.entries.iter())
            .filter_map(|(k, v)| {
                let (prefix, digits) = (k.get(..5)?, k.get(5..)?);
                if !prefix.eq_ignore_ascii_case("probe")
                    || digits.is_empty()
                    || !digits.bytes().all(|b| b.is_ascii_digit())
                {
                    return None;
                }
                digits.parse::<usize>().ok().map(|idx| (idx, v.as_str()))
            })
            .collect();
        probes.sort_by_key(|(idx, _)| *idx);
        probes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "[version]\nversion = 3\n[header]\ndriver = DSCope\n\
                          total probes = 2\nprobe0 = CH0\n enable0 = 1\n vDiv0 = 1000\n\
                          probe1 = CH1\n";

    #[test]
    fn test_sections_and_lookup() {
        let doc = HeaderDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.lookup("version", "version"), Some("3"));
        assert_eq!(doc.lookup("header", "Total Probes"), Some("2"));
        assert_eq!(doc.lookup("header", "version"), Some("3"));
        assert_eq!(doc.lookup("header", "samplerate"), None);
    }

    #[test]
    fn test_continuation_lines_join_with_newline() {
        let doc = HeaderDocument::parse(SAMPLE).unwrap();
        let header = doc.section("header").unwrap();
        assert_eq!(header.get("probe0"), Some("CH0\nenable0 = 1\nvDiv0 = 1000"));
        assert_eq!(header.get("probe1"), Some("CH1"));
    }

    #[test]
    fn test_probe_entries_sorted_by_index() {
        let doc =
            HeaderDocument::parse("[header]\nprobe10 = j\nprobe2 = c\nprobes = x\nprobe0 = a\n")
                .unwrap();
        let probes = doc.probe_entries("header");
        assert_eq!(probes, vec![(0, "a"), (2, "c"), (10, "j")]);
    }

    #[test]
    fn test_line_without_equals_is_malformed() {
        let result = HeaderDocument::parse("[header]\ndriver DSLogic\n");
        assert!(matches!(
            result,
            Err(ConvertError::MalformedHeader(msg)) if msg.contains("line 2")
        ));
    }

    #[test]
    fn test_leading_continuation_is_malformed() {
        let result = HeaderDocument::parse("[header]\n  enable0 = 1\n");
        assert!(matches!(result, Err(ConvertError::MalformedHeader(_))));
    }

    #[test]
    fn test_comments_blank_lines_and_crlf() {
        let doc =
            HeaderDocument::parse("; comment\r\n\r\n[header]\r\ndriver = DSLogic\r\n").unwrap();
        assert_eq!(doc.lookup("header", "driver"), Some("DSLogic"));
    }
}
