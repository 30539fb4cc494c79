//! The ordered key/value document written to the `.sr` `metadata` entry.
//!
//! Sections and keys keep insertion order. Setting a key that already exists
//! replaces its value in place, which lets a value be reserved early and
//! filled in once it is known.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputMetadata {
    sections: Vec<(String, Vec<(String, String)>)>,
}

impl OutputMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` in `section`, creating the section at the end if needed.
    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        let entries = match self.sections.iter().position(|(name, _)| name == section) {
            Some(idx) => &mut self.sections[idx].1,
            None => {
                self.sections.push((section.to_string(), Vec::new()));
                let last = self.sections.len() - 1;
                &mut self.sections[last].1
            }
        };

        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => entries.push((key, value)),
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .and_then(|(_, entries)| entries.iter().find(|(k, _)| k == key))
            .map(|(_, v)| v.as_str())
    }

    /// Keys of `section` in document order.
    pub fn keys(&self, section: &str) -> Vec<&str> {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, entries)| entries.iter().map(|(k, _)| k.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (name, entries) in &self.sections {
            text.push('[');
            text.push_str(name);
            text.push_str("]\n");
            for (key, value) in entries {
                text.push_str(key);
                text.push('=');
                text.push_str(value);
                text.push('\n');
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_position() {
        let mut meta = OutputMetadata::new();
        meta.set("device 1", "total analog", "");
        meta.set("device 1", "analog1", "CH0");
        meta.set("device 1", "total analog", "1");

        assert_eq!(meta.keys("device 1"), vec!["total analog", "analog1"]);
        assert_eq!(meta.get("device 1", "total analog"), Some("1"));
    }

    #[test]
    fn test_to_text_sections_in_insertion_order() {
        let mut meta = OutputMetadata::new();
        meta.set("global", "sigrok version", "0.6.0");
        meta.set("device 1", "unitsize", "1");
        meta.set("global", "extra", "x");
        assert_eq!(
            meta.to_text(),
            "[global]\nsigrok version=0.6.0\nextra=x\n[device 1]\nunitsize=1\n"
        );
    }

    #[test]
    fn test_missing_lookups() {
        let meta = OutputMetadata::new();
        assert_eq!(meta.get("global", "x"), None);
        assert!(meta.keys("global").is_empty());
        assert_eq!(meta.to_text(), "");
    }
}
