//! An in-process container backed by an ordered map. Used to assemble captures
//! in tests and by callers that already hold the archive contents in memory.

use std::collections::BTreeMap;

use super::{ContainerReader, ContainerWriter};
use crate::error::Result;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryContainer {
    entries: BTreeMap<String, Vec<u8>>,
    /// Names in the order they were first written.
    write_order: Vec<String>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, mostly for assembling test captures.
    pub fn with_entry(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        let name = name.into();
        if !self.entries.contains_key(&name) {
            self.write_order.push(name.clone());
        }
        self.entries.insert(name, data.into());
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in first-write order.
    pub fn write_order(&self) -> &[String] {
        &self.write_order
    }
}

impl ContainerReader for MemoryContainer {
    fn entry_names(&self) -> Vec<String> {
        self.write_order.clone()
    }

    fn entry_exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(name).cloned())
    }
}

impl ContainerWriter for MemoryContainer {
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.insert(name, data.to_vec());
        Ok(())
    }
}
