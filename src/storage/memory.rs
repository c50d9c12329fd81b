//! In-memory slot, used when no save directory is available and in tests

use crate::core::error::Result;
use crate::storage::SaveStore;
use ahash::AHashMap;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: AHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}
