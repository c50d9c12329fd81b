//! Save slots
//!
//! A `SaveStore` is a key/value slot holding the serialized save blob.
//! Write failures are reported to the caller, which logs them and carries on.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::core::error::Result;

pub trait SaveStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}
