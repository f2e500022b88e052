//! Key-value storage infrastructure

mod file_store;
mod memory;

pub use file_store::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
