//! Persistent key/value stores backing the boot and grant flags.

mod file_store;
mod memory_store;

pub use file_store::{FileConfigStore, DEFAULT_STATE_FILE};
pub use memory_store::InMemoryConfigStore;
