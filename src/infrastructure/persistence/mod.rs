//! Persistence - 设置存储实现

mod memory_store;
mod sled_store;

pub use memory_store::InMemorySettingsStore;
pub use sled_store::{SledSettingsStore, SledStoreConfig};
