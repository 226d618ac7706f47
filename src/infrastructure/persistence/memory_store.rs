//! In-Memory Settings Store Implementation
//!
//! 基于 DashMap 的非持久化存储，测试与演示场景使用

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{SettingsError, SettingsStorePort};

/// 内存设置存储
#[derive(Default)]
pub struct InMemorySettingsStore {
    entries: DashMap<String, String>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl SettingsStorePort for InMemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = InMemorySettingsStore::new();

        assert_eq!(store.get("last-tone").await.unwrap(), None);

        store.set("last-tone", "friendly").await.unwrap();
        assert_eq!(
            store.get("last-tone").await.unwrap(),
            Some("friendly".to_string())
        );

        store.remove("last-tone").await.unwrap();
        assert_eq!(store.get("last-tone").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_noop() {
        let store = InMemorySettingsStore::new();
        store.remove("never-set").await.unwrap();
    }
}
