//! Sled-based Settings Store Implementation

use async_trait::async_trait;
use sled::Db;
use std::sync::Arc;

use crate::application::ports::{SettingsError, SettingsStorePort};

/// Sled 存储配置
#[derive(Debug, Clone)]
pub struct SledStoreConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledStoreConfig {
    fn default() -> Self {
        Self {
            db_path: "data/settings.sled".to_string(),
        }
    }
}

/// Sled 设置存储
///
/// 扁平键值，值为 UTF-8 字符串
pub struct SledSettingsStore {
    db: Db,
}

impl SledSettingsStore {
    pub fn new(config: &SledStoreConfig) -> Result<Self, SettingsError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| SettingsError::Storage(e.to_string()))?;

        tracing::info!(db_path = %config.db_path, "SledSettingsStore initialized");
        Ok(Self { db })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), SettingsError> {
        self.db
            .flush()
            .map_err(|e| SettingsError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStorePort for SledSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        match self.db.get(key) {
            Ok(Some(value)) => {
                let value = String::from_utf8(value.to_vec())
                    .map_err(|e| SettingsError::Storage(e.to_string()))?;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(SettingsError::Storage(e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.db
            .insert(key, value.as_bytes())
            .map_err(|e| SettingsError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.db
            .remove(key)
            .map_err(|e| SettingsError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::settings_keys;
    use tempfile::tempdir;

    fn store(dir: &tempfile::TempDir) -> SledSettingsStore {
        let config = SledStoreConfig {
            db_path: dir.path().join("test.sled").to_string_lossy().to_string(),
        };
        SledSettingsStore::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("last-target-lang", "french").await.unwrap();
        assert_eq!(
            store.get("last-target-lang").await.unwrap(),
            Some("french".to_string())
        );

        store.remove("last-target-lang").await.unwrap();
        assert_eq!(store.get("last-target-lang").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_credential_helpers() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        store
            .set(settings_keys::TTS_API_KEY, "secret")
            .await
            .unwrap();
        assert_eq!(
            store.tts_api_key().await.unwrap(),
            Some("secret".to_string())
        );

        store.clear_tts_api_key().await.unwrap();
        assert_eq!(store.tts_api_key().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_value() {
        let dir = tempdir().unwrap();
        let store = store(&dir);

        store.set("last-formality", "formal").await.unwrap();
        store.set("last-formality", "casual").await.unwrap();
        assert_eq!(
            store.get("last-formality").await.unwrap(),
            Some("casual".to_string())
        );
    }
}
