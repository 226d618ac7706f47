//! Settings Store Port - 扁平键值设置存储抽象
//!
//! 存放 API 凭证和上次使用的语种/音色/语气选项

use async_trait::async_trait;
use thiserror::Error;

/// 设置项键名
pub mod settings_keys {
    /// 翻译服务 API 凭证
    pub const TRANSLATOR_API_KEY: &str = "gemini-api-key";
    /// TTS 服务 API 凭证
    pub const TTS_API_KEY: &str = "eleven-api-key";

    pub const LAST_SOURCE_LANG: &str = "last-source-lang";
    pub const LAST_TARGET_LANG: &str = "last-target-lang";
    pub const LAST_FORMALITY: &str = "last-formality";
    pub const LAST_PROFESSIONAL: &str = "last-professional";
    pub const LAST_TONE: &str = "last-tone";
    pub const LAST_SOURCE_VOICE: &str = "last-source-voice";
    pub const LAST_OUTPUT_VOICE: &str = "last-output-voice";
}

/// 存储错误
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Settings Store Port
///
/// 扁平键值存储；值一律为字符串
#[async_trait]
pub trait SettingsStorePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
    async fn remove(&self, key: &str) -> Result<(), SettingsError>;

    /// 读取 TTS 凭证
    async fn tts_api_key(&self) -> Result<Option<String>, SettingsError> {
        self.get(settings_keys::TTS_API_KEY).await
    }

    /// 清除 TTS 凭证（401 后调用）
    async fn clear_tts_api_key(&self) -> Result<(), SettingsError> {
        self.remove(settings_keys::TTS_API_KEY).await
    }

    /// 读取翻译服务凭证
    async fn translator_api_key(&self) -> Result<Option<String>, SettingsError> {
        self.get(settings_keys::TRANSLATOR_API_KEY).await
    }

    /// 清除翻译服务凭证（401/403 后调用）
    async fn clear_translator_api_key(&self) -> Result<(), SettingsError> {
        self.remove(settings_keys::TRANSLATOR_API_KEY).await
    }
}
