//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// TTS 服务配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 翻译服务配置
    #[serde(default)]
    pub translator: TranslatorConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tts: TtsConfig::default(),
            translator: TranslatorConfig::default(),
            storage: StorageConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// TTS 服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// TTS 服务基础 URL
    #[serde(default = "default_tts_base_url")]
    pub base_url: String,

    /// 语音合成模型
    #[serde(default = "default_tts_model_id")]
    pub model_id: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,
}

fn default_tts_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_tts_model_id() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: default_tts_base_url(),
            model_id: default_tts_model_id(),
            timeout_secs: default_tts_timeout(),
        }
    }
}

/// 翻译服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct TranslatorConfig {
    /// 翻译服务基础 URL
    #[serde(default = "default_translator_base_url")]
    pub base_url: String,

    /// 翻译模型
    #[serde(default = "default_translator_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_translator_timeout")]
    pub timeout_secs: u64,
}

fn default_translator_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_translator_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_translator_timeout() -> u64 {
    60
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            base_url: default_translator_base_url(),
            model: default_translator_model(),
            timeout_secs: default_translator_timeout(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 设置数据库路径
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

fn default_settings_path() -> String {
    "data/settings.sled".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
