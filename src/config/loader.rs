//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `LINGUA_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `LINGUA_TTS__BASE_URL=https://api.elevenlabs.io`
/// - `LINGUA_TRANSLATOR__MODEL=gemini-2.5-flash`
/// - `LINGUA_STORAGE__SETTINGS_PATH=/data/settings.sled`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("tts.base_url", "https://api.elevenlabs.io")?
        .set_default("tts.model_id", "eleven_multilingual_v2")?
        .set_default("tts.timeout_secs", 120)?
        .set_default(
            "translator.base_url",
            "https://generativelanguage.googleapis.com",
        )?
        .set_default("translator.model", "gemini-2.5-flash")?
        .set_default("translator.timeout_secs", 60)?
        .set_default("storage.settings_path", "data/settings.sled")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: LINGUA_
    // 层级分隔符: __ (双下划线)
    // 例如: LINGUA_TTS__BASE_URL=https://api.elevenlabs.io
    builder = builder.add_source(
        Environment::with_prefix("LINGUA")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.tts.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS base URL cannot be empty".to_string(),
        ));
    }

    if config.tts.model_id.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS model id cannot be empty".to_string(),
        ));
    }

    if config.tts.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "TTS timeout cannot be 0".to_string(),
        ));
    }

    if config.translator.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Translator base URL cannot be empty".to_string(),
        ));
    }

    if config.translator.model.is_empty() {
        return Err(ConfigError::ValidationError(
            "Translator model cannot be empty".to_string(),
        ));
    }

    if config.translator.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Translator timeout cannot be 0".to_string(),
        ));
    }

    if config.storage.settings_path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Settings path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("TTS Base URL: {}", config.tts.base_url);
    tracing::info!("TTS Model: {}", config.tts.model_id);
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("Translator Base URL: {}", config.translator.base_url);
    tracing::info!("Translator Model: {}", config.translator.model);
    tracing::info!("Translator Timeout: {}s", config.translator.timeout_secs);
    tracing::info!("Settings Path: {}", config.storage.settings_path);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_empty_tts_url() {
        let mut config = AppConfig::default();
        config.tts.base_url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.translator.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_settings_path() {
        let mut config = AppConfig::default();
        config.storage.settings_path = String::new();
        assert!(validate_config(&config).is_err());
    }
}
