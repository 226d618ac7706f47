//! Translator Port - 翻译模型服务抽象

use async_trait::async_trait;
use thiserror::Error;

/// 翻译服务错误
#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API key not configured")]
    MissingCredential,

    #[error("Invalid or expired API key")]
    Unauthorized,

    #[error("Service error: HTTP {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Translator Port
///
/// 外部 LLM 补全服务的抽象接口；输入完整提示词，返回模型文本
#[async_trait]
pub trait TranslatorPort: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, TranslatorError>;
}
