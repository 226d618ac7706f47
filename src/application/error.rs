//! 应用层错误定义
//!
//! 语音会话与翻译用例的统一错误类型

use thiserror::Error;

use crate::application::ports::{DecodeError, OutputError, SynthesisError, TranslatorError};

/// 语音会话错误
///
/// 会话的所有失败路径最终收敛为这里的某个变体；
/// `Cancelled` 是正常终止，不作为失败上报
#[derive(Debug, Error)]
pub enum SpeechError {
    /// 输入校验失败
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 音频输出设备不可用
    #[error("Audio output unavailable: {0}")]
    AudioInit(String),

    /// 合成请求失败（网络或服务端错误）
    #[error("Speech request failed: {0}")]
    Request(String),

    /// 凭证无效或已过期
    #[error("Invalid or expired API key")]
    Auth,

    /// 服务端限流，不自动重试
    #[error("Rate limit exceeded")]
    RateLimit,

    /// 音频数据解码失败
    #[error("Failed to decode audio data: {0}")]
    Decode(String),

    /// 用户取消，正常终止
    #[error("Cancelled")]
    Cancelled,
}

impl SpeechError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<SynthesisError> for SpeechError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::Unauthorized | SynthesisError::MissingCredential => Self::Auth,
            SynthesisError::RateLimited => Self::RateLimit,
            other => Self::Request(other.to_string()),
        }
    }
}

impl From<DecodeError> for SpeechError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<OutputError> for SpeechError {
    fn from(err: OutputError) -> Self {
        match err {
            OutputError::DeviceUnavailable(msg) => Self::AudioInit(msg),
            OutputError::Playback(msg) => Self::Request(msg),
        }
    }
}

/// 翻译用例错误
#[derive(Debug, Error)]
pub enum TranslationError {
    /// 输入校验失败
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 凭证无效或已过期
    #[error("Invalid or expired API key")]
    Auth,

    /// 请求失败（网络或服务端错误）
    #[error("Translation request failed: {0}")]
    Request(String),
}

impl From<TranslatorError> for TranslationError {
    fn from(err: TranslatorError) -> Self {
        match err {
            TranslatorError::Unauthorized | TranslatorError::MissingCredential => Self::Auth,
            other => Self::Request(other.to_string()),
        }
    }
}
