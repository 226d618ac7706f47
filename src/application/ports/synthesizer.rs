//! Synthesizer Port - 流式语音合成服务抽象
//!
//! 定义外部 TTS 服务的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use thiserror::Error;

use crate::domain::voice::{Voice, VoiceId, VoiceSettings};

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API key not configured")]
    MissingCredential,

    #[error("Invalid or expired API key")]
    Unauthorized,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Service error: HTTP {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 流式传输的音频分块序列
///
/// 每个分块是响应体的一段原始字节，按到达顺序产出
pub type AudioChunkStream = BoxStream<'static, Result<Vec<u8>, SynthesisError>>;

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本
    pub text: String,
    /// 音色 ID
    pub voice_id: VoiceId,
    /// 语音参数（含语速）
    pub settings: VoiceSettings,
}

/// Synthesizer Port
///
/// 外部流式 TTS 服务的抽象接口
#[async_trait]
pub trait SynthesizerPort: Send + Sync {
    /// 发起合成请求，返回分块音频流
    ///
    /// 返回 Ok 表示响应头已确认成功，流本身仍可能在读取中途出错
    async fn open_stream(
        &self,
        request: SynthesisRequest,
    ) -> Result<AudioChunkStream, SynthesisError>;

    /// 拉取账号可用的音色目录
    ///
    /// 空目录不是错误
    async fn list_voices(&self) -> Result<Vec<Voice>, SynthesisError>;
}
