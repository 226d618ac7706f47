//! Audio Decoder Port - 压缩音频解码抽象

use async_trait::async_trait;
use thiserror::Error;

/// 解码错误
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unsupported or corrupt audio data: {0}")]
    InvalidData(String),

    #[error("Decoder error: {0}")]
    Internal(String),
}

/// 解码后的 PCM 音频
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// 交织的 f32 采样
    pub samples: Vec<f32>,
    /// 采样率（Hz）
    pub sample_rate: u32,
    /// 声道数
    pub channels: u16,
}

impl DecodedAudio {
    /// 音频时长（毫秒）
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0;
        }
        let frames = self.samples.len() as u64 / self.channels as u64;
        frames * 1000 / self.sample_rate as u64
    }
}

/// Audio Decoder Port
///
/// 将完整的压缩音频缓冲解码为 PCM；不支持增量解码，
/// 调用方必须先拼接出完整缓冲
#[async_trait]
pub trait AudioDecoderPort: Send + Sync {
    async fn decode(&self, data: Vec<u8>) -> Result<DecodedAudio, DecodeError>;
}
