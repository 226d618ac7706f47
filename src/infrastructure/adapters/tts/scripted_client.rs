//! Scripted Synthesizer - 用于测试的 TTS 客户端
//!
//! 按脚本产出固定的分块序列或固定失败，不实际调用 TTS 服务

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;

use crate::application::ports::{
    AudioChunkStream, SynthesisError, SynthesisRequest, SynthesizerPort,
};
use crate::domain::voice::Voice;

/// 脚本化的失败类型
#[derive(Debug, Clone, Copy)]
pub enum ScriptedFailure {
    Unauthorized,
    RateLimited,
    Service(u16),
}

impl ScriptedFailure {
    fn to_error(self) -> SynthesisError {
        match self {
            Self::Unauthorized => SynthesisError::Unauthorized,
            Self::RateLimited => SynthesisError::RateLimited,
            Self::Service(status) => SynthesisError::Service {
                status,
                message: "scripted failure".to_string(),
            },
        }
    }
}

/// Scripted Synthesizer
///
/// open_stream 按配置产出分块（每块前可插入延迟）或直接失败；
/// 记录请求次数供断言
pub struct ScriptedSynthesizer {
    chunks: Vec<Vec<u8>>,
    chunk_delay_ms: u64,
    failure: Option<ScriptedFailure>,
    voices: Vec<Voice>,
    stream_requests: AtomicUsize,
}

impl ScriptedSynthesizer {
    /// 产出给定分块序列的合成器
    pub fn with_chunks(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks,
            chunk_delay_ms: 0,
            failure: None,
            voices: Vec::new(),
            stream_requests: AtomicUsize::new(0),
        }
    }

    /// open_stream 立即返回给定失败的合成器
    pub fn failing(failure: ScriptedFailure) -> Self {
        Self {
            chunks: Vec::new(),
            chunk_delay_ms: 0,
            failure: Some(failure),
            voices: Vec::new(),
            stream_requests: AtomicUsize::new(0),
        }
    }

    /// 每个分块产出前的延迟
    pub fn chunk_delay_ms(mut self, ms: u64) -> Self {
        self.chunk_delay_ms = ms;
        self
    }

    pub fn with_voices(mut self, voices: Vec<Voice>) -> Self {
        self.voices = voices;
        self
    }

    /// open_stream 被调用的次数
    pub fn stream_requests(&self) -> usize {
        self.stream_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SynthesizerPort for ScriptedSynthesizer {
    async fn open_stream(
        &self,
        request: SynthesisRequest,
    ) -> Result<AudioChunkStream, SynthesisError> {
        self.stream_requests.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(
            text_len = request.text.len(),
            voice_id = %request.voice_id,
            chunks = self.chunks.len(),
            "ScriptedSynthesizer: opening stream"
        );

        if let Some(failure) = self.failure {
            return Err(failure.to_error());
        }

        let delay = self.chunk_delay_ms;
        let stream = futures_util::stream::iter(self.chunks.clone()).then(move |chunk| async move {
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            Ok(chunk)
        });

        Ok(Box::pin(stream))
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, SynthesisError> {
        if let Some(failure) = self.failure {
            return Err(failure.to_error());
        }
        Ok(self.voices.clone())
    }
}
