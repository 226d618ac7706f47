//! ElevenLabs Streaming Client - 调用外部流式 TTS 服务
//!
//! 实现 SynthesizerPort trait
//!
//! 外部 TTS API:
//! POST {base}/v1/text-to-speech/{voice_id}/stream
//! Request: {"text": "...", "model_id": "...", "voice_settings": {...}}  (JSON)
//! Response: chunked binary audio stream
//! GET {base}/v1/voices → {"voices": [{"voice_id", "name", "labels": {"accent"}}]}

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    AudioChunkStream, SettingsStorePort, SynthesisError, SynthesisRequest, SynthesizerPort,
};
use crate::domain::voice::{Voice, VoiceId};

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettingsBody,
}

#[derive(Debug, Serialize)]
struct VoiceSettingsBody {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
    speed: f32,
}

/// 音色目录响应 (JSON)
#[derive(Debug, Deserialize)]
struct VoicesResponse {
    #[serde(default)]
    voices: Vec<VoiceDto>,
}

#[derive(Debug, Deserialize)]
struct VoiceDto {
    voice_id: String,
    name: String,
    #[serde(default)]
    labels: VoiceLabels,
}

#[derive(Debug, Default, Deserialize)]
struct VoiceLabels {
    accent: Option<String>,
}

/// ElevenLabs 客户端配置
#[derive(Debug, Clone)]
pub struct ElevenLabsClientConfig {
    /// TTS 服务基础 URL
    pub base_url: String,
    /// 合成模型 ID
    pub model_id: String,
    /// 传输层超时（秒），覆盖从发出请求到流读完的整个过程；
    /// 这是 HTTP 客户端自身的超时，播放流水线不另加时限
    pub timeout_secs: u64,
}

impl Default for ElevenLabsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            timeout_secs: 120,
        }
    }
}

impl ElevenLabsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// ElevenLabs 流式 TTS 客户端
///
/// API 凭证从设置存储读取，每次请求取当前值
pub struct ElevenLabsClient {
    client: Client,
    config: ElevenLabsClientConfig,
    settings: Arc<dyn SettingsStorePort>,
}

impl ElevenLabsClient {
    pub fn new(
        config: ElevenLabsClientConfig,
        settings: Arc<dyn SettingsStorePort>,
    ) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        Ok(Self {
            client,
            config,
            settings,
        })
    }

    fn stream_url(&self, voice_id: &VoiceId) -> String {
        format!(
            "{}/v1/text-to-speech/{}/stream",
            self.config.base_url, voice_id
        )
    }

    fn voices_url(&self) -> String {
        format!("{}/v1/voices", self.config.base_url)
    }

    async fn api_key(&self) -> Result<String, SynthesisError> {
        self.settings
            .tts_api_key()
            .await
            .map_err(|e| SynthesisError::Network(format!("settings store: {}", e)))?
            .ok_or(SynthesisError::MissingCredential)
    }

    /// 非 2xx 状态码归类
    async fn classify_status(response: reqwest::Response) -> SynthesisError {
        let status = response.status().as_u16();
        match status {
            401 => SynthesisError::Unauthorized,
            429 => SynthesisError::RateLimited,
            _ => {
                let message = response.text().await.unwrap_or_default();
                SynthesisError::Service { status, message }
            }
        }
    }

    fn map_request_error(err: reqwest::Error) -> SynthesisError {
        if err.is_connect() {
            SynthesisError::Network(format!("cannot connect to TTS service: {}", err))
        } else {
            SynthesisError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl SynthesizerPort for ElevenLabsClient {
    async fn open_stream(
        &self,
        request: SynthesisRequest,
    ) -> Result<AudioChunkStream, SynthesisError> {
        let api_key = self.api_key().await?;

        let body = SynthesisBody {
            text: &request.text,
            model_id: &self.config.model_id,
            voice_settings: VoiceSettingsBody {
                stability: request.settings.stability,
                similarity_boost: request.settings.similarity_boost,
                style: request.settings.style,
                use_speaker_boost: request.settings.use_speaker_boost,
                speed: request.settings.speed,
            },
        };

        tracing::debug!(
            url = %self.stream_url(&request.voice_id),
            text_len = request.text.len(),
            voice_id = %request.voice_id,
            speed = request.settings.speed,
            "Opening TTS stream"
        );

        let response = self
            .client
            .post(self.stream_url(&request.voice_id))
            .header("xi-api-key", &api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        if !response.status().is_success() {
            return Err(Self::classify_status(response).await);
        }

        let stream = response.bytes_stream().map(|item| match item {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(e) => Err(SynthesisError::Stream(e.to_string())),
        });

        Ok(Box::pin(stream))
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, SynthesisError> {
        let api_key = self.api_key().await?;

        let response = self
            .client
            .get(self.voices_url())
            .header("xi-api-key", &api_key)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        if !response.status().is_success() {
            let err = Self::classify_status(response).await;
            // 目录拉取不经过会话层，401 在这里连带清除凭证
            if matches!(err, SynthesisError::Unauthorized) {
                if let Err(e) = self.settings.clear_tts_api_key().await {
                    tracing::warn!(error = %e, "Failed to clear TTS API key");
                }
            }
            return Err(err);
        }

        let catalog: VoicesResponse = response
            .json()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(e.to_string()))?;

        let voices = catalog
            .voices
            .into_iter()
            .filter_map(|dto| {
                let id = VoiceId::new(dto.voice_id).ok()?;
                Some(Voice {
                    id,
                    name: dto.name,
                    accent: dto.labels.accent,
                })
            })
            .collect::<Vec<_>>();

        tracing::info!(count = voices.len(), "Voice catalog fetched");
        Ok(voices)
    }
}
