//! Gemini Client - 调用外部翻译模型服务
//!
//! 实现 TranslatorPort trait
//!
//! 外部 API:
//! POST {base}/v1beta/models/{model}:generateContent?key={key}
//! Request: {"contents": [{"parts": [{"text": "..."}]}], "generationConfig": {...}}
//! Response text at candidates[0].content.parts[0].text

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{SettingsStorePort, TranslatorError, TranslatorPort};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// 确定性采样参数，翻译不需要多样性
#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "topK")]
    top_k: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            top_p: 0.0,
            top_k: 100,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Gemini 客户端配置
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// 模型名
    pub model: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Gemini 翻译客户端
///
/// API 凭证从设置存储读取，每次请求取当前值
pub struct GeminiClient {
    client: Client,
    config: GeminiClientConfig,
    settings: Arc<dyn SettingsStorePort>,
}

impl GeminiClient {
    pub fn new(
        config: GeminiClientConfig,
        settings: Arc<dyn SettingsStorePort>,
    ) -> Result<Self, TranslatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranslatorError::Network(e.to_string()))?;

        Ok(Self {
            client,
            config,
            settings,
        })
    }

    fn generate_url(&self, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, api_key
        )
    }
}

#[async_trait]
impl TranslatorPort for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, TranslatorError> {
        let api_key = self
            .settings
            .translator_api_key()
            .await
            .map_err(|e| TranslatorError::Network(format!("settings store: {}", e)))?
            .ok_or(TranslatorError::MissingCredential)?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig::default(),
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(self.generate_url(&api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslatorError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => TranslatorError::Unauthorized,
                code => {
                    let message = response.text().await.unwrap_or_default();
                    TranslatorError::Service {
                        status: code,
                        message,
                    }
                }
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TranslatorError::InvalidResponse(e.to_string()))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .ok_or_else(|| {
                TranslatorError::InvalidResponse("response has no candidates".to_string())
            })?;

        tracing::debug!(response_len = text.len(), "Completion received");
        Ok(text)
    }
}
