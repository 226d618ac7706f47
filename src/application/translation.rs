//! Translation Service - 翻译用例编排
//!
//! 构建提示词 → 调用翻译端口 → 解析响应 → 持久化最近使用的选项

use std::sync::Arc;

use crate::application::error::TranslationError;
use crate::application::ports::{
    settings_keys, SettingsStorePort, TranslatorError, TranslatorPort,
};
use crate::domain::build_translation_prompt;
use crate::domain::translation::{parse_translation_response, TranslationOutcome, TranslationRequest};

/// 翻译服务
pub struct TranslationService {
    translator: Arc<dyn TranslatorPort>,
    settings: Arc<dyn SettingsStorePort>,
}

impl TranslationService {
    pub fn new(translator: Arc<dyn TranslatorPort>, settings: Arc<dyn SettingsStorePort>) -> Self {
        Self {
            translator,
            settings,
        }
    }

    /// 执行一次翻译
    ///
    /// 成功后把本次的语种与语气选项写回设置存储；
    /// 写回失败只记日志，不影响翻译结果
    pub async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationOutcome, TranslationError> {
        if request.text.trim().is_empty() {
            return Err(TranslationError::InvalidInput(
                "text cannot be empty".to_string(),
            ));
        }
        if request.target_lang.trim().is_empty() {
            return Err(TranslationError::InvalidInput(
                "target language cannot be empty".to_string(),
            ));
        }

        let prompt = build_translation_prompt(&request);
        tracing::debug!(
            source = %request.source_lang,
            target = %request.target_lang,
            text_len = request.text.len(),
            "Sending translation request"
        );

        let raw = match self.translator.complete(&prompt).await {
            Ok(raw) => raw,
            Err(err) => {
                if matches!(err, TranslatorError::Unauthorized) {
                    // 凭证已失效，清除存储的 key
                    if let Err(e) = self.settings.clear_translator_api_key().await {
                        tracing::warn!(error = %e, "Failed to clear translator API key");
                    }
                }
                return Err(TranslationError::from(err));
            }
        };

        let outcome = parse_translation_response(&raw, request.is_auto_detect());

        if let Some(detected) = &outcome.detected {
            tracing::info!(
                language = %detected.language,
                confidence = detected.confidence,
                "Source language detected"
            );
        }

        self.persist_last_used(&request).await;

        Ok(outcome)
    }

    async fn persist_last_used(&self, request: &TranslationRequest) {
        let mut entries: Vec<(&str, &str)> = vec![
            (settings_keys::LAST_SOURCE_LANG, request.source_lang.as_str()),
            (settings_keys::LAST_TARGET_LANG, request.target_lang.as_str()),
        ];
        if let Some(formality) = &request.tone.formality {
            entries.push((settings_keys::LAST_FORMALITY, formality));
        }
        if let Some(professional) = &request.tone.professional_context {
            entries.push((settings_keys::LAST_PROFESSIONAL, professional));
        }
        if let Some(tone) = &request.tone.tone {
            entries.push((settings_keys::LAST_TONE, tone));
        }

        for (key, value) in entries {
            if let Err(e) = self.settings.set(key, value).await {
                tracing::warn!(key = %key, error = %e, "Failed to persist setting");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::translation::ToneSettings;
    use crate::infrastructure::adapters::translator::ScriptedTranslator;
    use crate::infrastructure::persistence::InMemorySettingsStore;

    fn request(source: &str, text: &str) -> TranslationRequest {
        TranslationRequest {
            text: text.to_string(),
            source_lang: source.to_string(),
            target_lang: "french".to_string(),
            tone: ToneSettings {
                formality: Some("formal".to_string()),
                professional_context: None,
                tone: None,
            },
        }
    }

    #[tokio::test]
    async fn test_translate_parses_detection_header() {
        let translator = Arc::new(ScriptedTranslator::replying(
            "DETECTED: German (92%)\nTRANSLATION:\nBonjour",
        ));
        let settings = Arc::new(InMemorySettingsStore::new());
        let service = TranslationService::new(translator, settings.clone());

        let outcome = service.translate(request("auto", "Hallo")).await.unwrap();
        assert_eq!(outcome.text, "Bonjour");
        assert_eq!(outcome.detected.unwrap().language, "German");

        // 最近使用的选项已写回
        assert_eq!(
            settings.get(settings_keys::LAST_SOURCE_LANG).await.unwrap(),
            Some("auto".to_string())
        );
        assert_eq!(
            settings.get(settings_keys::LAST_TARGET_LANG).await.unwrap(),
            Some("french".to_string())
        );
        assert_eq!(
            settings.get(settings_keys::LAST_FORMALITY).await.unwrap(),
            Some("formal".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let translator = Arc::new(ScriptedTranslator::replying("unused"));
        let service = TranslationService::new(translator, Arc::new(InMemorySettingsStore::new()));

        let result = service.translate(request("auto", "   ")).await;
        assert!(matches!(result, Err(TranslationError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_stored_credential() {
        let translator = Arc::new(ScriptedTranslator::unauthorized());
        let settings = Arc::new(InMemorySettingsStore::new());
        settings
            .set(settings_keys::TRANSLATOR_API_KEY, "stale-key")
            .await
            .unwrap();
        let service = TranslationService::new(translator, settings.clone());

        let result = service.translate(request("auto", "Hallo")).await;
        assert!(matches!(result, Err(TranslationError::Auth)));
        assert_eq!(
            settings
                .get(settings_keys::TRANSLATOR_API_KEY)
                .await
                .unwrap(),
            None
        );
    }
}
