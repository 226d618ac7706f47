//! Scripted Translator - 用于测试的翻译客户端
//!
//! 返回固定回复或固定失败，不实际调用模型服务

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{TranslatorError, TranslatorPort};

/// Scripted Translator
///
/// 记录收到的提示词与调用次数供断言
pub struct ScriptedTranslator {
    reply: Option<String>,
    unauthorized: bool,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedTranslator {
    /// 始终返回给定回复
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            unauthorized: false,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// 始终返回 Unauthorized
    pub fn unauthorized() -> Self {
        Self {
            reply: None,
            unauthorized: true,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 最近一次收到的提示词
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslatorPort for ScriptedTranslator {
    async fn complete(&self, prompt: &str) -> Result<String, TranslatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        if self.unauthorized {
            return Err(TranslatorError::Unauthorized);
        }

        Ok(self.reply.clone().unwrap_or_default())
    }
}
