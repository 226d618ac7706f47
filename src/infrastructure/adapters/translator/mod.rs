//! Translator Adapters - 翻译模型客户端

mod gemini_client;
mod scripted_client;

pub use gemini_client::{GeminiClient, GeminiClientConfig};
pub use scripted_client::ScriptedTranslator;
