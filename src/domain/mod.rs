//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Translation Context: 翻译请求、响应解析与语种目录
//! - Voice Context: 音色与语音参数

pub mod language;
pub mod translation;
pub mod voice;

// 共享的提示词构建器
mod prompt;

pub use prompt::build_translation_prompt;
