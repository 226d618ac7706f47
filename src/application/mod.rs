//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Synthesizer、AudioDecoder、AudioOutput、SettingsStore 等）
//! - speech: 语音播放控制器与会话流水线
//! - translation: 翻译服务
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod speech;
pub mod translation;

pub use error::{SpeechError, TranslationError};
pub use speech::{SpeechController, SpeechRequest};
pub use translation::TranslationService;
