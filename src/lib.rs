//! Lingua - 翻译与朗读工具
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Language: 语种表、RTL 方向检测
//! - Translation: 翻译请求、响应解析、提示词构建
//! - Voice: 音色与语音参数
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Synthesizer, AudioDecoder, AudioOutput, Translator, SettingsStore, ActivityIndicator）
//! - Speech: 语音会话管理器与会话流水线
//! - Translation: 翻译用例编排
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: ElevenLabs 流式 TTS、Gemini 翻译、Symphonia 解码、Rodio 输出
//! - Events: 进程内事件广播
//! - Persistence: Sled / 内存设置存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
