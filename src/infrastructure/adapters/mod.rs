//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod audio;
pub mod indicator;
pub mod translator;
pub mod tts;

pub use audio::{RodioOutput, SymphoniaDecoder};
pub use indicator::LogActivityIndicator;
pub use translator::{GeminiClient, GeminiClientConfig};
pub use tts::{ElevenLabsClient, ElevenLabsClientConfig, ScriptedSynthesizer};
