//! TTS Adapters - 流式语音合成客户端

mod scripted_client;
mod streaming_client;

pub use scripted_client::{ScriptedFailure, ScriptedSynthesizer};
pub use streaming_client::{ElevenLabsClient, ElevenLabsClientConfig};
