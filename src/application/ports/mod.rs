//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_decoder;
mod audio_output;
mod indicator;
mod settings_store;
mod synthesizer;
mod translator;

pub use audio_decoder::{AudioDecoderPort, DecodeError, DecodedAudio};
pub use audio_output::{AudioOutputPort, OutputError, PlaybackControl, PlaybackHandle};
pub use indicator::{ActivityIndicatorPort, SpeakerState};
pub use settings_store::{settings_keys, SettingsError, SettingsStorePort};
pub use synthesizer::{
    AudioChunkStream, SynthesisError, SynthesisRequest, SynthesizerPort,
};
pub use translator::{TranslatorError, TranslatorPort};
