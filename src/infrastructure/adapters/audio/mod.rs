//! Audio Adapters - 解码与输出

mod rodio_output;
mod symphonia_decoder;

pub use rodio_output::RodioOutput;
pub use symphonia_decoder::SymphoniaDecoder;
