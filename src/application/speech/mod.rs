//! Speech Playback - 语音播放控制
//!
//! - controller: 会话管理器，负责 toggle 语义、单会话不变量与幂等 stop
//! - session: 单次会话的流水线（流式读取 → 拼接 → 解码 → 顺序播放）

mod controller;
mod session;

pub use controller::SpeechController;
pub use session::SpeechRequest;

#[cfg(test)]
pub(crate) mod test_support;
