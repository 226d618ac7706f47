//! Activity Indicator Port - 播放状态指示抽象
//!
//! 由调用方提供的两态指示器（如 CLI 状态行或 UI 按钮），
//! 控制器只负责切换状态，不拥有指示器本身

/// 播放状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerState {
    Idle,
    Speaking,
}

/// Activity Indicator Port
pub trait ActivityIndicatorPort: Send + Sync {
    fn set_state(&self, state: SpeakerState);
}
