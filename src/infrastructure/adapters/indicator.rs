//! Log Activity Indicator - CLI 的播放状态指示

use crate::application::ports::{ActivityIndicatorPort, SpeakerState};

/// 基于 tracing 的两态指示器
pub struct LogActivityIndicator;

impl ActivityIndicatorPort for LogActivityIndicator {
    fn set_state(&self, state: SpeakerState) {
        match state {
            SpeakerState::Speaking => tracing::info!("Speaking..."),
            SpeakerState::Idle => tracing::info!("Idle"),
        }
    }
}
