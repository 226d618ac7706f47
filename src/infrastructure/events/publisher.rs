//! Event Publisher Implementation
//!
//! 语音会话生命周期事件的全局广播

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// 应用事件
///
/// 每个会话恰好产生一个终止事件（Finished 或 Failed）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum AppEvent {
    /// 会话启动
    SpeechStarted { session_id: Uuid },
    /// 会话正常终止（completed / cancelled）
    SpeechFinished { session_id: Uuid, reason: String },
    /// 会话失败终止
    SpeechFailed { session_id: Uuid, error: String },
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<AppEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅全局事件
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.channel.subscribe()
    }

    /// 发布会话启动事件
    pub fn publish_speech_started(&self, session_id: Uuid) {
        self.publish(AppEvent::SpeechStarted { session_id });
    }

    /// 发布会话正常终止事件
    pub fn publish_speech_finished(&self, session_id: Uuid, reason: &str) {
        self.publish(AppEvent::SpeechFinished {
            session_id,
            reason: reason.to_string(),
        });
    }

    /// 发布会话失败事件
    pub fn publish_speech_failed(&self, session_id: Uuid, error: &str) {
        self.publish(AppEvent::SpeechFailed {
            session_id,
            error: error.to_string(),
        });
    }

    fn publish(&self, event: AppEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::debug!(error = %e, "Failed to publish event (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
