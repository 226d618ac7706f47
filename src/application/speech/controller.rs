//! Speech Controller - 语音会话管理器
//!
//! 进程级单会话不变量的唯一执行点：
//! - speak 为 toggle 语义，播放中再次调用等价于 stop
//! - stop 幂等，无会话时调用安全
//! - 新会话启动前必先终止旧会话

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::application::error::SpeechError;
use crate::application::ports::{
    ActivityIndicatorPort, AudioDecoderPort, AudioOutputPort, OutputError, SettingsStorePort,
    SpeakerState, SynthesizerPort,
};
use crate::application::speech::session::{
    run_session, SessionContext, SessionShared, SpeechRequest,
};
use crate::infrastructure::events::EventPublisher;

/// 活动会话槽的内容
struct ActiveSession {
    id: Uuid,
    shared: Arc<SessionShared>,
}

/// 语音会话管理器
///
/// 持有全部端口依赖，拥有至多一个活动会话
pub struct SpeechController {
    synthesizer: Arc<dyn SynthesizerPort>,
    decoder: Arc<dyn AudioDecoderPort>,
    output: Arc<dyn AudioOutputPort>,
    settings: Arc<dyn SettingsStorePort>,
    indicator: Arc<dyn ActivityIndicatorPort>,
    events: Arc<EventPublisher>,
    /// 活动会话槽；锁从不跨 await 持有
    active: Mutex<Option<ActiveSession>>,
}

impl SpeechController {
    pub fn new(
        synthesizer: Arc<dyn SynthesizerPort>,
        decoder: Arc<dyn AudioDecoderPort>,
        output: Arc<dyn AudioOutputPort>,
        settings: Arc<dyn SettingsStorePort>,
        indicator: Arc<dyn ActivityIndicatorPort>,
        events: Arc<EventPublisher>,
    ) -> Self {
        Self {
            synthesizer,
            decoder,
            output,
            settings,
            indicator,
            events,
            active: Mutex::new(None),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 当前是否有会话在播放
    pub fn is_speaking(&self) -> bool {
        self.active
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.shared.is_speaking())
            .unwrap_or(false)
    }

    /// 发起朗读（toggle 语义）
    ///
    /// 有会话在播放时，本次调用只负责停止它并立即返回；
    /// 否则校验输入、初始化音频输出并启动新会话
    pub async fn speak(self: &Arc<Self>, request: SpeechRequest) -> Result<(), SpeechError> {
        if self.is_speaking() {
            self.stop();
            return Ok(());
        }

        validate_request(&request)?;

        // 音频输出不可用是 AudioInit，不进入会话流水线
        self.output.acquire().await.map_err(|e| match e {
            OutputError::DeviceUnavailable(msg) | OutputError::Playback(msg) => {
                SpeechError::AudioInit(msg)
            }
        })?;

        let id = Uuid::new_v4();
        let shared = SessionShared::new();
        {
            let mut active = self.active.lock().unwrap();
            // 竞态兜底：toggle 检查之后若有会话抢先占槽，仍保证单会话
            if let Some(prev) = active.take() {
                prev.shared.terminate();
            }
            *active = Some(ActiveSession {
                id,
                shared: shared.clone(),
            });
        }

        self.indicator.set_state(SpeakerState::Speaking);
        self.events.publish_speech_started(id);
        tracing::info!(
            session_id = %id,
            text_len = request.text.len(),
            voice_id = %request.voice_id,
            "Speech session started"
        );

        let ctx = SessionContext {
            id,
            shared,
            synthesizer: self.synthesizer.clone(),
            decoder: self.decoder.clone(),
            output: self.output.clone(),
            settings: self.settings.clone(),
        };
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let result = run_session(ctx, request).await;
            controller.finish_session(id, result);
        });

        Ok(())
    }

    /// 停止当前会话
    ///
    /// 幂等；无会话时只复位指示器。取消信号下发后
    /// 会话任务自行收尾并发布终止事件
    pub fn stop(&self) {
        let mut active = self.active.lock().unwrap();
        if let Some(session) = active.take() {
            tracing::debug!(session_id = %session.id, "Stopping speech session");
            session.shared.terminate();
        }
        drop(active);
        self.indicator.set_state(SpeakerState::Idle);
    }

    /// 会话任务结束时的收尾
    ///
    /// 每个会话恰好发布一个终止事件；指示器只在没有
    /// 其他会话占槽时才复位，避免覆盖新会话的状态
    fn finish_session(&self, id: Uuid, result: Result<(), SpeechError>) {
        let other_session_active = {
            let mut active = self.active.lock().unwrap();
            if active.as_ref().map(|s| s.id == id).unwrap_or(false) {
                if let Some(session) = active.take() {
                    session.shared.terminate();
                }
            }
            active.is_some()
        };

        if !other_session_active {
            self.indicator.set_state(SpeakerState::Idle);
        }

        match result {
            Ok(()) => {
                tracing::info!(session_id = %id, "Speech session completed");
                self.events.publish_speech_finished(id, "completed");
            }
            Err(err) if err.is_cancelled() => {
                tracing::debug!(session_id = %id, "Speech session cancelled");
                self.events.publish_speech_finished(id, "cancelled");
            }
            Err(err) => {
                tracing::error!(session_id = %id, error = %err, "Speech session failed");
                self.events.publish_speech_failed(id, &err.to_string());
            }
        }
    }
}

/// 输入校验：非空文本、正的有限语速
fn validate_request(request: &SpeechRequest) -> Result<(), SpeechError> {
    if request.text.trim().is_empty() {
        return Err(SpeechError::InvalidInput("text cannot be empty".to_string()));
    }
    request
        .settings
        .validate()
        .map_err(|e| SpeechError::InvalidInput(e.to_string()))?;
    Ok(())
}
