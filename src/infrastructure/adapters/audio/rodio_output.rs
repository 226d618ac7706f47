//! Rodio Output - 音频输出适配器
//!
//! 输出流惰性打开；每段缓冲一个 Sink，完成信号由
//! 轮询 sink 状态的后台任务发出，中止走 CancellationToken

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::application::ports::{AudioOutputPort, DecodedAudio, OutputError, PlaybackHandle};

/// OutputStream 不是 Send。它初始化后只存放在适配器内部、
/// 不再被任何线程访问（仅为保持设备打开而持有），
/// 包装只为满足 Arc<dyn AudioOutputPort> 的 Send + Sync 约束
struct SendWrapper<T>(T);
unsafe impl<T> Send for SendWrapper<T> {}
unsafe impl<T> Sync for SendWrapper<T> {}

struct OutputState {
    _stream: SendWrapper<OutputStream>,
    handle: OutputStreamHandle,
}

/// Rodio 输出设备
pub struct RodioOutput {
    state: Mutex<Option<OutputState>>,
}

impl RodioOutput {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    /// 惰性打开默认输出设备，已打开时复用
    fn ensure_stream(&self) -> Result<OutputStreamHandle, OutputError> {
        let mut state = self.state.lock().unwrap();
        if state.is_none() {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|e| OutputError::DeviceUnavailable(e.to_string()))?;
            tracing::info!("Audio output stream opened");
            *state = Some(OutputState {
                _stream: SendWrapper(stream),
                handle,
            });
        }
        Ok(state.as_ref().map(|s| s.handle.clone()).unwrap())
    }
}

impl Default for RodioOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioOutputPort for RodioOutput {
    async fn acquire(&self) -> Result<(), OutputError> {
        self.ensure_stream().map(|_| ())
    }

    async fn play(&self, audio: DecodedAudio) -> Result<PlaybackHandle, OutputError> {
        let stream_handle = self.ensure_stream()?;

        let sink =
            Sink::try_new(&stream_handle).map_err(|e| OutputError::Playback(e.to_string()))?;
        let duration_ms = audio.duration_ms();
        let source = SamplesBuffer::new(audio.channels, audio.sample_rate, audio.samples);
        sink.append(source);

        tracing::debug!(duration_ms, "Playback started");

        let (handle, control) = PlaybackHandle::pair();
        tokio::spawn(async move {
            let stop = control.stop_token();
            loop {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => {
                        sink.stop();
                        tracing::debug!("Playback stopped");
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_millis(20)) => {
                        if sink.empty() {
                            break;
                        }
                    }
                }
            }
            control.complete();
        });

        Ok(handle)
    }
}
