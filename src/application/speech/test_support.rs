//! 语音模块测试用的端口假实现

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::application::ports::{
    ActivityIndicatorPort, AudioDecoderPort, AudioOutputPort, DecodeError, DecodedAudio,
    OutputError, PlaybackHandle, SpeakerState, SynthesizerPort,
};
use crate::infrastructure::adapters::tts::ScriptedSynthesizer;

/// 构造产出固定分块序列的合成器
pub(crate) fn scripted_chunks(
    chunks: Vec<Vec<u8>>,
    chunk_delay_ms: u64,
) -> Arc<dyn SynthesizerPort> {
    Arc::new(ScriptedSynthesizer::with_chunks(chunks).chunk_delay_ms(chunk_delay_ms))
}

/// 假解码器
///
/// 每个输入字节映射为一个采样，便于断言解码输入长度；
/// 可配置为门控（等待放行）或始终失败
pub(crate) struct FakeDecoder {
    gate: Option<Arc<Notify>>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeDecoder {
    pub fn new() -> Self {
        Self {
            gate: None,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// 解码阻塞直到 release 被调用
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            gate: None,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioDecoderPort for FakeDecoder {
    async fn decode(&self, data: Vec<u8>) -> Result<DecodedAudio, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(DecodeError::InvalidData("scripted decode failure".to_string()));
        }

        Ok(DecodedAudio {
            samples: data.iter().map(|b| *b as f32 / 255.0).collect(),
            sample_rate: 44100,
            channels: 1,
        })
    }
}

/// 假输出设备
///
/// 记录播放顺序（以采样数区分缓冲），每次播放持续固定时长，
/// 统计中止次数
pub(crate) struct FakeOutput {
    playback_ms: u64,
    played: Mutex<Vec<usize>>,
    stops: Arc<AtomicUsize>,
    fail_acquire: bool,
}

impl FakeOutput {
    pub fn new(playback_ms: u64) -> Self {
        Self {
            playback_ms,
            played: Mutex::new(Vec::new()),
            stops: Arc::new(AtomicUsize::new(0)),
            fail_acquire: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            playback_ms: 0,
            played: Mutex::new(Vec::new()),
            stops: Arc::new(AtomicUsize::new(0)),
            fail_acquire: true,
        }
    }

    pub fn played_lengths(&self) -> Vec<usize> {
        self.played.lock().unwrap().clone()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioOutputPort for FakeOutput {
    async fn acquire(&self) -> Result<(), OutputError> {
        if self.fail_acquire {
            return Err(OutputError::DeviceUnavailable(
                "no output device".to_string(),
            ));
        }
        Ok(())
    }

    async fn play(&self, audio: DecodedAudio) -> Result<PlaybackHandle, OutputError> {
        self.played.lock().unwrap().push(audio.samples.len());

        let (handle, control) = PlaybackHandle::pair();
        let stops = self.stops.clone();
        let playback_ms = self.playback_ms;

        tokio::spawn(async move {
            let stop = control.stop_token();
            tokio::select! {
                biased;
                _ = stop.cancelled() => {
                    stops.fetch_add(1, Ordering::SeqCst);
                }
                _ = tokio::time::sleep(Duration::from_millis(playback_ms)) => {}
            }
            control.complete();
        });

        Ok(handle)
    }
}

/// 假指示器 - 记录状态切换序列
#[derive(Default)]
pub(crate) struct FakeIndicator {
    states: Mutex<Vec<SpeakerState>>,
}

impl FakeIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Vec<SpeakerState> {
        self.states.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<SpeakerState> {
        self.states.lock().unwrap().last().copied()
    }
}

impl ActivityIndicatorPort for FakeIndicator {
    fn set_state(&self, state: SpeakerState) {
        self.states.lock().unwrap().push(state);
    }
}
