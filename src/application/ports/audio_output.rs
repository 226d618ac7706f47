//! Audio Output Port - 音频输出设备抽象
//!
//! 每次播放返回一个显式的 PlaybackHandle，完成信号通过
//! oneshot 通道送达，中止通过 CancellationToken 下发

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use super::audio_decoder::DecodedAudio;

/// 输出错误
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Playback error: {0}")]
    Playback(String),
}

/// 播放句柄 - 调用方持有
///
/// 对应一次缓冲的播放；`wait` 等待自然播完，`stop` 立即中止
pub struct PlaybackHandle {
    finished: oneshot::Receiver<()>,
    stop: CancellationToken,
}

impl PlaybackHandle {
    /// 创建一对播放句柄与适配器侧控制端
    pub fn pair() -> (PlaybackHandle, PlaybackControl) {
        let (tx, rx) = oneshot::channel();
        let stop = CancellationToken::new();
        (
            PlaybackHandle {
                finished: rx,
                stop: stop.clone(),
            },
            PlaybackControl {
                finished: Some(tx),
                stop,
            },
        )
    }

    /// 等待播放结束（自然播完或被中止）
    pub async fn wait(&mut self) {
        let _ = (&mut self.finished).await;
    }

    /// 请求中止当前播放
    pub fn stop(&self) {
        self.stop.cancel();
    }
}

/// 播放控制端 - 适配器侧持有
///
/// 适配器在播放结束时调用 `complete`；Drop 时兜底发送完成信号，
/// 保证 `wait` 不会因适配器提前退出而悬挂
pub struct PlaybackControl {
    finished: Option<oneshot::Sender<()>>,
    stop: CancellationToken,
}

impl PlaybackControl {
    /// 中止令牌，适配器在播放循环中监听
    pub fn stop_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    /// 播放结束，通知持有句柄的一方
    pub fn complete(mut self) {
        if let Some(tx) = self.finished.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for PlaybackControl {
    fn drop(&mut self) {
        if let Some(tx) = self.finished.take() {
            let _ = tx.send(());
        }
    }
}

/// Audio Output Port
///
/// 音频输出设备只有一个写入方，同一时刻至多一个缓冲在播放，
/// 由调用方持有至多一个 PlaybackHandle 保证
#[async_trait]
pub trait AudioOutputPort: Send + Sync {
    /// 初始化或恢复输出设备
    async fn acquire(&self) -> Result<(), OutputError>;

    /// 开始播放一段 PCM 缓冲，立即返回句柄
    async fn play(&self, audio: DecodedAudio) -> Result<PlaybackHandle, OutputError>;
}
