//! 语音会话流水线
//!
//! 单次 speak 请求的完整生命周期：
//! 1. 发起流式合成请求
//! 2. 循环读取音频分块（取消令牌在每个挂起点复查）
//! 3. 按到达顺序拼接为完整缓冲（单次拷贝）
//! 4. 整体解码为 PCM；解码完成后复查取消状态
//! 5. 入队并顺序播放，缓冲之间不重叠

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::error::SpeechError;
use crate::application::ports::{
    AudioChunkStream, AudioDecoderPort, AudioOutputPort, DecodedAudio, SettingsStorePort,
    SynthesisError, SynthesisRequest, SynthesizerPort,
};
use crate::domain::voice::{VoiceId, VoiceSettings};

/// 一次 speak 请求
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// 要朗读的文本
    pub text: String,
    /// 音色 ID
    pub voice_id: VoiceId,
    /// 语音参数（含语速）
    pub settings: VoiceSettings,
}

/// 会话共享状态
///
/// 控制器与会话任务各持一份引用；speaking 标志与取消令牌
/// 一起构成会话是否存活的判据
pub(crate) struct SessionShared {
    pub cancel: CancellationToken,
    speaking: AtomicBool,
}

impl SessionShared {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            cancel: CancellationToken::new(),
            speaking: AtomicBool::new(true),
        })
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::Acquire)
    }

    /// 终止会话：先取消再落 speaking 标志
    pub fn terminate(&self) {
        self.cancel.cancel();
        self.speaking.store(false, Ordering::Release);
    }
}

/// 会话任务的依赖集合
pub(crate) struct SessionContext {
    pub id: Uuid,
    pub shared: Arc<SessionShared>,
    pub synthesizer: Arc<dyn SynthesizerPort>,
    pub decoder: Arc<dyn AudioDecoderPort>,
    pub output: Arc<dyn AudioOutputPort>,
    pub settings: Arc<dyn SettingsStorePort>,
}

/// 执行会话流水线
///
/// 取消以 `Err(Cancelled)` 返回，由控制器判定为正常终止
pub(crate) async fn run_session(
    ctx: SessionContext,
    request: SpeechRequest,
) -> Result<(), SpeechError> {
    let cancel = ctx.shared.cancel.clone();

    let synthesis = SynthesisRequest {
        text: request.text,
        voice_id: request.voice_id,
        settings: request.settings,
    };

    // 等待响应头期间同样可取消
    let stream = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(SpeechError::Cancelled),
        result = ctx.synthesizer.open_stream(synthesis) => match result {
            Ok(stream) => stream,
            Err(err) => return Err(classify_synthesis_error(&ctx, err).await),
        },
    };

    let chunks = collect_chunks(&ctx, stream).await?;
    let buffer = concat_chunks(chunks);
    tracing::debug!(
        session_id = %ctx.id,
        audio_size = buffer.len(),
        "Audio stream complete"
    );

    // 解码可随时被取消打断
    let decoded = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(SpeechError::Cancelled),
        result = ctx.decoder.decode(buffer) => result?,
    };

    // 解码完成后复查：取消与解码赛跑时丢弃解码结果
    if cancel.is_cancelled() || !ctx.shared.is_speaking() {
        return Err(SpeechError::Cancelled);
    }

    tracing::debug!(
        session_id = %ctx.id,
        duration_ms = decoded.duration_ms(),
        sample_rate = decoded.sample_rate,
        "Audio decoded"
    );

    let mut queue = VecDeque::new();
    queue.push_back(decoded);
    drain_queue(ctx.output.as_ref(), &cancel, &mut queue).await
}

/// 读取音频流的全部分块
///
/// 每次挂起恢复后先检查取消令牌；取消时放弃剩余读取，
/// 已积累的分块随之丢弃
pub(crate) async fn collect_chunks(
    ctx: &SessionContext,
    mut stream: AudioChunkStream,
) -> Result<Vec<Vec<u8>>, SpeechError> {
    let cancel = &ctx.shared.cancel;
    let mut chunks: Vec<Vec<u8>> = Vec::new();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(
                    session_id = %ctx.id,
                    chunks = chunks.len(),
                    "Stream read cancelled"
                );
                return Err(SpeechError::Cancelled);
            }
            next = stream.next() => match next {
                Some(Ok(chunk)) => chunks.push(chunk),
                Some(Err(err)) => return Err(classify_synthesis_error(ctx, err).await),
                None => break,
            },
        }
    }

    Ok(chunks)
}

/// 按到达顺序拼接分块为单一连续缓冲
///
/// 总长等于分块长度之和；预分配容量，每个分块只拷贝一次
pub(crate) fn concat_chunks(chunks: Vec<Vec<u8>>) -> Vec<u8> {
    let total: usize = chunks.iter().map(|c| c.len()).sum();
    let mut buffer = Vec::with_capacity(total);
    for chunk in &chunks {
        buffer.extend_from_slice(chunk);
    }
    buffer
}

/// 顺序播放队列中的缓冲
///
/// 逐个弹出队首、播放并等待完成信号；取消时中止当前播放。
/// 同一时刻至多一个缓冲在播放
pub(crate) async fn drain_queue(
    output: &dyn AudioOutputPort,
    cancel: &CancellationToken,
    queue: &mut VecDeque<DecodedAudio>,
) -> Result<(), SpeechError> {
    while let Some(audio) = queue.pop_front() {
        if cancel.is_cancelled() {
            return Err(SpeechError::Cancelled);
        }

        let mut handle = output.play(audio).await?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                handle.stop();
                return Err(SpeechError::Cancelled);
            }
            _ = handle.wait() => {}
        }
    }

    Ok(())
}

/// 合成错误归类
///
/// 401 说明存储的凭证已失效，连带清除
async fn classify_synthesis_error(ctx: &SessionContext, err: SynthesisError) -> SpeechError {
    if matches!(err, SynthesisError::Unauthorized) {
        if let Err(e) = ctx.settings.clear_tts_api_key().await {
            tracing::warn!(session_id = %ctx.id, error = %e, "Failed to clear TTS API key");
        }
    }
    SpeechError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::speech::test_support::{
        scripted_chunks, FakeDecoder, FakeOutput,
    };
    use crate::infrastructure::persistence::InMemorySettingsStore;
    use std::time::Duration;

    fn context(
        synthesizer: Arc<dyn SynthesizerPort>,
        decoder: Arc<FakeDecoder>,
        output: Arc<FakeOutput>,
        settings: Arc<InMemorySettingsStore>,
    ) -> SessionContext {
        SessionContext {
            id: Uuid::new_v4(),
            shared: SessionShared::new(),
            synthesizer,
            decoder,
            output,
            settings,
        }
    }

    fn request() -> SpeechRequest {
        SpeechRequest {
            text: "hello".to_string(),
            voice_id: VoiceId::new("voice-1").unwrap(),
            settings: VoiceSettings::default(),
        }
    }

    #[test]
    fn test_concat_preserves_order_and_length() {
        let chunks = vec![vec![1u8, 2, 3], vec![4, 5, 6, 7, 8], vec![9, 10]];
        let buffer = concat_chunks(chunks);
        assert_eq!(buffer.len(), 10);
        assert_eq!(buffer, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_concat_empty() {
        assert!(concat_chunks(vec![]).is_empty());
    }

    #[tokio::test]
    async fn test_happy_path_collects_decodes_and_plays() {
        let synthesizer = scripted_chunks(vec![vec![1u8; 4], vec![2u8; 4]], 0);
        let decoder = Arc::new(FakeDecoder::new());
        let output = Arc::new(FakeOutput::new(10));
        let settings = Arc::new(InMemorySettingsStore::new());

        let ctx = context(synthesizer, decoder.clone(), output.clone(), settings);
        run_session(ctx, request()).await.unwrap();

        assert_eq!(decoder.calls(), 1);
        // 两个 4 字节分块拼接后一次性解码为 8 个采样
        assert_eq!(output.played_lengths(), vec![8]);
    }

    #[tokio::test]
    async fn test_cancel_during_stream_read() {
        // 分块之间留出延迟，在读取中途取消
        let synthesizer = scripted_chunks(vec![vec![1u8; 4], vec![2u8; 4], vec![3u8; 4]], 50);
        let decoder = Arc::new(FakeDecoder::new());
        let output = Arc::new(FakeOutput::new(10));
        let settings = Arc::new(InMemorySettingsStore::new());

        let ctx = context(synthesizer, decoder.clone(), output.clone(), settings);
        let shared = ctx.shared.clone();

        let session = tokio::spawn(run_session(ctx, request()));
        tokio::time::sleep(Duration::from_millis(75)).await;
        shared.terminate();

        let result = session.await.unwrap();
        assert!(matches!(result, Err(SpeechError::Cancelled)));
        // 取消在解码之前，已积累的分块被丢弃
        assert_eq!(decoder.calls(), 0);
        assert!(output.played_lengths().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_racing_decode_discards_result() {
        let synthesizer = scripted_chunks(vec![vec![1u8; 4]], 0);
        let decoder = Arc::new(FakeDecoder::gated());
        let output = Arc::new(FakeOutput::new(10));
        let settings = Arc::new(InMemorySettingsStore::new());

        let ctx = context(synthesizer, decoder.clone(), output.clone(), settings);
        let shared = ctx.shared.clone();

        let session = tokio::spawn(run_session(ctx, request()));
        // 等会话进入解码阶段后取消，再放行解码
        tokio::time::sleep(Duration::from_millis(50)).await;
        shared.terminate();
        decoder.release();

        let result = session.await.unwrap();
        assert!(matches!(result, Err(SpeechError::Cancelled)));
        assert!(output.played_lengths().is_empty());
    }

    #[tokio::test]
    async fn test_decode_failure_terminates_session() {
        let synthesizer = scripted_chunks(vec![vec![1u8; 4]], 0);
        let decoder = Arc::new(FakeDecoder::failing());
        let output = Arc::new(FakeOutput::new(10));
        let settings = Arc::new(InMemorySettingsStore::new());

        let ctx = context(synthesizer, decoder, output.clone(), settings);
        let result = run_session(ctx, request()).await;

        assert!(matches!(result, Err(SpeechError::Decode(_))));
        assert!(output.played_lengths().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_clears_stored_credential() {
        use crate::application::ports::{settings_keys, SettingsStorePort};
        use crate::infrastructure::adapters::tts::{ScriptedFailure, ScriptedSynthesizer};

        let synthesizer = Arc::new(ScriptedSynthesizer::failing(ScriptedFailure::Unauthorized));
        let decoder = Arc::new(FakeDecoder::new());
        let output = Arc::new(FakeOutput::new(10));
        let settings = Arc::new(InMemorySettingsStore::new());
        settings
            .set(settings_keys::TTS_API_KEY, "stale-key")
            .await
            .unwrap();

        let ctx = context(synthesizer, decoder, output, settings.clone());
        let result = run_session(ctx, request()).await;

        assert!(matches!(result, Err(SpeechError::Auth)));
        assert_eq!(settings.get(settings_keys::TTS_API_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rate_limit_maps_without_clearing_credential() {
        use crate::application::ports::{settings_keys, SettingsStorePort};
        use crate::infrastructure::adapters::tts::{ScriptedFailure, ScriptedSynthesizer};

        let synthesizer = Arc::new(ScriptedSynthesizer::failing(ScriptedFailure::RateLimited));
        let decoder = Arc::new(FakeDecoder::new());
        let output = Arc::new(FakeOutput::new(10));
        let settings = Arc::new(InMemorySettingsStore::new());
        settings
            .set(settings_keys::TTS_API_KEY, "good-key")
            .await
            .unwrap();

        let ctx = context(synthesizer, decoder, output, settings.clone());
        let result = run_session(ctx, request()).await;

        assert!(matches!(result, Err(SpeechError::RateLimit)));
        assert!(settings
            .get(settings_keys::TTS_API_KEY)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_drain_queue_plays_in_fifo_order() {
        let output = FakeOutput::new(5);
        let cancel = CancellationToken::new();
        let mut queue = VecDeque::new();
        for len in [3usize, 5, 2] {
            queue.push_back(DecodedAudio {
                samples: vec![0.0; len],
                sample_rate: 44100,
                channels: 1,
            });
        }

        drain_queue(&output, &cancel, &mut queue).await.unwrap();
        assert_eq!(output.played_lengths(), vec![3, 5, 2]);
    }

    #[tokio::test]
    async fn test_drain_queue_stops_on_cancel() {
        let output = FakeOutput::new(200);
        let cancel = CancellationToken::new();
        let mut queue = VecDeque::new();
        for _ in 0..3 {
            queue.push_back(DecodedAudio {
                samples: vec![0.0; 4],
                sample_rate: 44100,
                channels: 1,
            });
        }

        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel_clone.cancel();
        });

        let result = drain_queue(&output, &cancel, &mut queue).await;
        assert!(matches!(result, Err(SpeechError::Cancelled)));

        // 中止计数由后台播放任务更新，等它被调度
        tokio::time::sleep(Duration::from_millis(50)).await;
        // 第一个缓冲开播后即被中止，其余不再播放
        assert_eq!(output.played_lengths().len(), 1);
        assert_eq!(output.stop_count(), 1);
    }
}
