//! Lingua - 翻译与朗读工具
//!
//! CLI 入口：
//! - translate: 翻译文本（支持自动检测源语言）
//! - speak: 朗读文本（流式合成 + 本地播放，Ctrl-C 停止）
//! - voices: 列出可用音色
//! - set-key: 保存服务凭证

use std::sync::Arc;

use clap::{Parser, Subcommand};

use lingua::application::ports::{settings_keys, SettingsStorePort, SynthesizerPort};
use lingua::application::{SpeechController, SpeechRequest, TranslationService};
use lingua::config::{load_config, print_config};
use lingua::domain::language::{detect_direction, TextDirection};
use lingua::domain::translation::{ToneSettings, TranslationRequest, AUTO_DETECT};
use lingua::domain::voice::{VoiceId, VoiceSettings};
use lingua::infrastructure::adapters::{
    ElevenLabsClient, ElevenLabsClientConfig, GeminiClient, GeminiClientConfig,
    LogActivityIndicator, RodioOutput, SymphoniaDecoder,
};
use lingua::infrastructure::events::{AppEvent, EventPublisher};
use lingua::infrastructure::persistence::{SledSettingsStore, SledStoreConfig};

#[derive(Parser)]
#[command(name = "lingua", about = "Translate text and speak it aloud", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 翻译文本
    Translate {
        /// 要翻译的文本
        text: String,

        /// 源语言（auto 表示自动检测）
        #[arg(long, default_value = AUTO_DETECT)]
        from: String,

        /// 目标语言
        #[arg(long)]
        to: String,

        /// 正式程度（如 formal / casual）
        #[arg(long)]
        formality: Option<String>,

        /// 专业语境（如 legal / medical）
        #[arg(long)]
        professional: Option<String>,

        /// 语气（如 friendly / serious）
        #[arg(long)]
        tone: Option<String>,
    },

    /// 朗读文本
    Speak {
        /// 要朗读的文本
        text: String,

        /// 音色 ID（缺省时使用上次的音色）
        #[arg(long)]
        voice: Option<String>,

        /// 语速倍率
        #[arg(long, default_value_t = 1.0)]
        speed: f32,
    },

    /// 列出可用音色
    Voices,

    /// 保存服务凭证
    SetKey {
        /// 服务名（tts 或 translator）
        service: String,

        /// API key
        key: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},lingua={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::debug!("Lingua - 翻译与朗读工具");
    print_config(&config);

    // 确保设置数据库目录存在
    if let Some(parent) = std::path::Path::new(&config.storage.settings_path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 创建设置存储
    let store_config = SledStoreConfig {
        db_path: config.storage.settings_path.clone(),
    };
    let settings: Arc<dyn SettingsStorePort> = SledSettingsStore::new(&store_config)
        .map_err(|e| anyhow::anyhow!("Failed to open settings store: {}", e))?
        .arc();

    match cli.command {
        Command::Translate {
            text,
            from,
            to,
            formality,
            professional,
            tone,
        } => {
            run_translate(
                &config,
                settings,
                TranslationRequest {
                    text,
                    source_lang: from,
                    target_lang: to,
                    tone: ToneSettings {
                        formality,
                        professional_context: professional,
                        tone,
                    },
                },
            )
            .await
        }
        Command::Speak { text, voice, speed } => {
            run_speak(&config, settings, text, voice, speed).await
        }
        Command::Voices => run_voices(&config, settings).await,
        Command::SetKey { service, key } => run_set_key(settings, &service, &key).await,
    }
}

/// translate 子命令
async fn run_translate(
    config: &lingua::AppConfig,
    settings: Arc<dyn SettingsStorePort>,
    request: TranslationRequest,
) -> anyhow::Result<()> {
    let translator_config = GeminiClientConfig {
        base_url: config.translator.base_url.clone(),
        model: config.translator.model.clone(),
        timeout_secs: config.translator.timeout_secs,
    };
    let translator = Arc::new(
        GeminiClient::new(translator_config, settings.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create translator client: {}", e))?,
    );

    let target_lang = request.target_lang.clone();
    let service = TranslationService::new(translator, settings);
    let outcome = service
        .translate(request)
        .await
        .map_err(|e| anyhow::anyhow!("Translation failed: {}", e))?;

    if let Some(detected) = &outcome.detected {
        println!("Detected: {} ({}%)", detected.language, detected.confidence);
    }
    if detect_direction(&outcome.text, Some(&target_lang)) == TextDirection::Rtl {
        tracing::debug!("Output text is right-to-left");
    }
    println!("{}", outcome.text);

    Ok(())
}

/// speak 子命令
async fn run_speak(
    config: &lingua::AppConfig,
    settings: Arc<dyn SettingsStorePort>,
    text: String,
    voice: Option<String>,
    speed: f32,
) -> anyhow::Result<()> {
    // 未指定音色时回退到上次使用的音色
    let voice = match voice {
        Some(v) => v,
        None => settings
            .get(settings_keys::LAST_OUTPUT_VOICE)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?
            .ok_or_else(|| {
                anyhow::anyhow!("No voice specified and no previously used voice found")
            })?,
    };
    let voice_id = VoiceId::new(voice).map_err(|e| anyhow::anyhow!("Invalid voice: {}", e))?;

    let synthesizer = Arc::new(
        ElevenLabsClient::new(
            ElevenLabsClientConfig {
                base_url: config.tts.base_url.clone(),
                model_id: config.tts.model_id.clone(),
                timeout_secs: config.tts.timeout_secs,
            },
            settings.clone(),
        )
        .map_err(|e| anyhow::anyhow!("Failed to create TTS client: {}", e))?,
    );

    let events = EventPublisher::new().arc();
    let mut rx = events.subscribe();
    let controller = SpeechController::new(
        synthesizer,
        Arc::new(SymphoniaDecoder::new()),
        Arc::new(RodioOutput::new()),
        settings.clone(),
        Arc::new(LogActivityIndicator),
        events,
    )
    .arc();

    controller
        .speak(SpeechRequest {
            text,
            voice_id: voice_id.clone(),
            settings: VoiceSettings::with_speed(speed),
        })
        .await
        .map_err(|e| anyhow::anyhow!("Speech failed: {}", e))?;

    // 记录本次音色，下次可省略 --voice
    if let Err(e) = settings
        .set(settings_keys::LAST_OUTPUT_VOICE, voice_id.as_str())
        .await
    {
        tracing::warn!(error = %e, "Failed to persist last used voice");
    }

    // 等待会话终止或 Ctrl-C
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received stop signal");
                controller.stop();
            }
            event = rx.recv() => {
                match event {
                    Ok(AppEvent::SpeechFinished { reason, .. }) => {
                        tracing::info!(reason = %reason, "Playback finished");
                        return Ok(());
                    }
                    Ok(AppEvent::SpeechFailed { error, .. }) => {
                        return Err(anyhow::anyhow!("Speech failed: {}", error));
                    }
                    Ok(AppEvent::SpeechStarted { .. }) => {}
                    Err(e) => {
                        return Err(anyhow::anyhow!("Event channel closed: {}", e));
                    }
                }
            }
        }
    }
}

/// voices 子命令
async fn run_voices(
    config: &lingua::AppConfig,
    settings: Arc<dyn SettingsStorePort>,
) -> anyhow::Result<()> {
    let synthesizer = ElevenLabsClient::new(
        ElevenLabsClientConfig {
            base_url: config.tts.base_url.clone(),
            model_id: config.tts.model_id.clone(),
            timeout_secs: config.tts.timeout_secs,
        },
        settings,
    )
    .map_err(|e| anyhow::anyhow!("Failed to create TTS client: {}", e))?;

    let voices = synthesizer
        .list_voices()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list voices: {}", e))?;

    if voices.is_empty() {
        println!("No voices available");
        return Ok(());
    }
    for voice in voices {
        println!("{}  {}", voice.id, voice.label());
    }

    Ok(())
}

/// set-key 子命令
async fn run_set_key(
    settings: Arc<dyn SettingsStorePort>,
    service: &str,
    key: &str,
) -> anyhow::Result<()> {
    let setting_key = match service {
        "tts" => settings_keys::TTS_API_KEY,
        "translator" => settings_keys::TRANSLATOR_API_KEY,
        other => {
            return Err(anyhow::anyhow!(
                "Unknown service '{}', expected 'tts' or 'translator'",
                other
            ))
        }
    };

    settings
        .set(setting_key, key)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to save key: {}", e))?;
    println!("Saved {} API key", service);

    Ok(())
}
