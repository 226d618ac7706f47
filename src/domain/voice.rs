//! Voice Context - 音色与语音参数

use serde::{Deserialize, Serialize};

/// 音色唯一标识（TTS 服务分配的字符串 ID）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Result<Self, &'static str> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("音色 ID 不能为空");
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色目录条目（来自 TTS 服务的 voice 列表）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    pub id: VoiceId,
    pub name: String,
    /// 口音标签，目录中可能缺失
    pub accent: Option<String>,
}

impl Voice {
    /// 列表展示用标签，如 "Rachel (american)"
    pub fn label(&self) -> String {
        match &self.accent {
            Some(accent) => format!("{} ({})", self.name, accent),
            None => format!("{} (No accent)", self.name),
        }
    }
}

/// 语音合成参数
///
/// 每次合成请求的不可变快照，speed 为语速倍率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
    pub speed: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
            speed: 1.0,
        }
    }
}

impl VoiceSettings {
    pub fn with_speed(speed: f32) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !(0.0..=1.0).contains(&self.stability) {
            return Err("stability 必须在 0.0 到 1.0 之间");
        }
        if !(0.0..=1.0).contains(&self.similarity_boost) {
            return Err("similarity_boost 必须在 0.0 到 1.0 之间");
        }
        if !(0.0..=1.0).contains(&self.style) {
            return Err("style 必须在 0.0 到 1.0 之间");
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err("语速必须为正数");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_id_rejects_empty() {
        assert!(VoiceId::new("").is_err());
        assert!(VoiceId::new("   ").is_err());
        assert!(VoiceId::new("21m00Tcm4TlvDq8ikWAM").is_ok());
    }

    #[test]
    fn test_voice_label() {
        let voice = Voice {
            id: VoiceId::new("v1").unwrap(),
            name: "Rachel".to_string(),
            accent: Some("american".to_string()),
        };
        assert_eq!(voice.label(), "Rachel (american)");

        let voice = Voice {
            id: VoiceId::new("v2").unwrap(),
            name: "Adam".to_string(),
            accent: None,
        };
        assert_eq!(voice.label(), "Adam (No accent)");
    }

    #[test]
    fn test_settings_defaults() {
        let settings = VoiceSettings::default();
        assert_eq!(settings.stability, 0.5);
        assert_eq!(settings.similarity_boost, 0.75);
        assert_eq!(settings.style, 0.0);
        assert!(settings.use_speaker_boost);
        assert_eq!(settings.speed, 1.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = VoiceSettings::default();
        settings.stability = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = VoiceSettings::default();
        settings.speed = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = VoiceSettings::default();
        settings.speed = f32::NAN;
        assert!(settings.validate().is_err());

        assert!(VoiceSettings::with_speed(1.2).validate().is_ok());
    }
}
