//! Translation Context - 翻译请求与响应解析

use serde::{Deserialize, Serialize};

/// 自动检测源语种的哨兵值
pub const AUTO_DETECT: &str = "auto";

/// 语气与风格设置
///
/// 三项均可选，为空的项不进入提示词
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToneSettings {
    pub formality: Option<String>,
    pub professional_context: Option<String>,
    pub tone: Option<String>,
}

impl ToneSettings {
    /// 展开为提示词中的风格要求行
    pub fn requirement_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(formality) = &self.formality {
            lines.push(format!("Formality: {}", formality));
        }
        if let Some(professional) = &self.professional_context {
            lines.push(format!("Professional Context: {}", professional));
        }
        if let Some(tone) = &self.tone {
            lines.push(format!("Tone: {}", tone));
        }
        lines
    }

    pub fn is_empty(&self) -> bool {
        self.formality.is_none() && self.professional_context.is_none() && self.tone.is_none()
    }
}

/// 翻译请求
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// 待翻译文本
    pub text: String,
    /// 源语种，`auto` 表示自动检测
    pub source_lang: String,
    /// 目标语种
    pub target_lang: String,
    /// 语气设置
    pub tone: ToneSettings,
}

impl TranslationRequest {
    pub fn is_auto_detect(&self) -> bool {
        self.source_lang == AUTO_DETECT
    }
}

/// 自动检测到的源语种
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    pub language: String,
    /// 置信度百分比
    pub confidence: u32,
}

/// 翻译结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub text: String,
    /// 仅自动检测模式下解析出检测头时存在
    pub detected: Option<DetectedLanguage>,
}

/// 解析模型返回的翻译文本
///
/// 自动检测模式下，模型输出可能带检测头:
///
/// ```text
/// DETECTED: <语种> (<置信度>%)
/// TRANSLATION:
/// <译文>
/// ```
///
/// 解析规则: 找到第一个以 `DETECTED:` 开头的行，提取语种和整数置信度；
/// 译文为 `TRANSLATION:` 标记行之后的全部内容。检测头格式不符时
/// 整体回退为原始文本。
pub fn parse_translation_response(raw: &str, auto_detect: bool) -> TranslationOutcome {
    let trimmed = raw.trim();

    if !auto_detect {
        return TranslationOutcome {
            text: trimmed.to_string(),
            detected: None,
        };
    }

    let lines: Vec<&str> = trimmed.lines().collect();
    let detection_line = lines.iter().find(|line| line.starts_with("DETECTED:"));

    let Some(detection_line) = detection_line else {
        return TranslationOutcome {
            text: trimmed.to_string(),
            detected: None,
        };
    };

    let Some(detected) = parse_detection_line(detection_line) else {
        return TranslationOutcome {
            text: trimmed.to_string(),
            detected: None,
        };
    };

    // 译文从 TRANSLATION: 标记行之后开始；标记缺失时返回完整文本
    let text = match lines.iter().position(|line| *line == "TRANSLATION:") {
        Some(marker) => lines[marker + 1..].join("\n").trim().to_string(),
        None => trimmed.to_string(),
    };

    TranslationOutcome {
        text,
        detected: Some(detected),
    }
}

/// 解析 `DETECTED: <语种> (<置信度>%)` 格式的检测头
fn parse_detection_line(line: &str) -> Option<DetectedLanguage> {
    let rest = line.strip_prefix("DETECTED: ")?;
    let open = rest.rfind(" (")?;
    let language = &rest[..open];
    let confidence = rest[open + 2..].strip_suffix("%)")?;
    if language.is_empty() || confidence.is_empty() {
        return None;
    }
    let confidence: u32 = confidence.parse().ok()?;

    Some(DetectedLanguage {
        language: language.to_string(),
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_requirement_lines() {
        let tone = ToneSettings {
            formality: Some("formal".to_string()),
            professional_context: None,
            tone: Some("friendly".to_string()),
        };
        assert_eq!(
            tone.requirement_lines(),
            vec!["Formality: formal", "Tone: friendly"]
        );
        assert!(ToneSettings::default().is_empty());
    }

    #[test]
    fn test_parse_with_detection_header() {
        let raw = "DETECTED: French (95%)\nTRANSLATION:\nHello world";
        let outcome = parse_translation_response(raw, true);
        assert_eq!(outcome.text, "Hello world");
        assert_eq!(
            outcome.detected,
            Some(DetectedLanguage {
                language: "French".to_string(),
                confidence: 95,
            })
        );
    }

    #[test]
    fn test_parse_multiline_translation() {
        let raw = "DETECTED: German (88%)\nTRANSLATION:\nline one\nline two";
        let outcome = parse_translation_response(raw, true);
        assert_eq!(outcome.text, "line one\nline two");
    }

    #[test]
    fn test_parse_without_header_falls_back() {
        let raw = "Bonjour le monde";
        let outcome = parse_translation_response(raw, true);
        assert_eq!(outcome.text, "Bonjour le monde");
        assert!(outcome.detected.is_none());
    }

    #[test]
    fn test_parse_malformed_confidence_falls_back() {
        let raw = "DETECTED: French (high%)\nTRANSLATION:\nHello";
        let outcome = parse_translation_response(raw, true);
        assert_eq!(outcome.text, raw);
        assert!(outcome.detected.is_none());
    }

    #[test]
    fn test_parse_missing_translation_marker() {
        // 检测头有效但缺少 TRANSLATION: 标记，返回完整文本
        let raw = "DETECTED: Spanish (90%)\nHola";
        let outcome = parse_translation_response(raw, true);
        assert_eq!(outcome.text, raw);
        assert_eq!(
            outcome.detected.unwrap().language,
            "Spanish"
        );
    }

    #[test]
    fn test_parse_language_with_parentheses() {
        // 语种名本身含括号时取最后一组括号作置信度
        let raw = "DETECTED: Chinese (Simplified) (97%)\nTRANSLATION:\n你好";
        let outcome = parse_translation_response(raw, true);
        let detected = outcome.detected.unwrap();
        assert_eq!(detected.language, "Chinese (Simplified)");
        assert_eq!(detected.confidence, 97);
        assert_eq!(outcome.text, "你好");
    }

    #[test]
    fn test_parse_explicit_source_passes_through() {
        let raw = "DETECTED: French (95%)\nTRANSLATION:\nHello";
        let outcome = parse_translation_response(raw, false);
        // 非自动检测模式不解析检测头
        assert_eq!(outcome.text, raw);
        assert!(outcome.detected.is_none());
    }
}
