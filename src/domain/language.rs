//! Translation Context - 语种目录与文字方向
//!
//! 提供完整的语种列表（已排序）、RTL 语种集合，
//! 以及基于语种或文本内容的文字方向推断

/// 完整语种列表（按字母序排列）
pub const LANGUAGES: &[&str] = &[
    "Abkhaz", "Acehnese", "Acholi", "Afar", "Afrikaans", "Albanian", "Alur", "Amharic",
    "Arabic", "Armenian", "Assamese", "Avar", "Awadhi", "Aymara", "Azerbaijani", "Balinese",
    "Baluchi", "Bambara", "Baoulé", "Bashkir", "Basque", "Batak Karo", "Batak Simalungun",
    "Batak Toba", "Belarusian", "Bemba", "Bengali", "Betawi", "Bhojpuri", "Bikol", "Bosnian",
    "Breton", "Bulgarian", "Buryat", "Cantonese", "Catalan", "Cebuano", "Chamorro", "Chechen",
    "Chichewa", "Chinese (Simplified)", "Chinese (Traditional)", "Chuukese", "Chuvash",
    "Corsican", "Croatian", "Czech", "Danish", "Dari", "Dhivehi", "Dinka", "Dogri", "Dombe",
    "Dutch", "Dyula", "Dzongkha", "English", "Esperanto", "Estonian", "Ewe", "Faroese",
    "Fijian", "Filipino", "Finnish", "Fon", "French", "French (Canada)", "Frisian",
    "Friulian", "Fulani", "Ga", "Galician", "Georgian", "German", "Greek", "Guarani",
    "Gujarati", "Haitian Creole", "Hakha Chin", "Hausa", "Hawaiian", "Hebrew", "Hiligaynon",
    "Hindi", "Hmong", "Hungarian", "Hunsrik", "Iban", "Icelandic", "Igbo", "Ilocano",
    "Indonesian", "Inuktut (Latin)", "Irish", "Italian", "Japanese", "Javanese", "Jingpo",
    "Kalaallisut", "Kannada", "Kanuri", "Kapampangan", "Kazakh", "Khasi", "Khmer",
    "Kinyarwanda", "Korean", "Kurdish", "Kyrgyz", "Lao", "Latin", "Latvian", "Lithuanian",
    "Luxembourgish", "Macedonian", "Malagasy", "Malay", "Malayalam", "Maltese", "Maori",
    "Marathi", "Mongolian", "Nepali", "Norwegian", "Oromo", "Pashto", "Persian", "Polish",
    "Portuguese", "Punjabi", "Romanian", "Russian", "Sanskrit", "Serbian", "Sindhi",
    "Sinhala", "Slovak", "Slovenian", "Somali", "Spanish", "Swahili", "Swedish", "Tagalog",
    "Tamil", "Telugu", "Thai", "Tibetan", "Turkish", "Ukrainian", "Urdu", "Uzbek",
    "Vietnamese", "Welsh", "Yiddish", "Yoruba", "Zulu",
];

/// RTL 语种集合（小写匹配）
const RTL_LANGUAGES: &[&str] = &[
    "arabic", "persian", "hebrew", "urdu", "aramaic", "azeri", "kurdish", "syriac",
    "mandaic", "samaritan", "mende kikakui", "n'ko", "psalter pahlavi", "thana",
    "mandaean", "manichaean", "mendean", "nabataean", "palmyrene", "phoenician",
    "mesopotamian arabic", "moroccan arabic", "egyptian arabic", "dari",
];

/// 文字方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// 判断语种是否为 RTL（从右向左书写）
pub fn is_rtl(language: &str) -> bool {
    let lower = language.to_lowercase();
    RTL_LANGUAGES.contains(&lower.as_str())
}

/// 推断文本的显示方向
///
/// 优先依据语种判断；语种未知（None 或 "auto"）时退回到
/// 基于 Unicode 区段的文本内容分析。RTL 与 LTR 字符共存时优先 RTL。
pub fn detect_direction(text: &str, language: Option<&str>) -> TextDirection {
    if let Some(lang) = language {
        if lang != "auto" {
            return if is_rtl(lang) {
                TextDirection::Rtl
            } else {
                TextDirection::Ltr
            };
        }
    }

    let has_rtl = text.chars().any(is_rtl_char);
    let has_ltr = text.chars().any(is_ltr_char);

    match (has_rtl, has_ltr) {
        (true, false) => TextDirection::Rtl,
        (false, true) => TextDirection::Ltr,
        // 混合内容优先 RTL
        (true, true) => TextDirection::Rtl,
        (false, false) => TextDirection::Ltr,
    }
}

/// RTL 书写系统的 Unicode 区段
fn is_rtl_char(c: char) -> bool {
    matches!(c,
        '\u{0591}'..='\u{07FF}'
        | '\u{200F}'
        | '\u{202B}'
        | '\u{202E}'
        | '\u{FB1D}'..='\u{FDFF}'
        | '\u{FE70}'..='\u{FEFC}')
}

/// LTR 书写系统的 Unicode 区段（拉丁字母及扩展）
fn is_ltr_char(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | 'a'..='z'
        | '\u{00C0}'..='\u{00D6}'
        | '\u{00D8}'..='\u{00F6}'
        | '\u{00F8}'..='\u{02AF}')
}
