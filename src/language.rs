//! Script-based language detection
//!
//! A coarse presence test over Unicode blocks, not a linguistic
//! identifier. Hindi and Marathi share Devanagari and both map to `hi`;
//! transliterated (Latin) text is reported as English.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Language codes the router can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "gu")]
    Gujarati,
    #[serde(rename = "kn")]
    Kannada,
}

/// Blocks checked in priority order; the first with any hit wins.
const SCRIPT_RANGES: [(RangeInclusive<char>, Script); 5] = [
    ('\u{0900}'..='\u{097F}', Script::Hindi),
    ('\u{0B80}'..='\u{0BFF}', Script::Tamil),
    ('\u{0980}'..='\u{09FF}', Script::Bengali),
    ('\u{0A80}'..='\u{0AFF}', Script::Gujarati),
    ('\u{0C80}'..='\u{0CFF}', Script::Kannada),
];

impl Script {
    /// Short language code.
    pub fn code(self) -> &'static str {
        match self {
            Script::English => "en",
            Script::Hindi => "hi",
            Script::Tamil => "ta",
            Script::Bengali => "bn",
            Script::Gujarati => "gu",
            Script::Kannada => "kn",
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Detect the script family of `text`.
///
/// Total: every string, including the empty one, yields a code.
pub fn detect_language(text: &str) -> Script {
    SCRIPT_RANGES
        .iter()
        .find(|(range, _)| text.chars().any(|c| range.contains(&c)))
        .map(|(_, script)| *script)
        .unwrap_or(Script::English)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devanagari() {
        assert_eq!(detect_language("आज हम क्या पढ़ेंगे?"), Script::Hindi);
        assert_eq!(detect_language("आज हम क्या पढ़ेंगे?").code(), "hi");
    }

    #[test]
    fn test_each_script() {
        assert_eq!(detect_language("வணக்கம்"), Script::Tamil);
        assert_eq!(detect_language("নমস্কার"), Script::Bengali);
        assert_eq!(detect_language("નમસ્તે"), Script::Gujarati);
        assert_eq!(detect_language("ನಮಸ್ಕಾರ"), Script::Kannada);
    }

    #[test]
    fn test_defaults_to_english() {
        assert_eq!(detect_language(""), Script::English);
        assert_eq!(detect_language("1234 !?"), Script::English);
        assert_eq!(detect_language("namaste bachchon"), Script::English);
        // Malayalam is outside the table
        assert_eq!(detect_language("നമസ്കാരം"), Script::English);
    }

    #[test]
    fn test_priority_order_for_mixed_text() {
        // Tamil appears first in the text, but Devanagari is checked first
        assert_eq!(detect_language("வணக்கம் नमस्ते"), Script::Hindi);
        assert_eq!(detect_language("ನಮಸ್ಕಾರ নমস্কার"), Script::Bengali);
        assert_eq!(detect_language("hello வணக்கம்"), Script::Tamil);
    }

    #[test]
    fn test_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Script::Gujarati).unwrap(), "\"gu\"");
        assert_eq!(Script::Kannada.to_string(), "kn");
    }
}
