//! Language detection and prefix handling
//!
//! A message may start with an explicit marker such as `in Hindi: ...`. When
//! present it wins; otherwise the text is classified statistically and the
//! result is mapped onto the supported language set.

use regex::Regex;
use tracing::debug;

/// Supported language codes and their display names
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "Hindi"),
    ("pa", "Punjabi"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("mr", "Marathi"),
];

const PREFIX_PATTERN: &str = r"(?i)^in\s+([a-z]+)(?:\s*[:-]|\s)\s*";

/// Source of statistical language guesses
pub trait LanguageDetector: Send + Sync {
    /// Best-guess language code for `text`, `None` if undetectable
    fn detect(&self, text: &str) -> Option<String>;
}

/// Trigram-based detection via `whatlang`, reporting ISO 639-1 codes where
/// one exists
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        let code = info.lang().code();
        let short = match code {
            "eng" => "en",
            "hin" => "hi",
            "urd" => "ur",
            "pan" => "pa",
            "tam" => "ta",
            "tel" => "te",
            "mar" => "mr",
            "ben" => "bn",
            "guj" => "gu",
            "kan" => "kn",
            "mal" => "ml",
            other => other,
        };
        Some(short.to_string())
    }
}

/// Language detection bound to a default language
pub struct LanguageService {
    detector: Box<dyn LanguageDetector>,
    default_language: String,
    prefix: Regex,
}

impl LanguageService {
    pub fn new(default_language: impl Into<String>) -> crate::Result<Self> {
        Self::with_detector(default_language, Box::new(WhatlangDetector))
    }

    pub fn with_detector(
        default_language: impl Into<String>,
        detector: Box<dyn LanguageDetector>,
    ) -> crate::Result<Self> {
        Ok(Self {
            detector,
            default_language: default_language.into(),
            prefix: Regex::new(PREFIX_PATTERN)?,
        })
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Language code of `text` within the supported set
    pub fn detect_language(&self, text: &str) -> String {
        if let Some(code) = self.explicit_language(text) {
            debug!("Explicit language prefix found: {}", code);
            return code.to_string();
        }

        match self.detector.detect(text) {
            Some(detected) => self.normalize(&detected),
            None => self.default_language.clone(),
        }
    }

    /// Remove a recognized `in <language>` prefix and the whitespace after it.
    /// Text without such a prefix is returned unchanged.
    pub fn clean_language_prefix(&self, text: &str) -> String {
        match self.prefix.captures(text) {
            Some(caps) if resolve_language(&caps[1]).is_some() => text[caps[0].len()..].to_string(),
            _ => text.to_string(),
        }
    }

    /// Display name for `code`, English when unknown
    pub fn language_name(code: &str) -> &'static str {
        SUPPORTED_LANGUAGES
            .iter()
            .find(|(c, _)| *c == code)
            .map_or("English", |(_, name)| *name)
    }

    pub fn is_supported(code: &str) -> bool {
        SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == code)
    }

    fn explicit_language(&self, text: &str) -> Option<&'static str> {
        let caps = self.prefix.captures(text)?;
        resolve_language(&caps[1])
    }

    fn normalize(&self, detected: &str) -> String {
        let detected = detected.to_lowercase();
        if Self::is_supported(&detected) {
            return detected;
        }
        if let Some((base, _)) = detected.split_once('-') {
            if Self::is_supported(base) {
                return base.to_string();
            }
        }
        // Urdu and Hindi are frequently confused in short texts
        if detected == "ur" {
            return "hi".to_string();
        }
        self.default_language.clone()
    }
}

/// Match a word against supported codes, then against display names
/// contained in it
fn resolve_language(word: &str) -> Option<&'static str> {
    let word = word.to_lowercase();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(code, _)| *code == word)
        .or_else(|| {
            SUPPORTED_LANGUAGES
                .iter()
                .find(|(_, name)| word.contains(&name.to_lowercase()))
        })
        .map(|(code, _)| *code)
}
