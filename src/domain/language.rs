use std::fmt;

/// Recognizer and synthesizer configuration for one supported language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    pub code: &'static str,
    /// Tesseract language packs loaded for this language. No duplicates.
    pub recognizer_locales: &'static [&'static str],
    pub synthesis_locale: &'static str,
}

const BUILTIN_PROFILES: &[LanguageProfile] = &[
    LanguageProfile {
        code: "en",
        recognizer_locales: &["eng"],
        synthesis_locale: "en",
    },
    LanguageProfile {
        code: "hi",
        recognizer_locales: &["hin"],
        synthesis_locale: "hi",
    },
    LanguageProfile {
        code: "bn",
        recognizer_locales: &["ben"],
        synthesis_locale: "bn",
    },
    LanguageProfile {
        code: "te",
        recognizer_locales: &["tel"],
        synthesis_locale: "te",
    },
    LanguageProfile {
        code: "mr",
        recognizer_locales: &["mar"],
        synthesis_locale: "mr",
    },
    LanguageProfile {
        code: "ta",
        recognizer_locales: &["tam"],
        synthesis_locale: "ta",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguage(pub String);

/// Fixed table of supported language codes.
#[derive(Debug, Clone, Copy)]
pub struct LanguageRegistry {
    profiles: &'static [LanguageProfile],
}

impl LanguageRegistry {
    pub fn builtin() -> Self {
        Self {
            profiles: BUILTIN_PROFILES,
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn resolve(&self, code: &str) -> Result<&'static LanguageProfile, UnknownLanguage> {
        self.profiles
            .iter()
            .find(|p| p.code == code)
            .ok_or_else(|| UnknownLanguage(code.to_string()))
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.resolve(code).is_ok()
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> {
        self.profiles.iter().map(|p| p.code)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Display for LanguageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}
