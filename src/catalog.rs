pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
}

/// A synthetic voice offered by the service.
///
/// `code` always starts with `language_code`, and `language_code` names an entry
/// of [`LANGUAGES`]. Filtering goes through `language_code`, never through the
/// textual prefix.
pub struct VoiceOption {
    pub code: &'static str,
    pub name: &'static str,
    pub language_code: &'static str,
}

pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_VOICE: &str = "en-US-Neural2-D";

pub const LANGUAGES: &[LanguageOption] = &[
    LanguageOption {
        code: "en-US",
        name: "English (US)",
    },
    LanguageOption {
        code: "en-GB",
        name: "English (UK)",
    },
    LanguageOption {
        code: "da-DK",
        name: "Danish (Denmark)",
    },
    LanguageOption {
        code: "es-ES",
        name: "Spanish (Spain)",
    },
    LanguageOption {
        code: "de-DE",
        name: "German (Germany)",
    },
];

pub const VOICES: &[VoiceOption] = &[
    VoiceOption {
        code: "en-US-Neural2-D",
        name: "English (US) - Neural2-D",
        language_code: "en-US",
    },
    VoiceOption {
        code: "en-US-Neural2-A",
        name: "English (US) - Neural2-A",
        language_code: "en-US",
    },
    VoiceOption {
        code: "en-US-Neural2-F",
        name: "English (US) - Neural2-F",
        language_code: "en-US",
    },
    VoiceOption {
        code: "en-GB-Neural2-A",
        name: "English (UK) - Neural2-A",
        language_code: "en-GB",
    },
    VoiceOption {
        code: "en-GB-Neural2-B",
        name: "English (UK) - Neural2-B",
        language_code: "en-GB",
    },
    VoiceOption {
        code: "da-DK-Neural2-C",
        name: "Danish (DK) - Neural2-C",
        language_code: "da-DK",
    },
    VoiceOption {
        code: "es-ES-Neural2-B",
        name: "Spanish (ES) - Neural2-B",
        language_code: "es-ES",
    },
    VoiceOption {
        code: "es-ES-Neural2-A",
        name: "Spanish (ES) - Neural2-A",
        language_code: "es-ES",
    },
    VoiceOption {
        code: "de-DE-Neural2-B",
        name: "German (DE) - Neural2-B",
        language_code: "de-DE",
    },
];

/// Read-only language and voice lists. Handed to whoever needs them rather than
/// reached through a global.
#[derive(Clone, Copy)]
pub struct Catalog {
    languages: &'static [LanguageOption],
    voices: &'static [VoiceOption],
}

impl Catalog {
    pub const fn new(
        languages: &'static [LanguageOption],
        voices: &'static [VoiceOption],
    ) -> Self {
        Self { languages, voices }
    }

    pub const fn builtin() -> Self {
        Self::new(LANGUAGES, VOICES)
    }

    pub fn languages(&self) -> &'static [LanguageOption] {
        self.languages
    }

    /// Voices belonging to `language_code`, in declaration order.
    pub fn compatible_voices<'a>(
        &self,
        language_code: &'a str,
    ) -> impl Iterator<Item = &'static VoiceOption> + 'a {
        let voices: &'static [VoiceOption] = self.voices;
        voices
            .iter()
            .filter(move |voice| voice.language_code == language_code)
    }

    pub fn language(&self, code: &str) -> Option<&'static LanguageOption> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    pub fn voice(&self, code: &str) -> Option<&'static VoiceOption> {
        self.voices.iter().find(|voice| voice.code == code)
    }

    pub fn contains_language(&self, code: &str) -> bool {
        self.language(code).is_some()
    }

    pub fn is_compatible(&self, voice_code: &str, language_code: &str) -> bool {
        self.voice(voice_code)
            .map(|voice| voice.language_code == language_code)
            .unwrap_or(false)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
