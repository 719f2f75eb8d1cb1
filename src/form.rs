use crate::catalog::{Catalog, DEFAULT_LANGUAGE, DEFAULT_VOICE};
use crate::dispatch::RequestOutcome;

/// User input behind the form. Only user interaction mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    text: String,
    language: String,
    voice: String,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            voice: DEFAULT_VOICE.to_string(),
        }
    }

    /// Initial state from configured defaults. Unknown languages fall back to
    /// the built-in default, and the voice is re-resolved against whatever
    /// language wins.
    pub fn from_defaults(catalog: &Catalog, language: Option<&str>, voice: Option<&str>) -> Self {
        let mut form = Self::new();
        if let Some(code) = language.filter(|code| catalog.contains_language(code)) {
            form.set_language(catalog, code);
        } else if let Some(code) = language {
            log::warn!("Ignoring unknown default language {code:?}");
        }
        if let Some(code) = voice {
            if catalog.is_compatible(code, &form.language) {
                form.set_voice(code);
            } else {
                log::warn!(
                    "Ignoring default voice {code:?}: not available for {}",
                    form.language
                );
            }
        }
        form
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Selects `code` and swaps the voice for the first compatible one when the
    /// current voice belongs to another language. With no compatible voice in
    /// the catalog the voice is left as it was.
    pub fn set_language(&mut self, catalog: &Catalog, code: &str) {
        self.language = code.to_string();
        if catalog.is_compatible(&self.voice, code) {
            return;
        }
        if let Some(voice) = catalog.compatible_voices(code).next() {
            self.voice = voice.code.to_string();
        }
    }

    pub fn set_voice(&mut self, code: &str) {
        self.voice = code.to_string();
    }

    pub(crate) fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn can_submit(&self, outcome: &RequestOutcome) -> bool {
        !self.text.is_empty() && !outcome.is_loading()
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LanguageOption, VoiceOption};

    #[test]
    fn starts_with_default_selection() {
        let form = FormState::new();
        assert_eq!(form.text(), "");
        assert_eq!(form.language(), "en-US");
        assert_eq!(form.voice(), "en-US-Neural2-D");
    }

    #[test]
    fn set_text_is_verbatim() {
        let mut form = FormState::new();
        form.set_text("  Hello\n world  ");
        assert_eq!(form.text(), "  Hello\n world  ");
        form.set_text("");
        assert_eq!(form.text(), "");
    }

    #[test]
    fn changing_language_resolves_a_compatible_voice() {
        let catalog = Catalog::builtin();
        for lang in catalog.languages() {
            let mut form = FormState::new();
            form.set_voice("de-DE-Neural2-B");
            form.set_language(&catalog, lang.code);
            assert_eq!(form.language(), lang.code);
            assert!(
                catalog.is_compatible(form.voice(), lang.code),
                "{} incompatible with {}",
                form.voice(),
                lang.code
            );
        }
    }

    #[test]
    fn changing_language_picks_first_voice_in_catalog_order() {
        let catalog = Catalog::builtin();
        let mut form = FormState::new();
        form.set_language(&catalog, "es-ES");
        assert_eq!(form.voice(), "es-ES-Neural2-B");
        form.set_language(&catalog, "en-US");
        assert_eq!(form.voice(), "en-US-Neural2-D");
    }

    #[test]
    fn compatible_voice_is_kept() {
        let catalog = Catalog::builtin();
        let mut form = FormState::new();
        form.set_voice("en-US-Neural2-F");
        form.set_language(&catalog, "en-US");
        assert_eq!(form.voice(), "en-US-Neural2-F");
    }

    #[test]
    fn language_without_voices_leaves_voice_unchanged() {
        const LANGS: &[LanguageOption] = &[
            LanguageOption {
                code: "en-US",
                name: "English (US)",
            },
            LanguageOption {
                code: "fr-FR",
                name: "French (France)",
            },
        ];
        const VOICES: &[VoiceOption] = &[VoiceOption {
            code: "en-US-Neural2-D",
            name: "English (US) - Neural2-D",
            language_code: "en-US",
        }];
        let catalog = Catalog::new(LANGS, VOICES);
        let mut form = FormState::new();
        form.set_language(&catalog, "fr-FR");
        assert_eq!(form.language(), "fr-FR");
        assert_eq!(form.voice(), "en-US-Neural2-D");
    }

    #[test]
    fn set_voice_does_not_cross_check_language() {
        let mut form = FormState::new();
        form.set_voice("da-DK-Neural2-C");
        assert_eq!(form.language(), "en-US");
        assert_eq!(form.voice(), "da-DK-Neural2-C");
    }

    #[test]
    fn submission_needs_text_and_no_request_in_flight() {
        let mut form = FormState::new();
        assert!(!form.can_submit(&RequestOutcome::Idle));
        form.set_text("Hello world");
        assert!(form.can_submit(&RequestOutcome::Idle));
        assert!(form.can_submit(&RequestOutcome::Failure("boom".into())));
        assert!(form.can_submit(&RequestOutcome::Success("data:".into())));
        assert!(!form.can_submit(&RequestOutcome::Loading));
    }

    #[test]
    fn whitespace_only_text_is_submittable() {
        let mut form = FormState::new();
        form.set_text(" ");
        assert!(form.can_submit(&RequestOutcome::Idle));
    }

    #[test]
    fn defaults_are_validated_against_catalog() {
        let catalog = Catalog::builtin();

        let form = FormState::from_defaults(&catalog, Some("da-DK"), None);
        assert_eq!(form.language(), "da-DK");
        assert_eq!(form.voice(), "da-DK-Neural2-C");

        let form = FormState::from_defaults(&catalog, Some("es-ES"), Some("es-ES-Neural2-A"));
        assert_eq!(form.voice(), "es-ES-Neural2-A");

        let form = FormState::from_defaults(&catalog, Some("xx-XX"), Some("es-ES-Neural2-A"));
        assert_eq!(form.language(), "en-US");
        assert_eq!(form.voice(), "en-US-Neural2-D");

        let form = FormState::from_defaults(&catalog, None, Some("en-US-Neural2-A"));
        assert_eq!(form.voice(), "en-US-Neural2-A");
    }
}
