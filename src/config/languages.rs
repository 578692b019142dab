//! Static catalog of the languages offered in the pickers.

/// One selectable language.
#[derive(Debug, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-1 code
    pub code: &'static str,
    /// English display name, also used inside prompts
    pub name: &'static str,
    pub flag: &'static str,
    /// BCP-47 locale handed to speech capture
    pub locale: &'static str,
}

// ============================================================================
// CATALOG
// ============================================================================

pub const LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English", flag: "🇺🇸", locale: "en-US" },
    Language { code: "ur", name: "Urdu", flag: "🇵🇰", locale: "ur-PK" },
    Language { code: "es", name: "Spanish", flag: "🇪🇸", locale: "es-ES" },
    Language { code: "fr", name: "French", flag: "🇫🇷", locale: "fr-FR" },
    Language { code: "de", name: "German", flag: "🇩🇪", locale: "de-DE" },
    Language { code: "it", name: "Italian", flag: "🇮🇹", locale: "it-IT" },
    Language { code: "pt", name: "Portuguese", flag: "🇵🇹", locale: "pt-PT" },
    Language { code: "ru", name: "Russian", flag: "🇷🇺", locale: "ru-RU" },
    Language { code: "ja", name: "Japanese", flag: "🇯🇵", locale: "ja-JP" },
    Language { code: "ko", name: "Korean", flag: "🇰🇷", locale: "ko-KR" },
    Language { code: "zh", name: "Chinese (Simplified)", flag: "🇨🇳", locale: "zh-CN" },
    Language { code: "ar", name: "Arabic", flag: "🇸🇦", locale: "ar-SA" },
    Language { code: "hi", name: "Hindi", flag: "🇮🇳", locale: "hi-IN" },
    Language { code: "tr", name: "Turkish", flag: "🇹🇷", locale: "tr-TR" },
    Language { code: "nl", name: "Dutch", flag: "🇳🇱", locale: "nl-NL" },
    Language { code: "vi", name: "Vietnamese", flag: "🇻🇳", locale: "vi-VN" },
    Language { code: "th", name: "Thai", flag: "🇹🇭", locale: "th-TH" },
    Language { code: "id", name: "Indonesian", flag: "🇮🇩", locale: "id-ID" },
    Language { code: "pl", name: "Polish", flag: "🇵🇱", locale: "pl-PL" },
    Language { code: "bn", name: "Bengali", flag: "🇧🇩", locale: "bn-BD" },
    Language { code: "pa", name: "Punjabi", flag: "🇮🇳", locale: "pa-IN" },
];

pub const DEFAULT_SOURCE: &Language = &LANGUAGES[0];
pub const DEFAULT_TARGET: &Language = &LANGUAGES[1];

// ============================================================================
// LOOKUP
// ============================================================================

/// Find a catalog entry by code.
///
/// Besides the catalog's own 639-1 codes this accepts 639-3 codes (`urd`)
/// and locale tags (`ur-PK`, `pt_BR`), case-insensitively.
pub fn find_language(code: &str) -> Option<&'static Language> {
    let primary = code
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    let normalized = match primary.len() {
        2 => primary,
        3 => isolang::Language::from_639_3(&primary)
            .and_then(|lang| lang.to_639_1())
            .map(str::to_string)?,
        _ => return None,
    };

    LANGUAGES.iter().find(|lang| lang.code == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_english_to_urdu() {
        assert_eq!(DEFAULT_SOURCE.name, "English");
        assert_eq!(DEFAULT_TARGET.name, "Urdu");
    }

    #[test]
    fn codes_are_unique_and_known_to_isolang() {
        let mut seen = std::collections::HashSet::new();
        for lang in LANGUAGES {
            assert!(seen.insert(lang.code), "duplicate code {}", lang.code);
            assert!(
                isolang::Language::from_639_1(lang.code).is_some(),
                "{} is not an ISO 639-1 code",
                lang.code
            );
            assert!(lang.locale.starts_with(lang.code));
        }
        assert_eq!(LANGUAGES.len(), 21);
    }

    #[test]
    fn lookup_accepts_alternate_spellings() {
        assert_eq!(find_language("ur").map(|l| l.name), Some("Urdu"));
        assert_eq!(find_language("URD").map(|l| l.name), Some("Urdu"));
        assert_eq!(find_language("pt_BR").map(|l| l.name), Some("Portuguese"));
        assert_eq!(find_language(" ja-JP ").map(|l| l.name), Some("Japanese"));
        assert_eq!(find_language("eng").map(|l| l.name), Some("English"));
    }

    #[test]
    fn lookup_rejects_unknown_codes() {
        assert!(find_language("").is_none());
        assert!(find_language("xx").is_none());
        assert!(find_language("sv").is_none());
        assert!(find_language("english").is_none());
    }
}
