//! Static language name to ISO code lookup.
//!
//! Source files carry display names ("English"); the remote schema wants
//! codes ("en"). A name with no entry is a mapper error, not a silent miss.

/// Language display names paired with their ISO 639-1 codes, as accepted by
/// the remote directory service.
const LANGUAGES: &[(&str, &str)] = &[
    ("Arabic", "ar"),
    ("Chinese (Simplified)", "zh_CN"),
    ("Chinese (Traditional)", "zh_TW"),
    ("Czech", "cs"),
    ("Danish", "da"),
    ("Dutch", "nl"),
    ("English", "en"),
    ("Finnish", "fi"),
    ("French", "fr"),
    ("German", "de"),
    ("Greek", "el"),
    ("Hebrew", "iw"),
    ("Hungarian", "hu"),
    ("Italian", "it"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Norwegian", "no"),
    ("Polish", "pl"),
    ("Portuguese", "pt"),
    ("Russian", "ru"),
    ("Spanish", "es"),
    ("Swedish", "sv"),
    ("Thai", "th"),
    ("Turkish", "tr"),
];

/// Resolve a language display name to its code. Case-sensitive, as the
/// source system exports fixed labels.
pub fn language_code(name: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(display, _)| *display == name)
        .map(|(_, code)| *code)
}
