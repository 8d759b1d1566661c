//! Script names and their canonical forms

/// A transliteration scheme the built-in engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Devanagari,
    Bengali,
    Gurmukhi,
    Gujarati,
    Oriya,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Iast,
    Itrans,
}

impl Scheme {
    pub const ALL: [Scheme; 11] = [
        Scheme::Devanagari,
        Scheme::Bengali,
        Scheme::Gurmukhi,
        Scheme::Gujarati,
        Scheme::Oriya,
        Scheme::Tamil,
        Scheme::Telugu,
        Scheme::Kannada,
        Scheme::Malayalam,
        Scheme::Iast,
        Scheme::Itrans,
    ];

    /// Canonical name, as reported back to clients
    pub fn name(self) -> &'static str {
        match self {
            Scheme::Devanagari => "Devanagari",
            Scheme::Bengali => "Bengali",
            Scheme::Gurmukhi => "Gurmukhi",
            Scheme::Gujarati => "Gujarati",
            Scheme::Oriya => "Oriya",
            Scheme::Tamil => "Tamil",
            Scheme::Telugu => "Telugu",
            Scheme::Kannada => "Kannada",
            Scheme::Malayalam => "Malayalam",
            Scheme::Iast => "IAST",
            Scheme::Itrans => "ITRANS",
        }
    }

    /// Look up a scheme by canonical name, ignoring case
    pub fn from_name(name: &str) -> Option<Scheme> {
        Scheme::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(name.trim()))
    }

    /// First code point of the script's Unicode block.
    ///
    /// The Brahmic blocks share one layout, so a letter sits at the same
    /// offset in each of them.
    pub fn block_base(self) -> Option<u32> {
        match self {
            Scheme::Devanagari => Some(0x0900),
            Scheme::Bengali => Some(0x0980),
            Scheme::Gurmukhi => Some(0x0A00),
            Scheme::Gujarati => Some(0x0A80),
            Scheme::Oriya => Some(0x0B00),
            Scheme::Tamil => Some(0x0B80),
            Scheme::Telugu => Some(0x0C00),
            Scheme::Kannada => Some(0x0C80),
            Scheme::Malayalam => Some(0x0D00),
            Scheme::Iast | Scheme::Itrans => None,
        }
    }
}

/// Map a free-form script or language name to its canonical scheme name.
///
/// Unknown names come back trimmed and lower-cased so the transliterator can
/// make the final call. Blank or missing names yield `None`.
pub fn normalize_script_name(name: Option<&str>) -> Option<String> {
    let key = name?.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }

    let canonical = match key.as_str() {
        "devanagari" | "hindi" | "marathi" | "sanskrit" | "nepali" => Scheme::Devanagari,
        "iast" => Scheme::Iast,
        "itrans" => Scheme::Itrans,
        "telugu" => Scheme::Telugu,
        "kannada" => Scheme::Kannada,
        "tamil" => Scheme::Tamil,
        "malayalam" => Scheme::Malayalam,
        "gujarati" => Scheme::Gujarati,
        "gurmukhi" | "punjabi" => Scheme::Gurmukhi,
        "bengali" | "bangla" => Scheme::Bengali,
        "oriya" | "odia" => Scheme::Oriya,
        _ => return Some(key),
    };

    Some(canonical.name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(normalize_script_name(Some("hindi")).as_deref(), Some("Devanagari"));
        assert_eq!(normalize_script_name(Some("  Devanagari ")).as_deref(), Some("Devanagari"));
        assert_eq!(normalize_script_name(Some("iast")).as_deref(), Some("IAST"));
        assert_eq!(normalize_script_name(Some("Odia")).as_deref(), Some("Oriya"));
        assert_eq!(normalize_script_name(Some("PUNJABI")).as_deref(), Some("Gurmukhi"));
    }

    #[test]
    fn test_unknown_passes_through() {
        assert_eq!(normalize_script_name(Some("Klingon")).as_deref(), Some("klingon"));
    }

    #[test]
    fn test_blank_is_none() {
        assert_eq!(normalize_script_name(None), None);
        assert_eq!(normalize_script_name(Some("   ")), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Scheme::from_name("itrans"), Some(Scheme::Itrans));
        assert_eq!(Scheme::from_name("Tamil"), Some(Scheme::Tamil));
        assert_eq!(Scheme::from_name("hindi"), None);
        for scheme in Scheme::ALL {
            assert_eq!(Scheme::from_name(scheme.name()), Some(scheme));
        }
    }
}
