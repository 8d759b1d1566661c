//! Transliteration engine
//!
//! The Brahmic scripts share one block layout, so every supported scheme is
//! decoded into offsets within that layout and encoded back out. Roman
//! schemes go through lookup tables; consonants carry an inherent `a` that a
//! virama suppresses.

use std::collections::HashMap;

use super::scheme::Scheme;

/// Transliteration error types
#[derive(Debug, thiserror::Error)]
pub enum TranslitError {
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
}

/// Converts text between named schemes
pub trait Transliterator: Send + Sync {
    /// Canonical names of every scheme this transliterator accepts
    fn supported_schemes(&self) -> Vec<&'static str>;

    fn supports(&self, scheme: &str) -> bool {
        self.supported_schemes()
            .iter()
            .any(|name| name.eq_ignore_ascii_case(scheme))
    }

    fn transliterate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslitError>;
}

// ============================================================================
// Shared letter model
// ============================================================================

/// A decoded character: a Brahmic letter by block offset, or anything else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Letter(u8),
    Other(char),
}

const CANDRABINDU: u8 = 0x01;
const ANUSVARA: u8 = 0x02;
const VISARGA: u8 = 0x03;
const INHERENT_A: u8 = 0x05;
const NUKTA: u8 = 0x3C;
const AVAGRAHA: u8 = 0x3D;
const VIRAMA: u8 = 0x4D;
const OM: u8 = 0x50;
const DANDA: u8 = 0x64;
const DOUBLE_DANDA: u8 = 0x65;
const DIGIT_ZERO: u8 = 0x66;

fn is_consonant(offset: u8) -> bool {
    (0x15..=0x39).contains(&offset) || (0x58..=0x5F).contains(&offset)
}

fn is_independent_vowel(offset: u8) -> bool {
    (0x05..=0x14).contains(&offset) || offset == 0x60 || offset == 0x61
}

fn digit_value(offset: u8) -> Option<u8> {
    (DIGIT_ZERO..DIGIT_ZERO + 10)
        .contains(&offset)
        .then(|| offset - DIGIT_ZERO)
}

/// (independent vowel, dependent sign) pairs
const VOWEL_SIGNS: &[(u8, u8)] = &[
    (0x06, 0x3E),
    (0x07, 0x3F),
    (0x08, 0x40),
    (0x09, 0x41),
    (0x0A, 0x42),
    (0x0B, 0x43),
    (0x60, 0x44),
    (0x0C, 0x62),
    (0x61, 0x63),
    (0x0D, 0x45),
    (0x0E, 0x46),
    (0x0F, 0x47),
    (0x10, 0x48),
    (0x11, 0x49),
    (0x12, 0x4A),
    (0x13, 0x4B),
    (0x14, 0x4C),
];

fn vowel_for_sign(sign: u8) -> Option<u8> {
    VOWEL_SIGNS
        .iter()
        .find(|(_, s)| *s == sign)
        .map(|(vowel, _)| *vowel)
}

fn sign_for_vowel(vowel: u8) -> Option<u8> {
    VOWEL_SIGNS
        .iter()
        .find(|(v, _)| *v == vowel)
        .map(|(_, sign)| *sign)
}

/// Tamil has no aspirates or voiced stops; they collapse onto the plain
/// consonant. `None` means the letter exists as-is.
fn fold_tamil(offset: u8) -> Option<&'static [u8]> {
    let folded: &'static [u8] = match offset {
        0x16 | 0x17 | 0x18 | 0x58 | 0x59 | 0x5A => &[0x15],
        0x1B => &[0x1A],
        0x1D | 0x5B => &[0x1C],
        0x20 | 0x21 | 0x22 | 0x5C | 0x5D => &[0x1F],
        0x25 | 0x26 | 0x27 => &[0x24],
        0x2B | 0x2C | 0x2D | 0x5E => &[0x2A],
        0x5F => &[0x2F],
        0x0B => &[0x30, 0x41],
        0x43 => &[VIRAMA, 0x30, 0x41],
        CANDRABINDU => &[0x2E, VIRAMA],
        NUKTA | AVAGRAHA => &[],
        _ => return None,
    };
    Some(folded)
}

// ============================================================================
// Roman tables
// ============================================================================

struct RomanEntry {
    offset: u8,
    iast: &'static str,
    itrans: &'static str,
    /// Whether the spelling is accepted on input
    decodes: bool,
}

const fn entry(offset: u8, iast: &'static str, itrans: &'static str) -> RomanEntry {
    RomanEntry {
        offset,
        iast,
        itrans,
        decodes: true,
    }
}

const fn output_only(offset: u8, iast: &'static str, itrans: &'static str) -> RomanEntry {
    RomanEntry {
        offset,
        iast,
        itrans,
        decodes: false,
    }
}

/// Earlier entries win for both directions; later duplicates only add
/// alternative spellings.
const ROMAN_ENTRIES: &[RomanEntry] = &[
    // Vowels
    entry(0x05, "a", "a"),
    entry(0x06, "ā", "A"),
    entry(0x07, "i", "i"),
    entry(0x08, "ī", "I"),
    entry(0x09, "u", "u"),
    entry(0x0A, "ū", "U"),
    entry(0x0B, "ṛ", "RRi"),
    entry(0x60, "ṝ", "RRI"),
    entry(0x0C, "ḷ", "LLi"),
    entry(0x61, "ḹ", "LLI"),
    entry(0x0F, "e", "e"),
    entry(0x10, "ai", "ai"),
    entry(0x13, "o", "o"),
    entry(0x14, "au", "au"),
    output_only(0x0D, "e", "e"),
    output_only(0x0E, "e", "e"),
    output_only(0x11, "o", "o"),
    output_only(0x12, "o", "o"),
    // Consonants
    entry(0x15, "k", "k"),
    entry(0x16, "kh", "kh"),
    entry(0x17, "g", "g"),
    entry(0x18, "gh", "gh"),
    entry(0x19, "ṅ", "~N"),
    entry(0x1A, "c", "ch"),
    entry(0x1B, "ch", "Ch"),
    entry(0x1C, "j", "j"),
    entry(0x1D, "jh", "jh"),
    entry(0x1E, "ñ", "~n"),
    entry(0x1F, "ṭ", "T"),
    entry(0x20, "ṭh", "Th"),
    entry(0x21, "ḍ", "D"),
    entry(0x22, "ḍh", "Dh"),
    entry(0x23, "ṇ", "N"),
    entry(0x24, "t", "t"),
    entry(0x25, "th", "th"),
    entry(0x26, "d", "d"),
    entry(0x27, "dh", "dh"),
    entry(0x28, "n", "n"),
    entry(0x29, "ṉ", "^n"),
    entry(0x2A, "p", "p"),
    entry(0x2B, "ph", "ph"),
    entry(0x2C, "b", "b"),
    entry(0x2D, "bh", "bh"),
    entry(0x2E, "m", "m"),
    entry(0x2F, "y", "y"),
    entry(0x30, "r", "r"),
    entry(0x31, "ṟ", "^r"),
    entry(0x32, "l", "l"),
    entry(0x33, "ḻ", "L"),
    entry(0x34, "ḻ", "zh"),
    entry(0x35, "v", "v"),
    entry(0x36, "ś", "sh"),
    entry(0x37, "ṣ", "Sh"),
    entry(0x38, "s", "s"),
    entry(0x39, "h", "h"),
    entry(0x58, "q", "q"),
    entry(0x59, "ḵh", "K"),
    entry(0x5A, "ġ", "G"),
    entry(0x5B, "z", "z"),
    entry(0x5C, "ṙ", ".D"),
    entry(0x5D, "ṙh", ".Dh"),
    entry(0x5E, "f", "f"),
    entry(0x5F, "ẏ", "Y"),
    // Marks and punctuation
    entry(ANUSVARA, "ṃ", "M"),
    entry(VISARGA, "ḥ", "H"),
    entry(CANDRABINDU, "m̐", ".N"),
    entry(AVAGRAHA, "'", ".a"),
    output_only(OM, "oṃ", "OM"),
    entry(DANDA, "|", "|"),
    entry(DOUBLE_DANDA, "||", "||"),
    // Alternative spellings
    entry(0x06, "ā", "aa"),
    entry(0x08, "ī", "ii"),
    entry(0x08, "ī", "ee"),
    entry(0x0A, "ū", "uu"),
    entry(0x0A, "ū", "oo"),
    entry(0x0B, "ṛ", "R^i"),
    entry(0x60, "ṝ", "R^I"),
    entry(0x1A, "c", "c"),
    entry(0x1B, "ch", "chh"),
    entry(0x35, "v", "w"),
    entry(0x36, "ś", "shh"),
    entry(ANUSVARA, "ṁ", ".n"),
    entry(VISARGA, "ḥ", ".h"),
    entry(0x37, "ṣ", "S"),
];

struct RomanTable {
    to_roman: HashMap<u8, &'static str>,
    from_roman: HashMap<&'static str, u8>,
    /// Longest input spelling, in chars
    max_len: usize,
}

impl RomanTable {
    fn build(spelling: impl Fn(&RomanEntry) -> &'static str) -> Self {
        let mut to_roman = HashMap::new();
        let mut from_roman = HashMap::new();

        for entry in ROMAN_ENTRIES {
            let text = spelling(entry);
            to_roman.entry(entry.offset).or_insert(text);
            if entry.decodes {
                from_roman.entry(text).or_insert(entry.offset);
            }
        }

        let max_len = from_roman
            .keys()
            .map(|key| key.chars().count())
            .max()
            .unwrap_or(1);

        Self {
            to_roman,
            from_roman,
            max_len,
        }
    }

    fn roman(&self, offset: u8) -> &'static str {
        self.to_roman.get(&offset).copied().unwrap_or("")
    }

    /// Longest spelling at the start of `chars`, with its length
    fn longest_match(&self, chars: &[char]) -> Option<(u8, usize)> {
        (1..=self.max_len.min(chars.len())).rev().find_map(|len| {
            let key: String = chars[..len].iter().collect();
            self.from_roman.get(key.as_str()).map(|offset| (*offset, len))
        })
    }
}

// ============================================================================
// Built-in transliterator
// ============================================================================

/// In-process transliterator for the Brahmic scripts plus IAST and ITRANS
pub struct BrahmicTransliterator {
    iast: RomanTable,
    itrans: RomanTable,
}

impl BrahmicTransliterator {
    pub fn new() -> Self {
        Self {
            iast: RomanTable::build(|entry| entry.iast),
            itrans: RomanTable::build(|entry| entry.itrans),
        }
    }

    fn scheme(name: &str) -> Result<Scheme, TranslitError> {
        Scheme::from_name(name).ok_or_else(|| TranslitError::UnsupportedScheme(name.to_string()))
    }

    fn roman_table(&self, scheme: Scheme) -> &RomanTable {
        match scheme {
            Scheme::Itrans => &self.itrans,
            _ => &self.iast,
        }
    }

    fn decode(&self, text: &str, scheme: Scheme) -> Vec<Unit> {
        match scheme.block_base() {
            Some(base) => decode_brahmic(text, base),
            None if scheme == Scheme::Iast => decode_roman(&text.to_lowercase(), &self.iast),
            None => decode_roman(text, self.roman_table(scheme)),
        }
    }

    fn encode(&self, units: &[Unit], scheme: Scheme) -> String {
        match scheme.block_base() {
            Some(base) => encode_brahmic(units, base, scheme == Scheme::Tamil),
            None => encode_roman(units, self.roman_table(scheme)),
        }
    }
}

impl Default for BrahmicTransliterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Transliterator for BrahmicTransliterator {
    fn supported_schemes(&self) -> Vec<&'static str> {
        Scheme::ALL.iter().map(|scheme| scheme.name()).collect()
    }

    fn transliterate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslitError> {
        let from = Self::scheme(from)?;
        let to = Self::scheme(to)?;

        if from == to {
            return Ok(text.to_string());
        }

        let units = self.decode(text, from);
        Ok(self.encode(&units, to))
    }
}

fn decode_brahmic(text: &str, base: u32) -> Vec<Unit> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            match c {
                '\u{0964}' => Unit::Letter(DANDA),
                '\u{0965}' => Unit::Letter(DOUBLE_DANDA),
                _ if (base..base + 0x80).contains(&code) => Unit::Letter((code - base) as u8),
                _ => Unit::Other(c),
            }
        })
        .collect()
}

fn push_letter(out: &mut String, base: u32, offset: u8) {
    let code = match offset {
        DANDA | DOUBLE_DANDA => 0x0900 + offset as u32,
        _ => base + offset as u32,
    };
    if let Some(c) = char::from_u32(code) {
        out.push(c);
    }
}

fn encode_brahmic(units: &[Unit], base: u32, tamil: bool) -> String {
    let mut out = String::with_capacity(units.len() * 3);

    for unit in units {
        match *unit {
            Unit::Other(c) => out.push(c),
            Unit::Letter(offset) => match fold_tamil(offset).filter(|_| tamil) {
                Some(folded) => {
                    for o in folded {
                        push_letter(&mut out, base, *o);
                    }
                }
                None => push_letter(&mut out, base, offset),
            },
        }
    }

    out
}

fn decode_roman(text: &str, table: &RomanTable) -> Vec<Unit> {
    let chars: Vec<char> = text.chars().collect();
    let mut units = Vec::with_capacity(chars.len());
    // A consonant still waiting for its vowel
    let mut pending = false;
    let mut i = 0;

    while i < chars.len() {
        match table.longest_match(&chars[i..]) {
            Some((offset, len)) => {
                i += len;
                if is_consonant(offset) {
                    if pending {
                        units.push(Unit::Letter(VIRAMA));
                    }
                    units.push(Unit::Letter(offset));
                    pending = true;
                } else if is_independent_vowel(offset) && pending {
                    if let Some(sign) = sign_for_vowel(offset) {
                        units.push(Unit::Letter(sign));
                    }
                    pending = false;
                } else {
                    if pending {
                        units.push(Unit::Letter(VIRAMA));
                        pending = false;
                    }
                    units.push(Unit::Letter(offset));
                }
            }
            None => {
                let c = chars[i];
                i += 1;
                if pending {
                    units.push(Unit::Letter(VIRAMA));
                    pending = false;
                }
                match c.to_digit(10) {
                    Some(d) => units.push(Unit::Letter(DIGIT_ZERO + d as u8)),
                    None => units.push(Unit::Other(c)),
                }
            }
        }
    }

    if pending {
        units.push(Unit::Letter(VIRAMA));
    }

    units
}

fn encode_roman(units: &[Unit], table: &RomanTable) -> String {
    let mut out = String::with_capacity(units.len() * 2);
    let mut i = 0;

    while i < units.len() {
        match units[i] {
            Unit::Other(c) => {
                out.push(c);
                i += 1;
            }
            Unit::Letter(offset) if is_consonant(offset) => {
                out.push_str(table.roman(offset));
                let mut next = i + 1;
                if units.get(next) == Some(&Unit::Letter(NUKTA)) {
                    next += 1;
                }
                match units.get(next) {
                    Some(Unit::Letter(VIRAMA)) => next += 1,
                    Some(Unit::Letter(sign)) => match vowel_for_sign(*sign) {
                        Some(vowel) => {
                            out.push_str(table.roman(vowel));
                            next += 1;
                        }
                        None => out.push_str(table.roman(INHERENT_A)),
                    },
                    _ => out.push_str(table.roman(INHERENT_A)),
                }
                i = next;
            }
            Unit::Letter(offset) => {
                if let Some(d) = digit_value(offset) {
                    out.push(char::from(b'0' + d));
                } else if let Some(vowel) = vowel_for_sign(offset) {
                    out.push_str(table.roman(vowel));
                } else {
                    // Stray virama and nukta have no roman form
                    out.push_str(table.roman(offset));
                }
                i += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translit(text: &str, from: &str, to: &str) -> String {
        BrahmicTransliterator::new()
            .transliterate(text, from, to)
            .unwrap()
    }

    #[test]
    fn test_devanagari_to_iast() {
        assert_eq!(translit("नमस्ते", "Devanagari", "IAST"), "namaste");
        assert_eq!(translit("धन्यवाद", "Devanagari", "IAST"), "dhanyavāda");
        assert_eq!(translit("संस्कृतम्", "Devanagari", "IAST"), "saṃskṛtam");
        assert_eq!(translit("ज्ञान", "Devanagari", "IAST"), "jñāna");
    }

    #[test]
    fn test_devanagari_to_itrans() {
        assert_eq!(translit("नमस्ते", "Devanagari", "ITRANS"), "namaste");
        assert_eq!(translit("धन्यवाद", "Devanagari", "ITRANS"), "dhanyavAda");
    }

    #[test]
    fn test_iast_to_devanagari() {
        assert_eq!(translit("namaste", "IAST", "Devanagari"), "नमस्ते");
        assert_eq!(translit("saṃskṛtam", "IAST", "Devanagari"), "संस्कृतम्");
        assert_eq!(translit("Namaste", "IAST", "Devanagari"), "नमस्ते");
    }

    #[test]
    fn test_itrans_to_devanagari() {
        assert_eq!(translit("dhanyavaada", "ITRANS", "Devanagari"), "धन्यवाद");
        assert_eq!(translit("dhanyavAda", "ITRANS", "Devanagari"), "धन्यवाद");
    }

    #[test]
    fn test_between_brahmic_scripts() {
        assert_eq!(translit("नमस्ते", "Devanagari", "Telugu"), "నమస్తే");
        assert_eq!(translit("नमस्ते", "Devanagari", "Kannada"), "ನಮಸ್ತೇ");
        assert_eq!(translit("नमस्ते", "Devanagari", "Gujarati"), "નમસ્તે");
        assert_eq!(translit("నమస్తే", "Telugu", "Devanagari"), "नमस्ते");
    }

    #[test]
    fn test_tamil_folds_missing_letters() {
        assert_eq!(translit("नमस्ते", "Devanagari", "Tamil"), "நமஸ்தே");
        assert_eq!(translit("धन्यवाद", "Devanagari", "Tamil"), "தந்யவாத");
    }

    #[test]
    fn test_tamil_to_iast() {
        assert_eq!(translit("நன்றி", "Tamil", "IAST"), "naṉṟi");
    }

    #[test]
    fn test_punctuation_and_spaces_survive() {
        assert_eq!(
            translit("नमस्ते, भारत।", "Devanagari", "IAST"),
            "namaste, bhārata|"
        );
        assert_eq!(translit("राम।", "Devanagari", "Bengali"), "রাম।");
    }

    #[test]
    fn test_digits() {
        assert_eq!(translit("२०२४", "Devanagari", "IAST"), "2024");
        assert_eq!(translit("2024", "IAST", "Devanagari"), "२०२४");
    }

    #[test]
    fn test_same_scheme_is_identity() {
        assert_eq!(translit("anything at all", "IAST", "IAST"), "anything at all");
    }

    #[test]
    fn test_unsupported_scheme() {
        let engine = BrahmicTransliterator::new();
        let result = engine.transliterate("x", "Devanagari", "klingon");
        assert!(matches!(result, Err(TranslitError::UnsupportedScheme(ref s)) if s == "klingon"));
        assert!(!engine.supports("klingon"));
        assert!(engine.supports("Devanagari"));
        assert!(engine.supports("itrans"));
    }
}
