//! Glossary of common words shown next to a transliteration

const GLOSSARY: &[(&str, &str)] = &[
    ("नमस्ते", "Hello/Greetings (respectful salutation)"),
    ("नमस्कार", "Hello/Greetings (formal salutation)"),
    ("धन्यवाद", "Thank you/gratitude"),
    ("प्रेम", "Love/affection"),
    ("ज्ञान", "Knowledge/wisdom"),
    ("शांति", "Peace/calm"),
    ("भारत", "India"),
    ("स्वागत", "Welcome"),
    ("hello", "नमस्ते (respectful greeting)"),
    ("thank you", "धन्यवाद (gratitude)"),
];

/// Meaning of a known word or phrase, if the glossary has one
pub fn word_meaning(text: &str) -> Option<&'static str> {
    let key = text.trim().to_lowercase();
    GLOSSARY
        .iter()
        .find(|(word, _)| *word == key)
        .map(|(_, meaning)| *meaning)
}
