//! Transliteration Module
//!
//! Converts text between Indian scripts and their Roman renderings:
//! - Brahmic: Devanagari, Bengali, Gurmukhi, Gujarati, Oriya, Tamil,
//!   Telugu, Kannada, Malayalam
//! - Roman: IAST, ITRANS

mod engine;
mod meaning;
mod scheme;
mod service;

pub use engine::{BrahmicTransliterator, TranslitError, Transliterator};
pub use meaning::word_meaning;
pub use scheme::{normalize_script_name, Scheme};
pub use service::{Transliteration, TransliterationService};
