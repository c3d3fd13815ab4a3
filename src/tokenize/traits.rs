// Tokenizer traits: swap-ready abstractions.
//
// `MorphologicalAnalyzer` is the dictionary-backed segmenter (vibrato in
// production, a fake in tests). `Tokenize` is what the pipeline consumes:
// raw text in, normalized lemmas out.

use anyhow::Result;

/// A single token as produced by the morphological analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct Morpheme {
    /// Text as it appears in the input
    pub surface: String,
    /// Comma-joined part-of-speech hierarchy, e.g. `名詞,一般,*,*`
    pub part_of_speech: String,
    /// Dictionary (lemma) form, e.g. `行く` for `行っ`
    pub base_form: String,
}

impl Morpheme {
    pub fn new(surface: &str, part_of_speech: &str, base_form: &str) -> Self {
        Self {
            surface: surface.to_string(),
            part_of_speech: part_of_speech.to_string(),
            base_form: base_form.to_string(),
        }
    }
}

/// Segments text into morphemes.
pub trait MorphologicalAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<Morpheme>>;
}

/// Turns raw document text into a sequence of lemmas.
pub trait Tokenize {
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;
}
