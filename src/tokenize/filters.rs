// Char filters (before segmentation) and token filters (after).

use std::borrow::Cow;
use std::collections::HashSet;

use anyhow::{Context, Result};
use regex_lite::Regex;
use unicode_normalization::UnicodeNormalization;

use super::traits::Morpheme;

/// Parts of speech kept for topic modeling: nouns, adjectives, adverbs, verbs.
pub const CONTENT_POS: [&str; 4] = ["名詞", "形容詞", "副詞", "動詞"];

/// A text-to-text transformation applied before morphological analysis.
#[derive(Debug, Clone)]
pub enum CharFilter {
    /// NFKC normalization (full-width ASCII to half-width, half-width kana
    /// to full-width, compatibility characters folded)
    UnicodeNormalize,
    /// Replace every match of `pattern` with `replacement`
    RegexReplace { pattern: Regex, replacement: String },
}

impl CharFilter {
    pub fn regex_replace(pattern: &str, replacement: &str) -> Result<Self> {
        let pattern =
            Regex::new(pattern).with_context(|| format!("Invalid char filter regex: {pattern}"))?;
        Ok(Self::RegexReplace {
            pattern,
            replacement: replacement.to_string(),
        })
    }

    /// Collapse every run of digits into a single `0`.
    pub fn collapse_digits() -> Result<Self> {
        Self::regex_replace(r"\d+", "0")
    }

    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            Self::UnicodeNormalize => Cow::Owned(text.nfkc().collect()),
            Self::RegexReplace {
                pattern,
                replacement,
            } => pattern.replace_all(text, replacement.as_str()),
        }
    }
}

/// A filter or rewrite over the analyzer's morphemes.
#[derive(Debug, Clone)]
pub enum TokenFilter {
    /// Keep morphemes whose POS starts with one of these tags
    PosKeep(Vec<String>),
    /// Lowercase surface and base form
    LowerCase,
    /// Drop morphemes whose base form is in the set
    Stopwords(HashSet<String>),
}

impl TokenFilter {
    pub fn pos_keep(tags: &[&str]) -> Self {
        Self::PosKeep(tags.iter().map(|t| t.to_string()).collect())
    }

    pub fn stopwords<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Stopwords(words.into_iter().map(Into::into).collect())
    }

    pub fn apply(&self, tokens: Vec<Morpheme>) -> Vec<Morpheme> {
        match self {
            Self::PosKeep(tags) => tokens
                .into_iter()
                .filter(|m| tags.iter().any(|tag| m.part_of_speech.starts_with(tag.as_str())))
                .collect(),
            Self::LowerCase => tokens
                .into_iter()
                .map(|m| Morpheme {
                    surface: m.surface.to_lowercase(),
                    part_of_speech: m.part_of_speech,
                    base_form: m.base_form.to_lowercase(),
                })
                .collect(),
            Self::Stopwords(words) => tokens
                .into_iter()
                .filter(|m| !words.contains(&m.base_form))
                .collect(),
        }
    }
}
