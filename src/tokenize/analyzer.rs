// Analyzer: the configurable tokenization pipeline.
//
// char filters -> morphological analyzer -> token filters -> base forms.
// Each document is analyzed independently; no state carries over.

use anyhow::Result;

use super::filters::{CharFilter, TokenFilter, CONTENT_POS};
use super::traits::{MorphologicalAnalyzer, Tokenize};

pub struct Analyzer<M> {
    char_filters: Vec<CharFilter>,
    analyzer: M,
    token_filters: Vec<TokenFilter>,
}

impl<M: MorphologicalAnalyzer> Analyzer<M> {
    pub fn new(char_filters: Vec<CharFilter>, analyzer: M, token_filters: Vec<TokenFilter>) -> Self {
        Self {
            char_filters,
            analyzer,
            token_filters,
        }
    }

    /// The standard pipeline for Japanese blog text.
    ///
    /// NFKC, digit runs collapsed to `0`, content words only, lowercased.
    /// When `stopwords` is given it runs as the last filter, matching on
    /// the lowercased base form.
    pub fn japanese(analyzer: M, stopwords: Option<&[String]>) -> Result<Self> {
        let char_filters = vec![CharFilter::UnicodeNormalize, CharFilter::collapse_digits()?];

        let mut token_filters = vec![TokenFilter::pos_keep(&CONTENT_POS), TokenFilter::LowerCase];
        if let Some(words) = stopwords {
            token_filters.push(TokenFilter::stopwords(words.iter().map(|w| w.to_lowercase())));
        }

        Ok(Self::new(char_filters, analyzer, token_filters))
    }

    pub fn token_filters(&self) -> &[TokenFilter] {
        &self.token_filters
    }
}

impl<M: MorphologicalAnalyzer> Tokenize for Analyzer<M> {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let mut normalized = text.to_string();
        for filter in &self.char_filters {
            normalized = filter.apply(&normalized).into_owned();
        }

        let mut morphemes = self.analyzer.analyze(&normalized)?;
        for filter in &self.token_filters {
            morphemes = filter.apply(morphemes);
        }

        Ok(morphemes.into_iter().map(|m| m.base_form).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::traits::Morpheme;

    /// Splits on whitespace; tokens are `surface/pos/base`.
    struct SlashAnalyzer;

    impl MorphologicalAnalyzer for SlashAnalyzer {
        fn analyze(&self, text: &str) -> Result<Vec<Morpheme>> {
            Ok(text
                .split_whitespace()
                .map(|t| {
                    let mut parts = t.split('/');
                    let surface = parts.next().unwrap_or_default();
                    let pos = parts.next().unwrap_or("名詞");
                    let base = parts.next().unwrap_or(surface);
                    Morpheme::new(surface, pos, base)
                })
                .collect())
        }
    }

    #[test]
    fn test_japanese_pipeline_order() {
        let analyzer = Analyzer::japanese(SlashAnalyzer, None).unwrap();
        let lemmas = analyzer
            .tokenize("２０１９/名詞/２０１９ 年/名詞/年 に/助詞/に 行っ/動詞/行く ＡＢＣ/名詞/ＡＢＣ")
            .unwrap();
        assert_eq!(lemmas, vec!["0", "年", "行く", "abc"]);
    }

    #[test]
    fn test_stopwords_applied_only_when_given() {
        let stopwords = vec!["年".to_string()];

        let without = Analyzer::japanese(SlashAnalyzer, None).unwrap();
        assert_eq!(without.tokenize("年/名詞/年 春/名詞/春").unwrap(), vec!["年", "春"]);

        let with = Analyzer::japanese(SlashAnalyzer, Some(stopwords.as_slice())).unwrap();
        assert_eq!(with.tokenize("年/名詞/年 春/名詞/春").unwrap(), vec!["春"]);
        assert_eq!(with.token_filters().len(), 3);
    }

    #[test]
    fn test_empty_text_yields_no_lemmas() {
        let analyzer = Analyzer::japanese(SlashAnalyzer, None).unwrap();
        assert!(analyzer.tokenize("").unwrap().is_empty());
    }
}
