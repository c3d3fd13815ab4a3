// Vibrato-backed morphological analyzer.
//
// Loads an IPADIC-format system dictionary, either a plain `.dic` or a
// zstd-compressed `.dic.zst` (decompressed into vibrato's cache on first
// use). IPADIC features are comma-separated:
//
//   品詞,品詞細分類1,品詞細分類2,品詞細分類3,活用型,活用形,原形,読み,発音
//
// so the POS hierarchy is fields 0..4 and the base form is field 6.

use std::path::Path;

use anyhow::Result;
use tracing::info;
use vibrato_rkyv::{CacheStrategy, Dictionary, LoadMode, Tokenizer};

use super::traits::{Morpheme, MorphologicalAnalyzer};

const POS_FIELDS: usize = 4;
const BASE_FORM_FIELD: usize = 6;

pub struct VibratoAnalyzer {
    tokenizer: Tokenizer,
}

impl VibratoAnalyzer {
    /// Load the system dictionary at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Dictionary file not found at {}", path.display());
        }

        let is_zstd = path.extension().is_some_and(|ext| ext == "zst");
        let dictionary = if is_zstd {
            Dictionary::from_zstd(path, CacheStrategy::GlobalCache)
                .map_err(|e| anyhow::anyhow!("Failed to load dictionary {}: {e}", path.display()))?
        } else {
            Dictionary::from_path(path, LoadMode::Validate)
                .map_err(|e| anyhow::anyhow!("Failed to load dictionary {}: {e}", path.display()))?
        };

        info!(path = %path.display(), "Loaded morphological dictionary");
        Ok(Self {
            tokenizer: Tokenizer::new(dictionary),
        })
    }
}

impl MorphologicalAnalyzer for VibratoAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<Morpheme>> {
        let mut worker = self.tokenizer.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();

        Ok(worker
            .token_iter()
            .map(|token| morpheme_from_ipadic(token.surface(), token.feature()))
            .collect())
    }
}

/// Build a morpheme from an IPADIC feature string.
///
/// Unknown words carry `*` (or nothing) in the base-form slot; those fall
/// back to the surface form.
pub fn morpheme_from_ipadic(surface: &str, feature: &str) -> Morpheme {
    let fields: Vec<&str> = feature.split(',').collect();

    let part_of_speech = fields
        .iter()
        .take(POS_FIELDS)
        .copied()
        .collect::<Vec<_>>()
        .join(",");

    let base_form = match fields.get(BASE_FORM_FIELD) {
        Some(&base) if !base.is_empty() && base != "*" => base,
        _ => surface,
    };

    Morpheme::new(surface, &part_of_speech, base_form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipadic_inflected_verb() {
        let m = morpheme_from_ipadic("行っ", "動詞,自立,*,*,五段・カ行促音便,連用タ接続,行く,イッ,イッ");
        assert_eq!(m.surface, "行っ");
        assert_eq!(m.part_of_speech, "動詞,自立,*,*");
        assert_eq!(m.base_form, "行く");
    }

    #[test]
    fn test_ipadic_unknown_word_falls_back_to_surface() {
        let m = morpheme_from_ipadic("ケータイ", "名詞,一般,*,*,*,*,*");
        assert_eq!(m.base_form, "ケータイ");

        let short = morpheme_from_ipadic("ほげ", "名詞,サ変接続");
        assert_eq!(short.part_of_speech, "名詞,サ変接続");
        assert_eq!(short.base_form, "ほげ");
    }

    #[test]
    fn test_load_missing_dictionary_fails() {
        let path = std::env::temp_dir().join("jatopics-test-missing.dic");
        assert!(VibratoAnalyzer::load(&path).is_err());
    }
}
