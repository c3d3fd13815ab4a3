// Vocabulary: bidirectional term <-> id mapping with document frequencies.
//
// Built once from every document's lemmas, pruned of too-rare and
// too-common terms, then read-only for vectorization and topic display.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::info;

/// Sparse term-frequency vector: `(term id, count)` sorted by id.
pub type BagOfWords = Vec<(usize, u32)>;

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    token2id: HashMap<String, usize>,
    id2token: Vec<String>,
    /// Document frequency per id
    dfs: Vec<usize>,
    num_docs: usize,
}

impl Vocabulary {
    /// Assign ids in first-seen order and count document frequencies.
    pub fn build<S: AsRef<str>>(documents: &[Vec<S>]) -> Self {
        let mut vocab = Self::default();

        for doc in documents {
            let mut seen: HashSet<usize> = HashSet::new();
            for term in doc {
                let term = term.as_ref();
                let id = match vocab.token2id.get(term) {
                    Some(&id) => id,
                    None => {
                        let id = vocab.id2token.len();
                        vocab.token2id.insert(term.to_string(), id);
                        vocab.id2token.push(term.to_string());
                        vocab.dfs.push(0);
                        id
                    }
                };
                if seen.insert(id) {
                    vocab.dfs[id] += 1;
                }
            }
            vocab.num_docs += 1;
        }

        vocab
    }

    /// Drop terms in fewer than `no_below` documents or in more than
    /// `no_above` (a fraction) of documents, then keep at most `keep_n` of
    /// the most widespread survivors. Ids are compacted afterwards, keeping
    /// the survivors' relative order.
    pub fn filter_extremes(&mut self, no_below: usize, no_above: f64, keep_n: usize) {
        let before = self.len();
        let num_docs = self.num_docs.max(1) as f64;

        let mut keep: Vec<usize> = (0..self.id2token.len())
            .filter(|&id| {
                let df = self.dfs[id];
                df >= no_below && (df as f64 / num_docs) <= no_above
            })
            .collect();

        if keep.len() > keep_n {
            // Most widespread first, ties by id, then back to id order
            keep.sort_by(|&a, &b| self.dfs[b].cmp(&self.dfs[a]).then(a.cmp(&b)));
            keep.truncate(keep_n);
            keep.sort_unstable();
        }

        self.compact(&keep);

        info!(
            before,
            after = self.len(),
            no_below,
            no_above,
            "Filtered vocabulary extremes"
        );
    }

    fn compact(&mut self, keep: &[usize]) {
        let id2token: Vec<String> = keep.iter().map(|&id| self.id2token[id].clone()).collect();
        let dfs: Vec<usize> = keep.iter().map(|&id| self.dfs[id]).collect();
        let token2id = id2token
            .iter()
            .enumerate()
            .map(|(id, term)| (term.clone(), id))
            .collect();

        self.id2token = id2token;
        self.dfs = dfs;
        self.token2id = token2id;
    }

    /// Vectorize a lemma sequence. Lemmas outside the vocabulary are dropped.
    pub fn doc2bow<S: AsRef<str>>(&self, tokens: &[S]) -> BagOfWords {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for token in tokens {
            if let Some(&id) = self.token2id.get(token.as_ref()) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }

    pub fn id(&self, term: &str) -> Option<usize> {
        self.token2id.get(term).copied()
    }

    pub fn term(&self, id: usize) -> Option<&str> {
        self.id2token.get(id).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.id2token
    }

    pub fn document_frequency(&self, term: &str) -> Option<usize> {
        self.id(term).map(|id| self.dfs[id])
    }

    /// Number of documents the vocabulary was built from.
    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn len(&self) -> usize {
        self.id2token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&str]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_build_assigns_first_seen_ids_and_dfs() {
        let vocab = Vocabulary::build(&docs(&["b a a", "a c", "c"]));
        assert_eq!(vocab.terms(), &["b", "a", "c"]);
        assert_eq!(vocab.document_frequency("a"), Some(2));
        assert_eq!(vocab.document_frequency("b"), Some(1));
        assert_eq!(vocab.document_frequency("c"), Some(2));
        assert_eq!(vocab.num_docs(), 3);
    }

    #[test]
    fn test_doc2bow_counts_and_sorts() {
        let vocab = Vocabulary::build(&docs(&["x y z"]));
        let bow = vocab.doc2bow(&["z", "x", "z", "unknown"]);
        assert_eq!(bow, vec![(0, 1), (2, 2)]);
    }

    #[test]
    fn test_filter_compacts_ids() {
        // "rare" in 1 doc, "common" in all 5, "mid" in 2
        let mut vocab = Vocabulary::build(&docs(&[
            "rare common mid",
            "common mid",
            "common",
            "common",
            "common",
        ]));
        vocab.filter_extremes(2, 0.5, 100);
        assert_eq!(vocab.terms(), &["mid"]);
        assert_eq!(vocab.id("mid"), Some(0));
        assert_eq!(vocab.id("rare"), None);
    }

    #[test]
    fn test_filter_keep_n_prefers_higher_df() {
        let mut vocab = Vocabulary::build(&docs(&["a b c", "b c", "c"]));
        vocab.filter_extremes(1, 1.0, 2);
        assert_eq!(vocab.terms(), &["b", "c"]);
    }

    #[test]
    fn test_filter_everything_leaves_empty_vocabulary() {
        let mut vocab = Vocabulary::build(&docs(&["a b", "a b"]));
        vocab.filter_extremes(3, 0.4, 100);
        assert!(vocab.is_empty());
        assert!(vocab.doc2bow(&["a", "b"]).is_empty());
    }
}
