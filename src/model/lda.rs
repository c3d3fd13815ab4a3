// Latent Dirichlet Allocation, backed by aprender.
//
// The fitter turns the bag-of-words vectors into aprender's dense
// document-term count matrix, trains `LatentDirichletAllocation` with the
// configured seed, and keeps what the reporter needs afterwards: every
// topic's ranked terms and the fitted topic proportions of each training
// document.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use aprender::primitives::Matrix;
use aprender::text::topic::LatentDirichletAllocation;
use tracing::{info, warn};

use super::traits::{TopicModel, TopicModelFitter, TopicTerms};
use super::vocabulary::{BagOfWords, Vocabulary};
use crate::config::Config;

/// Training parameters for LDA.
#[derive(Debug, Clone)]
pub struct LdaParams {
    pub num_topics: usize,
    /// Upper bound on training iterations
    pub iterations: usize,
    pub seed: u64,
}

impl LdaParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            num_topics: config.num_topics,
            iterations: config.iterations,
            seed: config.seed,
        }
    }
}

/// Fits `LdaModel`s.
pub struct LdaTrainer {
    pub params: LdaParams,
}

impl LdaTrainer {
    pub fn new(params: LdaParams) -> Self {
        Self { params }
    }
}

impl TopicModelFitter for LdaTrainer {
    type Model = LdaModel;

    fn fit(&self, corpus: &[BagOfWords], vocabulary: &Vocabulary) -> Result<LdaModel> {
        let LdaParams {
            num_topics: k,
            iterations,
            seed,
        } = self.params;

        if k == 0 {
            anyhow::bail!("num_topics must be at least 1");
        }

        let total_tokens: u64 = corpus
            .iter()
            .flat_map(|bow| bow.iter().map(|&(_, count)| u64::from(count)))
            .sum();

        // Nothing to learn from: every topic is empty and every document uniform
        if vocabulary.is_empty() || total_tokens == 0 {
            warn!(
                documents = corpus.len(),
                vocabulary = vocabulary.len(),
                "No terms survived filtering; topics are empty"
            );
            return Ok(LdaModel {
                num_topics: k,
                topics: (0..k).map(|topic| TopicTerms { topic, terms: Vec::new() }).collect(),
                doc_topics: HashMap::new(),
            });
        }

        let dtm = document_term_matrix(corpus, vocabulary.len())?;

        let mut lda = LatentDirichletAllocation::new(k).with_random_seed(seed);
        lda.fit(&dtm, iterations)
            .map_err(|e| anyhow!("LDA training failed: {e}"))?;

        let ranked = lda
            .top_words(vocabulary.terms(), vocabulary.len())
            .map_err(|e| anyhow!("Failed to read LDA topic terms: {e}"))?;
        let topics = ranked
            .into_iter()
            .enumerate()
            .map(|(topic, terms)| TopicTerms { topic, terms })
            .collect();

        let fitted = lda
            .document_topics()
            .map_err(|e| anyhow!("Failed to read LDA document topics: {e}"))?;

        // Identical vectors share the first fitted row
        let mut doc_topics: HashMap<BagOfWords, Vec<f64>> = HashMap::new();
        for (d, bow) in corpus.iter().enumerate() {
            doc_topics
                .entry(bow.clone())
                .or_insert_with(|| normalize((0..k).map(|t| fitted.get(d, t)).collect()));
        }

        info!(
            topics = k,
            documents = corpus.len(),
            tokens = total_tokens,
            vocabulary = vocabulary.len(),
            iterations,
            "Trained LDA model"
        );

        Ok(LdaModel {
            num_topics: k,
            topics,
            doc_topics,
        })
    }
}

/// A trained LDA model. Holds each topic's full term ranking and the
/// topic proportions of the documents it was trained on.
#[derive(Debug, Clone)]
pub struct LdaModel {
    num_topics: usize,
    topics: Vec<TopicTerms>,
    doc_topics: HashMap<BagOfWords, Vec<f64>>,
}

impl TopicModel for LdaModel {
    fn num_topics(&self) -> usize {
        self.num_topics
    }

    fn show_topics(&self, num_words: usize) -> Vec<TopicTerms> {
        self.topics
            .iter()
            .map(|t| TopicTerms {
                topic: t.topic,
                terms: t.terms.iter().take(num_words).cloned().collect(),
            })
            .collect()
    }

    fn document_topics(&self, bow: &BagOfWords) -> Result<Vec<(usize, f64)>> {
        if let Some(row) = self.doc_topics.get(bow) {
            return Ok(row.iter().copied().enumerate().collect());
        }
        if bow.is_empty() {
            return Ok(uniform(self.num_topics));
        }
        anyhow::bail!(
            "Document vector with {} distinct terms was not part of the training corpus",
            bow.len()
        )
    }
}

/// Dense `documents x terms` count matrix, row-major.
pub fn document_term_matrix(corpus: &[BagOfWords], vocab_size: usize) -> Result<Matrix<f64>> {
    let mut data = vec![0.0f64; corpus.len() * vocab_size];
    for (d, bow) in corpus.iter().enumerate() {
        for &(id, count) in bow {
            if id >= vocab_size {
                anyhow::bail!("Term id {id} is outside the vocabulary of {vocab_size} terms");
            }
            data[d * vocab_size + id] += f64::from(count);
        }
    }
    Matrix::from_vec(corpus.len(), vocab_size, data)
        .map_err(|e| anyhow!("Failed to build document-term matrix: {e}"))
}

fn normalize(row: Vec<f64>) -> Vec<f64> {
    let total: f64 = row.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return vec![1.0 / row.len() as f64; row.len()];
    }
    row.into_iter().map(|p| p / total).collect()
}

fn uniform(num_topics: usize) -> Vec<(usize, f64)> {
    (0..num_topics).map(|t| (t, 1.0 / num_topics as f64)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_term_matrix_layout() {
        let dtm = document_term_matrix(&[vec![(0, 2), (2, 1)], vec![(1, 3)]], 3).unwrap();
        assert_eq!((dtm.n_rows(), dtm.n_cols()), (2, 3));
        assert_eq!(dtm.get(0, 0), 2.0);
        assert_eq!(dtm.get(0, 1), 0.0);
        assert_eq!(dtm.get(0, 2), 1.0);
        assert_eq!(dtm.get(1, 1), 3.0);
    }

    #[test]
    fn test_document_term_matrix_rejects_out_of_range_ids() {
        assert!(document_term_matrix(&[vec![(5, 1)]], 2).is_err());
    }

    #[test]
    fn test_normalize_handles_degenerate_rows() {
        assert_eq!(normalize(vec![1.0, 3.0]), vec![0.25, 0.75]);
        assert_eq!(normalize(vec![0.0, 0.0]), vec![0.5, 0.5]);
        assert_eq!(normalize(vec![f64::NAN, 1.0]), vec![0.5, 0.5]);
    }

    #[test]
    fn test_zero_topics_rejected() {
        let vocab = Vocabulary::build(&[vec!["a"]]);
        let params = LdaParams {
            num_topics: 0,
            iterations: 10,
            seed: 1,
        };
        assert!(LdaTrainer::new(params).fit(&[vec![(0, 1)]], &vocab).is_err());
    }

    #[test]
    fn test_unseen_document_is_rejected() {
        let model = LdaModel {
            num_topics: 2,
            topics: Vec::new(),
            doc_topics: HashMap::from([(vec![(0, 1)], vec![0.9, 0.1])]),
        };
        assert_eq!(model.document_topics(&vec![(0, 1)]).unwrap(), vec![(0, 0.9), (1, 0.1)]);
        assert_eq!(model.document_topics(&Vec::new()).unwrap(), vec![(0, 0.5), (1, 0.5)]);
        assert!(model.document_topics(&vec![(1, 4)]).is_err());
    }
}
