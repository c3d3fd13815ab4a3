// Topic model traits: the swap-ready abstraction.
//
// The pipeline only needs to fit a model on bag-of-words vectors, list each
// topic's top terms, and look up a topic distribution for a document. The
// default implementation adapts aprender's LDA; another library can slot in
// behind the same traits.

use std::fmt;

use anyhow::Result;
use serde::Serialize;

use super::vocabulary::{BagOfWords, Vocabulary};

/// A topic's most probable terms, highest probability first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicTerms {
    pub topic: usize,
    pub terms: Vec<(String, f64)>,
}

impl fmt::Display for TopicTerms {
    /// Renders as `0.012*"term" + 0.010*"other"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .terms
            .iter()
            .map(|(term, p)| format!("{p:.3}*\"{term}\""))
            .collect();
        write!(f, "{}", parts.join(" + "))
    }
}

/// A fitted topic model. Immutable once trained.
pub trait TopicModel {
    fn num_topics(&self) -> usize;

    /// Top `num_words` terms of every topic, in topic-index order.
    fn show_topics(&self, num_words: usize) -> Vec<TopicTerms>;

    /// Topic proportions for one document, as `(topic, proportion)` in
    /// topic-index order. Proportions sum to approximately 1.
    fn document_topics(&self, bow: &BagOfWords) -> Result<Vec<(usize, f64)>>;
}

/// Trains a topic model from a vectorized corpus.
pub trait TopicModelFitter {
    type Model: TopicModel;

    fn fit(&self, corpus: &[BagOfWords], vocabulary: &Vocabulary) -> Result<Self::Model>;
}

/// Index of the largest proportion. Ties go to the earliest entry.
pub fn dominant_topic(distribution: &[(usize, f64)]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &(topic, p) in distribution {
        match best {
            Some((_, best_p)) if p <= best_p => {}
            _ => best = Some((topic, p)),
        }
    }
    best.map(|(topic, _)| topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_topic_picks_max() {
        assert_eq!(dominant_topic(&[(0, 0.1), (1, 0.7), (2, 0.2)]), Some(1));
    }

    #[test]
    fn test_dominant_topic_ties_go_first() {
        assert_eq!(dominant_topic(&[(0, 0.25), (1, 0.25), (2, 0.25), (3, 0.25)]), Some(0));
        assert_eq!(dominant_topic(&[(2, 0.5), (0, 0.5)]), Some(2));
    }

    #[test]
    fn test_dominant_topic_empty() {
        assert_eq!(dominant_topic(&[]), None);
    }

    #[test]
    fn test_topic_terms_display() {
        let topic = TopicTerms {
            topic: 0,
            terms: vec![("京都".to_string(), 0.0123), ("行く".to_string(), 0.01)],
        };
        assert_eq!(topic.to_string(), "0.012*\"京都\" + 0.010*\"行く\"");
    }
}
