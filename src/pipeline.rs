// Analysis pipeline: tokenize -> vocabulary -> vectorize -> fit -> tally.
//
// Loading the corpus and fetching stopwords happen before this (they need
// I/O the caller controls); everything here is deterministic given the
// corpus, the tokenizer, and the fitter's seed.

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::config::Config;
use crate::corpus::document::Corpus;
use crate::model::traits::{dominant_topic, TopicModel, TopicModelFitter};
use crate::model::vocabulary::{BagOfWords, Vocabulary};
use crate::report::{AnalysisReport, TopicCountTable};
use crate::tokenize::traits::Tokenize;

/// Pipeline settings that aren't part of the tokenizer or the fitter.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub no_below: usize,
    pub no_above: f64,
    pub keep_n: usize,
    pub top_terms: usize,
    /// Categories that always get a row in the topic count table
    pub categories: Vec<String>,
}

impl AnalysisOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            no_below: config.no_below,
            no_above: config.no_above,
            keep_n: config.keep_n,
            top_terms: config.top_terms,
            categories: config.categories.clone(),
        }
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Tokenize every document, in corpus order.
pub fn tokenize_corpus<T: Tokenize + ?Sized>(corpus: &Corpus, tokenizer: &T) -> Result<Vec<Vec<String>>> {
    let pb = ProgressBar::new(corpus.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("    [{bar:40.cyan/blue}] {pos}/{len} documents ({eta})")
            .expect("valid template")
            .progress_chars("=> "),
    );

    let mut sequences = Vec::with_capacity(corpus.len());
    for doc in corpus.iter() {
        let lemmas = tokenizer
            .tokenize(&doc.text)
            .with_context(|| format!("Failed to tokenize document {}", doc.id))?;
        sequences.push(lemmas);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(sequences)
}

/// Build the vocabulary and prune extreme-frequency terms.
pub fn build_vocabulary(sequences: &[Vec<String>], options: &AnalysisOptions) -> Vocabulary {
    let mut vocabulary = Vocabulary::build(sequences);
    vocabulary.filter_extremes(options.no_below, options.no_above, options.keep_n);
    vocabulary
}

/// Count each document's dominant topic under its category.
///
/// Documents are re-vectorized here rather than reusing the training
/// vectors, so any model can be reported against any vocabulary.
pub fn tally_topics<M: TopicModel>(
    corpus: &Corpus,
    sequences: &[Vec<String>],
    vocabulary: &Vocabulary,
    model: &M,
    categories: &[String],
) -> Result<TopicCountTable> {
    if corpus.len() != sequences.len() {
        anyhow::bail!(
            "Corpus has {} documents but {} token sequences",
            corpus.len(),
            sequences.len()
        );
    }

    let mut table = TopicCountTable::new(model.num_topics(), categories);
    for (doc, tokens) in corpus.iter().zip(sequences) {
        let bow = vocabulary.doc2bow(tokens);
        let distribution = model
            .document_topics(&bow)
            .with_context(|| format!("Topic inference failed for document {}", doc.id))?;
        let topic = dominant_topic(&distribution)
            .with_context(|| format!("Model returned no topics for document {}", doc.id))?;
        table.increment(&doc.category, topic)?;
    }
    Ok(table)
}

/// Run everything after corpus loading and produce the report.
pub fn analyze<T, F>(
    corpus: &Corpus,
    tokenizer: &T,
    fitter: &F,
    options: &AnalysisOptions,
) -> Result<AnalysisReport>
where
    T: Tokenize + ?Sized,
    F: TopicModelFitter,
{
    let sequences = tokenize_corpus(corpus, tokenizer)?;
    let token_count: usize = sequences.iter().map(Vec::len).sum();
    info!(documents = sequences.len(), tokens = token_count, "Tokenized corpus");

    let vocabulary = build_vocabulary(&sequences, options);
    let vectors: Vec<BagOfWords> = sequences.iter().map(|s| vocabulary.doc2bow(s)).collect();

    let model = fitter.fit(&vectors, &vocabulary)?;
    let topics = model.show_topics(options.top_terms);

    let topic_counts = tally_topics(corpus, &sequences, &vocabulary, &model, &options.categories)?;

    Ok(AnalysisReport {
        generated_at: Utc::now(),
        document_count: corpus.len(),
        token_count,
        vocabulary_size: vocabulary.len(),
        topics,
        topic_counts,
    })
}
