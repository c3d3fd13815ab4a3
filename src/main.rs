use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use jatopics::config::Config;
use jatopics::corpus::loader::{load_corpus, LoaderOptions};
use jatopics::model::lda::{LdaParams, LdaTrainer};
use jatopics::output::terminal;
use jatopics::pipeline::{self, AnalysisOptions};
use jatopics::stopwords::StopwordSource;
use jatopics::tokenize::analyzer::Analyzer;
use jatopics::tokenize::traits::Tokenize;
use jatopics::tokenize::vibrato::VibratoAnalyzer;

/// jatopics: LDA topic analysis for tagged Japanese blog corpora.
///
/// Loads a directory of tab-separated blog segments, tokenizes them with a
/// morphological analyzer, fits a topic model, and reports which topic
/// dominates each blog category.
#[derive(Parser)]
#[command(name = "jatopics", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis: load, tokenize, fit, report
    Analyze {
        /// Glob pattern for the corpus files (default: KNBC corpus2/*.tsv)
        #[arg(long)]
        corpus: Option<String>,

        /// IPADIC-format system dictionary (.dic or .dic.zst)
        #[arg(long)]
        dictionary: Option<PathBuf>,

        /// Number of topics
        #[arg(long)]
        topics: Option<usize>,

        /// Random seed for topic model training
        #[arg(long)]
        seed: Option<u64>,

        /// Use the fetched stopword list as a token filter
        #[arg(long)]
        apply_stopwords: bool,

        /// Drop the first fragment (title line) of every blog
        #[arg(long)]
        skip_title: bool,

        /// Also write the report as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the lemma sequence the analyzer produces for a text
    Tokenize {
        /// Text to analyze
        text: String,

        /// IPADIC-format system dictionary (.dic or .dic.zst)
        #[arg(long)]
        dictionary: Option<PathBuf>,
    },

    /// Fetch the stopword list and show a sample
    Stopwords,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("jatopics=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            corpus,
            dictionary,
            topics,
            seed,
            apply_stopwords,
            skip_title,
            output,
        } => {
            let mut config = Config::load()?;
            if let Some(corpus) = corpus {
                config.corpus_glob = corpus;
            }
            if let Some(dictionary) = dictionary {
                config.dictionary_path = dictionary;
            }
            if let Some(topics) = topics {
                config.num_topics = topics;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            config.apply_stopwords |= apply_stopwords;
            config.skip_title_fragment |= skip_title;
            config.validate()?;

            // Step 1: Load the corpus
            let loader_options =
                LoaderOptions::with_encoding_label(&config.corpus_encoding, config.skip_title_fragment)?;
            let corpus = load_corpus(&config.corpus_glob, &loader_options)?;
            terminal::display_corpus_summary(corpus.len(), corpus.representative());

            // Step 2: Prepare the morphological analyzer
            config.require_dictionary()?;
            let morph = VibratoAnalyzer::load(&config.dictionary_path)?;

            // Step 3: Stopwords are always fetched; applying them is opt-in
            let stopwords = StopwordSource::from_config(&config).load().await?;
            let analyzer = if config.apply_stopwords {
                info!(count = stopwords.len(), "Applying stopword filter");
                Analyzer::japanese(morph, Some(stopwords.as_slice()))?
            } else {
                info!(
                    count = stopwords.len(),
                    "Stopwords loaded but not applied (use --apply-stopwords to filter them)"
                );
                Analyzer::japanese(morph, None)?
            };

            // Step 4: Tokenize, vectorize, fit, tally
            println!("Analyzing {} documents...", corpus.len());
            let fitter = LdaTrainer::new(LdaParams::from_config(&config));
            let report =
                pipeline::analyze(&corpus, &analyzer, &fitter, &AnalysisOptions::from_config(&config))?;

            terminal::display_report(&report);

            if let Some(path) = output {
                report.write_json(&path)?;
                println!("{}", format!("Report written to {}", path.display()).dimmed());
            }
        }

        Commands::Tokenize { text, dictionary } => {
            let mut config = Config::load()?;
            if let Some(dictionary) = dictionary {
                config.dictionary_path = dictionary;
            }
            config.require_dictionary()?;

            let analyzer = Analyzer::japanese(VibratoAnalyzer::load(&config.dictionary_path)?, None)?;
            let lemmas = analyzer.tokenize(&text)?;
            println!("{}", lemmas.join(" | "));
            println!("{}", format!("{} lemmas", lemmas.len()).dimmed());
        }

        Commands::Stopwords => {
            let config = Config::load()?;
            let stopwords = StopwordSource::from_config(&config).load().await?;
            println!("{} stopwords", stopwords.len().to_string().bold());
            let sample: Vec<&str> = stopwords.iter().take(20).map(String::as_str).collect();
            println!("  {}", sample.join(", ").dimmed());
        }
    }

    Ok(())
}
