use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// SlothLib's Japanese stopword list.
pub const DEFAULT_STOPWORDS_URL: &str =
    "http://svn.sourceforge.jp/svnroot/slothlib/CSharp/Version1/SlothLib/NLP/Filter/StopWord/word/Japanese.txt";

/// Where the KNBC corpus lands when the archive is unpacked next to the binary.
pub const DEFAULT_CORPUS_GLOB: &str = "./KNBC_v1.0_090925/corpus2/*.tsv";

/// The four blog categories of the KNBC corpus.
pub const KNBC_CATEGORIES: [&str; 4] = ["Kyoto", "Gourmet", "Keitai", "Sports"];

/// Where the stopword list comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum StopwordBackend {
    /// Newline-delimited list fetched over HTTP (default)
    Remote,
    /// The `stop-words` crate's bundled Japanese list, no network needed
    Builtin,
}

/// Central configuration for one analysis run.
///
/// `Default` carries the constants of the reference run; `load()` overlays
/// `JATOPICS_*` environment variables on top. The .env file is loaded
/// at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Glob pattern matching the corpus `*.tsv` files
    pub corpus_glob: String,
    /// WHATWG label of the corpus text encoding (e.g. "euc-jp")
    pub corpus_encoding: String,
    /// Drop the first fragment of every document (the blog title)
    pub skip_title_fragment: bool,
    /// IPADIC-format system dictionary (`.dic` or `.dic.zst`)
    pub dictionary_path: PathBuf,
    pub stopword_backend: StopwordBackend,
    pub stopwords_url: String,
    /// Whether the stopword list is applied as a token filter. Off by default:
    /// the list is fetched but left out of the filter chain.
    pub apply_stopwords: bool,
    pub http_timeout: Duration,
    /// Terms in fewer documents than this are dropped from the vocabulary
    pub no_below: usize,
    /// Terms in more than this fraction of documents are dropped
    pub no_above: f64,
    /// Upper bound on vocabulary size after extreme-frequency filtering
    pub keep_n: usize,
    pub num_topics: usize,
    pub seed: u64,
    /// Upper bound on LDA training iterations
    pub iterations: usize,
    /// Number of terms shown per topic
    pub top_terms: usize,
    /// Categories that always get a row in the topic count table
    pub categories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_glob: DEFAULT_CORPUS_GLOB.to_string(),
            corpus_encoding: "euc-jp".to_string(),
            skip_title_fragment: false,
            dictionary_path: default_dictionary_path(),
            stopword_backend: StopwordBackend::Remote,
            stopwords_url: DEFAULT_STOPWORDS_URL.to_string(),
            apply_stopwords: false,
            http_timeout: Duration::from_secs(10),
            no_below: 3,
            no_above: 0.4,
            keep_n: 100_000,
            num_topics: 4,
            seed: 1,
            iterations: 100,
            top_terms: 10,
            categories: KNBC_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Default location of the system dictionary:
/// ~/.local/share/jatopics/system.dic on Linux.
pub fn default_dictionary_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jatopics")
        .join("system.dic")
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let stopword_backend = match env::var("JATOPICS_STOPWORDS").as_deref() {
            Ok("builtin") => StopwordBackend::Builtin,
            // "remote" or unset both default to the HTTP list
            _ => StopwordBackend::Remote,
        };

        let categories = match env::var("JATOPICS_CATEGORIES") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.categories,
        };

        let config = Self {
            corpus_glob: env::var("JATOPICS_CORPUS_GLOB").unwrap_or(defaults.corpus_glob),
            corpus_encoding: env::var("JATOPICS_ENCODING").unwrap_or(defaults.corpus_encoding),
            skip_title_fragment: env_or("JATOPICS_SKIP_TITLE", defaults.skip_title_fragment)?,
            dictionary_path: env::var("JATOPICS_DICTIONARY")
                .map(PathBuf::from)
                .unwrap_or(defaults.dictionary_path),
            stopword_backend,
            stopwords_url: env::var("JATOPICS_STOPWORDS_URL").unwrap_or(defaults.stopwords_url),
            apply_stopwords: env_or("JATOPICS_APPLY_STOPWORDS", defaults.apply_stopwords)?,
            http_timeout: Duration::from_secs(env_or(
                "JATOPICS_HTTP_TIMEOUT_SECS",
                defaults.http_timeout.as_secs(),
            )?),
            no_below: env_or("JATOPICS_NO_BELOW", defaults.no_below)?,
            no_above: env_or("JATOPICS_NO_ABOVE", defaults.no_above)?,
            keep_n: env_or("JATOPICS_KEEP_N", defaults.keep_n)?,
            num_topics: env_or("JATOPICS_TOPICS", defaults.num_topics)?,
            seed: env_or("JATOPICS_SEED", defaults.seed)?,
            iterations: env_or("JATOPICS_ITERATIONS", defaults.iterations)?,
            top_terms: env_or("JATOPICS_TOP_TERMS", defaults.top_terms)?,
            categories,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the model cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.num_topics == 0 {
            anyhow::bail!("num_topics must be at least 1");
        }
        if !(self.no_above > 0.0 && self.no_above <= 1.0) {
            anyhow::bail!("no_above must be in (0, 1], got {}", self.no_above);
        }
        if self.iterations == 0 {
            anyhow::bail!("iterations must be at least 1");
        }
        Ok(())
    }

    /// Check that the morphological dictionary exists.
    /// Call this before any operation that tokenizes text.
    pub fn require_dictionary(&self) -> Result<()> {
        if !self.dictionary_path.exists() {
            anyhow::bail!(
                "Dictionary file not found at {}\n\
                 Download an IPADIC dictionary for vibrato and point \
                 JATOPICS_DICTIONARY (or --dictionary) at it.",
                self.dictionary_path.display()
            );
        }
        Ok(())
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid value for {key}: {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = Config::default();
        assert_eq!(config.num_topics, 4);
        assert_eq!(config.seed, 1);
        assert_eq!(config.no_below, 3);
        assert!((config.no_above - 0.4).abs() < f64::EPSILON);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert!(!config.apply_stopwords);
        assert_eq!(config.categories.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let config = Config {
            iterations: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_topics() {
        let config = Config {
            num_topics: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_no_above() {
        for no_above in [0.0, -0.1, 1.5] {
            let config = Config {
                no_above,
                ..Config::default()
            };
            assert!(config.validate().is_err(), "no_above={no_above} accepted");
        }
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<usize>("JATOPICS_TOPICS", "four").unwrap_err();
        assert!(err.to_string().contains("JATOPICS_TOPICS"));
    }

    #[test]
    fn test_default_dictionary_path_is_under_jatopics() {
        let path = default_dictionary_path();
        let path_str = path.to_string_lossy();
        assert!(
            path_str.contains("jatopics") && path_str.ends_with("system.dic"),
            "Expected path containing jatopics/system.dic, got: {path_str}"
        );
    }

    #[test]
    fn test_require_dictionary_fails_when_missing() {
        let config = Config {
            dictionary_path: std::env::temp_dir().join("jatopics-test-nonexistent.dic"),
            ..Config::default()
        };
        assert!(config.require_dictionary().is_err());
    }
}
