// Corpus loader for tab-separated blog segment files.
//
// Each line is `<id>-<segment>\t<body fragment>`. Fragments sharing an id
// prefix are concatenated into one document. A blank line ends the file:
// anything after it is ignored, even if it looks like more records.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use tracing::{debug, info};

use super::document::Corpus;

/// Options controlling how segment files are read.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Text encoding of the corpus files
    pub encoding: &'static Encoding,
    /// Register each document on its first fragment without keeping that
    /// fragment (the blog title line in KNBC).
    pub skip_title_fragment: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::EUC_JP,
            skip_title_fragment: false,
        }
    }
}

impl LoaderOptions {
    /// Build options from a WHATWG encoding label such as "euc-jp" or "utf-8".
    pub fn with_encoding_label(label: &str, skip_title_fragment: bool) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .with_context(|| format!("Unknown text encoding label: {label:?}"))?;
        Ok(Self {
            encoding,
            skip_title_fragment,
        })
    }
}

/// Expand a glob pattern into a sorted list of files.
///
/// Zero matches is an error rather than an empty corpus, so a mistyped path
/// never turns into a silently "successful" empty run.
pub fn corpus_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries =
        glob::glob(pattern).with_context(|| format!("Invalid corpus glob pattern: {pattern}"))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.context("Failed to read a corpus path")?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        anyhow::bail!("No corpus files match pattern {pattern}");
    }
    Ok(paths)
}

/// Load every file matching `pattern` into a single corpus.
pub fn load_corpus(pattern: &str, options: &LoaderOptions) -> Result<Corpus> {
    let paths = corpus_files(pattern)?;
    let mut corpus = Corpus::new();

    for path in &paths {
        let text = read_file(path, options.encoding)?;
        let lines = parse_segments(&text, &mut corpus, options.skip_title_fragment)
            .with_context(|| format!("Failed to parse corpus file {}", path.display()))?;
        debug!(path = %path.display(), lines, "Parsed corpus file");
    }

    if corpus.is_empty() {
        anyhow::bail!(
            "Corpus is empty: {} file(s) matched {pattern} but none held a record before the first blank line",
            paths.len()
        );
    }

    info!(
        files = paths.len(),
        documents = corpus.len(),
        "Loaded corpus"
    );
    Ok(corpus)
}

/// Read a file and decode it strictly: malformed byte sequences are an
/// error, never replacement characters.
pub fn read_file(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read corpus file {}", path.display()))?;

    match encoding.decode_without_bom_handling_and_without_replacement(&bytes) {
        Some(text) => Ok(text.into_owned()),
        None => anyhow::bail!(
            "Corpus file {} is not valid {}",
            path.display(),
            encoding.name()
        ),
    }
}

/// Parse the decoded contents of one segment file into `corpus`.
///
/// Returns the number of lines consumed before the first blank line
/// (or end of input).
pub fn parse_segments(text: &str, corpus: &mut Corpus, skip_title_fragment: bool) -> Result<usize> {
    let mut consumed = 0;

    for (lineno, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            break;
        }

        let mut fields = line.split('\t');
        let key = fields.next().unwrap_or_default();
        let Some(body) = fields.next() else {
            anyhow::bail!(
                "Malformed corpus line {} (no tab separator): {:?}",
                lineno + 1,
                line
            );
        };

        let id = key.split('-').next().unwrap_or(key);
        if skip_title_fragment && corpus.ensure(id) {
            consumed += 1;
            continue;
        }
        corpus.append(id, body);
        consumed += 1;
    }

    Ok(consumed)
}
