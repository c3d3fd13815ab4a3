// Colored terminal output for the analysis run.
//
// Everything here writes human-readable lines to stdout; nothing is meant
// to be machine-parsed (use the JSON report for that).

use colored::Colorize;

use crate::corpus::document::Document;
use crate::model::traits::TopicTerms;
use crate::report::{AnalysisReport, TopicCountTable};

/// How much of the sample document to show.
const SAMPLE_CHARS: usize = 200;

/// Show the corpus size and one representative document.
pub fn display_corpus_summary(document_count: usize, sample: Option<&Document>) {
    println!("# of blogs: {}", document_count.to_string().bold());
    if let Some(doc) = sample {
        println!(
            "[Blog sample] text({}):\n{}",
            doc.id.cyan(),
            super::preview(&doc.text, SAMPLE_CHARS).dimmed()
        );
    }
}

/// Show each topic's top terms.
pub fn display_topics(topics: &[TopicTerms]) {
    println!("\n{}", "=== Topics ===".bold());
    for topic in topics {
        println!("  topic[{}]: {}", topic.topic.to_string().cyan(), topic);
    }
}

/// Show the category x topic count table.
pub fn display_topic_counts(table: &TopicCountTable) {
    println!("\n{}", "=== Topic counts ===".bold());

    let header: Vec<String> = (0..table.num_topics())
        .map(|t| format!("{:>6}", format!("t{t}")))
        .collect();
    println!("  {:<12}{}", "Category".dimmed(), header.join("").dimmed());
    println!("  {}", "-".repeat(12 + 6 * table.num_topics()).dimmed());

    for (category, counts) in table.rows() {
        // Highlight the topic that dominates this category
        let max = counts.iter().copied().max().unwrap_or(0);
        let cells: Vec<String> = counts
            .iter()
            .map(|&n| {
                let cell = format!("{n:>6}");
                if n > 0 && n == max {
                    cell.bright_green().bold().to_string()
                } else {
                    cell
                }
            })
            .collect();
        println!("  {:<12}{}", category, cells.join(""));
    }
    println!();
}

/// Show the whole report: token count, topics, and the count table.
pub fn display_report(report: &AnalysisReport) {
    println!("# of tokens: {}", report.token_count.to_string().bold());
    println!("# of vocabulary terms: {}", report.vocabulary_size.to_string().bold());
    if report.vocabulary_size == 0 {
        println!(
            "  {}",
            "Vocabulary is empty after filtering; topics carry no terms.".yellow()
        );
    }
    display_topics(&report.topics);
    display_topic_counts(&report.topic_counts);
}
