// Topic count table and the serializable analysis report.
//
// The table answers "which topic dominates each category's documents":
// one row per category, one counter per topic, every document counted once.
// Rows keep the seeded category order, then first-appearance order for
// categories that only show up in the corpus.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::traits::TopicTerms;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub counts: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCountTable {
    num_topics: usize,
    rows: Vec<CategoryRow>,
}

impl TopicCountTable {
    /// An all-zero table with a row for each of `categories`, in the given
    /// order. Repeated names keep their first position.
    pub fn new<S: AsRef<str>>(num_topics: usize, categories: &[S]) -> Self {
        let mut table = Self {
            num_topics,
            rows: Vec::with_capacity(categories.len()),
        };
        for category in categories {
            table.row_mut(category.as_ref());
        }
        table
    }

    fn row_mut(&mut self, category: &str) -> &mut Vec<u32> {
        let index = match self.rows.iter().position(|r| r.category == category) {
            Some(i) => i,
            None => {
                self.rows.push(CategoryRow {
                    category: category.to_string(),
                    counts: vec![0; self.num_topics],
                });
                self.rows.len() - 1
            }
        };
        &mut self.rows[index].counts
    }

    /// Count one document of `category` whose dominant topic is `topic`.
    /// Unknown categories get a fresh row.
    pub fn increment(&mut self, category: &str, topic: usize) -> Result<()> {
        if topic >= self.num_topics {
            anyhow::bail!(
                "Topic index {topic} out of range for {} topics",
                self.num_topics
            );
        }
        self.row_mut(category)[topic] += 1;
        Ok(())
    }

    pub fn row(&self, category: &str) -> Option<&[u32]> {
        self.rows
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.counts.as_slice())
    }

    /// Rows in table order: seeded categories first, then new ones as seen.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.rows
            .iter()
            .map(|r| (r.category.as_str(), r.counts.as_slice()))
    }

    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    /// Sum over every category and topic: the number of documents counted.
    pub fn total(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|r| r.counts.iter())
            .map(|&n| n as u64)
            .sum()
    }
}

/// Everything a run produces, in a form that can be written to JSON.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub document_count: usize,
    pub token_count: usize,
    pub vocabulary_size: usize,
    pub topics: Vec<TopicTerms>,
    pub topic_counts: TopicCountTable,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize analysis report")
    }

    pub fn write_json(&self, path: &std::path::Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_all_zero() {
        let table = TopicCountTable::new(4, &["Kyoto", "Sports"]);
        assert_eq!(table.row("Kyoto"), Some(&[0, 0, 0, 0][..]));
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_increment_known_and_new_categories() {
        let mut table = TopicCountTable::new(2, &["Kyoto"]);
        table.increment("Kyoto", 1).unwrap();
        table.increment("Kyoto", 1).unwrap();
        table.increment("Gourmet", 0).unwrap();

        assert_eq!(table.row("Kyoto"), Some(&[0, 2][..]));
        assert_eq!(table.row("Gourmet"), Some(&[1, 0][..]));
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_increment_rejects_bad_topic() {
        let mut table = TopicCountTable::new(2, &["Kyoto"]);
        assert!(table.increment("Kyoto", 2).is_err());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_rows_keep_seed_then_appearance_order() {
        let mut table = TopicCountTable::new(1, &["Kyoto", "Gourmet", "Keitai", "Sports", "Kyoto"]);
        table.increment("Travel", 0).unwrap();
        table.increment("Anime", 0).unwrap();
        table.increment("Gourmet", 0).unwrap();

        let names: Vec<&str> = table.rows().map(|(c, _)| c).collect();
        assert_eq!(names, vec!["Kyoto", "Gourmet", "Keitai", "Sports", "Travel", "Anime"]);
    }

    #[test]
    fn test_report_json_contains_counts() {
        let mut topic_counts = TopicCountTable::new(2, &["Kyoto"]);
        topic_counts.increment("Kyoto", 0).unwrap();
        let report = AnalysisReport {
            generated_at: Utc::now(),
            document_count: 1,
            token_count: 3,
            vocabulary_size: 2,
            topics: vec![TopicTerms {
                topic: 0,
                terms: vec![("寺".to_string(), 0.5)],
            }],
            topic_counts,
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["topic_counts"]["rows"][0]["category"], "Kyoto");
        assert_eq!(json["topic_counts"]["rows"][0]["counts"][0], 1);
        assert_eq!(json["topics"][0]["terms"][0][0], "寺");
    }
}
