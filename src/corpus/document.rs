// Document and Corpus: the loader's output.
//
// A corpus keeps documents in first-appearance order so that every later
// stage (tokenization, vocabulary ids, the document-term matrix) sees the same
// sequence on every run.

use std::collections::HashMap;

use serde::Serialize;

/// One blog post, reassembled from its tab-separated segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Record key up to the first `-`, e.g. `KN203_Kyoto_1`
    pub id: String,
    /// Category segment of the id, e.g. `Kyoto`
    pub category: String,
    /// Concatenated body fragments in file/line order
    pub text: String,
}

impl Document {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            category: category_of(id).to_string(),
            text: String::new(),
        }
    }
}

/// Extract the category from a document id.
///
/// KNBC ids look like `KN203_Kyoto_1`: the category is the second
/// `_`-separated segment. Ids without an underscore are their own category.
pub fn category_of(id: &str) -> &str {
    id.split('_').nth(1).unwrap_or(id)
}

/// Ordered collection of documents keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    index: HashMap<String, usize>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` if unseen. Returns true when the document is new.
    pub fn ensure(&mut self, id: &str) -> bool {
        if self.index.contains_key(id) {
            return false;
        }
        self.index.insert(id.to_string(), self.documents.len());
        self.documents.push(Document::new(id));
        true
    }

    /// Append a body fragment to `id`, registering the document first if needed.
    pub fn append(&mut self, id: &str, fragment: &str) {
        self.ensure(id);
        if let Some(&i) = self.index.get(id) {
            self.documents[i].text.push_str(fragment);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.index.get(id).map(|&i| &self.documents[i])
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Any document suitable as a sample for display: the first one loaded.
    pub fn representative(&self) -> Option<&Document> {
        self.documents.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_knbc_id() {
        assert_eq!(category_of("KN203_Kyoto_1"), "Kyoto");
        assert_eq!(category_of("KN001_Keitai_1"), "Keitai");
    }

    #[test]
    fn test_category_falls_back_to_whole_id() {
        assert_eq!(category_of("A"), "A");
        assert_eq!(category_of(""), "");
    }

    #[test]
    fn test_append_concatenates_in_order() {
        let mut corpus = Corpus::new();
        corpus.append("KN1_Sports_1", "今日は");
        corpus.append("KN2_Gourmet_1", "ラーメン");
        corpus.append("KN1_Sports_1", "野球");

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get("KN1_Sports_1").unwrap().text, "今日は野球");
        assert_eq!(corpus.documents()[1].id, "KN2_Gourmet_1");
        assert_eq!(corpus.representative().unwrap().id, "KN1_Sports_1");
    }

    #[test]
    fn test_ensure_reports_new_documents_once() {
        let mut corpus = Corpus::new();
        assert!(corpus.ensure("x"));
        assert!(!corpus.ensure("x"));
        assert_eq!(corpus.get("x").unwrap().text, "");
    }
}
