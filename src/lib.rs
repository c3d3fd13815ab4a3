// jatopics: LDA topic analysis for tagged Japanese blog corpora.
//
// This is the library root. Each module corresponds to one stage of the
// analysis pipeline: load -> tokenize -> vectorize -> fit -> report.

pub mod config;
pub mod corpus;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod stopwords;
pub mod tokenize;
