// Corpus loading: tagged blog segments reassembled into whole documents.

pub mod document;
pub mod loader;
