// Tokenization: char filters, morphological analysis, token filters.

pub mod analyzer;
pub mod filters;
pub mod traits;
pub mod vibrato;
