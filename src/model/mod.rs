// Topic modeling: vocabulary, vectorization, and LDA.

pub mod lda;
pub mod traits;
pub mod vocabulary;
