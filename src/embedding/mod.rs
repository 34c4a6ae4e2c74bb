// Word embeddings: the read-only vector lookup the classifier is built on.
//
// The EmbeddingProvider trait is what the pipeline consumes. WordVectors is
// the in-memory implementation, filled from a word2vec model file.

pub mod store;
pub mod traits;
pub mod word2vec;
