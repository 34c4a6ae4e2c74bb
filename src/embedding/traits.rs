// Embedding provider trait: swap-ready abstraction.
//
// The classification pipeline only needs three things from an embedding
// model: membership, a vector per word, and nearest neighbors. Anything that
// answers those (an in-memory table, a memory-mapped file, an ANN index) can
// be dropped in without touching the pipeline.

/// Read-only word embedding lookup over a fixed vocabulary.
pub trait EmbeddingProvider {
    /// Whether `word` is in the vocabulary.
    fn contains(&self, word: &str) -> bool;

    /// The vector for `word`, or `None` if it is not in the vocabulary.
    fn vector_of(&self, word: &str) -> Option<&[f32]>;

    /// Up to `k` nearest words to `word` by cosine similarity, most similar
    /// first. The query word itself is never included. Unknown words have
    /// no neighbors.
    fn nearest_neighbors(&self, word: &str, k: usize) -> Vec<(String, f32)>;

    /// Dimensionality of every vector in the vocabulary.
    fn dimension(&self) -> usize;

    /// Number of words in the vocabulary.
    fn vocab_len(&self) -> usize;
}
