// Text vectorization: bag-of-words embedding centroids.
//
// A text's vector is the arithmetic mean of the vectors of its known,
// non-stop-word tokens. Word order and text length don't matter. Text with no
// usable tokens maps to the zero vector, which has cosine similarity 0.0 with
// everything.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

use crate::embedding::traits::EmbeddingProvider;

/// Zero-vector dimension used when a text has no known words. Matches the
/// 300-dimensional pretrained word2vec models the tool is meant for.
pub const EMBEDDING_DIM: usize = 300;

/// English stop words from the `stop-words` crate.
pub fn english_stop_words() -> HashSet<String> {
    let words: Vec<String> = get(LANGUAGE::English);
    words.into_iter().collect()
}

/// Maps text to an embedding centroid.
pub struct TextVectorizer<'a> {
    embedding: &'a dyn EmbeddingProvider,
    stop_words: HashSet<String>,
    dimension: usize,
}

impl<'a> TextVectorizer<'a> {
    /// Vectorizer with the English stop-word list and a zero vector of
    /// `dimension` for texts with no known words.
    pub fn new(embedding: &'a dyn EmbeddingProvider, dimension: usize) -> Self {
        Self::with_stop_words(embedding, dimension, english_stop_words())
    }

    pub fn with_stop_words(
        embedding: &'a dyn EmbeddingProvider,
        dimension: usize,
        stop_words: HashSet<String>,
    ) -> Self {
        Self {
            embedding,
            stop_words,
            dimension,
        }
    }

    /// Lower-cased whitespace tokens that survive stop-word and vocabulary
    /// filtering.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split_whitespace()
            .filter(|t| !self.stop_words.contains(*t) && self.embedding.contains(t))
            .map(str::to_string)
            .collect()
    }

    /// Mean vector of the text's surviving tokens, or the zero vector.
    pub fn vectorize(&self, text: &str) -> Vec<f64> {
        let vectors: Vec<&[f32]> = self
            .tokens(text)
            .iter()
            .filter_map(|t| self.embedding.vector_of(t))
            .collect();

        if vectors.is_empty() {
            return vec![0.0; self.dimension];
        }

        let mut mean = vec![0.0_f64; self.embedding.dimension()];
        for vector in &vectors {
            for (acc, &val) in mean.iter_mut().zip(vector.iter()) {
                *acc += val as f64;
            }
        }

        let n = vectors.len() as f64;
        for val in &mut mean {
            *val /= n;
        }

        mean
    }
}

/// Cosine similarity, nominally in [-1, 1]. The ratio is returned as
/// computed, without clamping.
///
/// Defined as 0.0 when either vector has zero magnitude or the lengths
/// differ, so a description with no known words never matches anything.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        dot / denom
    }
}
