// In-memory word vector table.
//
// Vectors are stored in one flat row-major f32 buffer with a precomputed L2
// norm per row, so a nearest-neighbor query is a single linear scan of dot
// products. That is fast enough for the handful of seed words a run expands.

use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::Result;

use super::traits::EmbeddingProvider;

/// Upper bound on values reserved up front. Model headers are untrusted, so
/// anything larger grows as vectors are actually read.
const MAX_RESERVED_VALUES: usize = 1 << 24;

/// Word embeddings held entirely in memory.
#[derive(Debug)]
pub struct WordVectors {
    dim: usize,
    words: Vec<String>,
    index: HashMap<String, usize>,
    data: Vec<f32>,
    norms: Vec<f32>,
}

impl WordVectors {
    /// Create an empty table for vectors of dimension `dim`.
    pub fn new(dim: usize) -> Self {
        Self::with_capacity(dim, 0)
    }

    /// Create an empty table with room for up to `words` vectors.
    pub fn with_capacity(dim: usize, words: usize) -> Self {
        let words = words.min(MAX_RESERVED_VALUES / dim.max(1));
        Self {
            dim,
            words: Vec::with_capacity(words),
            index: HashMap::with_capacity(words),
            data: Vec::with_capacity(words * dim),
            norms: Vec::with_capacity(words),
        }
    }

    /// Build a table from `(word, vector)` pairs.
    pub fn from_pairs<I, S>(dim: usize, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut vectors = Self::new(dim);
        for (word, vector) in pairs {
            vectors.insert(word, &vector)?;
        }
        Ok(vectors)
    }

    /// Add a word. Returns `false` (and keeps the existing vector) if the word
    /// is already present. A vector of the wrong dimension is an error.
    pub fn insert(&mut self, word: impl Into<String>, vector: &[f32]) -> Result<bool> {
        let word = word.into();
        if vector.len() != self.dim {
            anyhow::bail!(
                "Vector for {:?} has dimension {}, expected {}",
                word,
                vector.len(),
                self.dim
            );
        }
        if self.index.contains_key(&word) {
            return Ok(false);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.data.extend_from_slice(vector);
        self.norms.push(norm);
        Ok(true)
    }

    /// Vocabulary in insertion order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn row(&self, idx: usize) -> &[f32] {
        &self.data[idx * self.dim..(idx + 1) * self.dim]
    }

    fn cosine_to_row(&self, query: &[f32], query_norm: f32, idx: usize) -> f32 {
        let denom = query_norm * self.norms[idx];
        if denom <= f32::EPSILON {
            return 0.0;
        }
        let dot: f32 = query.iter().zip(self.row(idx)).map(|(a, b)| a * b).sum();
        let cosine = dot / denom;
        if cosine.is_finite() {
            cosine
        } else {
            0.0
        }
    }
}

/// Descending similarity, ties broken by vocabulary position.
fn by_similarity(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

impl EmbeddingProvider for WordVectors {
    fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    fn vector_of(&self, word: &str) -> Option<&[f32]> {
        self.index.get(word).map(|&idx| self.row(idx))
    }

    fn nearest_neighbors(&self, word: &str, k: usize) -> Vec<(String, f32)> {
        let Some(&query_idx) = self.index.get(word) else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let query = self.row(query_idx);
        let query_norm = self.norms[query_idx];

        let mut scored: Vec<(usize, f32)> = (0..self.words.len())
            .filter(|&idx| idx != query_idx)
            .map(|idx| (idx, self.cosine_to_row(query, query_norm, idx)))
            .collect();

        // Partition the top k to the front before sorting just those.
        if scored.len() > k {
            scored.select_nth_unstable_by(k - 1, by_similarity);
            scored.truncate(k);
        }
        scored.sort_by(by_similarity);

        scored
            .into_iter()
            .map(|(idx, sim)| (self.words[idx].clone(), sim))
            .collect()
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn vocab_len(&self) -> usize {
        self.words.len()
    }
}
