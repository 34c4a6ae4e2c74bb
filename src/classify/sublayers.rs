// Sublayer scoring: cosine similarity between a description and each
// candidate sublayer's keyword bag.
//
// A sublayer's vector is the centroid of all its expanded keywords, built by
// vectorizing the keywords joined with spaces. Candidates come only from the
// CTAs the description matched, and a sublayer is kept when its similarity is
// strictly above the threshold.

use std::collections::BTreeMap;

use tracing::trace;

use super::vectorize::{cosine_similarity, TextVectorizer};
use crate::taxonomy::{CategoryToSublayerMap, ExpandedKeywordSet};

/// Minimum (exclusive) cosine similarity for a sublayer to be assigned.
pub const DEFAULT_THRESHOLD: f64 = 0.2;

/// Sublayer keyword-bag vectors, computed once and reused for every record.
pub struct SublayerScorer {
    vectors: BTreeMap<String, Vec<f64>>,
    threshold: f64,
}

impl SublayerScorer {
    pub fn new(keywords: &ExpandedKeywordSet, vectorizer: &TextVectorizer<'_>, threshold: f64) -> Self {
        let vectors = keywords
            .iter()
            .map(|(label, words)| {
                let bag = words
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                (label.clone(), vectorizer.vectorize(&bag))
            })
            .collect();
        Self { vectors, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Similarity between a description vector and a sublayer, or `None` if
    /// the sublayer has no keywords.
    pub fn similarity(&self, description_vector: &[f64], sublayer: &str) -> Option<f64> {
        self.vectors
            .get(sublayer)
            .map(|v| cosine_similarity(description_vector, v))
    }

    /// Sublayers of the matched categories whose similarity clears the
    /// threshold. Follows category order, then each category's sublayer
    /// order; a sublayer reachable from two matched categories is listed
    /// twice.
    pub fn score(
        &self,
        description_vector: &[f64],
        matched_categories: &[String],
        category_to_sublayers: &CategoryToSublayerMap,
    ) -> Vec<String> {
        let mut kept = Vec::new();

        for cta in matched_categories {
            let Some(candidates) = category_to_sublayers.get(cta) else {
                continue;
            };
            for sub in candidates {
                let Some(sim) = self.similarity(description_vector, sub) else {
                    continue;
                };
                trace!(cta = cta.as_str(), sublayer = sub.as_str(), sim, "Sublayer similarity");
                if sim > self.threshold {
                    kept.push(sub.clone());
                }
            }
        }

        kept
    }
}

/// One-shot scoring without a precomputed scorer.
pub fn score_sublayers(
    description_vector: &[f64],
    matched_categories: &[String],
    category_to_sublayers: &CategoryToSublayerMap,
    expanded_sublayer_keywords: &ExpandedKeywordSet,
    vectorizer: &TextVectorizer<'_>,
    threshold: f64,
) -> Vec<String> {
    SublayerScorer::new(expanded_sublayer_keywords, vectorizer, threshold).score(
        description_vector,
        matched_categories,
        category_to_sublayers,
    )
}
