// Keyword expansion via embedding nearest neighbors.
//
// Each label's seed list becomes a set, and every seed the model knows pulls
// in its `topn` nearest neighbors. Seeds the model doesn't know stay in the
// set but contribute no neighbors.

use std::collections::BTreeSet;

use tracing::debug;

use crate::embedding::traits::EmbeddingProvider;
use crate::taxonomy::{ExpandedKeywordSet, SeedKeywordSet};

/// Default number of neighbors pulled in per seed word.
pub const DEFAULT_TOPN: usize = 5;

/// Expand every label's seed keywords with their nearest neighbors.
pub fn expand(
    seeds: &SeedKeywordSet,
    topn: usize,
    embedding: &dyn EmbeddingProvider,
) -> ExpandedKeywordSet {
    seeds
        .iter()
        .map(|(label, words)| {
            let mut keywords: BTreeSet<String> = words.iter().cloned().collect();
            let mut unknown = 0usize;

            for word in words {
                if !embedding.contains(word) {
                    unknown += 1;
                    continue;
                }
                keywords.extend(
                    embedding
                        .nearest_neighbors(word, topn)
                        .into_iter()
                        .map(|(neighbor, _)| neighbor),
                );
            }

            debug!(
                label = label.as_str(),
                seeds = words.len(),
                unknown,
                expanded = keywords.len(),
                "Expanded keywords"
            );

            (label.clone(), keywords)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::store::WordVectors;

    fn fixture() -> WordVectors {
        WordVectors::from_pairs(
            2,
            vec![
                ("laser", vec![1.0, 0.0]),
                ("photonics", vec![0.95, 0.05]),
                ("optics", vec![0.9, 0.1]),
                ("orbit", vec![0.0, 1.0]),
            ],
        )
        .unwrap()
    }

    fn seeds(label: &str, words: &[&str]) -> SeedKeywordSet {
        let mut s = SeedKeywordSet::new();
        s.insert(
            label.to_string(),
            words.iter().map(|w| w.to_string()).collect(),
        );
        s
    }

    #[test]
    fn test_adds_neighbors() {
        let wv = fixture();
        let expanded = expand(&seeds("Directed Energy", &["laser"]), 2, &wv);
        let words: Vec<&str> = expanded["Directed Energy"]
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(words, vec!["laser", "optics", "photonics"]);
    }

    #[test]
    fn test_unknown_seed_kept_without_neighbors() {
        let wv = fixture();
        let expanded = expand(&seeds("Directed Energy", &["maser", "maser"]), 5, &wv);
        assert_eq!(expanded["Directed Energy"].len(), 1);
        assert!(expanded["Directed Energy"].contains("maser"));
    }

    #[test]
    fn test_topn_zero_is_seeds_only() {
        let wv = fixture();
        let expanded = expand(&seeds("Directed Energy", &["laser", "orbit"]), 0, &wv);
        assert_eq!(expanded["Directed Energy"].len(), 2);
    }

    #[test]
    fn test_label_with_no_seeds_is_kept() {
        let wv = fixture();
        let expanded = expand(&seeds("Empty", &[]), 5, &wv);
        assert!(expanded["Empty"].is_empty());
    }
}
