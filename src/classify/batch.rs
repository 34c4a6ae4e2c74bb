// Batch classification: the orchestrator.
//
// A Classifier is built once per run: it expands both seed tables, compiles
// the category matcher and precomputes sublayer vectors. Every record in the
// run is then classified against that same state, so siblings in a batch are
// always comparable.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::expand::{expand, DEFAULT_TOPN};
use super::matcher::{CategoryMatcher, MatchMode};
use super::sublayers::{SublayerScorer, DEFAULT_THRESHOLD};
use super::vectorize::{TextVectorizer, EMBEDDING_DIM};
use crate::embedding::traits::EmbeddingProvider;
use crate::records::{ClassificationResult, Record};
use crate::taxonomy::{CategoryToSublayerMap, ExpandedKeywordSet, Taxonomy};

/// Tunables for one classification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOptions {
    /// Nearest neighbors added per seed word
    pub topn: usize,
    /// Sublayers need a similarity strictly above this
    pub threshold: f64,
    /// Zero-vector size for text with no known words
    pub dimension: usize,
    pub match_mode: MatchMode,
    /// Drop repeated sublayers reachable from more than one matched CTA
    pub dedupe_sublayers: bool,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            topn: DEFAULT_TOPN,
            threshold: DEFAULT_THRESHOLD,
            dimension: EMBEDDING_DIM,
            match_mode: MatchMode::Substring,
            dedupe_sublayers: false,
        }
    }
}

/// Per-run classification state.
pub struct Classifier<'a> {
    cta_keywords: ExpandedKeywordSet,
    sublayer_keywords: ExpandedKeywordSet,
    category_to_sublayers: CategoryToSublayerMap,
    vectorizer: TextVectorizer<'a>,
    matcher: CategoryMatcher,
    scorer: SublayerScorer,
    dedupe_sublayers: bool,
}

impl<'a> Classifier<'a> {
    /// Expand the taxonomy against `embedding` and prepare for classification.
    pub fn new(
        taxonomy: &Taxonomy,
        embedding: &'a dyn EmbeddingProvider,
        options: &ClassifierOptions,
    ) -> Self {
        let cta_keywords = expand(&taxonomy.cta_seeds, options.topn, embedding);
        let sublayer_keywords = expand(&taxonomy.sublayer_keywords, options.topn, embedding);

        let vectorizer = TextVectorizer::new(embedding, options.dimension);
        let matcher = CategoryMatcher::new(&cta_keywords, options.match_mode);
        let scorer = SublayerScorer::new(&sublayer_keywords, &vectorizer, options.threshold);

        info!(
            ctas = cta_keywords.len(),
            cta_keywords = cta_keywords.values().map(|k| k.len()).sum::<usize>(),
            sublayers = sublayer_keywords.len(),
            topn = options.topn,
            mode = ?options.match_mode,
            "Expanded keyword sets"
        );

        Self {
            cta_keywords,
            sublayer_keywords,
            category_to_sublayers: taxonomy.cta_to_sublayers.clone(),
            vectorizer,
            matcher,
            scorer,
            dedupe_sublayers: options.dedupe_sublayers,
        }
    }

    pub fn cta_keywords(&self) -> &ExpandedKeywordSet {
        &self.cta_keywords
    }

    pub fn sublayer_keywords(&self) -> &ExpandedKeywordSet {
        &self.sublayer_keywords
    }

    /// Classify one record.
    pub fn classify_record(&self, record: &Record) -> ClassificationResult {
        let description = record.description.as_str();
        let description_vector = self.vectorizer.vectorize(description);
        let ctas = self.matcher.match_categories(description);
        let mut sublayers =
            self.scorer
                .score(&description_vector, &ctas, &self.category_to_sublayers);

        if self.dedupe_sublayers {
            dedupe_in_order(&mut sublayers);
        }

        debug!(
            account = record.account_name.as_str(),
            ctas = ctas.len(),
            sublayers = sublayers.len(),
            "Classified record"
        );

        ClassificationResult {
            account_name: record.account_name.clone(),
            description: record.description.clone(),
            ctas,
            sublayers,
        }
    }

    /// Classify every record, preserving input order.
    pub fn classify(&self, records: &[Record]) -> Vec<ClassificationResult> {
        records.iter().map(|r| self.classify_record(r)).collect()
    }
}

/// Keep the first occurrence of each label.
fn dedupe_in_order(labels: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    labels.retain(|l| seen.insert(l.clone()));
}

/// Expand the taxonomy once and classify every record against it.
pub fn classify(
    records: &[Record],
    taxonomy: &Taxonomy,
    embedding: &dyn EmbeddingProvider,
    options: &ClassifierOptions,
) -> Vec<ClassificationResult> {
    Classifier::new(taxonomy, embedding, options).classify(records)
}
