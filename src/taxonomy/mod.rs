// Taxonomy: the static keyword tables the classifier is configured with.
//
// Three tables drive a run: CTA seed keywords, enriched sublayer keywords,
// and the CTA -> sublayer map. The CTA seeds ship with the crate; the
// sublayer tables come from a JSON taxonomy file. All maps are ordered by
// label, which fixes the iteration order categories are reported in.

pub mod defaults;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Label -> hand-authored seed keywords.
pub type SeedKeywordSet = BTreeMap<String, Vec<String>>;

/// Label -> seeds plus their embedding neighbors.
pub type ExpandedKeywordSet = BTreeMap<String, BTreeSet<String>>;

/// CTA label -> candidate sublayer labels, in evaluation order.
pub type CategoryToSublayerMap = BTreeMap<String, Vec<String>>;

/// The full set of keyword tables for one classification session.
///
/// Deserializes from JSON of the form:
///
/// ```json
/// {
///   "cta_seeds": { "Quantum Science": ["quantum", "qubit"] },
///   "sublayer_keywords": { "Qubits": ["qubit", "superconducting"] },
///   "cta_to_sublayers": { "Quantum Science": ["Qubits"] }
/// }
/// ```
///
/// Every field is optional; a missing `cta_seeds` falls back to the
/// built-in table.
///
/// Key order in the file is not kept. CTAs are matched and reported in
/// label order, and each record's sublayers follow that CTA order; only the
/// sublayer lists inside `cta_to_sublayers` keep the order they are written
/// in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    pub cta_seeds: SeedKeywordSet,
    pub sublayer_keywords: SeedKeywordSet,
    pub cta_to_sublayers: CategoryToSublayerMap,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            cta_seeds: defaults::cta_seeds(),
            sublayer_keywords: SeedKeywordSet::new(),
            cta_to_sublayers: CategoryToSublayerMap::new(),
        }
    }
}

impl Taxonomy {
    /// Load a taxonomy from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read taxonomy file: {}", path.display()))?;
        let taxonomy: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse taxonomy file: {}", path.display()))?;

        debug!(
            ctas = taxonomy.cta_seeds.len(),
            sublayers = taxonomy.sublayer_keywords.len(),
            path = %path.display(),
            "Loaded taxonomy"
        );

        for problem in taxonomy.validate() {
            warn!("{problem}");
        }

        Ok(taxonomy)
    }

    /// Load from `path` if given, otherwise use the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Report references that will never produce a match. None of these are
    /// errors: unknown categories have no sublayers and sublayers without
    /// keywords are skipped during scoring.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (cta, sublayers) in &self.cta_to_sublayers {
            if !self.cta_seeds.contains_key(cta) {
                problems.push(format!(
                    "CTA {cta:?} has sublayers but no seed keywords; it can never match"
                ));
            }
            for sub in sublayers {
                if !self.sublayer_keywords.contains_key(sub) {
                    problems.push(format!(
                        "Sublayer {sub:?} (under {cta:?}) has no keywords and will be skipped"
                    ));
                }
            }
        }

        for (label, seeds) in self.cta_seeds.iter().chain(&self.sublayer_keywords) {
            if seeds.is_empty() {
                problems.push(format!("{label:?} has an empty keyword list"));
            }
        }

        problems
    }
}
