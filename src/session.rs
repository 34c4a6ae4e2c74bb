// Classification session: the stateful front-end adapter.
//
// A front end (the CLI here, a GUI elsewhere) drives the same four steps:
// load a model, load records, classify, export. The session holds what each
// step produced and enforces their order, so the front end itself only has to
// render state and forward user actions.

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::classify::batch::{Classifier, ClassifierOptions};
use crate::embedding::traits::EmbeddingProvider;
use crate::embedding::word2vec::{self, Word2VecFormat};
use crate::error::SessionError;
use crate::records::{self, ClassificationResult, Record};
use crate::taxonomy::Taxonomy;

pub struct Session {
    taxonomy: Taxonomy,
    options: ClassifierOptions,
    model: Option<Box<dyn EmbeddingProvider>>,
    records: Vec<Record>,
    results: Option<Vec<ClassificationResult>>,
}

impl Session {
    pub fn new(taxonomy: Taxonomy, options: ClassifierOptions) -> Self {
        Self {
            taxonomy,
            options,
            model: None,
            records: Vec::new(),
            results: None,
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    /// Load a word2vec model from disk, replacing any loaded model.
    pub fn load_model(
        &mut self,
        path: &Path,
        format: Option<Word2VecFormat>,
        limit: Option<usize>,
    ) -> Result<()> {
        let vectors = word2vec::load(path, format, limit)?;
        self.set_model(Box::new(vectors));
        Ok(())
    }

    /// Use an already-built embedding provider. Previous results are dropped
    /// because they were computed against the old model.
    pub fn set_model(&mut self, model: Box<dyn EmbeddingProvider>) {
        if model.dimension() != self.options.dimension {
            warn!(
                model_dim = model.dimension(),
                configured_dim = self.options.dimension,
                "Model dimension differs from configured dimension; descriptions with no known words will not be comparable"
            );
        }
        self.model = Some(model);
        self.results = None;
    }

    pub fn model(&self) -> Option<&dyn EmbeddingProvider> {
        self.model.as_deref()
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Load records from a CSV file, returning how many were read.
    pub fn load_records(&mut self, path: &Path) -> Result<usize> {
        let records = records::read_records(path)?;
        let count = records.len();
        self.set_records(records);
        Ok(count)
    }

    pub fn set_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.results = None;
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Classify the loaded records.
    pub fn classify(&mut self) -> Result<&[ClassificationResult]> {
        self.classify_with_progress(|_| {})
    }

    /// Classify the loaded records, calling `on_result` after each one.
    pub fn classify_with_progress<F>(&mut self, mut on_result: F) -> Result<&[ClassificationResult]>
    where
        F: FnMut(&ClassificationResult),
    {
        let model = self
            .model
            .as_deref()
            .ok_or(SessionError::ModelNotLoaded)?;

        let classifier = Classifier::new(&self.taxonomy, model, &self.options);
        let results: Vec<ClassificationResult> = self
            .records
            .iter()
            .map(|record| {
                let result = classifier.classify_record(record);
                on_result(&result);
                result
            })
            .collect();

        let classified = results.iter().filter(|r| r.is_classified()).count();
        info!(
            records = results.len(),
            classified,
            unclassified = results.len() - classified,
            "Classification complete"
        );

        Ok(self.results.insert(results).as_slice())
    }

    pub fn results(&self) -> Option<&[ClassificationResult]> {
        self.results.as_deref()
    }

    /// Write the latest results to a CSV file.
    pub fn export(&self, path: &Path) -> Result<()> {
        let results = self.results.as_deref().ok_or(SessionError::NoResults)?;
        records::write_results(path, results)?;
        info!(rows = results.len(), path = %path.display(), "Results saved");
        Ok(())
    }
}
