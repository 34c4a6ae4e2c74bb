use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::classify::batch::ClassifierOptions;
use crate::classify::matcher::MatchMode;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override anything set here.
#[derive(Debug, Clone)]
pub struct Config {
    /// word2vec model file (CTA_MODEL_PATH)
    pub model_path: Option<PathBuf>,
    /// JSON taxonomy file with sublayer tables (CTA_TAXONOMY_PATH)
    pub taxonomy_path: Option<PathBuf>,
    /// Read at most this many words from the model (CTA_MAX_WORDS)
    pub max_words: Option<usize>,
    pub options: ClassifierOptions,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only the model path is required, and only
    /// by commands that need embeddings (see `require_model`).
    pub fn load() -> Result<Self> {
        let defaults = ClassifierOptions::default();

        let options = ClassifierOptions {
            topn: parse_var("CTA_TOPN")?.unwrap_or(defaults.topn),
            threshold: parse_var("CTA_THRESHOLD")?.unwrap_or(defaults.threshold),
            dimension: parse_var("CTA_EMBEDDING_DIM")?.unwrap_or(defaults.dimension),
            match_mode: parse_var::<MatchMode>("CTA_MATCH_MODE")?.unwrap_or(defaults.match_mode),
            dedupe_sublayers: parse_var("CTA_DEDUPE_SUBLAYERS")?
                .unwrap_or(defaults.dedupe_sublayers),
        };

        Ok(Self {
            model_path: path_var("CTA_MODEL_PATH"),
            taxonomy_path: path_var("CTA_TAXONOMY_PATH"),
            max_words: parse_var("CTA_MAX_WORDS")?,
            options,
        })
    }

    /// The model path, or an error explaining how to set one.
    pub fn require_model(&self) -> Result<&PathBuf> {
        self.model_path.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "No embedding model configured. Pass --model <path> or set CTA_MODEL_PATH \
                 in your .env file (a word2vec .bin or text file)."
            )
        })
    }
}

fn path_var(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Parse an optional environment variable. Unset or blank is `None`; a value
/// that doesn't parse is a configuration error.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Invalid value for {name}: {raw:?}")),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names so they can run in parallel.

    #[test]
    fn test_parse_var_unset_and_blank() {
        env::remove_var("CTA_TEST_UNSET");
        assert_eq!(parse_var::<usize>("CTA_TEST_UNSET").unwrap(), None);
        env::set_var("CTA_TEST_BLANK", "  ");
        assert_eq!(parse_var::<usize>("CTA_TEST_BLANK").unwrap(), None);
    }

    #[test]
    fn test_parse_var_values() {
        env::set_var("CTA_TEST_NUM", " 7 ");
        assert_eq!(parse_var::<usize>("CTA_TEST_NUM").unwrap(), Some(7));
        env::set_var("CTA_TEST_MODE", "token");
        assert_eq!(
            parse_var::<MatchMode>("CTA_TEST_MODE").unwrap(),
            Some(MatchMode::Token)
        );
    }

    #[test]
    fn test_parse_var_invalid() {
        env::set_var("CTA_TEST_BAD", "lots");
        let err = parse_var::<f64>("CTA_TEST_BAD").unwrap_err();
        assert!(format!("{err:#}").contains("CTA_TEST_BAD"));
    }

    #[test]
    fn test_require_model_message() {
        let config = Config {
            model_path: None,
            taxonomy_path: None,
            max_words: None,
            options: ClassifierOptions::default(),
        };
        let err = config.require_model().unwrap_err();
        assert!(err.to_string().contains("CTA_MODEL_PATH"));
    }
}
