use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use cta_classifier::classify::batch::Classifier;
use cta_classifier::classify::matcher::MatchMode;
use cta_classifier::config::Config;
use cta_classifier::embedding::traits::EmbeddingProvider;
use cta_classifier::embedding::word2vec::{self, Word2VecFormat};
use cta_classifier::output::terminal;
use cta_classifier::session::Session;
use cta_classifier::taxonomy::Taxonomy;

/// CTA Classifier: tag organizations with critical technology areas.
///
/// Matches free-text descriptions against CTA keywords expanded with word
/// embeddings, then scores finer-grained sublayers by embedding similarity.
#[derive(Parser)]
#[command(name = "cta-classifier", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every record in a CSV file
    Classify {
        /// CSV with "Account Name" and "Description" columns
        #[arg(long)]
        input: PathBuf,

        /// Write results to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        taxonomy: TaxonomyArgs,

        /// Minimum (exclusive) similarity for a sublayer (default: 0.2)
        #[arg(long)]
        threshold: Option<f64>,

        /// Match keywords on word boundaries instead of as substrings
        #[arg(long)]
        token_match: bool,

        /// List each sublayer at most once per record
        #[arg(long)]
        dedupe_sublayers: bool,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the expanded CTA and sublayer keyword sets
    Expand {
        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        taxonomy: TaxonomyArgs,

        /// Print keyword sets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the nearest neighbors of a word in the model
    Neighbors {
        word: String,

        /// Number of neighbors (default: 10)
        #[arg(long, default_value = "10")]
        k: usize,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Show configuration status (model, taxonomy, options)
    Status,
}

#[derive(Args)]
struct ModelArgs {
    /// word2vec model file (overrides CTA_MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Model file format (default: by extension, .bin is binary)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Read at most this many words from the model
    #[arg(long)]
    max_words: Option<usize>,
}

#[derive(Args)]
struct TaxonomyArgs {
    /// JSON taxonomy file (overrides CTA_TAXONOMY_PATH)
    #[arg(long)]
    taxonomy: Option<PathBuf>,

    /// Nearest neighbors added per seed word (default: 5)
    #[arg(long)]
    topn: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Binary,
    Text,
}

impl From<FormatArg> for Word2VecFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Binary => Word2VecFormat::Binary,
            FormatArg::Text => Word2VecFormat::Text,
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cta_classifier=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            input,
            output,
            model,
            taxonomy,
            threshold,
            token_match,
            dedupe_sublayers,
            json,
        } => {
            let mut config = Config::load()?;
            apply_model_args(&mut config, &model);
            apply_taxonomy_args(&mut config, &taxonomy);
            if let Some(t) = threshold {
                config.options.threshold = t;
            }
            if token_match {
                config.options.match_mode = MatchMode::Token;
            }
            if dedupe_sublayers {
                config.options.dedupe_sublayers = true;
            }

            let model_path = config.require_model()?.clone();
            let taxonomy = Taxonomy::load_or_default(config.taxonomy_path.as_deref())?;
            let mut session = Session::new(taxonomy, config.options.clone());

            println!("Loading embedding model from {}...", model_path.display());
            session.load_model(&model_path, model.format.map(Into::into), config.max_words)?;

            let count = session.load_records(&input)?;
            println!("Classifying {count} records...");

            let pb = ProgressBar::new(count as u64);
            pb.set_style(
                ProgressStyle::default_bar().template("  Records [{bar:30}] {pos}/{len} ({eta})")?,
            );
            let results = session.classify_with_progress(|_| pb.inc(1))?;
            pb.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(results)?);
            } else {
                terminal::display_results(results);
            }

            match output {
                Some(path) => {
                    session.export(&path)?;
                    println!("{} {}", "Results saved to".bold(), path.display());
                }
                None => {
                    println!(
                        "{}",
                        "To save results, re-run with --output <file.csv>".dimmed()
                    );
                }
            }
        }

        Commands::Expand {
            model,
            taxonomy,
            json,
        } => {
            let mut config = Config::load()?;
            apply_model_args(&mut config, &model);
            apply_taxonomy_args(&mut config, &taxonomy);

            let model_path = config.require_model()?;
            let vectors = word2vec::load(model_path, model.format.map(Into::into), config.max_words)?;
            let taxonomy = Taxonomy::load_or_default(config.taxonomy_path.as_deref())?;
            let classifier = Classifier::new(&taxonomy, &vectors, &config.options);

            if json {
                let both = serde_json::json!({
                    "cta_keywords": classifier.cta_keywords(),
                    "sublayer_keywords": classifier.sublayer_keywords(),
                });
                println!("{}", serde_json::to_string_pretty(&both)?);
            } else {
                terminal::display_keywords("Expanded CTA keywords", classifier.cta_keywords());
                if !classifier.sublayer_keywords().is_empty() {
                    terminal::display_keywords(
                        "Expanded sublayer keywords",
                        classifier.sublayer_keywords(),
                    );
                }
            }
        }

        Commands::Neighbors { word, k, model } => {
            let mut config = Config::load()?;
            apply_model_args(&mut config, &model);

            let model_path = config.require_model()?;
            let vectors = word2vec::load(model_path, model.format.map(Into::into), config.max_words)?;

            if !vectors.contains(&word) {
                println!("{word:?} is not in the model vocabulary.");
                return Ok(());
            }
            info!(word = word.as_str(), k, "Querying nearest neighbors");
            terminal::display_neighbors(&word, &vectors.nearest_neighbors(&word, k));
        }

        Commands::Status => {
            let config = Config::load()?;
            cta_classifier::status::show(&config)?;
        }
    }

    Ok(())
}

fn apply_model_args(config: &mut Config, args: &ModelArgs) {
    if let Some(path) = &args.model {
        config.model_path = Some(path.clone());
    }
    if let Some(limit) = args.max_words {
        config.max_words = Some(limit);
    }
}

fn apply_taxonomy_args(config: &mut Config, args: &TaxonomyArgs) {
    if let Some(path) = &args.taxonomy {
        config.taxonomy_path = Some(path.clone());
    }
    if let Some(topn) = args.topn {
        config.options.topn = topn;
    }
}
