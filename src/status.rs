// System status display: shows the configured model, taxonomy and options.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::taxonomy::Taxonomy;

/// Display configuration status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    match &config.model_path {
        Some(path) => println!("Model: {}", describe_file(path)),
        None => {
            println!("Model: not configured");
            println!("  Set CTA_MODEL_PATH or pass --model to classify");
        }
    }
    if let Some(limit) = config.max_words {
        println!("  Reading at most {limit} words");
    }

    let taxonomy = match &config.taxonomy_path {
        Some(path) => {
            println!("Taxonomy: {}", describe_file(path));
            Taxonomy::load(path)?
        }
        None => {
            println!("Taxonomy: built-in CTA seeds, no sublayers");
            println!("  Set CTA_TAXONOMY_PATH to enable sublayer scoring");
            Taxonomy::default()
        }
    };

    let sublayer_links: usize = taxonomy.cta_to_sublayers.values().map(Vec::len).sum();
    println!(
        "  {} CTAs, {} sublayers with keywords, {} CTA->sublayer links",
        taxonomy.cta_seeds.len(),
        taxonomy.sublayer_keywords.len(),
        sublayer_links
    );

    let problems = taxonomy.validate();
    if !problems.is_empty() {
        println!("  {} warnings:", problems.len());
        for problem in &problems {
            println!("    {problem}");
        }
    }

    let opts = &config.options;
    println!(
        "Options: topn={} threshold={} dim={} match={:?} dedupe_sublayers={}",
        opts.topn, opts.threshold, opts.dimension, opts.match_mode, opts.dedupe_sublayers
    );

    Ok(())
}

fn describe_file(path: &Path) -> String {
    match std::fs::metadata(path) {
        Ok(m) => format!("{} ({})", path.display(), format_bytes(m.len())),
        Err(_) => format!("{} (missing)", path.display()),
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
