// Colored terminal output for classification results and keyword sets.
//
// This module handles all terminal-specific formatting. The CLI's display
// paths delegate here.

use colored::Colorize;

use crate::records::ClassificationResult;
use crate::taxonomy::ExpandedKeywordSet;

/// Display classification results as a table: account, CTAs, sublayers.
pub fn display_results(results: &[ClassificationResult]) {
    if results.is_empty() {
        println!("No records to display.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Classification Results ({} records) ===", results.len()).bold()
    );
    println!();

    println!(
        "  {:<30}  {:<45}  {}",
        "Account Name".dimmed(),
        "CTAs".dimmed(),
        "Sublayers".dimmed(),
    );
    println!("  {}", "-".repeat(100).dimmed());

    for result in results {
        let name = super::truncate_chars(&result.account_name, 28);
        let ctas = super::truncate_chars(&result.ctas_field(), 43);
        let sublayers = result.sublayers_field();

        let ctas = if result.is_classified() {
            ctas.normal()
        } else {
            ctas.yellow()
        };
        let sublayers = if result.sublayers.is_empty() {
            sublayers.dimmed()
        } else {
            sublayers.green()
        };

        println!("  {:<30}  {:<45}  {}", name, ctas, sublayers);
    }

    println!();
    display_summary(results);
}

/// Per-CTA counts and the unclassified total.
pub fn display_summary(results: &[ClassificationResult]) {
    let mut counts: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
    for result in results {
        for cta in &result.ctas {
            *counts.entry(cta.as_str()).or_insert(0) += 1;
        }
    }

    for (cta, count) in &counts {
        println!("  {:>5}  {}", count, cta);
    }

    let unclassified = results.iter().filter(|r| !r.is_classified()).count();
    if unclassified > 0 {
        println!(
            "  {} {} unclassified records",
            "~".yellow(),
            unclassified
        );
    }
}

/// Display an expanded keyword set, one label per block.
pub fn display_keywords(title: &str, keywords: &ExpandedKeywordSet) {
    println!("\n{}", format!("=== {title} ({} labels) ===", keywords.len()).bold());
    println!();

    for (label, words) in keywords {
        println!("  {} ({})", label.bold(), words.len());
        let joined = words.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
        println!("      {}", joined.dimmed());
    }
    println!();
}

/// Display nearest neighbors with their similarity.
pub fn display_neighbors(word: &str, neighbors: &[(String, f32)]) {
    if neighbors.is_empty() {
        println!("No neighbors found for {word:?}.");
        return;
    }

    println!("\n{}", format!("=== Nearest neighbors of {word:?} ===").bold());
    for (i, (neighbor, sim)) in neighbors.iter().enumerate() {
        println!("  {:>3}. {:<30} {:.4}", i + 1, neighbor, sim);
    }
    println!();
}
