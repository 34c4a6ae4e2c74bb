// Built-in CTA seed keywords.
//
// Three hand-picked seeds per critical technology area. Embedding expansion
// grows each list at run time, so these only need to anchor the category.

use super::SeedKeywordSet;

const CTA_SEEDS: &[(&str, &[&str])] = &[
    (
        "Advanced Computing and Software",
        &["computing", "cloud", "algorithms"],
    ),
    ("Advanced Materials", &["materials", "composites", "nanotech"]),
    ("Biotechnology", &["biotech", "genomics", "biosensors"]),
    ("Directed Energy", &["laser", "microwave", "beam"]),
    (
        "Future Generation Wireless Technology",
        &["5g", "wireless", "telecom"],
    ),
    (
        "Human-Machine Interfaces",
        &["interface", "wearables", "exoskeleton"],
    ),
    ("Hypersonics", &["hypersonic", "scramjet", "aerodynamics"]),
    (
        "Integrated Network Systems-of-Systems",
        &["network", "systems", "command"],
    ),
    ("Integrated Sensing and Cyber", &["cyber", "sensing", "radar"]),
    (
        "Microelectronics",
        &["semiconductor", "chip", "microelectronics"],
    ),
    ("Quantum Science", &["quantum", "qubit", "entanglement"]),
    ("Space Technology", &["satellite", "orbit", "spacecraft"]),
    ("Trusted AI and Autonomy", &["ai", "autonomy", "robotics"]),
];

/// The default CTA seed table.
pub fn cta_seeds() -> SeedKeywordSet {
    CTA_SEEDS
        .iter()
        .map(|(label, seeds)| {
            (
                label.to_string(),
                seeds.iter().map(|s| s.to_string()).collect(),
            )
        })
        .collect()
}
