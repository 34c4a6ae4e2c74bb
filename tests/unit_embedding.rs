// Unit tests for the embedding layer.
//
// Tests the in-memory WordVectors provider (lookup, nearest-neighbor
// ordering and tie-breaking) and loading word2vec files from disk in both
// formats.

use std::io::Write;
use std::path::PathBuf;

use cta_classifier::embedding::store::WordVectors;
use cta_classifier::embedding::traits::EmbeddingProvider;
use cta_classifier::embedding::word2vec::{self, Word2VecFormat};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cta_embedding_{}_{}", std::process::id(), name))
}

fn fixture() -> WordVectors {
    WordVectors::from_pairs(
        2,
        vec![
            ("radar", vec![1.0, 0.0]),
            ("sonar", vec![1.0, 0.0]),
            ("lidar", vec![1.0, 0.0]),
            ("cyber", vec![0.6, 0.8]),
            ("genomics", vec![-1.0, 0.0]),
        ],
    )
    .unwrap()
}

// ============================================================
// WordVectors: nearest neighbors
// ============================================================

#[test]
fn neighbors_exclude_query_word() {
    let wv = fixture();
    for word in wv.words() {
        let neighbors = wv.nearest_neighbors(word, 10);
        assert!(neighbors.iter().all(|(w, _)| w != word));
        assert_eq!(neighbors.len(), wv.vocab_len() - 1);
    }
}

#[test]
fn neighbors_sorted_descending() {
    let wv = fixture();
    let neighbors = wv.nearest_neighbors("cyber", 4);
    for pair in neighbors.windows(2) {
        assert!(pair[0].1 >= pair[1].1, "{:?} before {:?}", pair[0], pair[1]);
    }
    assert_eq!(neighbors.last().unwrap().0, "genomics");
}

#[test]
fn neighbors_ties_break_by_vocabulary_order() {
    let wv = fixture();
    let neighbors = wv.nearest_neighbors("lidar", 2);
    let words: Vec<&str> = neighbors.iter().map(|(w, _)| w.as_str()).collect();
    assert_eq!(words, vec!["radar", "sonar"]);
    assert!((neighbors[0].1 - 1.0).abs() < 1e-6);
}

#[test]
fn neighbors_are_deterministic() {
    let wv = fixture();
    assert_eq!(
        wv.nearest_neighbors("radar", 3),
        wv.nearest_neighbors("radar", 3)
    );
}

#[test]
fn opposite_vectors_have_negative_similarity() {
    let wv = fixture();
    let neighbors = wv.nearest_neighbors("radar", 10);
    let (_, sim) = neighbors.iter().find(|(w, _)| w == "genomics").unwrap();
    assert!((sim + 1.0).abs() < 1e-6);
}

// ============================================================
// word2vec::load: files on disk
// ============================================================

#[test]
fn load_binary_file_by_extension() {
    let path = temp_path("model.bin");
    let mut bytes = b"2 2\n".to_vec();
    for (word, v) in [("radar", [1.0f32, 0.0]), ("cyber", [0.6, 0.8])] {
        bytes.extend_from_slice(word.as_bytes());
        bytes.push(b' ');
        for x in v {
            bytes.extend_from_slice(&x.to_le_bytes());
        }
        bytes.push(b'\n');
    }
    std::fs::write(&path, bytes).unwrap();

    let wv = word2vec::load(&path, None, None).unwrap();
    assert_eq!(wv.vocab_len(), 2);
    assert_eq!(wv.vector_of("cyber"), Some(&[0.6, 0.8][..]));

    std::fs::remove_file(&path).ok();
}

#[test]
fn load_text_file_with_limit() {
    let path = temp_path("model.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "3 2").unwrap();
    writeln!(file, "radar 1 0").unwrap();
    writeln!(file, "cyber 0.6 0.8").unwrap();
    writeln!(file, "genomics -1 0").unwrap();
    drop(file);

    let wv = word2vec::load(&path, None, Some(2)).unwrap();
    assert_eq!(wv.vocab_len(), 2);
    assert!(!wv.contains("genomics"));

    std::fs::remove_file(&path).ok();
}

#[test]
fn load_forced_format_overrides_extension() {
    let path = temp_path("vectors.bin");
    std::fs::write(&path, "1 2\nradar 1 0\n").unwrap();

    let wv = word2vec::load(&path, Some(Word2VecFormat::Text), None).unwrap();
    assert!(wv.contains("radar"));

    std::fs::remove_file(&path).ok();
}

#[test]
fn load_missing_file_fails() {
    let path = temp_path("does_not_exist.bin");
    let err = word2vec::load(&path, None, None).unwrap_err();
    assert!(err.to_string().contains("not found"));
}
