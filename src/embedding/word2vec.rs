// word2vec model loading.
//
// Both formats written by the reference word2vec C tool are supported:
//
//   binary: "<vocab> <dim>\n" then per word: the word, a space, dim
//           little-endian f32s, and (usually) a newline
//   text:   "<vocab> <dim>\n" then per line: the word and dim decimal values
//
// Text files without the header line (GloVe-style) are accepted too; the
// dimension is taken from the first row.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::store::WordVectors;
use super::traits::EmbeddingProvider;

/// On-disk layout of a word2vec model file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Word2VecFormat {
    Binary,
    Text,
}

impl Word2VecFormat {
    /// Guess the format from the file extension: `.bin` is binary, anything
    /// else is text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bin") => Self::Binary,
            _ => Self::Text,
        }
    }
}

/// Load a word2vec model from disk.
///
/// `format` overrides the extension-based guess. `limit` caps the number of
/// words read, which keeps memory in check for multi-million-word models
/// (the most frequent words come first in published models).
pub fn load(path: &Path, format: Option<Word2VecFormat>, limit: Option<usize>) -> Result<WordVectors> {
    if !path.exists() {
        anyhow::bail!("Embedding model not found: {}", path.display());
    }

    let format = format.unwrap_or_else(|| Word2VecFormat::from_path(path));
    let file = File::open(path)
        .with_context(|| format!("Failed to open embedding model {}", path.display()))?;
    let reader = BufReader::new(file);

    debug!(path = %path.display(), ?format, ?limit, "Loading word2vec model");

    let vectors = match format {
        Word2VecFormat::Binary => read_binary(reader, limit),
        Word2VecFormat::Text => read_text(reader, limit),
    }
    .with_context(|| format!("Failed to load embedding model from {}", path.display()))?;

    info!(
        words = vectors.vocab_len(),
        dim = vectors.dimension(),
        "Loaded word2vec model"
    );

    Ok(vectors)
}

/// Widest vector a model header may declare.
pub const MAX_DIMENSION: usize = 1 << 16;

/// Reject headers no real model has before anything is allocated from them.
fn check_header(vocab: usize, dim: usize) -> Result<()> {
    if dim == 0 {
        anyhow::bail!("word2vec header declares zero-dimensional vectors");
    }
    if dim > MAX_DIMENSION {
        anyhow::bail!(
            "word2vec header declares {}-dimensional vectors (at most {} supported)",
            dim,
            MAX_DIMENSION
        );
    }
    vocab
        .checked_mul(dim)
        .and_then(|values| values.checked_mul(std::mem::size_of::<f32>()))
        .ok_or_else(|| {
            anyhow::anyhow!("word2vec header declares {} x {} values, more than can be addressed", vocab, dim)
        })?;
    Ok(())
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let vocab = parts.next()?.parse().ok()?;
    let dim = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((vocab, dim))
}

/// Read the binary word2vec format.
pub fn read_binary<R: BufRead>(mut reader: R, limit: Option<usize>) -> Result<WordVectors> {
    let mut header = String::new();
    reader
        .read_line(&mut header)
        .context("Failed to read word2vec header")?;
    let (vocab, dim) = parse_header(&header)
        .ok_or_else(|| anyhow::anyhow!("Malformed word2vec header: {:?}", header.trim_end()))?;
    check_header(vocab, dim)?;

    let count = limit.map_or(vocab, |l| l.min(vocab));
    let mut vectors = WordVectors::with_capacity(dim, count);
    let mut word_buf = Vec::new();
    let mut vec_buf = vec![0u8; dim * 4];
    let mut vector = vec![0f32; dim];
    let mut duplicates = 0usize;

    for i in 0..count {
        word_buf.clear();
        reader
            .read_until(b' ', &mut word_buf)
            .with_context(|| format!("Failed to read word {} of {}", i + 1, vocab))?;
        if word_buf.pop() != Some(b' ') {
            anyhow::bail!("Unexpected end of file at word {} of {}", i + 1, vocab);
        }

        // The newline ending the previous record, if any, is still in front.
        let start = word_buf
            .iter()
            .position(|&b| b != b'\n')
            .unwrap_or(word_buf.len());
        let word = String::from_utf8_lossy(&word_buf[start..]).into_owned();

        reader
            .read_exact(&mut vec_buf)
            .with_context(|| format!("Truncated vector for word {:?}", word))?;
        for (value, chunk) in vector.iter_mut().zip(vec_buf.chunks_exact(4)) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        if !vectors.insert(word, &vector)? {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        warn!(duplicates, "word2vec model contains duplicate words; kept the first vector of each");
    }

    Ok(vectors)
}

/// Read the text word2vec format (header optional).
pub fn read_text<R: BufRead>(reader: R, limit: Option<usize>) -> Result<WordVectors> {
    let mut lines = reader.lines().enumerate().peekable();
    let mut vectors: Option<WordVectors> = None;
    let mut count_limit = limit;
    let mut expected = None;

    let header = match lines.peek() {
        Some((_, Ok(first))) => parse_header(first),
        _ => None,
    };
    if let Some((vocab, dim)) = header {
        check_header(vocab, dim)?;
        let count = limit.map_or(vocab, |l| l.min(vocab));
        vectors = Some(WordVectors::with_capacity(dim, count));
        count_limit = Some(count);
        expected = Some(count);
        lines.next();
    }

    let mut read = 0usize;
    let mut duplicates = 0usize;
    for (line_no, line) in lines {
        if count_limit.is_some_and(|l| read >= l) {
            break;
        }
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            continue;
        };
        let vector = parts
            .map(|v| v.parse::<f32>())
            .collect::<Result<Vec<f32>, _>>()
            .with_context(|| format!("Invalid number on line {}", line_no + 1))?;

        let table = vectors.get_or_insert_with(|| WordVectors::new(vector.len()));
        if vector.len() != table.dimension() || vector.is_empty() {
            anyhow::bail!(
                "Line {} has {} values, expected {}",
                line_no + 1,
                vector.len(),
                table.dimension()
            );
        }
        if !table.insert(word, &vector)? {
            duplicates += 1;
        }
        read += 1;
    }

    if let Some(expected) = expected.filter(|&e| read < e) {
        anyhow::bail!("Unexpected end of file: read {} of {} words", read, expected);
    }

    if duplicates > 0 {
        warn!(duplicates, "word2vec model contains duplicate words; kept the first vector of each");
    }

    vectors.ok_or_else(|| anyhow::anyhow!("word2vec file contains no vectors"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn binary_model(words: &[(&str, [f32; 2])], trailing_newline: bool) -> Vec<u8> {
        let mut bytes = format!("{} 2\n", words.len()).into_bytes();
        for (word, vector) in words {
            bytes.extend_from_slice(word.as_bytes());
            bytes.push(b' ');
            for v in vector {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
            if trailing_newline {
                bytes.push(b'\n');
            }
        }
        bytes
    }

    #[test]
    fn test_binary_with_newlines() {
        let bytes = binary_model(&[("laser", [1.0, 0.5]), ("beam", [0.25, -2.0])], true);
        let wv = read_binary(Cursor::new(bytes), None).unwrap();
        assert_eq!(wv.vocab_len(), 2);
        assert_eq!(wv.vector_of("laser"), Some(&[1.0, 0.5][..]));
        assert_eq!(wv.vector_of("beam"), Some(&[0.25, -2.0][..]));
    }

    #[test]
    fn test_binary_without_newlines() {
        let bytes = binary_model(&[("laser", [1.0, 0.5]), ("beam", [0.25, -2.0])], false);
        let wv = read_binary(Cursor::new(bytes), None).unwrap();
        assert_eq!(wv.words(), &["laser".to_string(), "beam".to_string()]);
    }

    #[test]
    fn test_binary_limit() {
        let bytes = binary_model(&[("laser", [1.0, 0.5]), ("beam", [0.25, -2.0])], true);
        let wv = read_binary(Cursor::new(bytes), Some(1)).unwrap();
        assert_eq!(wv.vocab_len(), 1);
        assert!(wv.contains("laser"));
        assert!(!wv.contains("beam"));
    }

    #[test]
    fn test_binary_truncated_fails() {
        let mut bytes = binary_model(&[("laser", [1.0, 0.5])], false);
        bytes.truncate(bytes.len() - 3);
        assert!(read_binary(Cursor::new(bytes), None).is_err());
    }

    #[test]
    fn test_binary_bad_header_fails() {
        assert!(read_binary(Cursor::new(b"not a header\n".to_vec()), None).is_err());
    }

    #[test]
    fn test_binary_overflowing_header_fails() {
        let err = read_binary(Cursor::new(b"18446744073709551615 300\nx ".to_vec()), None)
            .unwrap_err();
        assert!(err.to_string().contains("more than can be addressed"), "{err}");
    }

    #[test]
    fn test_binary_huge_vocab_on_short_file_fails() {
        let mut bytes = b"4000000000 2\n".to_vec();
        bytes.extend_from_slice(&binary_model(&[("laser", [1.0, 0.5])], true)[4..]);
        let err = read_binary(Cursor::new(bytes), None).unwrap_err();
        assert!(err.to_string().contains("Unexpected end of file"), "{err}");
    }

    #[test]
    fn test_binary_oversized_dimension_fails() {
        assert!(read_binary(Cursor::new(b"1 4294967296\nx ".to_vec()), None).is_err());
    }

    #[test]
    fn test_text_overflowing_header_fails() {
        let err = read_text(Cursor::new("18446744073709551615 300\n"), None).unwrap_err();
        assert!(err.to_string().contains("more than can be addressed"), "{err}");
    }

    #[test]
    fn test_text_fewer_rows_than_declared_fails() {
        let text = "4000000000 3\nchip 0.1 0.2 0.3\n";
        let err = read_text(Cursor::new(text), None).unwrap_err();
        assert!(err.to_string().contains("read 1 of 4000000000"), "{err}");
    }

    #[test]
    fn test_text_with_header() {
        let text = "2 3\nchip 0.1 0.2 0.3\nwafer -1 0 1\n";
        let wv = read_text(Cursor::new(text), None).unwrap();
        assert_eq!(wv.dimension(), 3);
        assert_eq!(wv.vector_of("wafer"), Some(&[-1.0, 0.0, 1.0][..]));
    }

    #[test]
    fn test_text_without_header() {
        let text = "chip 0.1 0.2 0.3\nwafer -1 0 1\n";
        let wv = read_text(Cursor::new(text), None).unwrap();
        assert_eq!(wv.vocab_len(), 2);
        assert_eq!(wv.dimension(), 3);
    }

    #[test]
    fn test_text_ragged_row_fails() {
        let text = "2 3\nchip 0.1 0.2 0.3\nwafer -1 0\n";
        assert!(read_text(Cursor::new(text), None).is_err());
    }

    #[test]
    fn test_text_empty_fails() {
        assert!(read_text(Cursor::new(""), None).is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            Word2VecFormat::from_path(Path::new("GoogleNews-vectors.BIN")),
            Word2VecFormat::Binary
        );
        assert_eq!(
            Word2VecFormat::from_path(Path::new("vectors.txt")),
            Word2VecFormat::Text
        );
    }
}
