// Input records and classification results, plus CSV import/export.
//
// Only two input columns matter: "Account Name" and "Description". Any other
// columns are ignored, and a missing column or short row reads as an empty
// string rather than an error.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const ACCOUNT_NAME_COLUMN: &str = "Account Name";
pub const DESCRIPTION_COLUMN: &str = "Description";

/// CTA field value for a record that matched no category.
pub const UNCLASSIFIED: &str = "UNCLASSIFIED";
/// Sublayer field value for a record with no sublayer above threshold.
pub const NO_SUBLAYERS: &str = "None";

/// One input row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub account_name: String,
    pub description: String,
}

impl Record {
    pub fn new(account_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            description: description.into(),
        }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub account_name: String,
    pub description: String,
    /// Matched CTA labels, in label order
    pub ctas: Vec<String>,
    /// Sublayers above threshold, in category then sublayer order
    pub sublayers: Vec<String>,
}

impl ClassificationResult {
    /// CTAs joined with ", ", or "UNCLASSIFIED".
    pub fn ctas_field(&self) -> String {
        join_or(&self.ctas, UNCLASSIFIED)
    }

    /// Sublayers joined with ", ", or "None".
    pub fn sublayers_field(&self) -> String {
        join_or(&self.sublayers, NO_SUBLAYERS)
    }

    pub fn is_classified(&self) -> bool {
        !self.ctas.is_empty()
    }
}

fn join_or(labels: &[String], sentinel: &str) -> String {
    if labels.is_empty() {
        sentinel.to_string()
    } else {
        labels.join(", ")
    }
}

/// CSV layout of an exported result.
#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Account Name")]
    account_name: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "CTAs")]
    ctas: String,
    #[serde(rename = "Sublayers")]
    sublayers: String,
}

impl<'a> From<&'a ClassificationResult> for ExportRow<'a> {
    fn from(r: &'a ClassificationResult) -> Self {
        Self {
            account_name: &r.account_name,
            description: &r.description,
            ctas: r.ctas_field(),
            sublayers: r.sublayers_field(),
        }
    }
}

/// Decode file bytes as UTF-8, falling back to ISO-8859-1 (every byte is a
/// code point) for spreadsheets exported with a legacy encoding.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("Input is not valid UTF-8, decoding as ISO-8859-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Read records from a CSV file.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
    let text = decode_text(bytes);
    let records = parse_records(&text)
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))?;
    debug!(rows = records.len(), path = %path.display(), "Loaded records");
    Ok(records)
}

/// Parse records from CSV text with a header row.
pub fn parse_records(text: &str) -> Result<Vec<Record>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let name_idx = column(ACCOUNT_NAME_COLUMN);
    let desc_idx = column(DESCRIPTION_COLUMN);

    if desc_idx.is_none() {
        warn!("CSV has no {DESCRIPTION_COLUMN:?} column; every record will be unclassified");
    }

    let field = |row: &csv::StringRecord, idx: Option<usize>| -> String {
        idx.and_then(|i| row.get(i)).unwrap_or_default().to_string()
    };

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("Failed to read row {}", idx + 1))?;
        records.push(Record {
            account_name: field(&row, name_idx),
            description: field(&row, desc_idx),
        });
    }

    Ok(records)
}

/// Export results to a CSV file.
pub fn write_results(path: &Path, results: &[ClassificationResult]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_results_to(BufWriter::new(file), results)
        .with_context(|| format!("Failed to write results to {}", path.display()))?;
    debug!(rows = results.len(), path = %path.display(), "Exported results");
    Ok(())
}

/// Write results as CSV to any writer.
pub fn write_results_to<W: Write>(writer: W, results: &[ClassificationResult]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    if results.is_empty() {
        writer.write_record([ACCOUNT_NAME_COLUMN, DESCRIPTION_COLUMN, "CTAs", "Sublayers"])?;
    }
    for result in results {
        writer.serialize(ExportRow::from(result))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(ctas: &[&str], sublayers: &[&str]) -> ClassificationResult {
        ClassificationResult {
            account_name: "Acme".to_string(),
            description: "desc".to_string(),
            ctas: ctas.iter().map(|s| s.to_string()).collect(),
            sublayers: sublayers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_sentinels() {
        let r = result(&[], &[]);
        assert_eq!(r.ctas_field(), "UNCLASSIFIED");
        assert_eq!(r.sublayers_field(), "None");
        assert!(!r.is_classified());
    }

    #[test]
    fn test_joined_fields() {
        let r = result(&["Biotechnology", "Hypersonics"], &["Genomics"]);
        assert_eq!(r.ctas_field(), "Biotechnology, Hypersonics");
        assert_eq!(r.sublayers_field(), "Genomics");
    }

    #[test]
    fn test_parse_records_any_column_order() {
        let csv = "Description,Website,Account Name\n\"Lasers, optics\",x.com,Acme\n";
        let records = parse_records(csv).unwrap();
        assert_eq!(records, vec![Record::new("Acme", "Lasers, optics")]);
    }

    #[test]
    fn test_parse_records_missing_fields_default_empty() {
        let csv = "Account Name,Description\nShort\nFull,Has text\n";
        let records = parse_records(csv).unwrap();
        assert_eq!(records[0], Record::new("Short", ""));
        assert_eq!(records[1], Record::new("Full", "Has text"));

        let no_desc = parse_records("Account Name\nAcme\n").unwrap();
        assert_eq!(no_desc, vec![Record::new("Acme", "")]);
    }

    #[test]
    fn test_parse_records_strips_bom() {
        let csv = "\u{feff}Account Name,Description\nAcme,quantum\n";
        let records = parse_records(csv).unwrap();
        assert_eq!(records[0].account_name, "Acme");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "Société" in ISO-8859-1
        let bytes = vec![b'S', b'o', b'c', b'i', 0xE9, b't', 0xE9];
        assert_eq!(decode_text(bytes), "Société");
        assert_eq!(decode_text("naïve".as_bytes().to_vec()), "naïve");
    }

    #[test]
    fn test_write_results_layout() {
        let mut out = Vec::new();
        write_results_to(&mut out, &[result(&["Biotechnology"], &[])]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Account Name,Description,CTAs,Sublayers"));
        assert_eq!(lines.next(), Some("Acme,desc,Biotechnology,None"));
    }

    #[test]
    fn test_write_empty_results_has_header() {
        let mut out = Vec::new();
        write_results_to(&mut out, &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Account Name,Description,CTAs,Sublayers\n"
        );
    }
}
