//! Record snapshots supplied to the engine
//!
//! A snapshot is the read-only set of stored documents for one analysis run:
//! the user's transactions and incomes, exactly as the storage layer returned
//! them. Documents stay as raw JSON until the normalizer turns them into
//! [`Record`](crate::models::Record)s.
//!
//! Supported files:
//! - JSON: `{"transactions": [...], "incomes": [...]}` or a bare array of
//!   documents (each routed by its `kind`/`type` field)
//! - CSV: one row per record, headers become document keys

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::RecordKind;

/// Raw documents for one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub transactions: Vec<Value>,
    #[serde(default)]
    pub incomes: Vec<Value>,
}

impl Snapshot {
    pub fn new(transactions: Vec<Value>, incomes: Vec<Value>) -> Self {
        Self {
            transactions,
            incomes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.incomes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len() + self.incomes.len()
    }

    /// Parse a JSON snapshot
    pub fn from_json_str(content: &str) -> Result<Self> {
        let parsed: SnapshotFile = serde_json::from_str(content)?;
        Ok(parsed.into_snapshot())
    }

    /// Parse a CSV snapshot
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut documents = Vec::new();

        for result in rdr.records() {
            let record = result?;
            documents.push(record_to_json(&headers, &record));
        }

        debug!(rows = documents.len(), "Parsed CSV snapshot");
        Ok(split_by_kind(documents))
    }
}

/// Either shape a JSON snapshot file may take
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Collections(Snapshot),
    Documents(Vec<Value>),
}

impl SnapshotFile {
    fn into_snapshot(self) -> Snapshot {
        match self {
            Self::Collections(snapshot) => snapshot,
            Self::Documents(documents) => split_by_kind(documents),
        }
    }
}

/// Load a snapshot file, picking the format from its extension
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let file = File::open(path)?;
    let snapshot = match extension.as_str() {
        "json" => {
            let mut content = String::new();
            BufReader::new(file).read_to_string(&mut content)?;
            Snapshot::from_json_str(&content)?
        }
        "csv" => Snapshot::from_csv(BufReader::new(file))?,
        other => {
            return Err(Error::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                other.to_string()
            }))
        }
    };

    debug!(
        path = %path.display(),
        transactions = snapshot.transactions.len(),
        incomes = snapshot.incomes.len(),
        "Loaded snapshot"
    );
    Ok(snapshot)
}

/// Convert a CSV record to a JSON object using headers as keys.
/// Empty cells are left out so they read as missing fields.
fn record_to_json(headers: &StringRecord, record: &StringRecord) -> Value {
    let mut map = serde_json::Map::new();
    for (i, header) in headers.iter().enumerate() {
        if let Some(value) = record.get(i) {
            if !value.is_empty() {
                map.insert(header.to_string(), Value::String(value.to_string()));
            }
        }
    }
    Value::Object(map)
}

/// Route documents to incomes or transactions by their kind field
fn split_by_kind(documents: Vec<Value>) -> Snapshot {
    let mut snapshot = Snapshot::default();
    for doc in documents {
        if document_kind(&doc) == Some(RecordKind::Income) {
            snapshot.incomes.push(doc);
        } else {
            snapshot.transactions.push(doc);
        }
    }
    snapshot
}

/// Explicit kind declared by a stored document, if any
pub(crate) fn document_kind(doc: &Value) -> Option<RecordKind> {
    ["kind", "type"]
        .iter()
        .filter_map(|key| doc.get(key).and_then(Value::as_str))
        .find_map(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_collections() {
        let snapshot = Snapshot::from_json_str(
            r#"{"transactions": [{"amount": 12.5}], "incomes": [{"amount": 1000}]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.incomes.len(), 1);
    }

    #[test]
    fn test_json_missing_collection_defaults_empty() {
        let snapshot = Snapshot::from_json_str(r#"{"incomes": [{"amount": 5}]}"#).unwrap();
        assert!(snapshot.transactions.is_empty());
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_json_bare_array_routed_by_kind() {
        let snapshot = Snapshot::from_json_str(
            r#"[{"type": "income", "amount": 10}, {"type": "expense", "amount": 3}, {"amount": 1}]"#,
        )
        .unwrap();
        assert_eq!(snapshot.incomes.len(), 1);
        assert_eq!(snapshot.transactions.len(), 2);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Snapshot::from_json_str("{not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_csv_rows_become_documents() {
        let csv = "id,kind,amount,category,date\n\
                   t1,expense,20.00,Food,2026-01-05\n\
                   i1,income,1000,,2026-01-01\n";
        let snapshot = Snapshot::from_csv(csv.as_bytes()).unwrap();

        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.incomes.len(), 1);
        assert_eq!(snapshot.transactions[0]["category"], json!("Food"));
        // Empty cells are omitted
        assert!(snapshot.incomes[0].get("category").is_none());
    }

    #[test]
    fn test_load_snapshot_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("snap.json");
        std::fs::write(&json_path, r#"{"transactions": [{"amount": 1}]}"#).unwrap();
        assert_eq!(load_snapshot(&json_path).unwrap().transactions.len(), 1);

        let csv_path = dir.path().join("snap.CSV");
        std::fs::write(&csv_path, "kind,amount\nincome,5\n").unwrap();
        assert_eq!(load_snapshot(&csv_path).unwrap().incomes.len(), 1);

        let other = dir.path().join("snap.xlsx");
        std::fs::write(&other, "").unwrap();
        assert!(matches!(
            load_snapshot(&other),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_snapshot_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_snapshot(&missing), Err(Error::Io(_))));
    }
}
