//! Record normalizer
//!
//! Converts heterogeneous stored documents into canonical [`Record`]s.
//! Malformed input never produces an error: every field degrades to its
//! safest default (zero amount, "Uncategorized", no date). Only documents that
//! are not objects at all are dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::categorize::CategoryRules;
use crate::models::{Record, RecordKind, UNCATEGORIZED};
use crate::snapshot::{document_kind, Snapshot};

const ID_KEYS: &[&str] = &["id", "_id"];
const AMOUNT_KEYS: &[&str] = &["amount", "value"];
const CATEGORY_KEYS: &[&str] = &["category", "categoryName"];
const DATE_KEYS: &[&str] = &["occurredAt", "date", "createdAt", "timestamp"];
const DESCRIPTION_KEYS: &[&str] = &["description", "note", "title", "name"];
const COLOR_KEYS: &[&str] = &["color", "categoryColor"];

/// Epoch values at or above this are milliseconds, below it seconds
const EPOCH_MILLIS_CUTOFF: i64 = 100_000_000_000;

/// Outcome of reading an amount field
#[derive(Debug, Clone, Copy, PartialEq)]
struct ParsedAmount {
    value: f64,
    valid: bool,
}

impl ParsedAmount {
    fn invalid() -> Self {
        Self {
            value: 0.0,
            valid: false,
        }
    }
}

/// Turns stored documents into records, optionally filling blank categories
/// from a keyword table
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    rules: Option<CategoryRules>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self { rules: None }
    }

    /// Fill blank categories from the description when a keyword matches
    pub fn with_rules(rules: CategoryRules) -> Self {
        Self { rules: Some(rules) }
    }

    /// Normalize one document. Returns None only for non-object documents.
    pub fn normalize(&self, doc: &Value, default_kind: RecordKind) -> Option<Record> {
        let object = doc.as_object()?;

        let kind = document_kind(doc).unwrap_or(default_kind);
        let amount = AMOUNT_KEYS
            .iter()
            .find_map(|k| object.get(*k).filter(|v| !v.is_null()))
            .map(parse_amount)
            .unwrap_or_else(ParsedAmount::invalid);
        let occurred_at = DATE_KEYS
            .iter()
            .find_map(|k| object.get(*k).and_then(parse_occurred_at));
        let description = first_string(doc, DESCRIPTION_KEYS);

        let (category, category_color) = read_category(doc);
        let category = category
            .or_else(|| {
                let rules = self.rules.as_ref()?;
                rules
                    .suggest(description.as_deref()?)
                    .map(|c| c.to_string())
            })
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        let id = first_string(doc, ID_KEYS)
            .or_else(|| first_number(doc, ID_KEYS))
            .unwrap_or_else(|| content_id(doc, kind));

        Some(Record {
            id,
            kind,
            amount: amount.value,
            valid_amount: amount.valid,
            category,
            occurred_at,
            currency: first_string(doc, &["currency"]).map(|c| c.to_uppercase()),
            description,
            color: first_string(doc, COLOR_KEYS).or(category_color),
        })
    }

    /// Normalize a whole snapshot: transactions default to expenses, incomes
    /// to income, unless a document declares its own kind
    pub fn normalize_snapshot(&self, snapshot: &Snapshot) -> Vec<Record> {
        let mut records = Vec::with_capacity(snapshot.len());
        let mut dropped = 0usize;

        let collections = [
            (&snapshot.transactions, RecordKind::Expense),
            (&snapshot.incomes, RecordKind::Income),
        ];
        for (documents, default_kind) in collections {
            for doc in documents {
                match self.normalize(doc, default_kind) {
                    Some(record) => records.push(record),
                    None => dropped += 1,
                }
            }
        }

        let invalid_amounts = records.iter().filter(|r| !r.valid_amount).count();
        let undated = records.iter().filter(|r| r.occurred_at.is_none()).count();
        debug!(
            normalized = records.len(),
            dropped, invalid_amounts, undated, "Normalized snapshot"
        );

        records
    }
}

/// Normalize one document without category rules
pub fn normalize_record(doc: &Value, default_kind: RecordKind) -> Option<Record> {
    Normalizer::new().normalize(doc, default_kind)
}

/// Normalize a snapshot without category rules
pub fn normalize_snapshot(snapshot: &Snapshot) -> Vec<Record> {
    Normalizer::new().normalize_snapshot(snapshot)
}

/// Read an amount. Negative, non-finite and non-numeric values become 0.
fn parse_amount(value: &Value) -> ParsedAmount {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount_str(s),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => ParsedAmount {
            value: v,
            valid: true,
        },
        _ => ParsedAmount::invalid(),
    }
}

/// Parse an amount string, handling currency symbols, commas and
/// accounting-style parentheses
fn parse_amount_str(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', '€', '£', '¥', '₹', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Read a date/time from a string, epoch number, or `{seconds, nanoseconds}`
/// timestamp object
fn parse_occurred_at(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let raw = n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })?;
            if raw.unsigned_abs() >= EPOCH_MILLIS_CUTOFF.unsigned_abs() {
                DateTime::from_timestamp_millis(raw).map(|dt| dt.naive_utc())
            } else {
                DateTime::from_timestamp(raw, 0).map(|dt| dt.naive_utc())
            }
        }
        Value::Object(map) => {
            let seconds = ["seconds", "_seconds"]
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_i64))?;
            let nanos = ["nanoseconds", "_nanoseconds"]
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_u64))
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, nanos).map(|dt| dt.naive_utc())
        }
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Offsets are kept as written: the record's own local time
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    // %Y also accepts two digits, so short years get their own formats
    let short_year = s
        .rsplit_once('/')
        .is_some_and(|(_, year)| year.len() == 2);
    let date_formats: &[&str] = if short_year {
        &[
            "%m/%d/%y", // 01/15/24
            "%d/%m/%y", // 15/01/24 (European)
        ]
    } else {
        &[
            "%Y-%m-%d", // 2024-01-15
            "%m/%d/%Y", // 01/15/2024
            "%d/%m/%Y", // 15/01/2024 (European)
        ]
    };
    date_formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Category name and color. Stored categories are either a plain label or
/// an embedded `{name, color}` object.
fn read_category(doc: &Value) -> (Option<String>, Option<String>) {
    for key in CATEGORY_KEYS {
        match doc.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => {
                return (Some(s.trim().to_string()), None);
            }
            Some(Value::Object(obj)) => {
                let name = obj
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
                let color = obj
                    .get("color")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                if name.is_some() {
                    return (name, color);
                }
            }
            _ => {}
        }
    }
    (None, None)
}

fn first_string(doc: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| doc.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_number(doc: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| doc.get(*k))
        .find(|v| v.is_number())
        .map(|v| v.to_string())
}

/// Stable id for documents stored without one
fn content_id(doc: &Value, kind: RecordKind) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_str().as_bytes());
    hasher.update(doc.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryRuleConfig;
    use serde_json::json;

    fn expense(doc: Value) -> Record {
        normalize_record(&doc, RecordKind::Expense).unwrap()
    }

    #[test]
    fn test_well_formed_record() {
        let record = expense(json!({
            "id": "tx-1",
            "amount": 42.5,
            "category": "Food",
            "date": "2026-03-14",
            "currency": "usd",
            "description": "Lunch",
            "color": "#FF6384"
        }));

        assert_eq!(record.id, "tx-1");
        assert_eq!(record.kind, RecordKind::Expense);
        assert_eq!(record.amount, 42.5);
        assert!(record.valid_amount);
        assert_eq!(record.category, "Food");
        assert_eq!(
            record.date(),
            Some(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
        );
        assert_eq!(record.currency.as_deref(), Some("USD"));
        assert_eq!(record.description.as_deref(), Some("Lunch"));
        assert_eq!(record.color.as_deref(), Some("#FF6384"));
    }

    #[test]
    fn test_missing_amount_is_zero_and_invalid() {
        let record = expense(json!({"category": "Food"}));
        assert_eq!(record.amount, 0.0);
        assert!(!record.valid_amount);

        let record = expense(json!({"amount": null}));
        assert_eq!(record.amount, 0.0);
        assert!(!record.valid_amount);
    }

    #[test]
    fn test_negative_and_non_numeric_amounts() {
        let negative = expense(json!({"amount": -25}));
        assert_eq!(negative.amount, 0.0);
        assert!(!negative.valid_amount);

        let text = expense(json!({"amount": "lots"}));
        assert_eq!(text.amount, 0.0);
        assert!(!text.valid_amount);

        let accounting = expense(json!({"amount": "(100.00)"}));
        assert_eq!(accounting.amount, 0.0);
        assert!(!accounting.valid_amount);

        let boolean = expense(json!({"amount": true}));
        assert!(!boolean.valid_amount);
    }

    #[test]
    fn test_numeric_string_amount() {
        let record = expense(json!({"amount": "$1,234.56"}));
        assert_eq!(record.amount, 1234.56);
        assert!(record.valid_amount);

        let record = expense(json!({"value": "12"}));
        assert_eq!(record.amount, 12.0);
    }

    #[test]
    fn test_blank_category_is_uncategorized() {
        assert_eq!(expense(json!({"amount": 1})).category, UNCATEGORIZED);
        assert_eq!(
            expense(json!({"amount": 1, "category": "   "})).category,
            UNCATEGORIZED
        );
        assert_eq!(
            expense(json!({"amount": 1, "category": "  Travel "})).category,
            "Travel"
        );
    }

    #[test]
    fn test_embedded_category_object() {
        let record = expense(json!({
            "amount": 1,
            "category": {"name": "Bills", "color": "#36A2EB"}
        }));
        assert_eq!(record.category, "Bills");
        assert_eq!(record.color.as_deref(), Some("#36A2EB"));
    }

    #[test]
    fn test_date_formats() {
        let cases = [
            (json!("2026-01-15T10:30:00Z"), (2026, 1, 15)),
            (json!("2026-01-15T23:30:00-05:00"), (2026, 1, 15)),
            (json!("2026-01-15T10:30:00.123"), (2026, 1, 15)),
            (json!("2026-01-15 10:30:00"), (2026, 1, 15)),
            (json!("01/15/2026"), (2026, 1, 15)),
            (json!("25/01/2026"), (2026, 1, 25)),
            (json!("01/15/24"), (2024, 1, 15)),
            (json!("25/01/24"), (2024, 1, 25)),
            (json!(1768435200000_i64), (2026, 1, 15)),
            (json!(1768435200), (2026, 1, 15)),
            (json!({"seconds": 1768435200, "nanoseconds": 0}), (2026, 1, 15)),
            (json!({"_seconds": 1768435200, "_nanoseconds": 5}), (2026, 1, 15)),
        ];

        for (raw, (y, m, d)) in cases {
            let record = expense(json!({"amount": 1, "date": raw.clone()}));
            assert_eq!(
                record.date(),
                Some(NaiveDate::from_ymd_opt(y, m, d).unwrap()),
                "failed for {}",
                raw
            );
        }
    }

    #[test]
    fn test_unparseable_date_is_none() {
        assert!(expense(json!({"amount": 1, "date": "yesterday"}))
            .occurred_at
            .is_none());
        assert!(expense(json!({"amount": 1, "date": ""})).occurred_at.is_none());
        assert!(expense(json!({"amount": 1, "date": [2026, 1, 1]}))
            .occurred_at
            .is_none());
        assert!(expense(json!({"amount": 1})).occurred_at.is_none());
    }

    #[test]
    fn test_out_of_range_epoch_is_none() {
        for raw in [json!(i64::MIN), json!(i64::MAX), json!(-1.0e300), json!(1.0e300)] {
            let record = expense(json!({"amount": 1, "date": raw.clone()}));
            assert!(record.occurred_at.is_none(), "failed for {}", raw);
        }
    }

    #[test]
    fn test_date_key_aliases() {
        let record = expense(json!({"amount": 1, "createdAt": "2026-02-01"}));
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2026, 2, 1));

        // An unparseable first key falls through to the next
        let record = expense(json!({"amount": 1, "occurredAt": "bad", "date": "2026-02-03"}));
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2026, 2, 3));
    }

    #[test]
    fn test_non_object_documents_dropped() {
        assert!(normalize_record(&json!(null), RecordKind::Expense).is_none());
        assert!(normalize_record(&json!("tx"), RecordKind::Expense).is_none());
        assert!(normalize_record(&json!([1, 2]), RecordKind::Expense).is_none());
    }

    #[test]
    fn test_explicit_kind_overrides_collection() {
        let record = normalize_record(&json!({"amount": 5, "type": "income"}), RecordKind::Expense)
            .unwrap();
        assert_eq!(record.kind, RecordKind::Income);
    }

    #[test]
    fn test_content_id_is_stable() {
        let doc = json!({"amount": 9.99, "category": "Food"});
        let a = expense(doc.clone());
        let b = expense(doc);
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.len(), 64);

        let other = expense(json!({"amount": 10.0, "category": "Food"}));
        assert_ne!(a.id, other.id);

        let numeric = expense(json!({"id": 17, "amount": 1}));
        assert_eq!(numeric.id, "17");
    }

    #[test]
    fn test_normalize_snapshot_kinds_and_drops() {
        let snapshot = Snapshot::new(
            vec![json!({"amount": 10}), json!(null), json!({"amount": 2, "kind": "income"})],
            vec![json!({"amount": 1000})],
        );

        let records = normalize_snapshot(&snapshot);
        assert_eq!(records.len(), 3);
        assert_eq!(records.iter().filter(|r| r.is_income()).count(), 2);
        assert_eq!(records.iter().filter(|r| r.is_expense()).count(), 1);
    }

    #[test]
    fn test_auto_categorize_fills_blank_only() {
        let rules = CategoryRules::new(&[CategoryRuleConfig {
            name: "Transport".to_string(),
            keywords: vec!["uber".to_string()],
        }])
        .unwrap();
        let normalizer = Normalizer::with_rules(rules);

        let filled = normalizer
            .normalize(&json!({"amount": 12, "description": "Uber trip"}), RecordKind::Expense)
            .unwrap();
        assert_eq!(filled.category, "Transport");

        let kept = normalizer
            .normalize(
                &json!({"amount": 12, "category": "Work", "description": "Uber trip"}),
                RecordKind::Expense,
            )
            .unwrap();
        assert_eq!(kept.category, "Work");

        let unmatched = normalizer
            .normalize(&json!({"amount": 12, "description": "Bookshop"}), RecordKind::Expense)
            .unwrap();
        assert_eq!(unmatched.category, UNCATEGORIZED);
    }
}
