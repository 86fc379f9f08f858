use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// FieldValue – a single cell of a record
// ---------------------------------------------------------------------------

/// Largest integer magnitude a spreadsheet number cell holds exactly.
/// Integers beyond it are stored as text.
pub const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// A dynamically-typed cell value shared by spreadsheets and JSON records.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Null => Ok(()),
        }
    }
}

impl FieldValue {
    /// Numeric view of the value. Numeric text counts, so CSV and
    /// string-typed JSON numbers still plot.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) if v.is_finite() => Some(*v),
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Null or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Whole-number floats become integers; spreadsheets store every number as a float.
    pub fn from_f64(v: f64) -> Self {
        if v.fract() == 0.0 && v.abs() < 9.0e15 {
            FieldValue::Integer(v as i64)
        } else {
            FieldValue::Float(v)
        }
    }

    /// Text cell of a workbook: an integer too large for a number cell
    /// comes back as an integer, anything else stays text.
    pub fn from_sheet_text(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(i) if i.unsigned_abs() > MAX_EXACT_INTEGER => FieldValue::Integer(i),
            _ => FieldValue::Text(s.to_string()),
        }
    }

    /// Best-effort typing of a raw text cell.
    pub fn guess(s: &str) -> Self {
        if s.is_empty() {
            return FieldValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return FieldValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return FieldValue::Float(f);
        }
        if s == "true" || s == "false" {
            return FieldValue::Bool(s == "true");
        }
        FieldValue::Text(s.to_string())
    }
}

impl From<&JsonValue> for FieldValue {
    fn from(val: &JsonValue) -> Self {
        match val {
            JsonValue::String(s) => FieldValue::Text(s.clone()),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    FieldValue::Text(n.to_string())
                }
            }
            JsonValue::Bool(b) => FieldValue::Bool(*b),
            JsonValue::Null => FieldValue::Null,
            // Nested arrays/objects are kept as their JSON text.
            other => FieldValue::Text(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row
// ---------------------------------------------------------------------------

/// One row of the source table: field name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub values: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Value of `field`, treating blank cells as absent.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field).filter(|v| !v.is_blank())
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Record {
            values: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – ordered columns plus records
// ---------------------------------------------------------------------------

/// A parsed table: column names in source order and the records under them.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Table { columns, records }
    }

    /// Build a table whose columns are the union of the records' fields in
    /// first-seen order. `field_order` yields each record's keys in source order.
    pub fn from_ordered<'a, I>(records: Vec<Record>, field_order: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen: HashSet<&str> = HashSet::new();
        let columns = field_order
            .into_iter()
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect();
        Table { columns, records }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
