use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// CellValue – a single cell as read from any input format
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, the common denominator of xlsx/csv/json/parquet
/// cells before they are coerced into a [`Row`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Blank text counts as null: spreadsheets often keep formatted-but-empty cells.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric view. Infinities and NaN yield `None`. Text is parsed leniently:
    /// surrounding whitespace is ignored and a decimal comma is accepted (`"12,50"`).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v).filter(|v| v.is_finite()),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => {
                let s = s.trim().replace(' ', "").replace(',', ".");
                s.parse::<f64>().ok().filter(|v| v.is_finite())
            }
            CellValue::Bool(_) | CellValue::Null => None,
        }
    }

    /// Integer view. Floats are accepted only when integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Some(*v as i64),
            CellValue::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| CellValue::Float(s.parse::<f64>().ok()?).as_i64())
            }
            _ => None,
        }
    }

    /// Text view; null becomes the empty string.
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

// ---------------------------------------------------------------------------
// Row – one line of an input price list
// ---------------------------------------------------------------------------

/// One price-list line (`EAN`, `NAZWA`, `CENA`, `DYS`).
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub ean: i64,
    pub name: String,
    pub price: f64,
    pub tag: String,
}

impl Row {
    pub fn new(ean: i64, name: impl Into<String>, price: f64, tag: impl Into<String>) -> Self {
        Self {
            ean,
            name: name.into(),
            price,
            tag: tag.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Group – rows sharing an EAN
// ---------------------------------------------------------------------------

/// All rows sharing one product identifier, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub ean: i64,
    pub rows: Vec<Row>,
}

impl Group {
    /// Highest price in the group, `None` for an empty group.
    pub fn max_price(&self) -> Option<f64> {
        self.rows.iter().map(|r| r.price).reduce(f64::max)
    }
}

// ---------------------------------------------------------------------------
// ExportRow – a row that passed the threshold test
// ---------------------------------------------------------------------------

/// Serde names follow the output headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "EAN")]
    pub ean: String,
    #[serde(rename = "NAZWA")]
    pub name: String,
    #[serde(rename = "CENA")]
    pub price: f64,
    #[serde(rename = "DYS")]
    pub tag: String,
    #[serde(rename = "ROZNICA")]
    pub difference: String,
}

/// Output column headers, in write order.
pub const EXPORT_HEADERS: [&str; 5] = ["EAN", "NAZWA", "CENA", "DYS", "ROZNICA"];

// ---------------------------------------------------------------------------
// Dataset – everything loaded by one "open files" action
// ---------------------------------------------------------------------------

/// Per-file summary of what the loader kept and skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub file_name: String,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

/// Rows of all files concatenated in upload order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<Row>,
    pub files: Vec<FileReport>,
}

impl Dataset {
    /// Concatenate per-file results, keeping the given order.
    pub fn concat(parts: Vec<(FileReport, Vec<Row>)>) -> Self {
        let mut dataset = Dataset::default();
        for (report, rows) in parts {
            dataset.rows.extend(rows);
            dataset.files.push(report);
        }
        dataset
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
