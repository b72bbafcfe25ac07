use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Decimal128Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type,
    Int8Type, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, Dataset, FileReport, Row};

/// Input column headers.
pub const COL_EAN: &str = "EAN";
pub const COL_NAME: &str = "NAZWA";
pub const COL_PRICE: &str = "CENA";
pub const COL_TAG: &str = "DYS";

/// Extensions offered in the open dialog.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json", "parquet", "pq",
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("workbook has no sheets")]
    NoSheets,
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("expected a top-level JSON array of objects")]
    NotRecords,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every file concurrently and concatenate the rows in the order the
/// paths were given. A single failure fails the whole load.
pub fn load_files(paths: &[PathBuf]) -> Result<Dataset> {
    let parts = std::thread::scope(|scope| {
        let handles: Vec<_> = paths
            .iter()
            .map(|path| scope.spawn(move || load_file(path)))
            .collect();

        handles
            .into_iter()
            .zip(paths)
            .map(|(handle, path)| {
                handle
                    .join()
                    .map_err(|_| anyhow!("loader thread panicked"))
                    .and_then(|res| res)
                    .with_context(|| format!("loading {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    Ok(Dataset::concat(parts))
}

/// Load the rows of one price list. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first sheet, first row is the header
/// * `.csv`     – header row, `,` or `;` separated
/// * `.json`    – `[{ "EAN": ..., "NAZWA": ..., "CENA": ..., "DYS": ... }, ...]`
/// * `.parquet` – flat columns named like the spreadsheet headers
pub fn load_file(path: &Path) -> Result<(FileReport, Vec<Row>)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path)?,
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (rows, rows_skipped) = table.into_rows(&file_name)?;

    log::info!(
        "Loaded {} rows from {file_name} ({rows_skipped} skipped)",
        rows.len()
    );

    let report = FileReport {
        file_name,
        rows_read: rows.len(),
        rows_skipped,
    };
    Ok((report, rows))
}

// ---------------------------------------------------------------------------
// Table – header + cells, the shape every format is read into
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

struct Columns {
    ean: usize,
    price: usize,
    name: Option<usize>,
    tag: Option<usize>,
}

impl Table {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    fn columns(&self) -> Result<Columns, LoadError> {
        Ok(Columns {
            ean: self
                .column(COL_EAN)
                .ok_or(LoadError::MissingColumn(COL_EAN))?,
            price: self
                .column(COL_PRICE)
                .ok_or(LoadError::MissingColumn(COL_PRICE))?,
            name: self.column(COL_NAME),
            tag: self.column(COL_TAG),
        })
    }

    /// Coerce cells into rows. Rows without a usable EAN or price are
    /// skipped and counted; blank rows are dropped silently.
    fn into_rows(self, file_name: &str) -> Result<(Vec<Row>, usize), LoadError> {
        if self.headers.is_empty() && self.rows.is_empty() {
            return Ok((Vec::new(), 0));
        }
        let cols = self.columns()?;

        let mut rows = Vec::with_capacity(self.rows.len());
        let mut skipped = 0;

        for (i, cells) in self.rows.iter().enumerate() {
            if cells.iter().all(CellValue::is_null) {
                continue;
            }
            let cell = |idx: usize| cells.get(idx).cloned().unwrap_or(CellValue::Null);
            let text = |idx: Option<usize>| idx.map(|c| cell(c).as_text()).unwrap_or_default();

            let ean = cell(cols.ean).as_i64();
            let price = cell(cols.price).as_f64();

            match (ean, price) {
                (Some(ean), Some(price)) => {
                    rows.push(Row::new(ean, text(cols.name), price, text(cols.tag)))
                }
                _ => {
                    // +2: 1-based, plus the header line
                    log::warn!(
                        "{file_name}: skipping line {}: EAN '{}' / CENA '{}' not usable",
                        i + 2,
                        cell(cols.ean),
                        cell(cols.price)
                    );
                    skipped += 1;
                }
            }
        }

        Ok((rows, skipped))
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoSheets)?
        .context("reading first worksheet")?;

    let mut lines = range.rows();
    let Some(header) = lines.next() else {
        return Ok(Table::default());
    };

    Ok(Table {
        headers: header.iter().map(|d| data_to_cell(d).as_text()).collect(),
        rows: lines
            .map(|line| line.iter().map(data_to_cell).collect())
            .collect(),
    })
}

fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty | Data::Error(_) => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names. The separator is `;` when the
/// header line uses it and has no commas, `,` otherwise.
fn load_csv(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading CSV file")?;
    let first_line = text.lines().next().unwrap_or("");
    let delimiter = if first_line.contains(';') && !first_line.contains(',') {
        b';'
    } else {
        b','
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(Table { headers, rows })
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the shape a spreadsheet-to-JSON export produces:
///
/// ```json
/// [
///   { "EAN": 5901234123457, "NAZWA": "Kawa 250g", "CENA": 18.99, "DYS": "A" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let records = root.as_array().ok_or(LoadError::NotRecords)?;

    let mut headers: Vec<String> = Vec::new();
    for rec in records {
        let obj = rec.as_object().ok_or(LoadError::NotRecords)?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(Table { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Flat Parquet file whose column names match the spreadsheet headers.
/// Works with files written by Pandas (`df.to_parquet()`) and Polars.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch
            .columns()
            .iter()
            .map(unpack_dictionary)
            .collect::<Result<Vec<_>>>()?;
        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| arrow_to_cell(col, row)).collect());
        }
    }

    Ok(Table { headers, rows })
}

/// Categorical columns come back dictionary-encoded; decode them to their
/// value type so cells can be read directly.
fn unpack_dictionary(col: &ArrayRef) -> Result<ArrayRef> {
    match col.data_type() {
        DataType::Dictionary(_, value_type) => {
            cast(col, value_type).context("decoding dictionary column")
        }
        _ => Ok(col.clone()),
    }
}

fn arrow_to_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt64 => i64::try_from(col.as_primitive::<UInt64Type>().value(row))
            .map(CellValue::Integer)
            .unwrap_or(CellValue::Null),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Decimal128(_, scale) => {
            let raw = col.as_primitive::<Decimal128Type>().value(row);
            CellValue::Float(raw as f64 / 10f64.powi(*scale as i32))
        }
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => {
            log::warn!("unsupported parquet column type {other:?}, reading as null");
            CellValue::Null
        }
    }
}
