use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use calamine::{open_workbook, Data, Reader, Xlsx};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, StatDataset, StatRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A failed load is fatal to the session: no partial dataset is ever
/// returned. Everything downstream of a successful load degrades softly.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("XLSX read error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON read error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet read error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow read error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("invalid file format: {0}")]
    InvalidFormat(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a stats table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` – Excel workbook, first sheet, header row on top
/// * `.csv`            – header row with column names, typed by content
/// * `.json`           – `[{ "First Name": ..., "PTS": ..., ... }, ...]`
/// * `.parquet`        – flat scalar columns
///
/// Column names are trimmed of surrounding whitespace in every format;
/// `full_name` is derived per record at construction.
pub fn load_file(path: &Path) -> Result<StatDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" => load_xlsx(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// First worksheet only; the first row is the header. Empty-named columns
/// are skipped, empty cells become `Null`.
fn load_xlsx(path: &Path) -> Result<StatDataset, LoadError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .ok_or_else(|| LoadError::InvalidFormat("workbook contains no sheets".to_string()))?;

    let range = workbook.worksheet_range(first)?;
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| LoadError::InvalidFormat("worksheet has no header row".to_string()))?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in rows {
        let mut values: BTreeMap<String, CellValue> = BTreeMap::new();
        for (col_idx, cell) in row.iter().enumerate() {
            let Some(name) = headers.get(col_idx) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            values.insert(name.clone(), excel_to_cell(cell));
        }
        records.push(StatRecord::new(values));
    }

    Ok(StatDataset::from_records(records))
}

fn excel_to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => {
            // Excel stores integers as floats; keep whole numbers integral
            // so seasons and counts filter and display as integers.
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                CellValue::Integer(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Integer(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::String(format!("{e:?}")),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; cell types are guessed from content
/// (int → float → bool → string, empty → null).
fn load_csv(path: &Path) -> Result<StatDataset, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let mut values: BTreeMap<String, CellValue> = BTreeMap::new();
        for (col_idx, raw) in row.iter().enumerate() {
            let Some(name) = headers.get(col_idx) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            values.insert(name.clone(), guess_cell_type(raw));
        }
        records.push(StatRecord::new(values));
    }

    Ok(StatDataset::from_records(records))
}

fn guess_cell_type(s: &str) -> CellValue {
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

/// Records-oriented JSON (the default `df.to_json(orient='records')`):
/// a top-level array of flat objects, one per stat line.
fn load_json(path: &Path) -> Result<StatDataset, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::InvalidFormat("expected top-level JSON array".to_string()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::InvalidFormat(format!("row {i} is not a JSON object")))?;

        let mut values: BTreeMap<String, CellValue> = BTreeMap::new();
        for (key, val) in obj {
            let name = key.trim();
            if name.is_empty() {
                continue;
            }
            values.insert(name.to_string(), json_to_cell(val));
        }
        records.push(StatRecord::new(values));
    }

    Ok(StatDataset::from_records(records))
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

/// Flat scalar columns (strings, ints, floats, bools). Works with files
/// written by both Pandas (`df.to_parquet()`) and Polars
/// (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<StatDataset, LoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let columns: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| (i, f.name().trim().to_string()))
            .filter(|(_, name)| !name.is_empty())
            .collect();

        for row in 0..batch.num_rows() {
            let mut values: BTreeMap<String, CellValue> = BTreeMap::new();
            for (col_idx, name) in &columns {
                let col_array = batch.column(*col_idx);
                values.insert(name.clone(), arrow_to_cell(col_array, row));
            }
            records.push(StatRecord::new(values));
        }
    }

    Ok(StatDataset::from_records(records))
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_to_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                CellValue::String(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                CellValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::Bool(arr.value(row))
        }
        _ => CellValue::String(format!("{:?}", col.data_type())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
