use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::catalog::IndicatorCatalog;
use super::model::{AreaType, CellValue, Dataset, RawRecord, Record, Sex, COLUMNS};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the indicator table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – semicolon-delimited text with a header row
/// * `.parquet` – one column per source column; value columns may be
///   text or floating point
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string()).into()),
    };

    let unparsable = dataset
        .records
        .iter()
        .filter(|r| r.estimated.is_nan())
        .count();
    if unparsable > 0 {
        log::warn!(
            "{}: {unparsable} of {} rows have no numeric Value",
            path.display(),
            dataset.len()
        );
    }
    Ok(dataset)
}

/// Load the indicator descriptions (`{ "<indicator>": "<text>", ... }`).
pub fn load_descriptions(path: &Path) -> Result<IndicatorCatalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let descriptions: BTreeMap<String, String> =
        serde_json::from_str(&text).context("parsing indicator descriptions")?;
    Ok(IndicatorCatalog::new(descriptions))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: `;`-separated, header row naming the ten source columns in
/// any order. Extra columns are ignored.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = reader.headers().context("reading CSV headers")?.clone();
    let index = column_index(|name| headers.iter().position(|h| h.trim() == name))?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let field = |col: usize| row.get(index[col]).unwrap_or("").trim();

        let raw = RawRecord {
            country: field(0).to_string(),
            iso3: field(1).to_string(),
            area_type: parse_label(field(2), row_no, "Type")?,
            indicator: field(3).to_string(),
            sex: parse_label(field(4), row_no, "Sex")?,
            age: field(5).to_string(),
            year: parse_year(field(6), row_no)?,
            value: CellValue::Text(field(7).to_string()),
            upper: CellValue::Text(field(8).to_string()),
            lower: CellValue::Text(field(9).to_string()),
        };
        records.push(Record::from(raw));
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load the table from Parquet.
///
/// Text columns may be Utf8 or LargeUtf8, `Year` any integer or text type
/// and the value columns either text (as exported from the CSV) or
/// Float64/Float32/Int64.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let index = column_index(|name| schema.index_of(name).ok())?;
        let col = |c: usize| batch.column(index[c]);

        for row in 0..batch.num_rows() {
            let row_no = offset + row;
            let raw = RawRecord {
                country: text_at(col(0), row),
                iso3: text_at(col(1), row),
                area_type: parse_label(&text_at(col(2), row), row_no, "Type")?,
                indicator: text_at(col(3), row),
                sex: parse_label(&text_at(col(4), row), row_no, "Sex")?,
                age: text_at(col(5), row),
                year: year_at(col(6), row, row_no)?,
                value: cell_at(col(7), row),
                upper: cell_at(col(8), row),
                lower: cell_at(col(9), row),
            };
            records.push(Record::from(raw));
        }
        offset += batch.num_rows();
    }

    Ok(Dataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn text_at(col: &Arc<dyn Array>, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).trim().to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).trim().to_string(),
        _ => match cell_at(col, row) {
            CellValue::Number(v) => v.to_string(),
            CellValue::Text(s) => s,
        },
    }
}

/// Read a value cell, keeping text as text so normalization sees it.
fn cell_at(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Number(f64::NAN);
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => CellValue::Text(text_at(col, row)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map_or(CellValue::Number(f64::NAN), |a| CellValue::Number(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map_or(CellValue::Number(f64::NAN), |a| {
                CellValue::Number(a.value(row) as f64)
            }),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map_or(CellValue::Number(f64::NAN), |a| {
                CellValue::Number(a.value(row) as f64)
            }),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map_or(CellValue::Number(f64::NAN), |a| {
                CellValue::Number(a.value(row) as f64)
            }),
        _ => CellValue::Number(f64::NAN),
    }
}

fn year_at(col: &Arc<dyn Array>, row: usize, row_no: usize) -> Result<i32> {
    let any = col.as_any();
    let year = match col.data_type() {
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .and_then(|a| i32::try_from(a.value(row)).ok()),
        _ => None,
    };
    match year {
        Some(y) if !col.is_null(row) => Ok(y),
        _ => parse_year(&text_at(col, row), row_no),
    }
}

// ---------------------------------------------------------------------------
// Shared field parsing
// ---------------------------------------------------------------------------

/// Resolve the position of every source column, in `COLUMNS` order.
fn column_index(mut find: impl FnMut(&str) -> Option<usize>) -> Result<[usize; 10]> {
    let mut index = [0usize; 10];
    for (slot, name) in index.iter_mut().zip(COLUMNS) {
        *slot = find(name).ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
    }
    Ok(index)
}

fn parse_label<T: std::str::FromStr>(value: &str, row: usize, column: &'static str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        anyhow::Error::from(DataError::UnknownLabel {
            row,
            column,
            value: value.to_string(),
        })
    })
}

fn parse_year(value: &str, row: usize) -> Result<i32> {
    let trimmed = value.trim();
    trimmed
        .parse::<i32>()
        .or_else(|_| {
            // Float-typed exports write years as "2020.0".
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|y| y.fract() == 0.0)
                .map(|y| y as i32)
                .ok_or(())
        })
        .map_err(|_| {
            anyhow::Error::from(DataError::InvalidYear {
                row,
                value: value.to_string(),
            })
        })
}
