use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::RawRow;

const COLUMNS: [&str; 5] = ["Region", "Classification", "Sector", "Year", "Values"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load raw emission rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Region,Classification,Sector,Year,Values`
///                (`;` separated files are detected from the header)
/// * `.json`    – `[{ "Region": "...", "Year": 2020, "Values": "1,5", ... }, ...]`
/// * `.parquet` – one column per field, text or numeric
///
/// Only container-level problems are errors here. Bad field contents pass
/// through and are rejected row by row during aggregation.
pub fn load_file(path: &Path) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    info!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading CSV file")?;
    read_csv_str(&text)
}

/// Parse CSV text into rows. Columns are matched by header name.
pub fn read_csv_str(text: &str) -> Result<Vec<RawRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = sniff_delimiter(text.lines().next().unwrap_or(""));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(row);
    }
    Ok(rows)
}

/// German exports often use `;` because `,` is the decimal separator.
fn sniff_delimiter(header: &str) -> u8 {
    if header.contains(';') && !header.contains(',') {
        b';'
    } else {
        b','
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json_str(&text)
}

/// Parse a records-oriented JSON array. Numbers are accepted wherever text is.
pub fn read_json_str(text: &str) -> Result<Vec<RawRow>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            let field = |name: &str| obj.get(name).map(json_to_text).unwrap_or_default();
            Ok(RawRow {
                region: field("Region"),
                classification: field("Classification"),
                sector: field("Sector"),
                year: field("Year"),
                values: field("Values"),
            })
        })
        .collect()
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Each of the five fields is looked up by column name;
/// absent columns read as empty text.
fn load_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        rows.extend(batch_to_rows(&batch)?);
    }
    Ok(rows)
}

/// Convert one Arrow record batch into raw rows.
pub fn batch_to_rows(batch: &RecordBatch) -> Result<Vec<RawRow>> {
    let schema = batch.schema();
    let columns: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|name| schema.index_of(name).ok())
        .collect();

    let cell = |field: usize, row: usize| -> Result<String> {
        let Some(idx) = columns[field] else {
            return Ok(String::new());
        };
        let array = batch.column(idx);
        if array.is_null(row) {
            return Ok(String::new());
        }
        array_value_to_string(array.as_ref(), row)
            .with_context(|| format!("Row {row}: unreadable '{}'", COLUMNS[field]))
    };

    (0..batch.num_rows())
        .map(|row| {
            Ok(RawRow {
                region: cell(0, row)?,
                classification: cell(1, row)?,
                sector: cell(2, row)?,
                year: cell(3, row)?,
                values: cell(4, row)?,
            })
        })
        .collect()
}
