use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::export::EXPORT_COLUMNS;
use super::model::{RawTitle, TitleStore};

/// Columns a catalog file must carry. `show_id`, `director` and `cast` are optional.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "type",
    "title",
    "date_added",
    "release_year",
    "rating",
    "duration",
    "listed_in",
    "country",
    "description",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a title catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the catalog columns (UTF-8 or Latin-1)
/// * `.json`    – `[{ "type": "Movie", "title": ..., ... }, ...]`
/// * `.parquet` – one column per catalog field, strings or integers
pub fn load_file(path: &Path) -> Result<TitleStore> {
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
    }
    .with_context(|| format!("loading {}", path.display()))?;

    Ok(TitleStore::from_raw(rows))
}

// ---------------------------------------------------------------------------
// Column mapping shared by all formats
// ---------------------------------------------------------------------------

/// Position of each catalog field (in [`EXPORT_COLUMNS`] order) within a source.
#[derive(Debug, Clone)]
struct ColumnMap {
    positions: [Option<usize>; EXPORT_COLUMNS.len()],
}

impl ColumnMap {
    /// Match source column names to catalog fields; fail on a missing required one.
    fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut positions = [None; EXPORT_COLUMNS.len()];
        for (source_idx, name) in names.into_iter().enumerate() {
            let name = name.trim().trim_start_matches('\u{feff}');
            if let Some(field) = EXPORT_COLUMNS.iter().position(|c| *c == name) {
                positions[field].get_or_insert(source_idx);
            }
        }
        for required in REQUIRED_COLUMNS {
            let field = EXPORT_COLUMNS
                .iter()
                .position(|c| *c == required)
                .context("required column outside export schema")?;
            if positions[field].is_none() {
                bail!("missing '{required}' column");
            }
        }
        Ok(ColumnMap { positions })
    }

    /// Assemble one row; `cell` reads a source column. Empty text is null.
    fn build(&self, mut cell: impl FnMut(usize) -> Result<Option<String>>) -> Result<RawTitle> {
        let mut values: [Option<String>; EXPORT_COLUMNS.len()] = Default::default();
        for (slot, position) in values.iter_mut().zip(self.positions) {
            if let Some(source_idx) = position {
                *slot = cell(source_idx)?.filter(|s| !s.is_empty());
            }
        }
        let [show_id, kind, title, director, cast, country, date_added, release_year, rating, duration, listed_in, description] =
            values;
        Ok(RawTitle {
            show_id,
            kind,
            title,
            director,
            cast,
            country,
            date_added,
            release_year,
            rating,
            duration,
            listed_in,
            description,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Decode file bytes as UTF-8, or as Latin-1 when that fails. Latin-1 maps
/// every byte to a code point, so decoding never fails.
fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("file is not valid UTF-8 ({err}), decoding as Latin-1");
            err.into_bytes().iter().map(|&b| char::from(b)).collect()
        }
    }
}

fn load_csv(path: &Path) -> Result<Vec<RawTitle>> {
    let bytes = std::fs::read(path).context("reading CSV file")?;
    parse_csv(&decode_text(bytes))
}

/// CSV layout: header row with the catalog column names, extra columns ignored.
pub fn parse_csv(text: &str) -> Result<Vec<RawTitle>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let columns = ColumnMap::from_names(reader.headers().context("reading CSV headers")?.iter())?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(columns.build(|idx| Ok(record.get(idx).map(str::to_string)))?);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "type": "Movie", "title": "Zodiac", "release_year": 2019, "rating": null, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawTitle>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<Vec<RawTitle>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            let names: Vec<&str> = obj.keys().map(String::as_str).collect();
            let columns = ColumnMap::from_names(names.iter().copied())
                .with_context(|| format!("Row {i}"))?;
            columns.build(|idx| Ok(json_text(&obj[names[idx]])))
        })
        .collect()
}

fn json_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

fn load_parquet(path: &Path) -> Result<Vec<RawTitle>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let columns = ColumnMap::from_names(schema.fields().iter().map(|f| f.name().as_str()))?;
        let arrays = batch
            .columns()
            .iter()
            .map(plain_column)
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let raw = columns
                .build(|idx| {
                    cell_text(&arrays[idx], row)
                        .with_context(|| format!("column '{}'", schema.field(idx).name()))
                })
                .with_context(|| format!("Row {}", rows.len()))?;
            rows.push(raw);
        }
    }

    Ok(rows)
}

/// Unpack a dictionary-encoded column into its value type.
fn plain_column(col: &ArrayRef) -> Result<ArrayRef> {
    match col.data_type() {
        DataType::Dictionary(_, values) => cast(col.as_ref(), values.as_ref())
            .with_context(|| format!("decoding dictionary column of {values:?}")),
        _ => Ok(Arc::clone(col)),
    }
}

/// Render one Arrow cell as catalog text. Dates and timestamps become `YYYY-MM-DD`.
fn cell_text(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        DataType::Date32 => match col.as_primitive::<Date32Type>().value_as_date(row) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => return Ok(None),
        },
        DataType::Date64 => match col.as_primitive::<Date64Type>().value_as_date(row) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => return Ok(None),
        },
        DataType::Timestamp(unit, _) => {
            let stamp = match unit {
                TimeUnit::Second => col.as_primitive::<TimestampSecondType>().value_as_datetime(row),
                TimeUnit::Millisecond => {
                    col.as_primitive::<TimestampMillisecondType>().value_as_datetime(row)
                }
                TimeUnit::Microsecond => {
                    col.as_primitive::<TimestampMicrosecondType>().value_as_datetime(row)
                }
                TimeUnit::Nanosecond => {
                    col.as_primitive::<TimestampNanosecondType>().value_as_datetime(row)
                }
            };
            match stamp {
                Some(stamp) => stamp.format("%Y-%m-%d").to_string(),
                None => return Ok(None),
            }
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(Some(text))
}
