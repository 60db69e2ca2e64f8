use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::TitleRecord;

/// Source column order. Also the export header.
pub const EXPORT_COLUMNS: [&str; 12] = [
    "show_id",
    "type",
    "title",
    "director",
    "cast",
    "country",
    "date_added",
    "release_year",
    "rating",
    "duration",
    "listed_in",
    "description",
];

/// One exported line. Field order is the catalog's source column order,
/// so an export can be loaded back as a catalog.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    show_id: Option<&'a str>,
    #[serde(rename = "type")]
    kind: Option<&'a str>,
    title: Option<&'a str>,
    director: Option<&'a str>,
    cast: Option<&'a str>,
    country: Option<&'a str>,
    date_added: Option<&'a str>,
    release_year: Option<i32>,
    rating: Option<&'a str>,
    duration: Option<&'a str>,
    listed_in: Option<&'a str>,
    description: Option<&'a str>,
}

impl<'a> From<&'a TitleRecord> for ExportRow<'a> {
    fn from(rec: &'a TitleRecord) -> Self {
        ExportRow {
            show_id: rec.show_id.as_deref(),
            kind: rec.kind.as_deref(),
            title: rec.title.as_deref(),
            director: rec.director.as_deref(),
            cast: rec.cast.as_deref(),
            country: rec.country.as_deref(),
            // Verbatim source text, not the parsed date.
            date_added: rec.date_added_raw.as_deref(),
            release_year: rec.release_year,
            rating: rec.rating.as_deref(),
            duration: rec.duration.as_deref(),
            listed_in: rec.listed_in.as_deref(),
            description: rec.description.as_deref(),
        }
    }
}

/// Write a view as CSV: header row, then one line per record in view order.
/// Missing values become empty cells. The header is written even for an
/// empty view.
pub fn write_csv<'a, W, I>(out: W, view: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a TitleRecord>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer
        .write_record(EXPORT_COLUMNS)
        .context("writing CSV header")?;
    for rec in view {
        writer
            .serialize(ExportRow::from(rec))
            .with_context(|| format!("writing record {}", rec.id))?;
    }
    writer.flush().context("flushing CSV export")?;
    Ok(())
}

/// CSV export as an in-memory string, for download handlers.
pub fn to_csv_string<'a, I>(view: I) -> Result<String>
where
    I: IntoIterator<Item = &'a TitleRecord>,
{
    let mut buf = Vec::new();
    write_csv(&mut buf, view)?;
    String::from_utf8(buf).context("CSV export is not valid UTF-8")
}

pub fn export_file<'a, I>(path: &Path, view: I) -> Result<()>
where
    I: IntoIterator<Item = &'a TitleRecord>,
{
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(std::io::BufWriter::new(file), view)
}
