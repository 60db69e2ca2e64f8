use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;

/// `type` value of feature films; the only type with a minute count.
pub const MOVIE: &str = "Movie";
pub const TV_SHOW: &str = "TV Show";

/// Rendered in place of a missing value in previews.
pub const UNKNOWN: &str = "unknown";

/// Default year-added window offered by the dashboard.
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (2016, 2021);
/// Default movie duration window (minutes) offered by the dashboard.
pub const DEFAULT_DURATION_RANGE: (u32, u32) = (90, 150);

const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S"];

static LEADING_MINUTES: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)").ok());

// ---------------------------------------------------------------------------
// RawTitle – one row as read from a file, all cells still text
// ---------------------------------------------------------------------------

/// Source columns of one catalog row before normalisation.
/// `None` means the cell was empty or absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTitle {
    pub show_id: Option<String>,
    pub kind: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub date_added: Option<String>,
    pub release_year: Option<String>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub listed_in: Option<String>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// TitleRecord – one normalised catalog entry
// ---------------------------------------------------------------------------

/// A single catalog entry (movie or show).
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRecord {
    /// Row position within the load; stable for the lifetime of the store.
    pub id: usize,
    pub show_id: Option<String>,
    pub title: Option<String>,
    /// Content type, e.g. "Movie" or "TV Show". Open set.
    pub kind: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    /// Free text, possibly several comma-separated countries.
    pub country: Option<String>,
    /// `date_added` exactly as it appeared in the source.
    pub date_added_raw: Option<String>,
    /// Parsed `date_added`; `None` when missing or unparseable.
    pub date_added: Option<NaiveDate>,
    /// `None` when missing or unparseable.
    pub release_year: Option<i32>,
    pub rating: Option<String>,
    /// "90 min" for movies, "3 Seasons" for shows.
    pub duration: Option<String>,
    /// Comma-separated genre list.
    pub listed_in: Option<String>,
    pub description: Option<String>,
}

impl TitleRecord {
    /// Normalise a raw row. Never rejects it: an unparseable year or date
    /// degrades to `None` with a warning.
    pub fn from_raw(id: usize, raw: RawTitle) -> Self {
        let release_year = raw.release_year.as_deref().and_then(parse_release_year);
        if release_year.is_none() {
            if let Some(text) = &raw.release_year {
                log::warn!("Row {id}: unparseable release_year '{text}', treating as unknown");
            }
        }

        let date_added = raw.date_added.as_deref().and_then(parse_date_added);
        if date_added.is_none() {
            if let Some(text) = &raw.date_added {
                log::warn!("Row {id}: unparseable date_added '{text}', treating as unknown");
            }
        }

        TitleRecord {
            id,
            show_id: raw.show_id,
            title: raw.title,
            kind: raw.kind,
            director: raw.director,
            cast: raw.cast,
            country: raw.country,
            date_added_raw: raw.date_added,
            date_added,
            release_year,
            rating: raw.rating,
            duration: raw.duration,
            listed_in: raw.listed_in,
            description: raw.description,
        }
    }

    /// Calendar year the title was added, if the date is known.
    pub fn year_added(&self) -> Option<i32> {
        self.date_added.map(|d| d.year())
    }

    pub fn is_movie(&self) -> bool {
        self.kind.as_deref() == Some(MOVIE)
    }

    /// Runtime in minutes. Only movies have one; shows count seasons.
    pub fn duration_minutes(&self) -> Option<u32> {
        if !self.is_movie() {
            return None;
        }
        self.duration.as_deref().and_then(leading_integer)
    }

    /// Individual genres from `listed_in`, trimmed, blanks dropped.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.listed_in
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }
}

/// Leading integer of a free-text field, e.g. `"90 min"` → `90`.
/// Returns `None` rather than failing on anything else.
pub fn leading_integer(text: &str) -> Option<u32> {
    LEADING_MINUTES
        .as_ref()?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse the catalog's `date_added` text. Accepts "September 25, 2021"
/// as well as ISO dates and timestamps.
pub fn parse_date_added(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_release_year(text: &str) -> Option<i32> {
    let text = text.trim();
    // Parquet/JSON writers sometimes hand back floats ("2019.0").
    text.parse::<i32>().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && v.abs() < i32::MAX as f64)
            .map(|v| v as i32)
    })
}

// ---------------------------------------------------------------------------
// Facets – the option domains a filter UI offers
// ---------------------------------------------------------------------------

/// Option domains derived from the full catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Facets {
    /// Distinct non-null `type` values in first-seen order.
    pub types: Vec<String>,
    /// Distinct non-null ratings in first-seen order.
    pub ratings: Vec<String>,
    pub year_added_bounds: Option<(i32, i32)>,
    pub movie_minutes_bounds: Option<(u32, u32)>,
}

fn widen<T: Ord + Copy>(bounds: Option<(T, T)>, value: T) -> Option<(T, T)> {
    Some(match bounds {
        Some((lo, hi)) => (lo.min(value), hi.max(value)),
        None => (value, value),
    })
}

// ---------------------------------------------------------------------------
// TitleStore – the complete loaded catalog
// ---------------------------------------------------------------------------

/// The full loaded catalog. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct TitleStore {
    records: Vec<TitleRecord>,
    facets: Facets,
}

impl TitleStore {
    /// Normalise raw rows and build facet indices.
    pub fn from_raw(rows: Vec<RawTitle>) -> Self {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(id, raw)| TitleRecord::from_raw(id, raw))
            .collect();
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<TitleRecord>) -> Self {
        let mut facets = Facets::default();
        let mut seen_types = BTreeSet::new();
        let mut seen_ratings = BTreeSet::new();

        for rec in &records {
            if let Some(kind) = &rec.kind {
                if seen_types.insert(kind.as_str()) {
                    facets.types.push(kind.clone());
                }
            }
            if let Some(rating) = &rec.rating {
                if seen_ratings.insert(rating.as_str()) {
                    facets.ratings.push(rating.clone());
                }
            }
            if let Some(year) = rec.year_added() {
                facets.year_added_bounds = widen(facets.year_added_bounds, year);
            }
            if let Some(minutes) = rec.duration_minutes() {
                facets.movie_minutes_bounds = widen(facets.movie_minutes_bounds, minutes);
            }
        }

        TitleStore { records, facets }
    }

    pub fn records(&self) -> &[TitleRecord] {
        &self.records
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    /// Number of titles.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
