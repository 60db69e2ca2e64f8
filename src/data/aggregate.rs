use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::model::{TitleRecord, MOVIE, TV_SHOW, UNKNOWN};

// ---------------------------------------------------------------------------
// Tally – insertion-ordered counter
// ---------------------------------------------------------------------------

/// Counts keys while remembering the order each key was first seen,
/// so that ranking ties resolve the same way on every run.
#[derive(Debug, Default)]
struct Tally<'a> {
    slots: HashMap<&'a str, usize>,
    counts: Vec<(&'a str, usize)>,
}

impl<'a> Tally<'a> {
    fn add(&mut self, key: &'a str) {
        match self.slots.get(key) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.slots.insert(key, self.counts.len());
                self.counts.push((key, 1));
            }
        }
    }

    /// The `n` largest counts, descending; ties keep first-seen order.
    fn top(mut self, n: usize) -> Vec<RankedCount> {
        // Stable sort: equal counts stay in insertion order.
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
            .into_iter()
            .take(n)
            .map(|(key, count)| RankedCount {
                key: key.to_string(),
                count,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Summary types
// ---------------------------------------------------------------------------

/// One row of a top-N breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub key: String,
    pub count: usize,
}

/// Display-safe subset of a record. Missing values read "unknown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub country: String,
    pub rating: String,
    pub duration: String,
    pub description: String,
}

impl PreviewRow {
    pub fn from_record(rec: &TitleRecord) -> Self {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| UNKNOWN.to_string());
        PreviewRow {
            title: show(&rec.title),
            kind: show(&rec.kind),
            country: show(&rec.country),
            rating: show(&rec.rating),
            duration: show(&rec.duration),
            description: show(&rec.description),
        }
    }
}

/// How many entries each ranked section keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLimits {
    pub top_genres: usize,
    pub top_countries: usize,
    pub preview_rows: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        SummaryLimits {
            top_genres: 10,
            top_countries: 10,
            preview_rows: 10,
        }
    }
}

/// Everything the dashboard shows about one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_count: usize,
    pub movie_count: usize,
    pub tv_show_count: usize,
    pub count_by_type: BTreeMap<String, usize>,
    /// Keyed by year added, ascending. Unknown years are left out.
    pub count_by_year: BTreeMap<i32, usize>,
    pub top_genres: Vec<RankedCount>,
    pub top_countries: Vec<RankedCount>,
    pub preview: Vec<PreviewRow>,
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

pub fn count_by_type<'a, I>(view: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a TitleRecord>,
{
    let mut counts = BTreeMap::new();
    for kind in view.into_iter().filter_map(|rec| rec.kind.as_deref()) {
        *counts.entry(kind.to_string()).or_insert(0) += 1;
    }
    counts
}

pub fn count_by_year<'a, I>(view: I) -> BTreeMap<i32, usize>
where
    I: IntoIterator<Item = &'a TitleRecord>,
{
    let mut counts = BTreeMap::new();
    for year in view.into_iter().filter_map(TitleRecord::year_added) {
        *counts.entry(year).or_insert(0) += 1;
    }
    counts
}

/// Each record counts once toward every genre it lists.
pub fn top_genres<'a, I>(view: I, n: usize) -> Vec<RankedCount>
where
    I: IntoIterator<Item = &'a TitleRecord>,
{
    let mut tally = Tally::default();
    for rec in view {
        for genre in rec.genres() {
            tally.add(genre);
        }
    }
    tally.top(n)
}

/// The whole `country` text is the key: "United States, India" is its own
/// bucket and does not add to "United States" or "India".
pub fn top_countries<'a, I>(view: I, n: usize) -> Vec<RankedCount>
where
    I: IntoIterator<Item = &'a TitleRecord>,
{
    let mut tally = Tally::default();
    for country in view.into_iter().filter_map(|rec| rec.country.as_deref()) {
        tally.add(country);
    }
    tally.top(n)
}

pub fn preview<'a, I>(view: I, n: usize) -> Vec<PreviewRow>
where
    I: IntoIterator<Item = &'a TitleRecord>,
{
    view.into_iter().take(n).map(PreviewRow::from_record).collect()
}

/// Compute every summary over an ordered view.
pub fn summarize(view: &[&TitleRecord], limits: &SummaryLimits) -> Summary {
    let by_type = count_by_type(view.iter().copied());
    let movie_count = by_type.get(MOVIE).copied().unwrap_or(0);
    let tv_show_count = by_type.get(TV_SHOW).copied().unwrap_or(0);

    Summary {
        total_count: view.len(),
        movie_count,
        tv_show_count,
        count_by_type: by_type,
        count_by_year: count_by_year(view.iter().copied()),
        top_genres: top_genres(view.iter().copied(), limits.top_genres),
        top_countries: top_countries(view.iter().copied(), limits.top_countries),
        preview: preview(view.iter().copied(), limits.preview_rows),
    }
}
