use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

use super::model::{Facets, TitleRecord, TitleStore, DEFAULT_YEAR_RANGE};

// ---------------------------------------------------------------------------
// Selection – tri-state value filter
// ---------------------------------------------------------------------------

/// Which values of a categorical column are allowed.
///
/// * `Any` → the filter is not specified, every record passes
/// * `Only(set)` with an empty set → the user deselected everything, nothing passes
/// * `Only(set)` → the record's value must be in the set; a null value never is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Any,
    Only(BTreeSet<String>),
}

impl Selection {
    pub fn none() -> Self {
        Selection::Only(BTreeSet::new())
    }

    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Only(values.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, value: Option<&str>) -> bool {
        match self {
            Selection::Any => true,
            Selection::Only(set) => value.is_some_and(|v| set.contains(v)),
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), QueryError> {
        match self {
            Selection::Only(set) if set.iter().any(|v| v.trim().is_empty()) => {
                Err(QueryError::BlankSelectionValue { field })
            }
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Inclusive ranges
// ---------------------------------------------------------------------------

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy + Into<i64>> Bounds<T> {
    pub fn new(min: T, max: T) -> Self {
        Bounds { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    fn validate(&self, field: &'static str) -> Result<(), QueryError> {
        if self.min > self.max {
            return Err(QueryError::InvalidRange {
                field,
                min: self.min.into(),
                max: self.max.into(),
            });
        }
        Ok(())
    }
}

impl<T: FromStr> Bounds<T> {
    /// Parse `"MIN:MAX"`. Ordering is checked later, with the rest of the criteria.
    pub fn parse(field: &'static str, input: &str) -> Result<Self, QueryError> {
        let malformed = || QueryError::MalformedRange {
            field,
            input: input.to_string(),
        };
        let (lo, hi) = input.split_once(':').ok_or_else(malformed)?;
        Ok(Bounds {
            min: lo.trim().parse().map_err(|_| malformed())?,
            max: hi.trim().parse().map_err(|_| malformed())?,
        })
    }
}

// ---------------------------------------------------------------------------
// Sort order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest release first, unknown years last.
    #[default]
    ReleaseYearDesc,
    /// Byte-wise (case-sensitive) title order, missing titles last.
    TitleAsc,
}

impl SortKey {
    fn compare(self, a: &TitleRecord, b: &TitleRecord) -> Ordering {
        match self {
            SortKey::ReleaseYearDesc => match (a.release_year, b.release_year) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::TitleAsc => match (&a.title, &b.title) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "release_year_desc" => Ok(SortKey::ReleaseYearDesc),
            "title_asc" => Ok(SortKey::TitleAsc),
            other => Err(QueryError::UnknownSortKey(other.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::ReleaseYearDesc => write!(f, "release_year_desc"),
            SortKey::TitleAsc => write!(f, "title_asc"),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria
// ---------------------------------------------------------------------------

/// Constraints applied to produce a view. `Default` filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub types: Selection,
    pub year_range: Option<Bounds<i32>>,
    pub ratings: Selection,
    /// Case-insensitive substring of `title`. Empty means no constraint.
    pub title_query: Option<String>,
    /// Movie runtime in minutes. Excludes every non-movie when set.
    pub duration_range: Option<Bounds<u32>>,
    pub sort: SortKey,
}

impl FilterCriteria {
    /// The dashboard's opening state: every type and every known rating
    /// selected, year added limited to the default window.
    pub fn dashboard(facets: &Facets) -> Self {
        let (min, max) = DEFAULT_YEAR_RANGE;
        FilterCriteria {
            types: Selection::only(facets.types.iter().cloned()),
            ratings: Selection::only(facets.ratings.iter().cloned()),
            year_range: Some(Bounds::new(min, max)),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        self.types.validate("type")?;
        self.ratings.validate("rating")?;
        if let Some(years) = &self.year_range {
            years.validate("year_added")?;
        }
        if let Some(minutes) = &self.duration_range {
            minutes.validate("duration")?;
        }
        Ok(())
    }

    /// Whether one record satisfies every active predicate.
    fn matches(&self, rec: &TitleRecord, needle: Option<&str>) -> bool {
        if !self.types.allows(rec.kind.as_deref()) {
            return false;
        }
        if !self.ratings.allows(rec.rating.as_deref()) {
            return false;
        }
        if let Some(years) = &self.year_range {
            if !rec.year_added().is_some_and(|y| years.contains(y)) {
                return false;
            }
        }
        if let Some(needle) = needle {
            if !title_contains(rec.title.as_deref(), needle) {
                return false;
            }
        }
        if let Some(minutes) = &self.duration_range {
            if !rec.duration_minutes().is_some_and(|m| minutes.contains(m)) {
                return false;
            }
        }
        true
    }

    /// Lower-cased title query, or `None` when the search box is empty.
    fn needle(&self) -> Option<String> {
        self.title_query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

/// `needle` must already be lower-cased. A missing title never matches.
fn title_contains(title: Option<&str>, needle: &str) -> bool {
    title.is_some_and(|t| t.to_lowercase().contains(needle))
}

/// Return the store indices of records passing `criteria`, in the requested
/// order. Equal sort keys keep their load order.
pub fn filtered_indices(store: &TitleStore, criteria: &FilterCriteria) -> Result<Vec<usize>, QueryError> {
    criteria.validate()?;
    let needle = criteria.needle();

    let records = store.records();
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec, needle.as_deref()))
        .map(|(i, _)| i)
        .collect();

    // `sort_by` is stable.
    indices.sort_by(|&a, &b| criteria.sort.compare(&records[a], &records[b]));
    Ok(indices)
}
