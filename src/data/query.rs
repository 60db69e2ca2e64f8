use std::path::Path;

use anyhow::Result;

use crate::error::QueryError;

use super::aggregate::{summarize, Summary, SummaryLimits};
use super::export;
use super::filter::{filtered_indices, FilterCriteria};
use super::model::{TitleRecord, TitleStore};

// ---------------------------------------------------------------------------
// View – ordered subsequence of the store
// ---------------------------------------------------------------------------

/// Records passing a set of criteria, in the requested order.
/// Borrows the store; holds only positions into it.
#[derive(Debug, Clone)]
pub struct View<'a> {
    store: &'a TitleStore,
    indices: Vec<usize>,
}

impl<'a> View<'a> {
    /// Store positions of the records in view order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TitleRecord> + '_ {
        let records = self.store.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn records(&self) -> Vec<&'a TitleRecord> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn to_csv(&self) -> Result<String> {
        export::to_csv_string(self.iter())
    }

    pub fn export(&self, path: &Path) -> Result<()> {
        export::export_file(path, self.iter())
    }
}

// ---------------------------------------------------------------------------
// Query entry point
// ---------------------------------------------------------------------------

/// A view together with its summaries.
#[derive(Debug, Clone)]
pub struct QueryOutcome<'a> {
    pub view: View<'a>,
    pub summary: Summary,
}

/// Filter and sort `store`, then summarise the result.
///
/// Invalid criteria fail before any record is touched; there is no partial
/// result. The store is never modified, so repeating a query gives the same
/// outcome.
pub fn run_query<'a>(
    store: &'a TitleStore,
    criteria: &FilterCriteria,
    limits: &SummaryLimits,
) -> Result<QueryOutcome<'a>, QueryError> {
    let indices = filtered_indices(store, criteria)?;
    let view = View { store, indices };
    let summary = summarize(&view.records(), limits);

    log::debug!(
        "query matched {} of {} titles (sort: {})",
        view.len(),
        store.len(),
        criteria.sort
    );

    Ok(QueryOutcome { view, summary })
}
