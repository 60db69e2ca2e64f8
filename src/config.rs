use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::aggregate::SummaryLimits;

/// Tunables read from an optional JSON file. Missing keys keep their defaults.
///
/// ```json
/// { "top_genres": 5, "preview_rows": 20 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerConfig {
    pub top_genres: usize,
    pub top_countries: usize,
    pub preview_rows: usize,
    /// Refuse catalogs larger than this; every query scans the whole store.
    pub max_records: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        let limits = SummaryLimits::default();
        ExplorerConfig {
            top_genres: limits.top_genres,
            top_countries: limits.top_countries,
            preview_rows: limits.preview_rows,
            max_records: 1_000_000,
        }
    }
}

impl ExplorerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn limits(&self) -> SummaryLimits {
        SummaryLimits {
            top_genres: self.top_genres,
            top_countries: self.top_countries,
            preview_rows: self.preview_rows,
        }
    }
}
