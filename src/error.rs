use thiserror::Error;

/// Invalid filter criteria. Reported before any record is scanned,
/// so a query either fails with one of these or returns a full result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid {field} range: min {min} is greater than max {max}")]
    InvalidRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("unknown sort key '{0}' (expected release_year_desc or title_asc)")]
    UnknownSortKey(String),

    /// A blank entry in a value list. Deselecting everything is spelled as
    /// an empty list, never as a list holding an empty string.
    #[error("{field} selection contains a blank value")]
    BlankSelectionValue { field: &'static str },

    #[error("malformed {field} range '{input}' (expected MIN:MAX)")]
    MalformedRange { field: &'static str, input: String },
}
