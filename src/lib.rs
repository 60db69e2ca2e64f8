//! Filter and aggregate a catalog of movie and TV titles.

pub mod config;
pub mod data;
pub mod error;
pub mod state;

pub use config::ExplorerConfig;
pub use data::aggregate::{RankedCount, Summary, SummaryLimits};
pub use data::filter::{Bounds, FilterCriteria, Selection, SortKey};
pub use data::model::{TitleRecord, TitleStore};
pub use data::query::{run_query, QueryOutcome, View};
pub use error::QueryError;
pub use state::CatalogSource;
