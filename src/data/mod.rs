/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TitleStore
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ TitleStore │  Vec<TitleRecord>, facets
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply predicates + sort → ordered indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  counts, top-N, preview      export → .csv
///   └───────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod query;

#[cfg(test)]
pub(crate) mod fixtures;
