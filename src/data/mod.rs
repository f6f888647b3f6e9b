/// Data layer: records, loading, caching, filtering and export.
///
/// Architecture:
/// ```text
///  file path / upload (.csv)
///        │
///        ▼
///   ┌──────────┐     ┌─────────┐
///   │  loader   │ ◄── │  cache  │  SourceKey → normalized table
///   └──────────┘     └─────────┘
///        │  coerce metrics, optional left join
///        ▼
///   ┌─────────────┐
///   │ DeputyTable │  Vec<DeputyRecord>, state / party domains
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  predicates → row indices → top-N
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  selected rows → CSV bytes
///   └──────────┘
/// ```

pub mod cache;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod source;
