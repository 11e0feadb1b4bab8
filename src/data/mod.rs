/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///   URL / .csv file
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  fetch + parse CSV → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table   │  header, Vec<Vec<Value>>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  column <= threshold → subset Table
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
