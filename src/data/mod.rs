/// Data layer: core types, loading, and the filter/aggregate pipeline.
///
/// Architecture:
/// ```text
///  hiv.csv / hiv.parquet        indicators.json
///        │                            │
///        ▼                            ▼
///   ┌──────────┐               ┌──────────┐
///   │  loader   │  → Dataset   │ catalog   │  descriptions, fixed lookups
///   └──────────┘               └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  steps    │   │  filter   │  Selection → chart rows, map rows
///   └──────────┘   └──────────┘
///                       │
///                       ▼
///                 ┌───────────┐
///                 │ aggregate  │  per-ISO3 map values, chart series
///                 └───────────┘
///                       │
///                       ▼
///                 ┌──────────┐
///                 │  title    │  view headings
///                 └──────────┘
/// ```
pub mod aggregate;
pub mod catalog;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod steps;
pub mod summary;
pub mod title;
