/// Chart layer: aggregation, the declarative description, and PNG export.
///
/// ```text
///   filtered Table ──► aggregate ──► Vec<CountPoint>
///                                        │
///                 ChartSpec ─────────────┤
///                                        ▼
///                           render (plotters → image PNG)
/// ```

pub mod aggregate;
pub mod fonts;
pub mod render;
pub mod spec;
