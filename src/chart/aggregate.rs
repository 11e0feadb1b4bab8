use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

/// One vertex of the count line: how many rows share the x value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountPoint {
    pub x: f64,
    pub count: u64,
}

/// Group by exact x value and count, ascending by x.
///
/// `None`, NaN and infinite entries are not counted.
pub fn count_by_value<I>(values: I) -> Vec<CountPoint>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut counts: BTreeMap<OrderedFloat<f64>, u64> = BTreeMap::new();
    for v in values.into_iter().flatten().filter(|v| v.is_finite()) {
        // -0.0 and 0.0 are the same group.
        let key = if v == 0.0 { 0.0 } else { v };
        *counts.entry(OrderedFloat(key)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(x, count)| CountPoint { x: x.0, count })
        .collect()
}
