use super::model::{DataError, Table};

// ---------------------------------------------------------------------------
// Filter predicate: numeric column at or below a ceiling
// ---------------------------------------------------------------------------

/// Keep rows whose `column` value is `<= max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub column: String,
    pub max: f64,
}

impl Threshold {
    pub fn new(column: impl Into<String>, max: f64) -> Self {
        Self {
            column: column.into(),
            max,
        }
    }
}

/// Return indices of rows that pass the threshold, ascending.
///
/// A row passes when its value is numeric and `<= max`. Null cells never
/// pass, the same way a NaN comparison is false.
pub fn filtered_indices(table: &Table, threshold: &Threshold) -> Result<Vec<usize>, DataError> {
    Ok(table
        .numeric_column(&threshold.column)?
        .into_iter()
        .enumerate()
        .filter(|(_, v)| matches!(v, Some(v) if *v <= threshold.max))
        .map(|(i, _)| i)
        .collect())
}

/// The subset of `table` passing `threshold`, in source order.
pub fn apply(table: &Table, threshold: &Threshold) -> Result<Table, DataError> {
    let indices = filtered_indices(table, threshold)?;
    log::debug!(
        "{} <= {} keeps {} of {} rows",
        threshold.column,
        threshold.max,
        indices.len(),
        table.len()
    );
    table.select(&indices)
}
