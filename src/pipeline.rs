use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::chart::aggregate::{count_by_value, CountPoint};
use crate::chart::spec::ChartSpec;
use crate::chart::{fonts, render};
use crate::config::Config;
use crate::data::filter::{self, Threshold};
use crate::data::loader::{self, Source};
use crate::data::model::Table;

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub distinct_values: usize,
    pub output: PathBuf,
}

/// Fetch, filter, aggregate, export. Any failure ends the run.
pub fn run(config: &Config) -> Result<Summary> {
    let source = Source::parse(&config.source);
    let table = loader::load_table(&source, &config.http())?;
    let labels = fonts::install(config.font.as_deref());
    export(config, &table, labels)
}

/// Everything after acquisition, against an already loaded table.
pub fn export(config: &Config, table: &Table, labels: bool) -> Result<Summary> {
    let threshold = Threshold::new(config.column.as_str(), config.threshold);
    let kept = filter::apply(table, &threshold)
        .with_context(|| format!("filtering on {} <= {}", threshold.column, threshold.max))?;
    log::info!(
        "Kept {} of {} rows with {} <= {}",
        kept.len(),
        table.len(),
        threshold.column,
        threshold.max
    );

    let points = count_points(&kept, &config.column)?;
    let spec = ChartSpec::new(config.column.as_str(), config.mark, config.width, config.height)
        .with_title(config.title.clone());

    render::render_png(&spec, &points, &config.output, labels)
        .with_context(|| format!("writing chart to {}", config.output.display()))?;
    log::info!(
        "Wrote {} ({} distinct {} values)",
        config.output.display(),
        points.len(),
        config.column
    );

    if let Some(path) = &config.spec_output {
        let doc = serde_json::to_string_pretty(&spec.to_document(&points))
            .context("serializing chart description")?;
        std::fs::write(path, doc)
            .with_context(|| format!("writing chart description to {}", path.display()))?;
        log::info!("Wrote chart description to {}", path.display());
    }

    Ok(Summary {
        total_rows: table.len(),
        kept_rows: kept.len(),
        distinct_values: points.len(),
        output: config.output.clone(),
    })
}

fn count_points(table: &Table, column: &str) -> Result<Vec<CountPoint>> {
    let values = table
        .numeric_column(column)
        .with_context(|| format!("reading '{column}' for the x axis"))?;
    Ok(count_by_value(values))
}
