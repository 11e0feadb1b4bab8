mod chart;
mod config;
mod data;
mod pipeline;

use std::path::PathBuf;

use anyhow::{bail, Result};
use config::Config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args_os().skip(1);
    let config_path = args.next().map(PathBuf::from);
    if args.next().is_some() {
        bail!("usage: diamond-sizes [CONFIG.json]");
    }

    let config = Config::load(config_path.as_deref())?;
    log::debug!("{config:?}");

    let summary = pipeline::run(&config)?;
    log::info!(
        "Done: {} of {} rows plotted as {} points in {}",
        summary.kept_rows,
        summary.total_rows,
        summary.distinct_values,
        summary.output.display()
    );
    Ok(())
}
