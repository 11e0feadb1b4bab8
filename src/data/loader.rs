use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Where the CSV comes from
// ---------------------------------------------------------------------------

/// A CSV location: a remote URL or a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    /// `http://` and `https://` inputs are URLs, anything else is a path.
    pub fn parse(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Knobs for the single HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            use_system_proxy: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Fetch and parse a CSV into a [`Table`].
pub fn load_table(source: &Source, http: &HttpSettings) -> Result<Table> {
    let text = fetch_text(source, http)?;
    let table = parse_csv(&text).with_context(|| format!("parsing CSV from {source}"))?;
    log::info!(
        "Loaded {} rows × {} columns from {source}",
        table.len(),
        table.columns().len()
    );
    Ok(table)
}

/// Read the raw CSV text. Non-2xx responses are errors; there is no retry.
pub fn fetch_text(source: &Source, http: &HttpSettings) -> Result<String> {
    match source {
        Source::Url(url) => {
            log::debug!("GET {url} (timeout {:?})", http.timeout);
            let mut builder = reqwest::blocking::Client::builder()
                .timeout(http.timeout)
                .user_agent(http.user_agent.as_str());
            if !http.use_system_proxy {
                builder = builder.no_proxy();
            }
            let client = builder
                .build()
                .context("building HTTP client")?;
            let response = client
                .get(url)
                .send()
                .with_context(|| format!("requesting {url}"))?
                .error_for_status()
                .with_context(|| format!("fetching {url}"))?;
            response
                .text()
                .with_context(|| format!("reading response body from {url}"))
        }
        Source::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading CSV file {}", path.display())),
    }
}

// ---------------------------------------------------------------------------
// CSV parser
// ---------------------------------------------------------------------------

/// Header row with column names, one record per row. Each cell's type is
/// guessed independently (see [`Value::guess`]).
pub fn parse_csv(text: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(Value::guess).collect());
    }

    Ok(Table::new(headers, rows)?)
}
