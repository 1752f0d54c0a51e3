pub mod json;
pub mod text;

use std::borrow::Cow;
use std::io;
use std::path::Path;

use crate::scheduler::PairReport;

/// Output format for score files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// One score per line, `ERROR` for failed pairs.
    #[default]
    Text,
    /// A JSON array with per-pair detail.
    Json,
}

/// Compute a display path relative to an optional base, falling back to the full path.
#[must_use]
pub fn display_path<'a>(base: Option<&Path>, path: &'a Path) -> Cow<'a, str> {
    if let Some(base) = base
        && let Ok(rel) = path.strip_prefix(base)
    {
        return rel.to_string_lossy();
    }
    path.to_string_lossy()
}

/// Trait for writing batch results.
///
/// Implementations must emit exactly one entry per report, in the given order.
pub trait Reporter {
    fn report(&self, reports: &[PairReport], writer: &mut dyn io::Write) -> io::Result<()>;
}

/// Create a reporter for the given output format.
#[must_use]
pub fn create_reporter(format: OutputFormat, base: Option<&Path>) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Text => Box::new(text::TextReporter::new()),
        OutputFormat::Json => Box::new(json::JsonReporter::new(base.map(Path::to_path_buf))),
    }
}
