use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::analyzer::LanguageAnalyzer;
use crate::config::Config;
use crate::error::ParseError;
use crate::flatten::Traversal;
use crate::manifest::{load_manifest, manifest_dir};
use crate::normalizer::NormalizationPolicy;
use crate::output::{OutputFormat, create_reporter};
use crate::scheduler::{BatchOptions, BatchSummary, label_sequence, run_batch, summarize};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors returned by CLI command functions. All of them are fatal.
#[derive(Debug)]
pub enum CliError {
    /// An I/O error on a file the command itself owns (exit code 2).
    Io(io::Error),
    /// Invalid config or manifest (exit code 2).
    Setup(crate::error::Error),
    /// A single file given to `labels` failed to read (exit code 2).
    Read { path: PathBuf, source: io::Error },
    /// A single file given to `labels` failed to parse (exit code 2).
    Parse { path: PathBuf, source: ParseError },
}

impl CliError {
    /// Map to an appropriate process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) | Self::Setup(_) | Self::Read { .. } | Self::Parse { .. } => 2,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{e}"),
            Self::Setup(e) => write!(f, "{e}"),
            Self::Read { path, source } => {
                write!(f, "Failed to read {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "Failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::Read { source: e, .. } => Some(e),
            Self::Setup(e) => Some(e),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<crate::error::Error> for CliError {
    fn from(e: crate::error::Error) -> Self {
        Self::Setup(e)
    }
}

/// Result type for CLI operations.
pub type CliResult<T = ()> = Result<T, CliError>;

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

/// Optional CLI overrides applied on top of file-based config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Explicit config file; replaces the lookup next to the manifest.
    pub config: Option<PathBuf>,
    pub workers: Option<usize>,
    pub traversal: Option<Traversal>,
    pub normalization: Option<NormalizationPolicy>,
    pub timeout_ms: Option<u64>,
    pub format: Option<OutputFormat>,
}

/// Apply CLI overrides to a loaded `Config`.
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(workers) = overrides.workers {
        config.workers = workers;
    }
    if let Some(traversal) = overrides.traversal {
        config.traversal = traversal;
    }
    if let Some(normalization) = overrides.normalization {
        config.normalization = normalization;
    }
    if let Some(timeout_ms) = overrides.timeout_ms {
        config.timeout_ms = Some(timeout_ms);
    }
    if let Some(format) = overrides.format {
        config.format = format;
    }
}

/// Resolve the effective config: overrides > config file > defaults, then validate.
pub fn resolve_config(dir: &Path, overrides: &CliOverrides) -> CliResult<Config> {
    let mut config = match &overrides.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(dir)?,
    };
    apply_overrides(&mut config, overrides);
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

/// Score every pair of a manifest.
///
/// Config and manifest problems fail before any pair is scheduled. Scores go
/// to `scores` when given (created once the whole batch is done), otherwise
/// to `writer`.
pub fn cmd_compare(
    analyzer: &dyn LanguageAnalyzer,
    manifest: &Path,
    scores: Option<&Path>,
    overrides: &CliOverrides,
    writer: &mut impl Write,
) -> CliResult<BatchSummary> {
    let base = manifest_dir(manifest);
    let config = resolve_config(&base, overrides)?;
    let pairs = load_manifest(manifest)?;
    tracing::info!(
        manifest = %manifest.display(),
        pairs = pairs.len(),
        workers = config.workers,
        "scoring manifest"
    );

    let start = Instant::now();
    let reports = run_batch(analyzer, &pairs, &BatchOptions::from(&config));
    let summary = summarize(&reports);
    tracing::info!(
        scored = summary.scored,
        failed = summary.failed,
        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "batch complete"
    );

    let reporter = create_reporter(config.format, Some(&base));
    match scores {
        Some(path) => {
            let mut file = io::BufWriter::new(std::fs::File::create(path)?);
            reporter.report(&reports, &mut file)?;
            file.flush()?;
        }
        None => reporter.report(&reports, writer)?,
    }
    Ok(summary)
}

/// Print the label sequence of one file, one label per line.
pub fn cmd_labels(
    analyzer: &dyn LanguageAnalyzer,
    file: &Path,
    traversal: Traversal,
    normalization: NormalizationPolicy,
    writer: &mut impl Write,
) -> CliResult {
    if !analyzer.handles(file) {
        tracing::warn!(
            file = %file.display(),
            language = analyzer.language(),
            "unrecognized file extension, parsing anyway"
        );
    }
    let source = std::fs::read_to_string(file).map_err(|source| CliError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    let sequence =
        label_sequence(analyzer, &source, traversal, normalization).map_err(|source| {
            CliError::Parse {
                path: file.to_path_buf(),
                source,
            }
        })?;
    for label in sequence.labels() {
        writeln!(writer, "{label}")?;
    }
    Ok(())
}
