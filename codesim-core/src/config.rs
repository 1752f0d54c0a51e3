use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::flatten::Traversal;
use crate::normalizer::NormalizationPolicy;
use crate::output::OutputFormat;

/// Name of the config file looked up next to the manifest.
pub const CONFIG_FILE_NAME: &str = "codesim.toml";

/// Default size of the worker pool.
pub const DEFAULT_WORKERS: usize = 4;

/// Configuration for a scoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of parallel workers.
    pub workers: usize,
    /// Order in which trees are flattened.
    pub traversal: Traversal,
    /// Treatment of terminal tokens.
    pub normalization: NormalizationPolicy,
    /// Per-pair time limit in milliseconds. `None` disables the limit.
    pub timeout_ms: Option<u64>,
    /// Score file format.
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            traversal: Traversal::default(),
            normalization: NormalizationPolicy::default(),
            timeout_ms: None,
            format: OutputFormat::default(),
        }
    }
}

/// Config as stored in codesim.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    workers: Option<usize>,
    traversal: Option<Traversal>,
    normalization: Option<NormalizationPolicy>,
    timeout_ms: Option<u64>,
    format: Option<OutputFormat>,
}

impl Config {
    /// Load config with the following precedence:
    /// 1. CLI overrides (applied by the caller after this method)
    /// 2. codesim.toml in `dir`
    /// 3. Defaults
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from an explicit file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| config_error(path, &e))?;
        let file_config: FileConfig = toml::from_str(&content).map_err(|e| config_error(path, &e))?;
        let mut config = Self::default();
        config.apply_file_config(&file_config);
        Ok(config)
    }

    fn apply_file_config(&mut self, fc: &FileConfig) {
        if let Some(v) = fc.workers {
            self.workers = v;
        }
        if let Some(v) = fc.traversal {
            self.traversal = v;
        }
        if let Some(v) = fc.normalization {
            self.normalization = v;
        }
        if let Some(v) = fc.timeout_ms {
            self.timeout_ms = Some(v);
        }
        if let Some(v) = fc.format {
            self.format = v;
        }
    }

    /// Reject settings no run can satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidWorkers);
        }
        Ok(())
    }

    /// The per-pair time limit, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

fn config_error(path: &Path, err: &dyn std::fmt::Display) -> Error {
    Error::ConfigParse {
        path: PathBuf::from(path),
        message: err.to_string(),
    }
}
