use std::io;
use std::path::PathBuf;

use crate::output::{Reporter, display_path};
use crate::scheduler::PairReport;

pub struct JsonReporter {
    /// Base path for displaying relative paths.
    pub base_path: Option<PathBuf>,
}

impl JsonReporter {
    #[must_use]
    pub fn new(base_path: Option<PathBuf>) -> Self {
        Self { base_path }
    }
}

#[derive(serde::Serialize)]
struct JsonPair {
    left: String,
    right: String,
    #[serde(flatten)]
    outcome: JsonOutcome,
}

#[derive(serde::Serialize)]
#[serde(untagged)]
enum JsonOutcome {
    Scored {
        score: f64,
        distance: usize,
        left_len: usize,
        right_len: usize,
    },
    Failed {
        error: String,
        kind: &'static str,
    },
}

impl Reporter for JsonReporter {
    fn report(&self, reports: &[PairReport], writer: &mut dyn io::Write) -> io::Result<()> {
        let base = self.base_path.as_deref();
        let pairs: Vec<JsonPair> = reports
            .iter()
            .map(|r| JsonPair {
                left: display_path(base, &r.pair.left).into_owned(),
                right: display_path(base, &r.pair.right).into_owned(),
                outcome: match &r.result {
                    Ok(cmp) => JsonOutcome::Scored {
                        score: cmp.score.rounded(),
                        distance: cmp.distance,
                        left_len: cmp.left_len,
                        right_len: cmp.right_len,
                    },
                    Err(e) => JsonOutcome::Failed {
                        error: e.to_string(),
                        kind: e.kind(),
                    },
                },
            })
            .collect();
        let json = serde_json::to_string_pretty(&pairs).map_err(io::Error::other)?;
        writeln!(writer, "{json}")
    }
}
