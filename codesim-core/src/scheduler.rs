use std::path::Path;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded};

use crate::analyzer::LanguageAnalyzer;
use crate::config::Config;
use crate::distance::{Comparison, compare_sequences, compare_sequences_until};
use crate::error::{CompareError, ParseError};
use crate::flatten::{LabelSequence, Traversal, flatten};
use crate::manifest::ComparisonPair;
use crate::normalizer::{NormalizationPolicy, normalize};

/// Settings shared by every worker of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    pub workers: usize,
    pub traversal: Traversal,
    pub normalization: NormalizationPolicy,
    pub timeout: Option<Duration>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions::from(&Config::default())
    }
}

impl From<&Config> for BatchOptions {
    fn from(config: &Config) -> Self {
        Self {
            workers: config.workers,
            traversal: config.traversal,
            normalization: config.normalization,
            timeout: config.timeout(),
        }
    }
}

/// Outcome for one input pair.
#[derive(Debug)]
pub struct PairReport {
    pub pair: ComparisonPair,
    pub result: Result<Comparison, CompareError>,
}

/// Counts of scored and failed pairs in a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub scored: usize,
    pub failed: usize,
}

#[must_use]
pub fn summarize(reports: &[PairReport]) -> BatchSummary {
    let failed = reports.iter().filter(|r| r.result.is_err()).count();
    BatchSummary {
        scored: reports.len() - failed,
        failed,
    }
}

/// Parse, normalize and flatten one source text.
pub fn label_sequence(
    analyzer: &dyn LanguageAnalyzer,
    source: &str,
    traversal: Traversal,
    normalization: NormalizationPolicy,
) -> Result<LabelSequence, ParseError> {
    let tree = analyzer.parse(source)?;
    Ok(flatten(&normalize(tree, normalization), traversal))
}

/// Compare two in-memory sources. No time limit applies.
pub fn compare_sources(
    analyzer: &dyn LanguageAnalyzer,
    left: &str,
    right: &str,
    options: &BatchOptions,
) -> Result<Comparison, ParseError> {
    let left = label_sequence(analyzer, left, options.traversal, options.normalization)?;
    let right = label_sequence(analyzer, right, options.traversal, options.normalization)?;
    Ok(compare_sequences(&left, &right))
}

/// Score every pair on a fixed pool of `options.workers` threads.
///
/// Work items go through a bounded channel; each worker sends `(index, result)`
/// back and the coordinator reorders by index, so the output matches `pairs`
/// one-to-one regardless of completion order. Failures stay in their pair's report.
pub fn run_batch(
    analyzer: &dyn LanguageAnalyzer,
    pairs: &[ComparisonPair],
    options: &BatchOptions,
) -> Vec<PairReport> {
    let workers = options.workers.clamp(1, pairs.len().max(1));
    tracing::debug!(
        pairs = pairs.len(),
        workers,
        language = analyzer.language(),
        "starting batch"
    );

    let (work_tx, work_rx) = bounded::<(usize, &ComparisonPair)>(workers * 2);
    let (result_tx, result_rx) = unbounded();

    let mut results: Vec<(usize, Result<Comparison, CompareError>)> =
        std::thread::scope(|scope| {
            for worker in 0..workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for (index, pair) in work_rx {
                        let result = compare_pair(analyzer, pair, options);
                        tracing::debug!(worker, index, ok = result.is_ok(), "pair done");
                        if result_tx.send((index, result)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(work_rx);
            drop(result_tx);

            for item in pairs.iter().enumerate() {
                if work_tx.send(item).is_err() {
                    break;
                }
            }
            drop(work_tx);

            result_rx.iter().collect()
        });

    results.sort_unstable_by_key(|(index, _)| *index);
    results
        .into_iter()
        .map(|(index, result)| {
            if let Err(e) = &result {
                tracing::warn!(index, kind = e.kind(), "{e}");
            }
            PairReport {
                pair: pairs[index].clone(),
                result,
            }
        })
        .collect()
}

/// Run the full pipeline for one pair, honoring the optional time limit.
fn compare_pair(
    analyzer: &dyn LanguageAnalyzer,
    pair: &ComparisonPair,
    options: &BatchOptions,
) -> Result<Comparison, CompareError> {
    let deadline = options.timeout.map(|limit| Instant::now() + limit);
    let timeout = || CompareError::Timeout {
        limit_ms: options
            .timeout
            .map_or(0, |t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
    };
    let expired = || deadline.is_some_and(|d| Instant::now() >= d);

    let left = sequence_for(analyzer, &pair.left, options)?;
    if expired() {
        return Err(timeout());
    }
    let right = sequence_for(analyzer, &pair.right, options)?;
    if expired() {
        return Err(timeout());
    }
    compare_sequences_until(&left, &right, deadline).map_err(|_| timeout())
}

fn sequence_for(
    analyzer: &dyn LanguageAnalyzer,
    path: &Path,
    options: &BatchOptions,
) -> Result<LabelSequence, CompareError> {
    let source = std::fs::read_to_string(path).map_err(|source| CompareError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    label_sequence(analyzer, &source, options.traversal, options.normalization).map_err(
        |source| CompareError::Parse {
            path: path.to_path_buf(),
            source,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SyntaxNode;
    use std::fs;
    use tempfile::TempDir;

    /// Toy analyzer: each non-empty line becomes a statement node whose kind is
    /// the line's first word. Every statement holds a terminal per extra word.
    /// A line starting with `!` is a syntax error.
    struct LineAnalyzer;

    fn intern(word: &str) -> &'static str {
        match word {
            "if" => "if",
            "for" => "for",
            "while" => "while",
            "return" => "return",
            _ => "expr",
        }
    }

    impl LanguageAnalyzer for LineAnalyzer {
        fn language(&self) -> &str {
            "lines"
        }

        fn file_extensions(&self) -> &[&str] {
            &["txt"]
        }

        fn parse(&self, source: &str) -> Result<SyntaxNode, ParseError> {
            let mut statements = Vec::new();
            for (idx, line) in source.lines().enumerate() {
                let mut words = line.split_whitespace();
                let Some(head) = words.next() else { continue };
                if head.starts_with('!') {
                    return Err(ParseError::Syntax {
                        line: idx + 1,
                        column: 1,
                    });
                }
                let tokens = words.map(|_| SyntaxNode::leaf("token")).collect();
                statements.push(SyntaxNode::with_children(intern(head), tokens));
            }
            Ok(SyntaxNode::with_children("module", statements))
        }
    }

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn options(workers: usize) -> BatchOptions {
        BatchOptions {
            workers,
            ..BatchOptions::default()
        }
    }

    #[test]
    fn compare_sources_identity_is_zero() {
        let src = "if a b\nfor x\nreturn y\n";
        let cmp = compare_sources(&LineAnalyzer, src, src, &BatchOptions::default()).unwrap();
        assert_eq!(cmp.distance, 0);
        assert_eq!(cmp.score.to_string(), "0.00");
    }

    #[test]
    fn compare_sources_ignores_token_values() {
        let a = "if a b\nreturn y\n";
        let b = "if zz qq\nreturn other\n";
        let cmp = compare_sources(&LineAnalyzer, a, b, &BatchOptions::default()).unwrap();
        assert_eq!(cmp.distance, 0);
    }

    #[test]
    fn keep_policy_sees_token_count_changes() {
        let a = "if a b\n";
        let b = "if a\n";
        let keep = BatchOptions {
            normalization: NormalizationPolicy::Keep,
            ..BatchOptions::default()
        };
        assert_eq!(
            compare_sources(&LineAnalyzer, a, b, &BatchOptions::default())
                .unwrap()
                .distance,
            0
        );
        assert_eq!(compare_sources(&LineAnalyzer, a, b, &keep).unwrap().distance, 1);
    }

    #[test]
    fn compare_sources_reports_parse_error() {
        let err = compare_sources(&LineAnalyzer, "if a\n", "!bad\n", &BatchOptions::default())
            .unwrap_err();
        assert_eq!(err, ParseError::Syntax { line: 1, column: 1 });
    }

    #[test]
    fn batch_preserves_input_order() {
        let tmp = TempDir::new().unwrap();
        let base = write(tmp.path(), "base.txt", "if a\nfor b\nreturn c\n");
        let same = write(tmp.path(), "same.txt", "if x\nfor y\nreturn z\n");
        let other = write(tmp.path(), "other.txt", "while a\n");
        let pairs = vec![
            ComparisonPair::new(&base, &other),
            ComparisonPair::new(&base, &same),
            ComparisonPair::new(&other, &other),
            ComparisonPair::new(&same, &other),
        ];

        let reports = run_batch(&LineAnalyzer, &pairs, &options(3));
        assert_eq!(reports.len(), pairs.len());
        for (report, pair) in reports.iter().zip(&pairs) {
            assert_eq!(&report.pair, pair);
        }
        let scores: Vec<String> = reports
            .iter()
            .map(|r| r.result.as_ref().unwrap().score.to_string())
            .collect();
        assert_eq!(scores, vec!["0.75", "0.00", "0.00", "0.75"]);
    }

    #[test]
    fn worker_count_does_not_change_results() {
        let tmp = TempDir::new().unwrap();
        let files: Vec<_> = (0..6)
            .map(|i| {
                let body = "if a\nfor b\n".repeat(i + 1) + &"return c\n".repeat(i % 3);
                write(tmp.path(), &format!("f{i}.txt"), &body)
            })
            .collect();
        let pairs: Vec<_> = files
            .iter()
            .flat_map(|a| files.iter().map(move |b| ComparisonPair::new(a, b)))
            .collect();

        let render = |reports: Vec<PairReport>| -> Vec<(std::path::PathBuf, String)> {
            reports
                .into_iter()
                .map(|r| (r.pair.left, r.result.unwrap().score.to_string()))
                .collect()
        };
        let serial = render(run_batch(&LineAnalyzer, &pairs, &options(1)));
        let parallel = render(run_batch(&LineAnalyzer, &pairs, &options(8)));
        assert_eq!(serial.len(), pairs.len());
        assert_eq!(serial, parallel);
    }

    #[test]
    fn failures_are_reported_per_pair() {
        let tmp = TempDir::new().unwrap();
        let good = write(tmp.path(), "good.txt", "if a\n");
        let bad = write(tmp.path(), "bad.txt", "if a\n!oops\n");
        let missing = tmp.path().join("missing.txt");
        let pairs = vec![
            ComparisonPair::new(&good, &good),
            ComparisonPair::new(&good, &missing),
            ComparisonPair::new(&bad, &good),
            ComparisonPair::new(&good, &good),
        ];

        let reports = run_batch(&LineAnalyzer, &pairs, &options(2));
        assert!(reports[0].result.is_ok());
        assert!(matches!(
            reports[1].result,
            Err(CompareError::Read { ref path, .. }) if path == &missing
        ));
        assert!(matches!(
            reports[2].result,
            Err(CompareError::Parse { source: ParseError::Syntax { line: 2, .. }, .. })
        ));
        assert!(reports[3].result.is_ok());

        assert_eq!(
            summarize(&reports),
            BatchSummary {
                scored: 2,
                failed: 2
            }
        );
    }

    #[test]
    fn zero_timeout_reports_timeout() {
        let tmp = TempDir::new().unwrap();
        let file = write(tmp.path(), "a.txt", "if a\nfor b\n");
        let pairs = vec![ComparisonPair::new(&file, &file)];
        let opts = BatchOptions {
            timeout: Some(Duration::ZERO),
            ..BatchOptions::default()
        };
        let reports = run_batch(&LineAnalyzer, &pairs, &opts);
        assert!(matches!(
            reports[0].result,
            Err(CompareError::Timeout { limit_ms: 0 })
        ));
    }

    #[test]
    fn empty_batch_yields_no_reports() {
        let reports = run_batch(&LineAnalyzer, &[], &options(4));
        assert!(reports.is_empty());
        assert_eq!(summarize(&reports), BatchSummary::default());
    }

    #[test]
    fn options_from_config() {
        let config = Config {
            workers: 7,
            timeout_ms: Some(50),
            ..Config::default()
        };
        let opts = BatchOptions::from(&config);
        assert_eq!(opts.workers, 7);
        assert_eq!(opts.timeout, Some(Duration::from_millis(50)));
    }
}
