use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use codesim_core::cli::{self, CliOverrides};
use codesim_core::flatten::Traversal;
use codesim_core::normalizer::NormalizationPolicy;
use codesim_core::output::OutputFormat;
use codesim_python::PythonAnalyzer;

#[derive(Parser)]
#[command(
    name = "codesim",
    version,
    about = "Score structural similarity between pairs of Python files"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score every pair listed in a manifest.
    Compare {
        /// Manifest with one whitespace-separated pair of paths per line.
        manifest: PathBuf,

        /// Scores file to write (defaults to stdout).
        scores: Option<PathBuf>,

        /// Number of parallel workers.
        #[arg(short, long)]
        workers: Option<usize>,

        /// Tree traversal used to build label sequences.
        #[arg(long)]
        traversal: Option<Traversal>,

        /// Whether terminal tokens are pruned before comparison.
        #[arg(long)]
        normalization: Option<NormalizationPolicy>,

        /// Per-pair time limit in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Output format.
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Config file (defaults to codesim.toml next to the manifest).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the label sequence of one file.
    Labels {
        /// Source file to parse.
        file: PathBuf,

        /// Tree traversal used to build the sequence.
        #[arg(long, default_value = "pre-order")]
        traversal: Traversal,

        /// Whether terminal tokens are pruned.
        #[arg(long, default_value = "prune")]
        normalization: NormalizationPolicy,
    },
}

/// Install the stderr log subscriber. `CODESIM_LOG` takes `EnvFilter` directives.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("CODESIM_LOG").unwrap_or_else(|_| EnvFilter::new("codesim=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let Cli { command } = Cli::parse();

    let analyzer = PythonAnalyzer::new();
    let stdout = std::io::stdout();
    let mut writer = stdout.lock();

    let result = match command {
        Command::Compare {
            manifest,
            scores,
            workers,
            traversal,
            normalization,
            timeout_ms,
            format,
            config,
        } => {
            let overrides = CliOverrides {
                config,
                workers,
                traversal,
                normalization,
                timeout_ms,
                format,
            };
            cli::cmd_compare(
                &analyzer,
                &manifest,
                scores.as_deref(),
                &overrides,
                &mut writer,
            )
            .map(|_| ())
        }
        Command::Labels {
            file,
            traversal,
            normalization,
        } => cli::cmd_labels(&analyzer, &file, traversal, normalization, &mut writer),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}
