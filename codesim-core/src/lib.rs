//! Structural similarity engine.
//!
//! A source file is parsed into a [`node::SyntaxNode`] tree by a
//! [`analyzer::LanguageAnalyzer`], stripped of terminal tokens by the
//! [`normalizer`], linearized into a [`flatten::LabelSequence`], and compared
//! with another sequence by label edit distance ([`distance`]). The
//! [`scheduler`] runs that pipeline for a whole manifest of file pairs on a
//! fixed pool of workers and returns results in manifest order.

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod distance;
pub mod error;
pub mod flatten;
pub mod manifest;
pub mod node;
pub mod normalizer;
pub mod output;
pub mod scheduler;

pub use distance::{Comparison, Score};
pub use manifest::ComparisonPair;
pub use scheduler::{BatchOptions, PairReport, run_batch};
