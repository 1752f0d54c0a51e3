//! Python language analyzer for the `codesim-core` similarity engine.
//!
//! This crate provides [`PythonAnalyzer`], which implements the
//! [`codesim_core::analyzer::LanguageAnalyzer`] trait using tree-sitter's
//! Python grammar.

pub mod parser;

use codesim_core::analyzer::LanguageAnalyzer;
use codesim_core::error::ParseError;
use codesim_core::node::SyntaxNode;

/// Python language analyzer using tree-sitter for parsing.
pub struct PythonAnalyzer;

impl PythonAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for PythonAnalyzer {
    fn language(&self) -> &str {
        "python"
    }

    fn file_extensions(&self) -> &[&str] {
        &["py", "pyi"]
    }

    fn parse(&self, source: &str) -> Result<SyntaxNode, ParseError> {
        parser::parse_source(source)
    }
}
