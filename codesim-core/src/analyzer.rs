use std::path::Path;

use crate::error::ParseError;
use crate::node::SyntaxNode;

/// Trait for language-specific parsing.
///
/// Implementors wrap a grammar-aware parser and turn source text into a
/// [`SyntaxNode`] tree. The engine treats them as a black box: everything after
/// parsing (normalization, flattening, distance) is language independent.
///
/// Analyzers are shared by every worker of a batch, hence `Send + Sync`.
pub trait LanguageAnalyzer: Send + Sync {
    /// Human-readable language name, used in log output.
    fn language(&self) -> &str;

    /// File extensions this analyzer handles (without the leading dot).
    fn file_extensions(&self) -> &[&str];

    /// Whether `path` carries one of [`Self::file_extensions`].
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.file_extensions().contains(&ext))
    }

    /// Parse source text into a syntax tree rooted at the grammar's top-level node.
    ///
    /// Source that is not valid for the grammar must be rejected with a
    /// [`ParseError`] rather than returned as a partial tree.
    fn parse(&self, source: &str) -> Result<SyntaxNode, ParseError>;
}
