/// A position in source text. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Source range covered by a node. Carried for diagnostics only; comparison ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// A node of a parsed program.
///
/// `kind` is the grammar construct the node represents (e.g. `function_definition`,
/// `binary_operator`, `identifier`). Kinds come from the grammar as interned static
/// strings, so two nodes have the same type exactly when their `kind` strings are equal.
///
/// Each node exclusively owns its children; a file parses to a single tree rooted at a
/// `module` node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxNode {
    pub kind: &'static str,
    pub children: Vec<SyntaxNode>,
    pub span: Option<Span>,
}

impl SyntaxNode {
    /// Create a terminal node (no children).
    #[must_use]
    pub fn leaf(kind: &'static str) -> Self {
        Self {
            kind,
            children: vec![],
            span: None,
        }
    }

    /// Create a node with children.
    #[must_use]
    pub fn with_children(kind: &'static str, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            children,
            span: None,
        }
    }

    /// Attach a source span.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Whether this node is a terminal token.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }
}

// Long operator chains nest thousands of levels deep; dropping them
// recursively would overflow a worker's stack.
impl Drop for SyntaxNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// A syntax tree after normalization.
///
/// `root` is `None` when normalization removed every node, which happens for an
/// empty file: its `module` root has no children and is itself a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTree {
    pub root: Option<SyntaxNode>,
}

impl NormalizedTree {
    #[must_use]
    pub fn empty() -> Self {
        Self { root: None }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, count_nodes)
    }
}

/// Count the nodes of a tree, root included.
#[must_use]
pub fn count_nodes(node: &SyntaxNode) -> usize {
    let mut count = 0;
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        count += 1;
        stack.extend(&node.children);
    }
    count
}
