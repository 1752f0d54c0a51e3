use std::cell::RefCell;

use tree_sitter::{Node, Parser, TreeCursor};

use codesim_core::error::ParseError;
use codesim_core::node::{Position, Span, SyntaxNode};

thread_local! {
    // One parser per worker thread; tree-sitter parsers are cheap to reuse but not `Sync`.
    static PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

fn new_parser() -> Result<Parser, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseError::Grammar(e.to_string()))?;
    Ok(parser)
}

/// Parse Python source into a syntax tree of named nodes.
///
/// Anonymous tokens (keywords, punctuation) and comments are left out. Source
/// containing any `ERROR` or `MISSING` node is rejected with the position of the
/// first one.
pub fn parse_source(source: &str) -> Result<SyntaxNode, ParseError> {
    PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(new_parser()?);
        }
        let parser = slot.as_mut().ok_or(ParseError::Aborted)?;
        let tree = parser.parse(source, None).ok_or(ParseError::Aborted)?;
        let root = tree.root_node();
        if root.has_error() {
            let at = first_error(root).unwrap_or(root);
            let start = position(at.start_position());
            return Err(ParseError::Syntax {
                line: start.line,
                column: start.column,
            });
        }
        convert(root).ok_or(ParseError::Aborted)
    })
}

fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() {
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    None
}

/// A node whose children are still being converted.
struct Frame<'tree> {
    node: Node<'tree>,
    pending: std::vec::IntoIter<Node<'tree>>,
    done: Vec<SyntaxNode>,
}

impl<'tree> Frame<'tree> {
    fn enter(node: Node<'tree>, cursor: &mut TreeCursor<'tree>) -> Self {
        let pending: Vec<_> = node
            .named_children(cursor)
            .filter(|child| !child.is_extra())
            .collect();
        Self {
            node,
            done: Vec::with_capacity(pending.len()),
            pending: pending.into_iter(),
        }
    }

    fn finish(self) -> SyntaxNode {
        SyntaxNode {
            kind: self.node.kind(),
            children: self.done,
            span: Some(Span {
                start: position(self.node.start_position()),
                end: position(self.node.end_position()),
            }),
        }
    }
}

/// Convert bottom-up with an explicit stack; expression chains can nest
/// deeper than a thread's stack allows.
fn convert(root: Node<'_>) -> Option<SyntaxNode> {
    let mut cursor = root.walk();
    let mut stack = vec![Frame::enter(root, &mut cursor)];
    while let Some(mut frame) = stack.pop() {
        if let Some(child) = frame.pending.next() {
            stack.push(frame);
            stack.push(Frame::enter(child, &mut cursor));
            continue;
        }
        let node = frame.finish();
        match stack.last_mut() {
            Some(parent) => parent.done.push(node),
            None => return Some(node),
        }
    }
    None
}

fn position(point: tree_sitter::Point) -> Position {
    Position {
        line: point.row + 1,
        column: point.column + 1,
    }
}
